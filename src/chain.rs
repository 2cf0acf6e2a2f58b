use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deployments::read_chain_id_file;
use crate::error::QuesthookError;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Pick the chain id for this run.
///
/// Precedence: an explicit value, then `eth_chainId` against `rpc_url`, then
/// the `.chainId` file in `network_dir`.
pub async fn resolve_chain_id(
    explicit: Option<u64>,
    rpc_url: Option<&str>,
    network_dir: &Path,
) -> Result<u64, QuesthookError> {
    if let Some(id) = explicit {
        return Ok(id);
    }
    if let Some(url) = rpc_url {
        return fetch_chain_id(url).await;
    }
    read_chain_id_file(network_dir)?.ok_or_else(|| {
        QuesthookError::ChainIdError(format!(
            "no .chainId in {}; pass --chain-id or --rpc-url",
            network_dir.display()
        ))
    })
}

/// Ask a node for its chain id over JSON-RPC.
pub async fn fetch_chain_id(rpc_url: &str) -> Result<u64, QuesthookError> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method: "eth_chainId",
        params: Vec::new(),
    };

    let response = reqwest::Client::new()
        .post(rpc_url)
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(QuesthookError::ChainIdError(format!(
            "{rpc_url} returned status {}",
            response.status()
        )));
    }

    let body: JsonRpcResponse = response.json().await?;
    if let Some(err) = body.error {
        return Err(QuesthookError::ChainIdError(format!(
            "eth_chainId failed ({}): {}",
            err.code, err.message
        )));
    }
    let quantity = body
        .result
        .ok_or_else(|| QuesthookError::ChainIdError("eth_chainId returned no result".into()))?;

    let chain_id = parse_hex_quantity(&quantity)?;
    tracing::debug!("Node at {rpc_url} reports chain id {chain_id}");
    Ok(chain_id)
}

/// Parse an Ethereum JSON-RPC quantity such as `0x7a69`.
pub fn parse_hex_quantity(quantity: &str) -> Result<u64, QuesthookError> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| QuesthookError::ChainIdError(format!("'{quantity}' is not a hex quantity")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| QuesthookError::ChainIdError(format!("'{quantity}': {e}")))
}
