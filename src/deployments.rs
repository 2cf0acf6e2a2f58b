use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::chain::resolve_chain_id;
use crate::config::HookConfig;
use crate::error::QuesthookError;

/// Contract name -> on-chain address.
pub type DeployedContracts = BTreeMap<String, String>;

/// Everything the tracking service needs to know about one deploy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub chain_id: u64,
    pub contracts: DeployedContracts,
}

#[derive(Debug, Deserialize)]
struct DeploymentArtifact {
    #[serde(default)]
    address: Option<String>,
}

/// `<deployments_dir>/<network>`, where hardhat-deploy writes its artifacts.
pub fn network_dir(deployments_dir: &Path, network: &str) -> PathBuf {
    deployments_dir.join(network)
}

/// Read every `<Contract>.json` artifact in `dir` into a name -> address map.
///
/// Dotfiles (`.chainId`, `.migrations.json`), subdirectories (`solcInputs`)
/// and non-JSON files are ignored. Artifacts without an `address` are skipped.
pub fn collect_contracts(dir: &Path) -> Result<DeployedContracts, QuesthookError> {
    let entries = std::fs::read_dir(dir).map_err(|e| deployment_error(dir, e.to_string()))?;

    let mut contracts = DeployedContracts::new();
    for entry in entries {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name.starts_with('.') || !path.is_file() {
            continue;
        }
        let Some(name) = file_name.strip_suffix(".json") else {
            continue;
        };

        let raw = std::fs::read_to_string(&path)?;
        let artifact: DeploymentArtifact = serde_json::from_str(&raw)
            .map_err(|e| deployment_error(&path, format!("Invalid JSON: {e}")))?;

        match artifact.address {
            Some(address) => {
                tracing::debug!("Found deployment {name} at {address}");
                contracts.insert(name.to_string(), address);
            }
            None => tracing::warn!("Skipping {}: no address field", path.display()),
        }
    }

    Ok(contracts)
}

/// Read the decimal chain id hardhat-deploy stores in `<dir>/.chainId`.
pub fn read_chain_id_file(dir: &Path) -> Result<Option<u64>, QuesthookError> {
    let path = dir.join(".chainId");
    match std::fs::read_to_string(&path) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|e| {
            QuesthookError::ChainIdError(format!("{} holds '{}': {e}", path.display(), raw.trim()))
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Build the deployment record for this run.
///
/// `extra` entries (from `--contract Name=address`) are layered over the
/// artifacts on disk. A missing deployments directory is only tolerated when
/// `extra` supplies at least one contract.
pub async fn gather(
    config: &HookConfig,
    chain_id: Option<u64>,
    extra: DeployedContracts,
) -> Result<Deployment, QuesthookError> {
    let dir = network_dir(&config.deployments_dir, &config.network);

    let mut contracts = if dir.is_dir() {
        collect_contracts(&dir)?
    } else if extra.is_empty() {
        return Err(deployment_error(&dir, "directory not found".into()));
    } else {
        tracing::debug!("No deployments at {}, using explicit contracts only", dir.display());
        DeployedContracts::new()
    };
    contracts.extend(extra);

    if contracts.is_empty() {
        tracing::warn!("No deployed contracts found in {}", dir.display());
    }

    let chain_id = resolve_chain_id(chain_id, config.rpc_url.as_deref(), &dir).await?;
    Ok(Deployment { chain_id, contracts })
}

fn deployment_error(path: &Path, detail: String) -> QuesthookError {
    QuesthookError::DeploymentError {
        path: path.to_path_buf(),
        detail,
    }
}
