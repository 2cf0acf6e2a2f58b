use reqwest::StatusCode;
use serde::Serialize;

use crate::config::HookConfig;
use crate::deployments::{DeployedContracts, Deployment};
use crate::error::QuesthookError;

pub const SUBMIT_PATH: &str = "/api/submitDeployedContracts";

/// JSON body of the submit call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody<'a> {
    pub token: &'a str,
    pub chain_id: u64,
    pub deployed_contracts: &'a DeployedContracts,
    pub challenge_slug: &'a str,
}

/// Client for the tracking service's submit endpoint.
#[derive(Debug, Clone)]
pub struct ReportClient {
    client: reqwest::Client,
    endpoint: String,
    challenge_slug: String,
}

impl ReportClient {
    pub fn new(service_url: &str, challenge_slug: &str) -> Result<Self, QuesthookError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("questhook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{SUBMIT_PATH}", service_url.trim_end_matches('/')),
            challenge_slug: challenge_slug.to_string(),
        })
    }

    pub fn from_config(config: &HookConfig) -> Result<Self, QuesthookError> {
        Self::new(&config.service_url, &config.challenge_slug)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one report.
    ///
    /// A 401 comes back as [`QuesthookError::Unauthorized`] so the caller can
    /// re-authenticate; any other non-2xx is [`QuesthookError::ReportRejected`].
    pub async fn submit(&self, token: &str, deployment: &Deployment) -> Result<(), QuesthookError> {
        let body = SubmitBody {
            token,
            chain_id: deployment.chain_id,
            deployed_contracts: &deployment.contracts,
            challenge_slug: &self.challenge_slug,
        };

        tracing::debug!(
            "Submitting {} contract(s) on chain {} to {}",
            deployment.contracts.len(),
            deployment.chain_id,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(QuesthookError::Unauthorized);
        }

        let detail = response.text().await.unwrap_or_default();
        if !detail.is_empty() {
            tracing::debug!("Tracking service answered {status}: {detail}");
        }
        Err(QuesthookError::ReportRejected {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string(),
        })
    }
}
