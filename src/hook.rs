use std::sync::Arc;

use crate::auth::{Authenticator, BrowserAuthenticator, FileTokenStore, TokenStore};
use crate::config::HookConfig;
use crate::deployments::Deployment;
use crate::error::QuesthookError;
use crate::report::ReportClient;

/// The post-deploy sequence: get a token, submit, and re-authenticate once
/// if the service rejects the token.
pub struct DeployHook {
    store: Arc<dyn TokenStore>,
    authenticator: Arc<dyn Authenticator>,
    reporter: ReportClient,
}

impl DeployHook {
    pub fn new(
        store: Arc<dyn TokenStore>,
        authenticator: Arc<dyn Authenticator>,
        reporter: ReportClient,
    ) -> Self {
        Self {
            store,
            authenticator,
            reporter,
        }
    }

    /// File-backed cache plus the browser handshake, as configured.
    /// `json_output` keeps the browser prompt off stdout.
    pub fn from_config(config: &HookConfig, json_output: bool) -> Result<Self, QuesthookError> {
        Ok(Self::new(
            Arc::new(FileTokenStore::new(&config.token_path)),
            Arc::new(BrowserAuthenticator::from_config(config).json_output(json_output)),
            ReportClient::from_config(config)?,
        ))
    }

    /// The cached token, or a fresh one if the cache is empty.
    pub async fn token(&self) -> Result<String, QuesthookError> {
        match self.store.load()? {
            Some(token) => {
                tracing::debug!("Using cached token");
                Ok(token)
            }
            None => {
                tracing::info!("No cached token, starting authentication");
                self.authenticator.authenticate(self.store.as_ref()).await
            }
        }
    }

    /// Report `deployment`.
    ///
    /// On a 401 the cached token is discarded, authentication runs exactly once
    /// more and the report is retried exactly once. Every other failure, and
    /// any failure of the retry, is returned as is.
    pub async fn run(&self, deployment: &Deployment) -> Result<(), QuesthookError> {
        let token = self.token().await?;

        match self.reporter.submit(&token, deployment).await {
            Err(QuesthookError::Unauthorized) => {
                tracing::warn!("Tracking service rejected the cached token, re-authenticating");
                self.store.clear()?;
                let token = self.authenticator.authenticate(self.store.as_ref()).await?;
                self.reporter.submit(&token, deployment).await
            }
            other => other,
        }
    }
}
