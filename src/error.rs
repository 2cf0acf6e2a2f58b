use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum QuesthookError {
    #[error("Authentication aborted: callback request carried no token")]
    AuthAborted,

    #[error("Timed out waiting for authentication callback after {}s", .0.as_secs())]
    AuthTimeout(Duration),

    #[error("Tracking service rejected the token (401 Unauthorized)")]
    Unauthorized,

    #[error("Failed to update server: {status_text} ({status})")]
    ReportRejected { status: u16, status_text: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error in config {}: {detail}", path.display())]
    ConfigError { path: PathBuf, detail: String },

    #[error("Cannot read deployments at {}: {detail}", path.display())]
    DeploymentError { path: PathBuf, detail: String },

    #[error("Cannot determine chain id: {0}")]
    ChainIdError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuesthookError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            QuesthookError::AuthAborted => "auth_aborted",
            QuesthookError::AuthTimeout(_) => "timeout",
            QuesthookError::Unauthorized => "unauthorized",
            QuesthookError::ReportRejected { .. } => "report_rejected",
            QuesthookError::Http(_) => "http_error",
            QuesthookError::ConfigError { .. } => "config_error",
            QuesthookError::DeploymentError { .. } => "deployment_error",
            QuesthookError::ChainIdError(_) => "chain_id_error",
            QuesthookError::InvalidArgument(_) => "invalid_argument",
            QuesthookError::Io(_) => "io_error",
        }
    }

    /// HTTP status attached to the error, if the tracking service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            QuesthookError::Unauthorized => Some(401),
            QuesthookError::ReportRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(status) = self.status() {
            obj.insert("status".into(), serde_json::Value::from(status));
        }
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        serde_json::json!({ "error": obj })
    }
}
