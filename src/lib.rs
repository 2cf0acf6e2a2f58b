pub mod args;
pub mod auth;
pub mod chain;
pub mod cli;
pub mod config;
pub mod deployments;
pub mod error;
pub mod hook;
pub mod report;

pub use auth::{Authenticator, BrowserAuthenticator, FileTokenStore, MemoryTokenStore, TokenStore};
pub use config::{load_config, ConfigFile, HookConfig};
pub use deployments::{DeployedContracts, Deployment};
pub use error::QuesthookError;
pub use hook::DeployHook;
pub use report::ReportClient;
