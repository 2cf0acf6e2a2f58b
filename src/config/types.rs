use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVICE_URL: &str = "https://eq.byteatatime.dev";
pub const DEFAULT_CHALLENGE_SLUG: &str = "test";
pub const DEFAULT_NETWORK: &str = "localhost";
pub const TOKEN_FILE_NAME: &str = ".ethereum-quest-token";

/// One config file as written on disk. Every field is optional so several
/// files can be layered; see [`ConfigFile::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployments_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_browser: Option<bool>,
}

impl ConfigFile {
    /// Fill fields that are still unset from `lower`. Fields already set win.
    pub fn merge(&mut self, lower: ConfigFile) {
        fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
            if slot.is_none() {
                *slot = value;
            }
        }
        fill(&mut self.service_url, lower.service_url);
        fill(&mut self.challenge_slug, lower.challenge_slug);
        fill(&mut self.token_path, lower.token_path);
        fill(&mut self.deployments_dir, lower.deployments_dir);
        fill(&mut self.network, lower.network);
        fill(&mut self.rpc_url, lower.rpc_url);
        fill(&mut self.auth_timeout_secs, lower.auth_timeout_secs);
        fill(&mut self.open_browser, lower.open_browser);
    }

    /// Apply built-in defaults to whatever is left unset.
    pub fn resolve(self) -> HookConfig {
        HookConfig {
            service_url: self
                .service_url
                .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            challenge_slug: self
                .challenge_slug
                .unwrap_or_else(|| DEFAULT_CHALLENGE_SLUG.to_string()),
            token_path: self
                .token_path
                .map(|p| expand_home(&p))
                .unwrap_or_else(default_token_path),
            deployments_dir: self
                .deployments_dir
                .map(|p| expand_home(&p))
                .unwrap_or_else(|| PathBuf::from("deployments")),
            network: self.network.unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
            rpc_url: self.rpc_url,
            auth_timeout: self.auth_timeout_secs.map(Duration::from_secs),
            open_browser: self.open_browser.unwrap_or(true),
        }
    }
}

/// Fully resolved settings the hook runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct HookConfig {
    pub service_url: String,
    pub challenge_slug: String,
    pub token_path: PathBuf,
    pub deployments_dir: PathBuf,
    pub network: String,
    pub rpc_url: Option<String>,
    /// `None` waits for the browser callback indefinitely.
    pub auth_timeout: Option<Duration>,
    pub open_browser: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        ConfigFile::default().resolve()
    }
}

pub fn default_token_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(TOKEN_FILE_NAME)
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
