use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::auth::cache::TokenStore;
use crate::auth::callback::CallbackListener;
use crate::cli::output;
use crate::config::HookConfig;
use crate::error::QuesthookError;

/// Something that can obtain a fresh token and leave it in the store.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, store: &dyn TokenStore) -> Result<String, QuesthookError>;
}

type PromptFn = Arc<dyn Fn(&Url) + Send + Sync>;

/// Browser redirect handshake against the tracking service's `/auth` page.
#[derive(Clone)]
pub struct BrowserAuthenticator {
    service_url: String,
    open_browser: bool,
    timeout: Option<Duration>,
    prompt: PromptFn,
}

impl fmt::Debug for BrowserAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserAuthenticator")
            .field("service_url", &self.service_url)
            .field("open_browser", &self.open_browser)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BrowserAuthenticator {
    pub fn new(service_url: &str) -> Self {
        Self {
            service_url: service_url.trim_end_matches('/').to_string(),
            open_browser: true,
            timeout: None,
            prompt: Arc::new(|url: &Url| output::print_auth_prompt(url.as_str(), false)),
        }
    }

    pub fn from_config(config: &HookConfig) -> Self {
        Self::new(&config.service_url)
            .open_browser(config.open_browser)
            .timeout(config.auth_timeout)
    }

    /// Keep stdout clean for machine-readable output: the prompt goes to stderr.
    pub fn json_output(self, json: bool) -> Self {
        self.on_prompt(move |url| output::print_auth_prompt(url.as_str(), json))
    }

    /// Replace how the authorization URL is shown to the operator.
    pub fn on_prompt(mut self, prompt: impl Fn(&Url) + Send + Sync + 'static) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    pub fn open_browser(mut self, open: bool) -> Self {
        self.open_browser = open;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Authenticator for BrowserAuthenticator {
    async fn authenticate(&self, store: &dyn TokenStore) -> Result<String, QuesthookError> {
        let listener = CallbackListener::bind().await?;
        let auth_url = authorization_url(&self.service_url, &listener.callback_url())?;

        (self.prompt)(&auth_url);
        if self.open_browser {
            if let Err(e) = webbrowser::open(auth_url.as_str()) {
                tracing::warn!("Could not open browser automatically: {e}");
            }
        }

        complete_authentication(listener, store, self.timeout).await
    }
}

/// Wait for the callback on an already-bound listener and cache the token.
/// Nothing is written to the store unless a token actually arrives.
pub async fn complete_authentication(
    listener: CallbackListener,
    store: &dyn TokenStore,
    timeout: Option<Duration>,
) -> Result<String, QuesthookError> {
    let token = listener.wait_for_token(timeout).await?;
    store.store(&token)?;
    tracing::info!("Authentication complete, token cached");
    Ok(token)
}

/// `https://<service>/auth?r=<url-encoded callback>`
pub fn authorization_url(service_url: &str, callback_url: &str) -> Result<Url, QuesthookError> {
    let base = format!("{}/auth", service_url.trim_end_matches('/'));
    Url::parse_with_params(&base, &[("r", callback_url)]).map_err(|e| {
        QuesthookError::InvalidArgument(format!("Invalid service URL '{service_url}': {e}"))
    })
}
