use crate::auth::{Authenticator, BrowserAuthenticator, FileTokenStore, TokenStore};
use crate::config::HookConfig;
use crate::error::QuesthookError;

/// Run the browser handshake and cache the resulting token.
pub async fn run_login(config: &HookConfig) -> Result<(), QuesthookError> {
    let store = FileTokenStore::new(&config.token_path);
    BrowserAuthenticator::from_config(config)
        .authenticate(&store)
        .await?;
    println!("Token cached at {}", store.path().display());
    Ok(())
}

/// Forget the cached token.
pub fn run_logout(config: &HookConfig) -> Result<(), QuesthookError> {
    let store = FileTokenStore::new(&config.token_path);
    store.clear()?;
    println!("Removed cached token at {}", store.path().display());
    Ok(())
}

/// Say whether a token is cached, without printing it.
pub fn run_status(config: &HookConfig) -> Result<(), QuesthookError> {
    let store = FileTokenStore::new(&config.token_path);
    match store.load()? {
        Some(_) => println!("Token cached at {}", store.path().display()),
        None => println!("No cached token ({})", store.path().display()),
    }
    println!("Service: {}", config.service_url);
    println!("Challenge: {}", config.challenge_slug);
    Ok(())
}
