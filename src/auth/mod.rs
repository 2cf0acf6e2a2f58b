pub mod cache;
pub mod callback;
pub mod flow;

pub use cache::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use callback::CallbackListener;
pub use flow::{authorization_url, complete_authentication, Authenticator, BrowserAuthenticator};
