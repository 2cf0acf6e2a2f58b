pub mod http_mock;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use questhook::{Authenticator, DeployedContracts, Deployment, QuesthookError, TokenStore};

/// Stands in for the browser handshake: hands out a fixed token and records
/// what the cache held each time it was asked.
#[allow(dead_code)]
pub struct FakeAuthenticator {
    token: String,
    calls: AtomicUsize,
    cache_seen: Mutex<Vec<Option<String>>>,
}

#[allow(dead_code)]
impl FakeAuthenticator {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            calls: AtomicUsize::new(0),
            cache_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn cache_seen(&self) -> Vec<Option<String>> {
        self.cache_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn authenticate(&self, store: &dyn TokenStore) -> Result<String, QuesthookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cache_seen.lock().unwrap().push(store.load()?);
        store.store(&self.token)?;
        Ok(self.token.clone())
    }
}

#[allow(dead_code)]
pub fn sample_deployment() -> Deployment {
    Deployment {
        chain_id: 31337,
        contracts: DeployedContracts::from([
            (
                "Greeter".to_string(),
                "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            ),
            (
                "Vault".to_string(),
                "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string(),
            ),
        ]),
    }
}

/// Lay out `<root>/localhost/` the way hardhat-deploy does.
#[allow(dead_code)]
pub fn write_hardhat_deployments(root: &Path) {
    let net = root.join("localhost");
    std::fs::create_dir_all(&net).unwrap();
    std::fs::write(net.join(".chainId"), "31337").unwrap();
    std::fs::write(
        net.join("Greeter.json"),
        r#"{"address": "0x5FbDB2315678afecb367f032d93F642f64180aa3", "abi": []}"#,
    )
    .unwrap();
}
