use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::types::default_token_path;
use crate::error::QuesthookError;

/// A single-slot credential store: either empty or holding one token.
pub trait TokenStore: Send + Sync {
    /// Return the cached token, or `None` when nothing is cached.
    fn load(&self) -> Result<Option<String>, QuesthookError>;

    /// Replace whatever is cached with `token`.
    fn store(&self, token: &str) -> Result<(), QuesthookError>;

    /// Drop the cached token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), QuesthookError>;
}

/// Token kept as a raw string in a plain-text file.
///
/// The contents are returned verbatim, except that one trailing line ending
/// is dropped so a hand-written file (`echo tok > file`) still works. An empty
/// file counts as no token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(default_token_path())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, QuesthookError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = strip_line_ending(&contents);
                if token.is_empty() {
                    tracing::debug!("Token cache {} is empty", self.path.display());
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, token: &str) -> Result<(), QuesthookError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token)?;
        tracing::debug!("Cached token at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), QuesthookError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed cached token {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn strip_line_ending(contents: &str) -> &str {
    contents
        .strip_suffix("\r\n")
        .or_else(|| contents.strip_suffix('\n'))
        .unwrap_or(contents)
}

/// In-process store, used when nothing should touch the filesystem.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, QuesthookError> {
        Ok(self.slot().clone())
    }

    fn store(&self, token: &str) -> Result<(), QuesthookError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), QuesthookError> {
        *self.slot() = None;
        Ok(())
    }
}
