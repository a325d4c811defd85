//! Persistent key/value storage for the session tokens.

use super::SessionError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// The two persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKey {
    Access,
    Refresh,
}

impl TokenKey {
    /// Name the token is stored under.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::Access => "access_token",
            TokenKey::Refresh => "refresh_token",
        }
    }
}

/// Storage backing a [`super::Session`].
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Result<Option<String>, SessionError>;
    fn set(&self, key: TokenKey, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: TokenKey) -> Result<(), SessionError>;
}

/// Tokens kept in a small JSON file, surviving between runs.
///
/// The file is re-read on every access so that several processes sharing it
/// see each other's logins and logouts. Writes replace it atomically with a
/// file only the owner can read.
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

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(values).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        // created 0600 on unix
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), keys = values.len(), "Session file written");
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>, SessionError> {
        Ok(self.read_all()?.remove(key.as_str()))
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), SessionError> {
        let mut values = self.read_all()?;
        values.insert(key.as_str().to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: TokenKey) -> Result<(), SessionError> {
        let mut values = self.read_all()?;
        if values.remove(key.as_str()).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// In-process store, nothing persisted.
#[derive(Default)]
pub struct MemoryTokenStore {
    values: RwLock<BTreeMap<TokenKey, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>, SessionError> {
        let values = self.values.read().map_err(|_| SessionError::Poisoned)?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: TokenKey) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        values.remove(&key);
        Ok(())
    }
}
