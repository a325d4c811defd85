//! Session state: the stored bearer tokens and the sign-in state derived from them.
mod gate;
mod store;

pub use gate::*;
pub use store::*;

use crate::gateway::TokenPair;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Whether a usable access token is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// A log-safe identifier for a token.
///
/// The token is hashed so the raw credential never lands in logs.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    pub fn from_token(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        let hash = result[..8].iter().map(|b| format!("{:02x}", b)).collect();
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

/// The signed-in session, shared by everything that needs a token.
///
/// This is the only place tokens are read from or written to storage.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// A session persisted in `path`.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileTokenStore::new(path)))
    }

    /// A session that lives only as long as this process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn access_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .store
            .get(TokenKey::Access)?
            .filter(|t| !t.trim().is_empty()))
    }

    pub fn refresh_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .store
            .get(TokenKey::Refresh)?
            .filter(|t| !t.trim().is_empty()))
    }

    /// Presence of the access token decides the state; it is never validated here.
    pub fn state(&self) -> Result<AuthState, SessionError> {
        Ok(match self.access_token()? {
            Some(_) => AuthState::Authenticated,
            None => AuthState::Anonymous,
        })
    }

    pub fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.state()? == AuthState::Authenticated)
    }

    /// Stores a freshly issued token pair.
    pub fn sign_in(&self, tokens: &TokenPair) -> Result<(), SessionError> {
        self.store.set(TokenKey::Access, &tokens.access)?;
        self.store.set(TokenKey::Refresh, &tokens.refresh)?;
        info!(
            token = %TokenFingerprint::from_token(&tokens.access),
            "Signed in"
        );
        Ok(())
    }

    /// Replaces only the access token.
    pub fn replace_access_token(&self, access: &str) -> Result<(), SessionError> {
        self.store.set(TokenKey::Access, access)
    }

    /// Forgets both tokens.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.store.remove(TokenKey::Access)?;
        self.store.remove(TokenKey::Refresh)?;
        info!("Signed out");
        Ok(())
    }

    /// Fingerprint of the current access token, for logging.
    pub fn fingerprint(&self) -> Result<Option<TokenFingerprint>, SessionError> {
        Ok(self
            .access_token()?
            .map(|t| TokenFingerprint::from_token(&t)))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str) -> TokenPair {
        TokenPair {
            access: access.to_string(),
            refresh: format!("{access}-refresh"),
        }
    }

    #[test]
    fn test_state_follows_access_token() {
        let session = Session::in_memory();
        assert_eq!(session.state().unwrap(), AuthState::Anonymous);

        session.sign_in(&pair("tok")).unwrap();
        assert_eq!(session.state().unwrap(), AuthState::Authenticated);
        assert_eq!(session.refresh_token().unwrap().as_deref(), Some("tok-refresh"));

        session.sign_out().unwrap();
        assert_eq!(session.state().unwrap(), AuthState::Anonymous);
        assert_eq!(session.refresh_token().unwrap(), None);
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        let session = Session::in_memory();
        session.replace_access_token("   ").unwrap();
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn test_fingerprint_hides_token() {
        let a = TokenFingerprint::from_token("secret-token");
        let b = TokenFingerprint::from_token("secret-token");
        let c = TokenFingerprint::from_token("other-token");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.to_string().contains("secret"));
        assert_eq!(a.as_str().len(), 16);
    }
}
