//! auth::credential
//!
//! The in-memory bearer token and its persistent copy.
//!
//! # Design
//!
//! [`CredentialCache`] holds the token behind a `RwLock` so request
//! execution can read it from any task. The secret store is the durable
//! copy: a token set here is written through, and clearing removes both.
//! A token configured statically (`[platform] token`) takes precedence
//! over the stored one at load time.
//!
//! An empty string is never held; it counts as absent.

use std::sync::RwLock;

use super::errors::AuthError;
use crate::secrets::SecretStore;

/// Secret store key for the AtomGit access token.
pub const TOKEN_SECRET_KEY: &str = "atomgit.token";

/// Process-wide token cache.
pub struct CredentialCache {
    store: Box<dyn SecretStore>,
    token: RwLock<Option<String>>,
}

impl CredentialCache {
    /// Cache seeded from `static_token`, else from the store.
    ///
    /// A store read failure is logged and treated as "no token"; the
    /// handshake can still obtain one.
    pub fn load(store: Box<dyn SecretStore>, static_token: Option<String>) -> Self {
        let initial = match static_token.filter(|t| !t.is_empty()) {
            Some(token) => Some(token),
            None => match store.get(TOKEN_SECRET_KEY) {
                Ok(token) => token.filter(|t| !t.is_empty()),
                Err(e) => {
                    tracing::warn!(error = %e, "could not read stored credential");
                    None
                }
            },
        };

        tracing::debug!(has_token = initial.is_some(), "credential loaded");
        Self {
            store,
            token: RwLock::new(initial),
        }
    }

    /// Cache with no token, backed by `store`.
    pub fn empty(store: Box<dyn SecretStore>) -> Self {
        Self {
            store,
            token: RwLock::new(None),
        }
    }

    /// The current token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// Whether a non-empty token is held.
    pub fn is_present(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// Replace the token in memory and in the store.
    ///
    /// Setting an empty token is the same as [`clear`](Self::clear).
    pub fn set_token(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return self.clear();
        }

        self.store.set(TOKEN_SECRET_KEY, token)?;
        let mut slot = self
            .token
            .write()
            .map_err(|_| AuthError::Internal("credential lock poisoned".into()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    /// Forget the token in memory and in the store.
    pub fn clear(&self) -> Result<(), AuthError> {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        self.store.delete(TOKEN_SECRET_KEY)?;
        Ok(())
    }
}

// Custom Debug to avoid exposing token
impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("has_token", &self.is_present())
            .finish()
    }
}
