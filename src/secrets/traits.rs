//! secrets::traits
//!
//! The key-value interface every credential backend implements.
//!
//! Keys are dotted names such as `atomgit.token`. Backends store them
//! verbatim. Values are never written to logs or error messages.

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Messages describe the failing step, never the secret.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Failed to delete from secret storage.
    #[error("failed to delete secret: {0}")]
    DeleteError(String),

    /// Provider not available or not configured.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// A credential backend.
///
/// `delete` is idempotent: removing an absent key succeeds.
pub trait SecretStore: Send + Sync {
    /// Read a secret. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Store a secret, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Remove a secret.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    /// Whether a secret is stored under `key`.
    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_step() {
        assert!(SecretError::ReadError("disk".into())
            .to_string()
            .starts_with("failed to read"));
        assert!(SecretError::WriteError("disk".into())
            .to_string()
            .starts_with("failed to write"));
        assert!(SecretError::DeleteError("disk".into())
            .to_string()
            .starts_with("failed to delete"));
        assert!(SecretError::ProviderNotAvailable("vault".into())
            .to_string()
            .contains("vault"));
    }
}
