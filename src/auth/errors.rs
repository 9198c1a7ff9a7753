//! auth::errors
//!
//! Errors from the credential cache and the authorization handshake.
//!
//! # Example
//!
//! ```
//! use atomgit_code_api::auth::AuthError;
//!
//! let err = AuthError::MalformedCallback("missing data".to_string());
//! assert!(err.to_string().contains("missing data"));
//! ```

use thiserror::Error;

use crate::secrets::SecretError;

/// Errors from authorization.
///
/// Messages never carry token values.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The external authorization flow could not be started or driven.
    #[error("authorization flow failed: {0}")]
    Flow(String),

    /// A callback addressed to this provider had no usable payload.
    #[error("malformed authorization callback: {0}")]
    MalformedCallback(String),

    /// Reading or writing the stored credential failed.
    #[error("secret store error: {0}")]
    SecretStore(String),

    /// Internal error (should not happen).
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl From<SecretError> for AuthError {
    fn from(err: SecretError) -> Self {
        AuthError::SecretStore(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            AuthError::Flow("no browser".into()).to_string(),
            "authorization flow failed: no browser"
        );
        assert!(AuthError::Internal("x".into())
            .to_string()
            .starts_with("internal"));
    }

    #[test]
    fn from_secret_error() {
        let err: AuthError = SecretError::WriteError("disk full".into()).into();
        assert!(matches!(err, AuthError::SecretStore(ref m) if m.contains("disk full")));
    }
}
