//! secrets
//!
//! Where the AtomGit access token lives between runs.
//!
//! # Providers
//!
//! - [`FileSecretStore`]: `~/.atomgit-code/secrets.toml` (default)
//! - [`KeychainSecretStore`]: OS keychain, behind the `keychain` feature
//! - [`MemorySecretStore`]: process-local, for tests and embedders
//!
//! # Security
//!
//! Secret values never appear in logs, `Debug` output or error messages.
//!
//! # Example
//!
//! ```ignore
//! use atomgit_code_api::secrets::create_store;
//!
//! let store = create_store("file")?;
//! store.set("atomgit.token", &token)?;
//! ```

mod file_store;
mod keychain_store;
mod memory_store;
mod traits;

pub use file_store::FileSecretStore;
pub use keychain_store::{KeychainSecretStore, KEYCHAIN_SERVICE};
pub use memory_store::MemorySecretStore;
pub use traits::{SecretError, SecretStore};

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Build the store named by the `[secrets] provider` setting.
///
/// # Errors
///
/// - unknown provider name
/// - `keychain` without the `keychain` feature
pub fn create_store(provider: &str) -> Result<Box<dyn SecretStore>, SecretError> {
    match provider {
        "file" => Ok(Box::new(FileSecretStore::new()?)),
        "keychain" => Ok(Box::new(KeychainSecretStore::new()?)),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: file, keychain)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider() {
        let err = create_store("vault").err().unwrap();
        assert!(matches!(err, SecretError::ProviderNotAvailable(ref m) if m.contains("vault")));
    }

    #[cfg(not(feature = "keychain"))]
    #[test]
    fn keychain_needs_feature() {
        let err = create_store("keychain").err().unwrap();
        assert!(err.to_string().contains("keychain"));
    }

    #[test]
    fn default_provider_is_file() {
        assert_eq!(DEFAULT_PROVIDER, "file");
    }
}
