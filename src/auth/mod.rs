//! auth - AtomGit OAuth authorization
//!
//! # Architecture
//!
//! - [`CredentialCache`] holds the bearer token every request uses and
//!   writes it through to the [`SecretStore`](crate::secrets::SecretStore).
//! - [`Authorizer`] runs the interactive handshake when no token is held
//!   or the provider rejects the one we have.
//! - [`AuthorizationFlow`] / [`AuthorizationWindow`] are supplied by the
//!   host: they open the authorize page and deliver its callback messages.
//!
//! # Security
//!
//! Tokens never appear in logs, error messages or `Debug` output. Every
//! type here that can hold one implements `Debug` by hand.
//!
//! # Example
//!
//! ```ignore
//! use atomgit_code_api::auth::{Authorizer, CredentialCache};
//! use std::sync::Arc;
//!
//! let store = secrets::create_store(secrets::DEFAULT_PROVIDER)?;
//! let credential = Arc::new(CredentialCache::load(store, platform.token.clone()));
//! let authorizer = Authorizer::new(credential, host, flow, &platform, &authorization);
//!
//! if authorizer.authorize().await? {
//!     println!("Authorized");
//! }
//! ```

mod credential;
mod errors;
pub mod flow;
mod handshake;

pub use credential::{CredentialCache, TOKEN_SECRET_KEY};
pub use errors::AuthError;
pub use flow::{AuthorizationFlow, AuthorizationWindow, ChannelWindow, PopupRequest};
pub use handshake::{Authorizer, HandshakeOutcome, AUTHORIZE_BUTTON, AUTHORIZE_PROMPT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_key_is_namespaced() {
        assert_eq!(TOKEN_SECRET_KEY, "atomgit.token");
    }

    #[test]
    fn callback_type_matches_platform() {
        assert_eq!(flow::CALLBACK_TYPE, "atomgit");
    }
}
