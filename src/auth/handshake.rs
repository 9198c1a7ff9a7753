//! auth::handshake
//!
//! The interactive authorization sequence.
//!
//! # Sequence
//!
//! 1. Wait the prompt delay, so a burst of failing calls does not flash a
//!    dialog that is immediately superseded.
//! 2. Ask the host to confirm with a single `Authorize` button.
//! 3. Open the authorize page through the [`AuthorizationFlow`].
//! 4. Read messages until one addressed to `atomgit` arrives or the
//!    window goes away.
//! 5. On a granted token: replace the credential and ask the host to
//!    reinitialize the provider connection.
//!
//! The window is closed on every path out of step 4.
//!
//! # Concurrency
//!
//! One handshake at a time. A caller that finds one in progress waits for
//! it, then re-checks the credential: if the other handshake produced a
//! token, the waiter reports success without prompting again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::credential::CredentialCache;
use super::errors::AuthError;
use super::flow::{parse_callback, AuthorizationFlow, AuthorizationWindow, Callback, PopupRequest};
use crate::core::config::{AuthorizationConfig, PlatformConfig};
use crate::host::{Dialog, Host, MessageType};

/// Label of the one affirmative dialog button.
pub const AUTHORIZE_BUTTON: &str = "Authorize";

/// Dialog text asking the user to authorize.
pub const AUTHORIZE_PROMPT: &str =
    "AtomGit needs your authorization to access this repository. Authorize now?";

/// How a handshake ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// A new token was stored.
    Authorized,
    /// A concurrent handshake stored a token while this one waited.
    AlreadyAuthorized,
    /// The user did not choose `Authorize`.
    Declined,
    /// The window closed before a callback arrived.
    Cancelled,
    /// The callback carried no token.
    Denied,
}

impl HandshakeOutcome {
    /// Whether a token is now available.
    pub fn is_authorized(self) -> bool {
        matches!(
            self,
            HandshakeOutcome::Authorized | HandshakeOutcome::AlreadyAuthorized
        )
    }
}

impl std::fmt::Display for HandshakeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HandshakeOutcome::Authorized => "authorized",
            HandshakeOutcome::AlreadyAuthorized => "already authorized",
            HandshakeOutcome::Declined => "declined",
            HandshakeOutcome::Cancelled => "cancelled",
            HandshakeOutcome::Denied => "denied",
        };
        f.write_str(label)
    }
}

/// Runs handshakes against one credential.
pub struct Authorizer {
    credential: Arc<CredentialCache>,
    host: Arc<dyn Host>,
    flow: Arc<dyn AuthorizationFlow>,
    request: PopupRequest,
    prompt_delay: Duration,
    gate: Mutex<()>,
}

impl Authorizer {
    /// Authorizer for `platform` using the given collaborators.
    pub fn new(
        credential: Arc<CredentialCache>,
        host: Arc<dyn Host>,
        flow: Arc<dyn AuthorizationFlow>,
        platform: &PlatformConfig,
        authorization: &AuthorizationConfig,
    ) -> Self {
        Self {
            credential,
            host,
            flow,
            request: PopupRequest::for_platform(platform, authorization),
            prompt_delay: authorization.prompt_delay,
            gate: Mutex::new(()),
        }
    }

    /// The popup this authorizer opens.
    pub fn popup_request(&self) -> &PopupRequest {
        &self.request
    }

    /// Run a handshake and report whether a token is now available.
    pub async fn authorize(&self) -> Result<bool, AuthError> {
        Ok(self.run().await?.is_authorized())
    }

    /// Run a handshake and report how it ended.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Flow`] if the window cannot be opened
    /// - [`AuthError::MalformedCallback`] for a callback without `data`
    /// - [`AuthError::SecretStore`] if the new token cannot be stored
    pub async fn run(&self) -> Result<HandshakeOutcome, AuthError> {
        let seen = self.credential.token();
        let _guard = match self.gate.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::debug!("waiting for handshake in progress");
                let guard = self.gate.lock().await;
                // Only a token stored while waiting counts.
                let current = self.credential.token();
                if current.is_some() && current != seen {
                    return Ok(HandshakeOutcome::AlreadyAuthorized);
                }
                guard
            }
        };

        if !self.prompt_delay.is_zero() {
            tokio::time::sleep(self.prompt_delay).await;
        }

        let dialog = Dialog {
            message: AUTHORIZE_PROMPT.to_string(),
            kind: MessageType::Info,
            closable: false,
            buttons: vec![AUTHORIZE_BUTTON.to_string()],
        };
        if self.host.show_dialog(&dialog).await.as_deref() != Some(AUTHORIZE_BUTTON) {
            tracing::info!("authorization declined");
            return Ok(HandshakeOutcome::Declined);
        }

        let mut window = self.flow.start(&self.request).await?;
        let outcome = self.await_callback(window.as_mut()).await;
        window.close();

        match &outcome {
            Ok(result) => tracing::info!(outcome = %result, "handshake finished"),
            Err(e) => tracing::warn!(error = %e, "handshake failed"),
        }
        outcome
    }

    async fn await_callback(
        &self,
        window: &mut dyn AuthorizationWindow,
    ) -> Result<HandshakeOutcome, AuthError> {
        while let Some(message) = window.next_message().await {
            let Some(callback) = parse_callback(&message)? else {
                continue;
            };

            window.close();
            return match callback {
                Callback::Granted(token) => {
                    self.credential.clear()?;
                    self.credential.set_token(&token)?;
                    self.host.reinitialize_code_service(true);
                    Ok(HandshakeOutcome::Authorized)
                }
                Callback::Empty => Ok(HandshakeOutcome::Denied),
            };
        }

        Ok(HandshakeOutcome::Cancelled)
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("credential", &self.credential)
            .field("request", &self.request)
            .field("prompt_delay", &self.prompt_delay)
            .finish()
    }
}
