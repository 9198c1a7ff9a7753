//! ui::console
//!
//! Terminal implementations of the host collaborators.
//!
//! - [`ConsoleHost`] asks dialog questions on stdin and prints
//!   notifications to stderr.
//! - [`BrowserAuthorizationFlow`] opens the authorize page in the system
//!   browser and reads the token the page displays, pasted by the user.
//!
//! Both block on the terminal, so they hop onto a blocking thread.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::output::{self, Verbosity};
use super::prompts::{self, PromptError};
use crate::auth::flow::callback_message;
use crate::auth::{AuthError, AuthorizationFlow, AuthorizationWindow, ChannelWindow, PopupRequest};
use crate::host::{Dialog, Host, Message};

/// Host backed by the terminal.
#[derive(Debug)]
pub struct ConsoleHost {
    interactive: bool,
    verbosity: Verbosity,
    reinitializations: AtomicUsize,
}

impl ConsoleHost {
    /// Console host; dialogs are declined when not `interactive`.
    pub fn new(interactive: bool, verbosity: Verbosity) -> Self {
        Self {
            interactive,
            verbosity,
            reinitializations: AtomicUsize::new(0),
        }
    }

    /// How often the adapter asked for a reinitialization.
    pub fn reinitializations(&self) -> usize {
        self.reinitializations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Host for ConsoleHost {
    async fn show_dialog(&self, dialog: &Dialog) -> Option<String> {
        if !self.interactive {
            tracing::debug!("non-interactive, declining dialog");
            return None;
        }

        let message = dialog.message.clone();
        let buttons = dialog.buttons.clone();
        let answer =
            tokio::task::spawn_blocking(move || prompts::choose(&message, &buttons, true)).await;

        match answer {
            Ok(Ok(choice)) => Some(choice),
            Ok(Err(PromptError::Cancelled)) => None,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "dialog prompt failed");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "dialog task failed");
                None
            }
        }
    }

    fn show_message(&self, platform: &str, message: &Message) {
        if output::should_show(message.kind, self.verbosity) {
            eprintln!("{}", output::format_message(platform, message));
        }
    }

    fn reinitialize_code_service(&self, force: bool) {
        // Every CLI request reads the shared credential, so there is no
        // connection to rebuild.
        self.reinitializations.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(force, "code service reinitialization requested");
    }
}

/// Authorization through the system browser and a pasted token.
#[derive(Debug)]
pub struct BrowserAuthorizationFlow {
    interactive: bool,
}

impl BrowserAuthorizationFlow {
    /// Browser flow; refuses to start when not `interactive`.
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

#[async_trait]
impl AuthorizationFlow for BrowserAuthorizationFlow {
    async fn start(
        &self,
        request: &PopupRequest,
    ) -> Result<Box<dyn AuthorizationWindow>, AuthError> {
        if !self.interactive {
            return Err(AuthError::Flow(
                "interactive terminal required; use `auth --token` instead".into(),
            ));
        }

        eprintln!("Opening {} in your browser.", request.url);
        if let Err(e) = open::that(&request.url) {
            tracing::debug!(error = %e, "could not launch browser");
            eprintln!("Could not open a browser. Visit the URL above manually.");
        }

        let (sender, window) = ChannelWindow::channel();
        let token = tokio::task::spawn_blocking(|| {
            prompts::password("Paste the access token shown after authorizing: ", true)
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        match token {
            Ok(token) => {
                let _ = sender.send(callback_message(&token));
            }
            // Dropping the sender ends the window: the handshake reports cancelled.
            Err(PromptError::Cancelled) => {}
            Err(e) => return Err(AuthError::Flow(e.to_string())),
        }

        Ok(Box::new(window))
    }
}
