//! host
//!
//! Collaborators the embedding application provides to the adapter.
//!
//! # Design
//!
//! The adapter never reaches for ambient UI. Everything user-facing goes
//! through the [`Host`] trait, injected at construction:
//!
//! - modal dialogs (the authorization prompt)
//! - toast notifications for failed requests
//! - reinitializing the provider connection after a new token arrives
//!
//! [`crate::ui::ConsoleHost`] is the terminal implementation used by the CLI.

use async_trait::async_trait;

/// Severity of a dialog or notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Info => write!(f, "info"),
            MessageType::Warning => write!(f, "warning"),
            MessageType::Error => write!(f, "error"),
        }
    }
}

/// A modal dialog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Text shown to the user
    pub message: String,
    /// Severity
    pub kind: MessageType,
    /// Whether the user may dismiss the dialog without choosing a button
    pub closable: bool,
    /// Button labels
    pub buttons: Vec<String>,
}

/// A notification about a failed provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Severity
    pub kind: MessageType,
    /// HTTP status, when the failure had one
    pub status: Option<u16>,
    /// Message key the host localizes (e.g. `error.request`)
    pub symbol: String,
    /// Extra detail
    pub message: Option<String>,
}

/// Host services used by the adapter.
///
/// Implementations must be `Send + Sync`; the adapter calls them from
/// async tasks.
#[async_trait]
pub trait Host: Send + Sync {
    /// Show a modal dialog and return the label of the chosen button.
    ///
    /// Returns `None` if the dialog was dismissed.
    async fn show_dialog(&self, dialog: &Dialog) -> Option<String>;

    /// Show a notification on behalf of `platform`.
    fn show_message(&self, platform: &str, message: &Message);

    /// Re-create the provider connection, e.g. after a new token was stored.
    fn reinitialize_code_service(&self, force: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_display() {
        assert_eq!(MessageType::Info.to_string(), "info");
        assert_eq!(MessageType::Warning.to_string(), "warning");
        assert_eq!(MessageType::Error.to_string(), "error");
    }
}
