//! auth::flow
//!
//! The external authorization window and the messages it posts back.
//!
//! # Design
//!
//! Opening the provider's authorize page is the host's business: a webview
//! popup, a system browser, or a scripted double in tests. The handshake
//! only needs to start a window, read the JSON messages it delivers, and
//! close it. [`AuthorizationFlow`] and [`AuthorizationWindow`] capture
//! exactly that.
//!
//! A message addresses this provider when it is an object whose `type` is
//! `"atomgit"`:
//!
//! ```json
//! {"type": "atomgit", "data": {"token": "..."}}
//! ```

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use super::errors::AuthError;
use crate::core::config::{AuthorizationConfig, PlatformConfig};

/// Message `type` identifying callbacks for this provider.
pub const CALLBACK_TYPE: &str = "atomgit";

/// Window target for the authorize page.
pub const POPUP_TARGET: &str = "_blank";

/// What to open and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRequest {
    /// Authorize page URL
    pub url: String,
    /// Window target name
    pub target: String,
    /// Window feature string (geometry, no chrome)
    pub features: String,
}

impl PopupRequest {
    /// Request for the platform's authorize page with the configured geometry.
    pub fn for_platform(platform: &PlatformConfig, authorization: &AuthorizationConfig) -> Self {
        Self {
            url: platform.authorize_url(),
            target: POPUP_TARGET.to_string(),
            features: authorization.popup.features(),
        }
    }
}

/// An open authorization window.
#[async_trait]
pub trait AuthorizationWindow: Send {
    /// Wait for the next posted message.
    ///
    /// `None` once the window is gone and nothing more will arrive.
    async fn next_message(&mut self) -> Option<Value>;

    /// Tear the window and its listener down. Idempotent.
    fn close(&mut self);
}

/// Opens authorization windows.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// Open a window for `request`.
    async fn start(&self, request: &PopupRequest)
        -> Result<Box<dyn AuthorizationWindow>, AuthError>;
}

/// A callback addressed to this provider.
#[derive(Clone, PartialEq, Eq)]
pub enum Callback {
    /// The provider issued a token.
    Granted(String),
    /// The callback carried no token.
    Empty,
}

impl std::fmt::Display for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callback::Granted(_) => write!(f, "granted"),
            Callback::Empty => write!(f, "empty"),
        }
    }
}

// Custom Debug to avoid exposing token
impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callback::{}", self)
    }
}

/// Interpret a posted message.
///
/// Returns `Ok(None)` for messages meant for someone else.
///
/// # Errors
///
/// [`AuthError::MalformedCallback`] if the message is addressed to this
/// provider but has no `data` object.
pub fn parse_callback(message: &Value) -> Result<Option<Callback>, AuthError> {
    if message.get("type").and_then(Value::as_str) != Some(CALLBACK_TYPE) {
        return Ok(None);
    }

    let data = message
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| AuthError::MalformedCallback("missing data object".into()))?;

    match data.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => Ok(Some(Callback::Granted(token.to_string()))),
        _ => Ok(Some(Callback::Empty)),
    }
}

/// Build the callback message a window posts after authorization.
pub fn callback_message(token: &str) -> Value {
    serde_json::json!({
        "type": CALLBACK_TYPE,
        "data": { "token": token },
    })
}

/// A window fed through a channel.
///
/// Whatever owns the [`mpsc::UnboundedSender`] posts messages; dropping
/// every sender ends the stream.
pub struct ChannelWindow {
    receiver: mpsc::UnboundedReceiver<Value>,
    closed: bool,
}

impl ChannelWindow {
    /// A window and the sender that feeds it.
    pub fn channel() -> (mpsc::UnboundedSender<Value>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            sender,
            Self {
                receiver,
                closed: false,
            },
        )
    }

    /// Whether [`close`](AuthorizationWindow::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl AuthorizationWindow for ChannelWindow {
    async fn next_message(&mut self) -> Option<Value> {
        if self.closed {
            return None;
        }
        self.receiver.recv().await
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.receiver.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod callback {
        use super::*;

        #[test]
        fn granted() {
            let parsed = parse_callback(&callback_message("tok")).unwrap();
            assert_eq!(parsed, Some(Callback::Granted("tok".into())));
        }

        #[test]
        fn other_types_ignored() {
            assert_eq!(parse_callback(&json!({"type": "github"})).unwrap(), None);
            assert_eq!(parse_callback(&json!("atomgit")).unwrap(), None);
            assert_eq!(parse_callback(&json!({"data": {"token": "x"}})).unwrap(), None);
        }

        #[test]
        fn empty_or_missing_token() {
            for msg in [
                json!({"type": "atomgit", "data": {"token": ""}}),
                json!({"type": "atomgit", "data": {}}),
                json!({"type": "atomgit", "data": {"token": 5}}),
            ] {
                assert_eq!(parse_callback(&msg).unwrap(), Some(Callback::Empty));
            }
        }

        #[test]
        fn missing_data_is_malformed() {
            let err = parse_callback(&json!({"type": "atomgit"})).unwrap_err();
            assert!(matches!(err, AuthError::MalformedCallback(_)));

            let err = parse_callback(&json!({"type": "atomgit", "data": "tok"})).unwrap_err();
            assert!(matches!(err, AuthError::MalformedCallback(_)));
        }

        #[test]
        fn display_hides_token() {
            let callback = Callback::Granted("secret".into());
            assert_eq!(callback.to_string(), "granted");
            assert!(!format!("{:?}", callback).contains("secret"));
        }
    }

    mod popup {
        use super::*;

        #[test]
        fn defaults() {
            let request =
                PopupRequest::for_platform(&PlatformConfig::default(), &AuthorizationConfig::default());
            assert_eq!(
                request.url,
                "https://atomgit.com/login/oauth/authorize?client_id=9d8b531661f441d1"
            );
            assert_eq!(request.target, "_blank");
            assert!(request.features.contains("width=800,height=520,top=150,left=150"));
            assert!(request.features.contains("toolbar=no"));
        }
    }

    mod channel_window {
        use super::*;

        #[tokio::test]
        async fn delivers_then_ends() {
            let (sender, mut window) = ChannelWindow::channel();
            sender.send(json!({"n": 1})).unwrap();
            drop(sender);

            assert_eq!(window.next_message().await, Some(json!({"n": 1})));
            assert_eq!(window.next_message().await, None);
        }

        #[tokio::test]
        async fn close_stops_delivery() {
            let (sender, mut window) = ChannelWindow::channel();
            window.close();
            window.close();
            assert!(window.is_closed());
            assert!(sender.send(json!({})).is_err());
            assert_eq!(window.next_message().await, None);
        }
    }
}
