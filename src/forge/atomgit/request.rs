//! forge::atomgit::request
//!
//! Shared request execution and failure translation.
//!
//! Every adapter operation funnels through [`AtomGitApi::request`] or
//! [`AtomGitApi::request_with`]. They attach the credential, parse the body
//! into the endpoint's schema, and on failure:
//!
//! - 401: run the authorization handshake (awaited), then fail anyway so the
//!   caller retries with whatever credential the handshake produced
//! - with `error_option: false`: log and resolve to `None`
//! - otherwise: notify the host once and propagate

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::AtomGitApi;
use crate::forge::traits::{ForgeError, ResponseOptions};
use crate::host::{Message, MessageType};

/// User-Agent header value for API requests.
pub const USER_AGENT_VALUE: &str = "atomgit-code";

/// How to issue one request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Extra headers; these override the defaults
    pub headers: Vec<(String, String)>,
    /// Base URL overriding the platform endpoint
    pub base_url: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            params: Vec::new(),
            body: None,
            headers: Vec::new(),
            base_url: None,
        }
    }
}

impl RequestOptions {
    /// A GET request.
    pub fn get() -> Self {
        Self::default()
    }

    /// A POST request with a JSON body.
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Default::default()
        }
    }

    /// Add a query parameter.
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Add a header.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Send to a different base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl AtomGitApi {
    /// Issue a request and parse the body as `T`, surfacing failures.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ForgeError> {
        match self
            .request_with(path, options, ResponseOptions::default())
            .await?
        {
            Some(value) => Ok(value),
            // error_option is set, so a failure never resolves to None
            None => Err(ForgeError::Request {
                status: None,
                message: "empty result".into(),
            }),
        }
    }

    /// Issue a request and parse the body as `T`.
    ///
    /// Resolves to `None` on failure when `response.error_option` is false.
    pub(crate) async fn request_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        response: ResponseOptions,
    ) -> Result<Option<T>, ForgeError> {
        let method = options.method.clone();
        let error = match self.execute(path, options).await {
            Ok(value) => return Ok(Some(value)),
            Err(error) => error,
        };

        tracing::warn!(%method, path, status = ?error.status(), error = %error, "request failed");

        if matches!(error, ForgeError::Unauthorized) {
            match self.authorizer.run().await {
                Ok(outcome) => tracing::info!(%outcome, "authorization after 401"),
                Err(e) => tracing::warn!(error = %e, "authorization after 401 failed"),
            }
        }

        if !response.error_option {
            tracing::debug!(path, "request failure suppressed by caller");
            return Ok(None);
        }

        self.notify(&error);
        Err(error)
    }

    /// Report a failure to the host.
    fn notify(&self, error: &ForgeError) {
        let message = Message {
            kind: MessageType::Error,
            status: error.status(),
            symbol: error.message_key().to_string(),
            message: Some(error.to_string()),
        };
        self.host.show_message(Self::NAME, &message);
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ForgeError> {
        let base = options
            .base_url
            .as_deref()
            .unwrap_or(&self.platform.endpoint);
        let url = format!("{}{}", base.trim_end_matches('/'), path);

        tracing::debug!(method = %options.method, path, "atomgit request");

        let mut builder = self
            .client
            .request(options.method, &url)
            .headers(self.headers(&options.headers)?);
        if !options.params.is_empty() {
            builder = builder.query(&options.params);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ForgeError::Request {
            status: None,
            message: e.to_string(),
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ForgeError::Request {
            status: Some(status.as_u16()),
            message: format!("cannot read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(classify(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ForgeError::Request {
            status: Some(status.as_u16()),
            message: format!("cannot parse response: {}", e),
        })
    }

    fn headers(&self, extra: &[(String, String)]) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = self.credential.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ForgeError::Request {
                    status: None,
                    message: "stored token is not a valid header value".into(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ForgeError::Request {
                status: None,
                message: format!("invalid header name '{}': {}", name, e),
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| ForgeError::Request {
                status: None,
                message: format!("invalid value for header '{}': {}", name, e),
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

/// Provider error body.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error_message", alias = "error")]
    message: Option<String>,
}

/// Map a non-success response to a [`ForgeError`].
fn classify(status: StatusCode, body: &[u8]) -> ForgeError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED => ForgeError::Unauthorized,
        StatusCode::NOT_FOUND => ForgeError::NotFound(message),
        _ => ForgeError::Request {
            status: Some(status.as_u16()),
            message,
        },
    }
}
