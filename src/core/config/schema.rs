//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order:
//! 1. `$ATOMGIT_CODE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/atomgit-code/config.toml`
//! 3. `~/.atomgit-code/config.toml` (canonical)
//!
//! # Validation
//!
//! Config values are validated after parsing: URLs must be absolute
//! http(s) URLs, the client id must be non-empty, popup dimensions must
//! be positive.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Configuration file contents.
///
/// # Example
///
/// ```toml
/// [platform]
/// endpoint = "https://api.atomgit.com"
/// origin = "https://atomgit.com"
///
/// [authorization]
/// prompt_delay_ms = 300
///
/// [secrets]
/// provider = "file"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Provider endpoints and static credentials
    pub platform: Option<PlatformSettings>,

    /// Authorization handshake settings
    pub authorization: Option<AuthorizationSettings>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(platform) = &self.platform {
            platform.validate()?;
        }
        if let Some(authorization) = &self.authorization {
            authorization.validate()?;
        }
        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }
        Ok(())
    }
}

/// `[platform]` section.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformSettings {
    /// REST API base URL
    pub endpoint: Option<String>,

    /// Web origin hosting the OAuth authorize page
    pub origin: Option<String>,

    /// Static bearer token; takes precedence over the secret store
    pub token: Option<String>,

    /// OAuth client id
    pub client_id: Option<String>,
}

// Custom Debug to avoid exposing token
impl std::fmt::Debug for PlatformSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformSettings")
            .field("endpoint", &self.endpoint)
            .field("origin", &self.origin)
            .field("has_token", &self.token.is_some())
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl PlatformSettings {
    /// Validate the platform section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            validate_http_url("platform.endpoint", endpoint)?;
        }
        if let Some(origin) = &self.origin {
            validate_http_url("platform.origin", origin)?;
        }
        if let Some(client_id) = &self.client_id {
            if client_id.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "platform.client_id cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// `[authorization]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizationSettings {
    /// Delay before the authorization prompt is shown
    pub prompt_delay_ms: Option<u64>,

    /// Authorize window geometry
    pub popup: Option<PopupSettings>,
}

impl AuthorizationSettings {
    /// Validate the authorization section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(popup) = &self.popup {
            for (name, value) in [("width", popup.width), ("height", popup.height)] {
                if value == Some(0) {
                    return Err(ConfigError::InvalidValue(format!(
                        "authorization.popup.{} must be positive",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// `[authorization.popup]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PopupSettings {
    /// Window width in pixels
    pub width: Option<u32>,
    /// Window height in pixels
    pub height: Option<u32>,
    /// Distance from the top of the screen
    pub top: Option<u32>,
    /// Distance from the left of the screen
    pub left: Option<u32>,
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider to use ("file" or "keychain")
    pub provider: Option<String>,
}

impl SecretsConfig {
    /// Valid secret providers.
    pub const VALID_PROVIDERS: &'static [&'static str] = &["file", "keychain"];

    /// Validate the secrets configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if !Self::VALID_PROVIDERS.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    Self::VALID_PROVIDERS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| ConfigError::InvalidValue(format!("{} is not a valid URL: {}", key, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "{} must use http or https, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod global_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = GlobalConfig::default();
            assert!(config.platform.is_none());
            assert!(config.authorization.is_none());
            assert!(config.secrets.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn roundtrip() {
            let config = GlobalConfig {
                platform: Some(PlatformSettings {
                    endpoint: Some("https://api.atomgit.com".to_string()),
                    origin: Some("https://atomgit.com".to_string()),
                    token: None,
                    client_id: Some("abc".to_string()),
                }),
                authorization: Some(AuthorizationSettings {
                    prompt_delay_ms: Some(0),
                    popup: Some(PopupSettings {
                        width: Some(640),
                        height: Some(480),
                        top: None,
                        left: None,
                    }),
                }),
                secrets: Some(SecretsConfig {
                    provider: Some("file".to_string()),
                }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: GlobalConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }

        #[test]
        fn reject_unknown_fields() {
            let toml = r#"
                [platform]
                endpoint = "https://api.atomgit.com"
                unknown_field = true
            "#;

            let result: Result<GlobalConfig, _> = toml::from_str(toml);
            assert!(result.is_err());
        }
    }

    mod platform_settings {
        use super::*;

        #[test]
        fn rejects_relative_endpoint() {
            let settings = PlatformSettings {
                endpoint: Some("/api".to_string()),
                ..Default::default()
            };
            assert!(settings.validate().is_err());
        }

        #[test]
        fn rejects_non_http_origin() {
            let settings = PlatformSettings {
                origin: Some("ftp://atomgit.com".to_string()),
                ..Default::default()
            };
            let err = settings.validate().unwrap_err();
            assert!(err.to_string().contains("http or https"));
        }

        #[test]
        fn rejects_blank_client_id() {
            let settings = PlatformSettings {
                client_id: Some("  ".to_string()),
                ..Default::default()
            };
            assert!(settings.validate().is_err());
        }

        #[test]
        fn debug_redacts_token() {
            let settings = PlatformSettings {
                token: Some("secret_token_abc".to_string()),
                ..Default::default()
            };
            let debug = format!("{:?}", settings);
            assert!(!debug.contains("secret_token_abc"));
            assert!(debug.contains("has_token"));
        }
    }

    mod authorization_settings {
        use super::*;

        #[test]
        fn zero_width_rejected() {
            let settings = AuthorizationSettings {
                prompt_delay_ms: None,
                popup: Some(PopupSettings {
                    width: Some(0),
                    ..Default::default()
                }),
            };
            assert!(settings.validate().is_err());
        }
    }

    mod secrets_config {
        use super::*;

        #[test]
        fn valid_file_provider() {
            let config = SecretsConfig {
                provider: Some("file".to_string()),
            };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn valid_keychain_provider() {
            let config = SecretsConfig {
                provider: Some("keychain".to_string()),
            };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn invalid_provider() {
            let config = SecretsConfig {
                provider: Some("invalid".to_string()),
            };
            assert!(config.validate().is_err());
        }
    }
}
