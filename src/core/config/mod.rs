//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! A single user-level TOML file configures the provider endpoints, the
//! authorization handshake and the secret store. The adapter never reads
//! configuration itself; callers resolve a [`PlatformConfig`] and an
//! [`AuthorizationConfig`] here and pass them in.
//!
//! # Precedence
//!
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$ATOMGIT_CODE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/atomgit-code/config.toml`
//! 3. `~/.atomgit-code/config.toml` (canonical)
//!
//! # Example
//!
//! ```no_run
//! use atomgit_code_api::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! let platform = config.platform();
//! println!("Endpoint: {}", platform.endpoint);
//! ```

pub mod schema;

pub use schema::{
    AuthorizationSettings, GlobalConfig, PlatformSettings, PopupSettings, SecretsConfig,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default REST API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.atomgit.com";

/// Default web origin serving the OAuth authorize page.
pub const DEFAULT_ORIGIN: &str = "https://atomgit.com";

/// OAuth client id registered for the adapter.
pub const DEFAULT_CLIENT_ID: &str = "9d8b531661f441d1";

/// Delay before the authorization prompt appears.
pub const DEFAULT_PROMPT_DELAY_MS: u64 = 300;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ATOMGIT_CODE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Provider settings with defaults applied.
#[derive(Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// REST API base URL
    pub endpoint: String,
    /// Web origin serving the OAuth authorize page
    pub origin: String,
    /// Static bearer token, if configured
    pub token: Option<String>,
    /// OAuth client id
    pub client_id: String,
}

// Custom Debug to avoid exposing token
impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("endpoint", &self.endpoint)
            .field("origin", &self.origin)
            .field("has_token", &self.token.is_some())
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            token: None,
            client_id: DEFAULT_CLIENT_ID.to_string(),
        }
    }
}

impl PlatformConfig {
    /// Platform config pointing at a custom endpoint (tests, private deployments).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// The OAuth authorize URL for this platform.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/login/oauth/authorize?client_id={}",
            self.origin.trim_end_matches('/'),
            self.client_id
        )
    }
}

/// Authorize window geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupGeometry {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Distance from the top of the screen
    pub top: u32,
    /// Distance from the left of the screen
    pub left: u32,
}

impl Default for PopupGeometry {
    fn default() -> Self {
        Self {
            width: 800,
            height: 520,
            top: 150,
            left: 150,
        }
    }
}

impl PopupGeometry {
    /// Window feature string for a chromeless popup of this size.
    pub fn features(&self) -> String {
        format!(
            "directories=no,titlebar=no,toolbar=no,location=no,status=no,menubar=no,scrollbars=no,resizable=no,width={},height={},top={},left={}",
            self.width, self.height, self.top, self.left
        )
    }
}

/// Handshake settings with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationConfig {
    /// Delay before the prompt appears
    pub prompt_delay: Duration,
    /// Authorize window geometry
    pub popup: PopupGeometry,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            prompt_delay: Duration::from_millis(DEFAULT_PROMPT_DELAY_MS),
            popup: PopupGeometry::default(),
        }
    }
}

impl AuthorizationConfig {
    /// Settings without the prompt delay (tests, non-graphical hosts).
    pub fn immediate() -> Self {
        Self {
            prompt_delay: Duration::ZERO,
            ..Default::default()
        }
    }
}

/// Loaded configuration.
///
/// Accessor methods apply defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File contents
    pub global: GlobalConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// fails validation. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file.
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check $ATOMGIT_CODE_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/atomgit-code/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("atomgit-code/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.atomgit-code/config.toml
        let path = Self::config_path().ok()?;
        path.exists().then_some(path)
    }

    /// Get the canonical config path, `~/.atomgit-code/config.toml`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".atomgit-code/config.toml"))
    }

    /// Provider settings.
    pub fn platform(&self) -> PlatformConfig {
        let defaults = PlatformConfig::default();
        let Some(settings) = &self.global.platform else {
            return defaults;
        };

        PlatformConfig {
            endpoint: settings.endpoint.clone().unwrap_or(defaults.endpoint),
            origin: settings.origin.clone().unwrap_or(defaults.origin),
            token: settings.token.clone().filter(|t| !t.is_empty()),
            client_id: settings.client_id.clone().unwrap_or(defaults.client_id),
        }
    }

    /// Handshake settings.
    pub fn authorization(&self) -> AuthorizationConfig {
        let defaults = AuthorizationConfig::default();
        let Some(settings) = &self.global.authorization else {
            return defaults;
        };

        let popup = settings.popup.as_ref().map(|p| PopupGeometry {
            width: p.width.unwrap_or(defaults.popup.width),
            height: p.height.unwrap_or(defaults.popup.height),
            top: p.top.unwrap_or(defaults.popup.top),
            left: p.left.unwrap_or(defaults.popup.left),
        });

        AuthorizationConfig {
            prompt_delay: settings
                .prompt_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.prompt_delay),
            popup: popup.unwrap_or(defaults.popup),
        }
    }

    /// Secret store provider name.
    pub fn secrets_provider(&self) -> &str {
        self.global
            .secrets
            .as_ref()
            .and_then(|s| s.provider.as_deref())
            .unwrap_or(crate::secrets::DEFAULT_PROVIDER)
    }

    /// Where the config was loaded from, if anywhere.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
