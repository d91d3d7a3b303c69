//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional so that partial files parse; required values are
/// enforced when building a [`ClientConfig`](super::ClientConfig).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Connection and credential settings
    #[serde(default)]
    pub client: ClientSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Client configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Base URL of the platform API (must be https)
    pub base_url: Option<String>,

    /// Versioned path prefix (default: /v1)
    pub api_prefix: Option<String>,

    /// Account (space) identifier sent in the tenant header
    pub account_id: Option<String>,

    /// Access token sent as a bearer token
    pub access_token: Option<String>,

    /// Per-attempt timeout in milliseconds; 0 disables the timeout
    pub timeout_ms: Option<u64>,

    /// Whether caller-side validation runs before requests
    pub validation: Option<bool>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of retries after the initial attempt
    pub max_retries: Option<u32>,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,

    /// Upper bound of the random jitter in milliseconds; 0 disables jitter
    pub max_jitter_ms: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Returns a commented configuration file with every option.
///
/// Applications embedding the client can write this out as a starting point
/// for their users; it parses into an empty [`TomlConfig`].
///
/// # Example
///
/// ```
/// use paycore::config::{TomlConfig, default_config_template};
///
/// let template = default_config_template();
/// assert!(template.contains("[retry]"));
/// assert!(TomlConfig::parse(&template).is_ok());
/// ```
#[must_use]
pub fn default_config_template() -> String {
    r#"# Payment platform client configuration

[client]
# Base URL of the platform API (required, https only)
# base_url = "https://api.example.com"

# Versioned path prefix (default: /v1)
# api_prefix = "/v1"

# Account (space) identifier (required)
# account_id = "acc_123"

# Access token (required)
# access_token = "your-token-here"

# Per-attempt timeout in milliseconds, 0 disables (default: 30000)
# timeout_ms = 30000

# Run caller-side validation before requests (default: true)
# validation = true

[retry]
# Maximum number of retries after the first attempt (default: 3)
# max_retries = 3

# Initial retry delay in milliseconds (default: 1000)
# initial_delay_ms = 1000

# Backoff multiplier (default: 2.0)
# multiplier = 2.0

# Random jitter bound in milliseconds, 0 disables (default: 500)
# max_jitter_ms = 500
"#
    .to_string()
}
