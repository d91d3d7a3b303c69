//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Base URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Base URL does not use HTTPS.
    #[error("Base URL '{url}' must use https, got '{scheme}'")]
    InsecureScheme {
        /// The rejected URL
        url: String,
        /// The scheme that was found
        scheme: String,
    },

    /// Credential is empty or not a valid header value.
    #[error("Invalid credential '{field}': {reason}")]
    InvalidCredential {
        /// Which credential was rejected
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// API prefix is malformed.
    #[error("Invalid API prefix '{0}': must start with '/' and must not end with '/'")]
    InvalidPrefix(String),

    /// Invalid retry configuration.
    #[error("Invalid retry configuration: {0}")]
    InvalidRetry(String),
}

/// Well-known field names for `MissingRequired` and `InvalidCredential` errors.
pub mod field {
    /// The base URL field.
    pub const BASE_URL: &str = "base_url";
    /// The account identifier field.
    pub const ACCOUNT_ID: &str = "account_id";
    /// The access token field.
    pub const ACCESS_TOKEN: &str = "access_token";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
