//! Validated client configuration.
//!
//! [`ClientConfig`] is built once, validated on construction, and shared
//! read-only by every request the executor issues.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::HeaderValue;
use url::Url;

use crate::executor::RetryPolicy;

use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{RetrySection, TomlConfig};

/// Fully validated client configuration.
///
/// The base URL uses https, both credentials are non-empty valid header
/// values, and the retry policy is well formed. Nothing can be changed
/// after construction except through the consuming `with_*` builders.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    api_prefix: String,
    account_id: String,
    authorization: HeaderValue,
    tenant: HeaderValue,
    timeout: Duration,
    retry: RetryPolicy,
    validation_enabled: bool,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_prefix", &self.api_prefix)
            .field("account_id", &self.account_id)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("validation_enabled", &self.validation_enabled)
            .finish()
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClientConfig {{ base_url: {}, api_prefix: {}, account_id: {}, timeout: {}ms, \
             retry: {}x/{}ms*{}, validation: {} }}",
            self.base_url,
            self.api_prefix,
            self.account_id,
            self.timeout.as_millis(),
            self.retry.max_retries(),
            self.retry.initial_delay().as_millis(),
            self.retry.multiplier(),
            self.validation_enabled,
        )
    }
}

impl ClientConfig {
    /// Creates a configuration with default timeout, retry policy and prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `base_url` cannot be parsed or does not use https
    /// - a credential is empty or contains characters invalid in a header
    pub fn new(
        base_url: &str,
        account_id: impl Into<String>,
        access_token: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)?;
        let account_id = account_id.into();
        let tenant = credential_header(field::ACCOUNT_ID, &account_id)?;

        let token = access_token.as_ref();
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidCredential {
                field: field::ACCESS_TOKEN,
                reason: "must not be empty".to_string(),
            });
        }
        let mut authorization = credential_header(field::ACCESS_TOKEN, &format!("Bearer {token}"))?;
        authorization.set_sensitive(true);

        Ok(Self {
            base_url,
            api_prefix: defaults::API_PREFIX.to_string(),
            account_id,
            authorization,
            tenant,
            timeout: defaults::timeout(),
            retry: RetryPolicy::new()
                .with_max_retries(defaults::RETRY_MAX_RETRIES)
                .with_initial_delay(defaults::retry_initial_delay())
                .with_multiplier(defaults::RETRY_MULTIPLIER)
                .with_max_jitter(defaults::retry_max_jitter()),
            validation_enabled: defaults::VALIDATION_ENABLED,
        })
    }

    /// Builds a configuration from a parsed TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or any value is invalid.
    pub fn from_toml(toml: &TomlConfig) -> Result<Self, ConfigError> {
        let client = &toml.client;

        let base_url = client.base_url.as_deref().ok_or_else(|| {
            ConfigError::missing(field::BASE_URL, "Set client.base_url in config file")
        })?;
        let account_id = client.account_id.as_deref().ok_or_else(|| {
            ConfigError::missing(field::ACCOUNT_ID, "Set client.account_id in config file")
        })?;
        let access_token = client.access_token.as_deref().ok_or_else(|| {
            ConfigError::missing(field::ACCESS_TOKEN, "Set client.access_token in config file")
        })?;

        let mut config = Self::new(base_url, account_id, access_token)?;

        if let Some(ref prefix) = client.api_prefix {
            config = config.with_api_prefix(prefix)?;
        }
        if let Some(ms) = client.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        if let Some(enabled) = client.validation {
            config = config.with_validation(enabled);
        }

        let retry = build_retry_policy(&toml.retry)?;
        Ok(config.with_retry_policy(retry))
    }

    /// Parses and validates a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_toml(&TomlConfig::parse(content)?)
    }

    /// Loads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&TomlConfig::load(path)?)
    }

    /// Sets the versioned path prefix, e.g. `/v2`. An empty prefix is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty prefix does not start with `/` or ends with `/`.
    pub fn with_api_prefix(mut self, prefix: &str) -> Result<Self, ConfigError> {
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            return Err(ConfigError::InvalidPrefix(prefix.to_string()));
        }
        self.api_prefix = prefix.to_string();
        Ok(self)
    }

    /// Sets the default per-attempt timeout. Zero disables the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enables or disables caller-side validation.
    #[must_use]
    pub const fn with_validation(mut self, enabled: bool) -> Self {
        self.validation_enabled = enabled;
        self
    }

    /// Base URL of the platform API.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Versioned path prefix.
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Account (space) identifier.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Prebuilt `Authorization` header value (marked sensitive).
    #[must_use]
    pub const fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    /// Prebuilt tenant header value.
    #[must_use]
    pub const fn tenant(&self) -> &HeaderValue {
        &self.tenant
    }

    /// Default per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Default retry policy.
    #[must_use]
    pub const fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Whether caller-side validation is enabled.
    #[must_use]
    pub const fn validation_enabled(&self) -> bool {
        self.validation_enabled
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "https" {
        return Err(ConfigError::InsecureScheme {
            url: raw.to_string(),
            scheme: url.scheme().to_string(),
        });
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "must not contain a query or fragment".to_string(),
        });
    }

    Ok(url)
}

fn credential_header(name: &'static str, value: &str) -> Result<HeaderValue, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidCredential {
            field: name,
            reason: "must not be empty".to_string(),
        });
    }

    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidCredential {
        field: name,
        reason: e.to_string(),
    })
}

fn build_retry_policy(section: &RetrySection) -> Result<RetryPolicy, ConfigError> {
    let multiplier = section.multiplier.unwrap_or(defaults::RETRY_MULTIPLIER);
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(ConfigError::InvalidRetry(format!(
            "multiplier must be a positive number, got {multiplier}"
        )));
    }

    let initial_delay = section
        .initial_delay_ms
        .map_or_else(defaults::retry_initial_delay, Duration::from_millis);
    let max_jitter = section
        .max_jitter_ms
        .map_or_else(defaults::retry_max_jitter, Duration::from_millis);

    Ok(RetryPolicy::new()
        .with_max_retries(section.max_retries.unwrap_or(defaults::RETRY_MAX_RETRIES))
        .with_initial_delay(initial_delay)
        .with_multiplier(multiplier)
        .with_max_jitter(max_jitter))
}
