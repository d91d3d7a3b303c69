//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default versioned path prefix inserted between base URL and resource path.
pub const API_PREFIX: &str = "/v1";

/// Default per-attempt timeout in milliseconds.
pub const TIMEOUT_MS: u64 = 30_000;

/// Default maximum number of retries after the initial attempt.
pub const RETRY_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: u64 = 1_000;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default upper bound of the retry jitter in milliseconds.
pub const RETRY_MAX_JITTER_MS: u64 = 500;

/// Whether caller-side validation runs by default.
pub const VALIDATION_ENABLED: bool = true;

/// Default per-attempt timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}

/// Default initial retry delay as Duration.
#[must_use]
pub const fn retry_initial_delay() -> Duration {
    Duration::from_millis(RETRY_INITIAL_DELAY_MS)
}

/// Default retry jitter bound as Duration.
#[must_use]
pub const fn retry_max_jitter() -> Duration {
    Duration::from_millis(RETRY_MAX_JITTER_MS)
}
