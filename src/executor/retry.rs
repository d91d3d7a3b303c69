//! Retry policy and failure classification.

use std::time::{Duration, SystemTime};

use rand::Rng;

use crate::error::Error;

/// Configuration for exponential backoff retry behavior.
///
/// Controls how many times a failed attempt is retried and how long to wait
/// between attempts. The wait before retry `n` (0-indexed) is
/// `initial_delay * multiplier^n` plus a random jitter in `[0, max_jitter)`.
///
/// # Defaults
///
/// - `max_retries`: 3
/// - `initial_delay`: 1 second
/// - `multiplier`: 2.0
/// - `max_jitter`: 500 milliseconds
///
/// # Example
///
/// ```
/// use paycore::executor::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(2)
///     .with_initial_delay(Duration::from_millis(100))
///     .with_multiplier(2.0)
///     .with_max_jitter(Duration::ZERO);
///
/// assert_eq!(policy.delay_for_retry(1), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    ///
    /// A value of 0 means only the initial attempt is made.
    max_retries: u32,

    /// Delay before the first retry.
    initial_delay: Duration,

    /// Multiplier applied to the delay after each retry.
    multiplier: f64,

    /// Upper bound (exclusive) of the random jitter added to each backoff.
    ///
    /// Zero disables jitter.
    max_jitter: Duration,
}

impl RetryPolicy {
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default initial delay (1 second).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Default jitter bound (500 milliseconds).
    pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(500);

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
            max_jitter: Self::DEFAULT_MAX_JITTER,
        }
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial delay between retries.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the delay multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not a positive, finite number.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(
            multiplier.is_finite() && multiplier > 0.0,
            "multiplier must be positive and finite"
        );
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter bound. Zero disables jitter.
    #[must_use]
    pub const fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Maximum number of retries after the initial attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the first retry.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Multiplier applied to the delay after each retry.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Upper bound (exclusive) of the random jitter.
    #[must_use]
    pub const fn max_jitter(&self) -> Duration {
        self.max_jitter
    }

    /// Total number of attempts for the given retry budget.
    #[must_use]
    pub const fn total_attempts(max_retries: u32) -> u32 {
        max_retries.saturating_add(1)
    }

    /// Computes the backoff for a given retry number (0-indexed), without jitter.
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Computes the backoff for a retry and adds random jitter.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        self.delay_for_retry(retry)
            .saturating_add(self.sample_jitter())
    }

    fn sample_jitter(&self) -> Duration {
        let bound = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if bound == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..bound))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of classifying a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    /// Whether another attempt may succeed.
    pub retryable: bool,
    /// Server-requested delay that replaces the computed backoff.
    pub delay_hint: Option<Duration>,
}

impl RetryDecision {
    const TERMINAL: Self = Self {
        retryable: false,
        delay_hint: None,
    };
}

/// Decides whether a failed attempt should be retried.
///
/// - Network failures are always retryable.
/// - API failures are retryable when their HTTP status is 429, 500, 502,
///   503 or 504; their `Retry-After` delay becomes the hint.
/// - Everything else (validation, timeout, caller cancellation, decoding)
///   is terminal.
#[must_use]
pub fn classify(error: &Error) -> RetryDecision {
    match error {
        Error::Network(_) => RetryDecision {
            retryable: true,
            delay_hint: None,
        },
        Error::Api(api) => RetryDecision {
            retryable: api.is_retryable(),
            delay_hint: api.retry_after,
        },
        Error::Validation { .. } | Error::Timeout { .. } | Error::Cancelled | Error::Decode(_) => {
            RetryDecision::TERMINAL
        }
    }
}

/// Parses a `Retry-After` header into a delay.
///
/// Accepts integer seconds or an HTTP-date. Dates are converted relative to
/// `now`. A zero delay, a date that is not in the future, and a missing or
/// unparseable header all yield `None`.
#[must_use]
pub fn parse_retry_after(headers: &http::HeaderMap, now: SystemTime) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds)).filter(|d| !d.is_zero());
    }

    let at = httpdate::parse_http_date(value).ok()?;
    at.duration_since(now).ok().filter(|d| !d.is_zero())
}
