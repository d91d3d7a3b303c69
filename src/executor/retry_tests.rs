//! Tests for `RetryPolicy`, `classify` and `parse_retry_after`.

use super::retry::{RetryDecision, RetryPolicy, classify, parse_retry_after};
use crate::error::{ApiError, Error};
use crate::transport::TransportError;
use std::time::{Duration, SystemTime};

mod retry_policy_defaults {
    use super::*;

    #[test]
    fn new_creates_policy_with_defaults() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.initial_delay(), Duration::from_secs(1));
        assert!((policy.multiplier() - 2.0).abs() < f64::EPSILON);
        assert_eq!(policy.max_jitter(), Duration::from_millis(500));
    }

    #[test]
    fn default_trait_matches_new() {
        assert_eq!(RetryPolicy::new(), RetryPolicy::default());
    }

    #[test]
    #[should_panic(expected = "multiplier must be positive")]
    fn with_multiplier_zero_panics() {
        let _ = RetryPolicy::new().with_multiplier(0.0);
    }

    #[test]
    #[should_panic(expected = "multiplier must be positive and finite")]
    fn with_multiplier_negative_panics() {
        let _ = RetryPolicy::new().with_multiplier(-2.0);
    }

    #[test]
    #[should_panic(expected = "multiplier must be positive and finite")]
    fn with_multiplier_nan_panics() {
        let _ = RetryPolicy::new().with_multiplier(f64::NAN);
    }

    #[test]
    #[should_panic(expected = "multiplier must be positive and finite")]
    fn with_multiplier_infinite_panics() {
        let _ = RetryPolicy::new().with_multiplier(f64::INFINITY);
    }

    #[test]
    fn total_attempts_is_one_more_than_retries() {
        assert_eq!(RetryPolicy::total_attempts(0), 1);
        assert_eq!(RetryPolicy::total_attempts(2), 3);
        assert_eq!(RetryPolicy::total_attempts(u32::MAX), u32::MAX);
    }
}

mod delay_for_retry {
    use super::*;

    fn policy(initial_ms: u64, multiplier: f64) -> RetryPolicy {
        RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(initial_ms))
            .with_multiplier(multiplier)
            .with_max_jitter(Duration::ZERO)
    }

    #[test]
    fn grows_exponentially_from_initial_delay() {
        let policy = policy(100, 2.0);

        assert_eq!(policy.delay_for_retry(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
    }

    #[test]
    fn fractional_multiplier_works() {
        let policy = policy(4000, 1.5);

        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(6));
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs(9));
    }

    #[test]
    fn huge_retry_number_saturates() {
        let policy = policy(1000, 10.0);

        assert_eq!(policy.delay_for_retry(10_000), Duration::MAX);
    }

    #[test]
    fn backoff_without_jitter_equals_delay() {
        let policy = policy(250, 2.0);

        assert_eq!(policy.backoff(1), Duration::from_millis(500));
    }

    #[test]
    fn backoff_jitter_stays_below_bound() {
        let policy = policy(100, 2.0).with_max_jitter(Duration::from_millis(500));

        for _ in 0..200 {
            let delay = policy.backoff(0);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay < Duration::from_millis(600));
        }
    }
}

mod classification {
    use super::*;

    fn api(status: u16, retry_after: Option<Duration>) -> Error {
        let status = http::StatusCode::from_u16(status).unwrap();
        ApiError::http_error(status, "x", retry_after).into()
    }

    #[test]
    fn network_errors_are_retryable() {
        let err = Error::Network(TransportError::connection("connection refused"));

        assert_eq!(
            classify(&err),
            RetryDecision {
                retryable: true,
                delay_hint: None
            }
        );
    }

    #[test]
    fn retryable_api_status_carries_retry_after_hint() {
        let decision = classify(&api(429, Some(Duration::from_secs(2))));

        assert!(decision.retryable);
        assert_eq!(decision.delay_hint, Some(Duration::from_secs(2)));
    }

    #[test]
    fn client_errors_are_terminal() {
        assert!(!classify(&api(400, None)).retryable);
        assert!(!classify(&api(404, None)).retryable);
    }

    #[test]
    fn invalid_json_on_success_status_is_terminal() {
        let err: Error = ApiError::invalid_json(http::StatusCode::OK, None).into();

        assert!(!classify(&err).retryable);
    }

    #[test]
    fn timeout_cancellation_and_validation_are_terminal() {
        let timeout = Error::Timeout {
            timeout: Duration::from_millis(50),
        };

        assert!(!classify(&timeout).retryable);
        assert!(!classify(&Error::Cancelled).retryable);
        assert!(!classify(&Error::validation("amount missing")).retryable);
    }
}

mod retry_after_header {
    use super::*;

    fn headers(value: &str) -> http::HeaderMap {
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, value.parse().unwrap());
        headers
    }

    #[test]
    fn parses_integer_seconds() {
        let now = SystemTime::UNIX_EPOCH;

        assert_eq!(
            parse_retry_after(&headers("2"), now),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            parse_retry_after(&headers(" 120 "), now),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn parses_http_date_relative_to_now() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let at = httpdate::fmt_http_date(now + Duration::from_secs(30));

        assert_eq!(
            parse_retry_after(&headers(&at), now),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn past_or_present_date_yields_none() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let past = httpdate::fmt_http_date(now - Duration::from_secs(30));
        let present = httpdate::fmt_http_date(now);

        assert_eq!(parse_retry_after(&headers(&past), now), None);
        assert_eq!(parse_retry_after(&headers(&present), now), None);
    }

    #[test]
    fn missing_or_garbage_yields_none() {
        let now = SystemTime::UNIX_EPOCH;

        assert_eq!(parse_retry_after(&http::HeaderMap::new(), now), None);
        assert_eq!(parse_retry_after(&headers("soon"), now), None);
        assert_eq!(parse_retry_after(&headers("-5"), now), None);
    }

    #[test]
    fn zero_seconds_yields_none() {
        let now = SystemTime::UNIX_EPOCH;

        assert_eq!(parse_retry_after(&headers("0"), now), None);
        assert_eq!(parse_retry_after(&headers(" 0 "), now), None);
    }
}
