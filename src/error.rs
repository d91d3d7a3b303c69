//! Classified errors surfaced by the request executor.

use std::time::Duration;

use thiserror::Error;

use crate::envelope::{ErrorBody, ErrorEnvelope};
use crate::transport::TransportError;

/// HTTP statuses that are worth another attempt.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Reason attached to a response whose body is not valid JSON.
pub const REASON_INVALID_JSON: &str = "invalid_json";

/// Reason attached to a non-2xx response without a structured error envelope.
pub const REASON_HTTP_ERROR: &str = "http_error";

/// The remote server answered with a non-2xx status, or with a body that
/// could not be parsed.
#[derive(Debug, Clone, Error)]
#[error("API error {code} ({reason}): {message}")]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: u16,
    /// Platform error code; equals `status` for synthesized errors.
    pub code: i64,
    /// Machine-readable reason, e.g. `invalid_json` or `http_error`.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details from the error envelope.
    pub details: Vec<serde_json::Value>,
    /// Delay requested by the server via `Retry-After`.
    pub retry_after: Option<Duration>,
}

impl ApiError {
    /// Error for a response whose body failed to parse as JSON.
    #[must_use]
    pub fn invalid_json(status: http::StatusCode, retry_after: Option<Duration>) -> Self {
        Self {
            status: status.as_u16(),
            code: i64::from(status.as_u16()),
            reason: REASON_INVALID_JSON.to_string(),
            message: "Response body is not valid JSON".to_string(),
            details: Vec::new(),
            retry_after,
        }
    }

    /// Generic error for a non-2xx response without an error envelope.
    #[must_use]
    pub fn http_error(
        status: http::StatusCode,
        status_text: impl Into<String>,
        retry_after: Option<Duration>,
    ) -> Self {
        Self {
            status: status.as_u16(),
            code: i64::from(status.as_u16()),
            reason: REASON_HTTP_ERROR.to_string(),
            message: status_text.into(),
            details: Vec::new(),
            retry_after,
        }
    }

    /// Error built from the platform's structured error envelope.
    #[must_use]
    pub fn from_envelope(
        status: http::StatusCode,
        envelope: ErrorEnvelope,
        retry_after: Option<Duration>,
    ) -> Self {
        let ErrorBody {
            code,
            reason,
            message,
            details,
        } = envelope.error;
        Self {
            status: status.as_u16(),
            code,
            reason,
            message,
            details,
            retry_after,
        }
    }

    /// Returns true when the HTTP status is one of [`RETRYABLE_STATUSES`].
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        RETRYABLE_STATUSES.contains(&self.status)
    }
}

/// Error type returned by every executor operation.
///
/// Each terminal failure surfaces exactly one of these, carrying enough
/// structured context to branch on without matching message strings.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-side input failed validation before any request was sent.
    #[error("Validation failed: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// The server responded with a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response arrived within the effective timeout.
    #[error("Request timed out after {}ms", timeout.as_millis())]
    Timeout {
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// Transport-level failure (DNS, connection refused, reset).
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// The caller's cancellation token fired.
    #[error("Request cancelled by caller")]
    Cancelled,

    /// A successful response body did not match the requested type.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Discriminant of [`Error`], convenient for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Validation`].
    Validation,
    /// See [`Error::Api`].
    Api,
    /// See [`Error::Timeout`].
    Timeout,
    /// See [`Error::Network`].
    Network,
    /// See [`Error::Cancelled`].
    Cancelled,
    /// See [`Error::Decode`].
    Decode,
}

impl Error {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Api(_) => ErrorKind::Api,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Network(_) => ErrorKind::Network,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Returns the API error, if this is one.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_json_keeps_original_status() {
        let err = ApiError::invalid_json(http::StatusCode::OK, None);

        assert_eq!(err.status, 200);
        assert_eq!(err.code, 200);
        assert_eq!(err.reason, REASON_INVALID_JSON);
        assert!(err.details.is_empty());
    }

    #[test]
    fn http_error_uses_status_text_as_message() {
        let err = ApiError::http_error(
            http::StatusCode::BAD_GATEWAY,
            "Bad Gateway",
            Some(Duration::from_secs(3)),
        );

        assert_eq!(err.reason, REASON_HTTP_ERROR);
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.retry_after, Some(Duration::from_secs(3)));
    }

    #[test]
    fn retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            let status = http::StatusCode::from_u16(status).unwrap();
            assert!(ApiError::http_error(status, "x", None).is_retryable());
        }
        for status in [400, 401, 404, 409, 422, 501] {
            let status = http::StatusCode::from_u16(status).unwrap();
            assert!(!ApiError::http_error(status, "x", None).is_retryable());
        }
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Error::validation("bad").kind(), ErrorKind::Validation);
        assert_eq!(Error::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            Error::Timeout {
                timeout: Duration::from_millis(50)
            }
            .kind(),
            ErrorKind::Timeout
        );
        let api: Error = ApiError::invalid_json(http::StatusCode::OK, None).into();
        assert_eq!(api.kind(), ErrorKind::Api);
        assert!(api.as_api().is_some());
    }

    #[test]
    fn display_includes_structured_context() {
        let err: Error = ApiError::http_error(http::StatusCode::NOT_FOUND, "Not Found", None).into();
        assert_eq!(err.to_string(), "API error 404 (http_error): Not Found");

        let timeout = Error::Timeout {
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(timeout.to_string(), "Request timed out after 1500ms");
    }
}
