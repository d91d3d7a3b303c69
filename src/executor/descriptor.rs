//! Per-call request description.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// A primitive query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// String value, sent as-is
    Str(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value, sent as `true` / `false`
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Values above `i64::MAX` are sent as their decimal text.
impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Description of one logical call.
///
/// Resource modules build a descriptor and hand it to
/// [`RequestExecutor::execute`](super::RequestExecutor::execute). Unset
/// overrides fall back to the client configuration.
///
/// # Example
///
/// ```
/// use paycore::executor::RequestDescriptor;
/// use std::time::Duration;
///
/// let descriptor = RequestDescriptor::get("/payouts")
///     .query("status", "pending")
///     .query_opt("cursor", None::<&str>)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(descriptor.path(), "/payouts");
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: http::Method,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, Option<QueryValue>)>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    cancellation: Option<CancellationToken>,
    idempotency_key: Option<String>,
}

impl RequestDescriptor {
    /// Creates a descriptor for the given method and resource-relative path.
    #[must_use]
    pub fn new(method: http::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            timeout: None,
            max_retries: None,
            cancellation: None,
            idempotency_key: None,
        }
    }

    /// Creates a GET descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(http::Method::GET, path)
    }

    /// Creates a POST descriptor.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(http::Method::POST, path)
    }

    /// Creates a PATCH descriptor.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(http::Method::PATCH, path)
    }

    /// Creates a DELETE descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(http::Method::DELETE, path)
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes a value into the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the value cannot be represented as JSON.
    pub fn try_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::validation(format!("request body is not serializable: {e}")))?;
        Ok(self.json(value))
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query_opt(key, Some(value))
    }

    /// Adds a query parameter that is omitted entirely when `value` is `None`.
    #[must_use]
    pub fn query_opt<V: Into<QueryValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.query.push((key.into(), value.map(Into::into)));
        self
    }

    /// Overrides the per-attempt timeout. Zero disables the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Attaches a caller cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Supplies the idempotency key instead of generating one.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// Resource-relative path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Query parameters whose value is defined, in insertion order.
    pub fn defined_query(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.query
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Per-call timeout override.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Per-call retry budget override.
    #[must_use]
    pub const fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Caller cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Caller-supplied idempotency key.
    #[must_use]
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}
