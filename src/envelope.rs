//! Response envelopes used by the payment platform.
//!
//! Successful single-resource responses look like
//! `{ "success": true, "messages": [], "result": { ... } }`; list responses
//! add a `pagination` object. Failures carry an `error` object.

use serde::{Deserialize, Serialize};

/// Envelope of a single-resource response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the platform considers the call successful
    pub success: bool,
    /// Informational messages
    #[serde(default)]
    pub messages: Vec<String>,
    /// The resource itself
    pub result: T,
}

/// Envelope of a paginated list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Whether the platform considers the call successful
    pub success: bool,
    /// Informational messages
    #[serde(default)]
    pub messages: Vec<String>,
    /// Items of the current page
    pub result: Vec<T>,
    /// Cursor information
    pub pagination: Pagination,
}

/// Pagination block of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of items in the current page
    pub count: u64,
    /// Cursor of the next page, absent on the last page
    #[serde(default)]
    pub next: Option<String>,
}

/// Structured failure envelope: `{ "error": { code, reason, message, details } }`.
///
/// All four fields are required; a body missing any of them is treated as
/// an unstructured HTTP error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEnvelope {
    /// The error object
    pub error: ErrorBody,
}

/// Body of an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorBody {
    /// Platform error code
    pub code: i64,
    /// Machine-readable reason
    pub reason: String,
    /// Human-readable message
    pub message: String,
    /// Structured details
    pub details: Vec<serde_json::Value>,
}

impl ErrorEnvelope {
    /// Recognizes an error envelope in an already parsed body.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}
