//! Request execution: building, sending, retrying and classifying calls.
//!
//! This module provides:
//! - Per-call request descriptions ([`RequestDescriptor`])
//! - Request construction from config and descriptor ([`build_request`])
//! - Fan-in of timeout and caller cancellation ([`CompositeCancellation`])
//! - Retry policy and failure classification ([`RetryPolicy`], [`classify`])
//! - The retry-driving executor ([`RequestExecutor`])

mod build;
mod cancel;
mod descriptor;
mod idempotency;
mod pipeline;
mod retry;

#[cfg(test)]
mod retry_tests;
#[cfg(test)]
mod test_fixtures;

pub use build::{IDEMPOTENCY_KEY_HEADER, TENANT_HEADER, build_request};
pub use cancel::{CancelSource, CompositeCancellation};
pub use descriptor::{QueryValue, RequestDescriptor};
pub use idempotency::{IdGenerator, UuidGenerator};
pub use pipeline::RequestExecutor;
pub use retry::{RetryDecision, RetryPolicy, classify, parse_retry_after};
