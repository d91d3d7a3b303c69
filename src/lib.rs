//! paycore: HTTP execution core for a payment-platform REST client
//!
//! Builds authenticated requests, enforces per-attempt timeouts, honors
//! caller cancellation, retries transient failures with backoff, and
//! classifies every failure into a structured [`Error`].

pub mod config;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod time;
pub mod transport;
mod validate;

pub use config::ClientConfig;
pub use error::{ApiError, Error, ErrorKind};
pub use executor::{RequestDescriptor, RequestExecutor};
pub use validate::Validate;
