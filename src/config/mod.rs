//! Configuration layer for the payment-platform client.
//!
//! This module provides:
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated client configuration ([`ClientConfig`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Per-call overrides** - timeout, retry budget, cancellation token and
//!    idempotency key set on a [`RequestDescriptor`]
//! 2. **Client configuration** - values from the TOML file or the builder
//! 3. **Built-in defaults** - constants in [`defaults`]
//!
//! Credentials and the base URL have no defaults and must always be supplied.
//!
//! [`RequestDescriptor`]: crate::executor::RequestDescriptor

pub mod defaults;
mod error;
mod toml;
mod validated;


pub use error::{ConfigError, field};
pub use toml::{ClientSection, RetrySection, TomlConfig, default_config_template};
pub use validated::ClientConfig;
