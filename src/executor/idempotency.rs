//! Idempotency key generation.

/// Source of unique idempotency keys.
///
/// Injected into the executor so tests can supply deterministic keys.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh, unique key.
    fn generate(&self) -> String;
}

/// Generates random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
