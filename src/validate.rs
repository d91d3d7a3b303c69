//! Caller-side input validation hook.

/// Input that can check itself before a request is built.
///
/// Resource modules implement this for their request payloads and call
/// [`RequestExecutor::validate`](crate::executor::RequestExecutor::validate),
/// which runs the check only when validation is enabled in the client
/// configuration. A failure surfaces as [`Error::Validation`](crate::Error::Validation).
///
/// # Example
///
/// ```
/// use paycore::Validate;
///
/// struct CreatePayout {
///     amount: i64,
/// }
///
/// impl Validate for CreatePayout {
///     fn validate(&self) -> Result<(), String> {
///         if self.amount <= 0 {
///             return Err("amount must be positive".to_string());
///         }
///         Ok(())
///     }
/// }
///
/// assert!(CreatePayout { amount: 0 }.validate().is_err());
/// ```
pub trait Validate {
    /// Returns a description of the first problem found, if any.
    ///
    /// # Errors
    ///
    /// Returns the validation message when the input is invalid.
    fn validate(&self) -> Result<(), String>;
}
