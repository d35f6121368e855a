//! Generative driver error types.

/// Error raised by the underlying generative capability (timeout, quota,
/// transport), with source location.
///
/// Stage batch loops convert these into per-item failure records rather than
/// letting them abort the batch.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Driver Error: {} at line {} in {}", message, line, file)]
pub struct DriverError {
    /// Error message describing the underlying cause
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DriverError {
    /// Create a new DriverError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::DriverError;
    ///
    /// let err = DriverError::new("model service unavailable");
    /// assert!(err.message.contains("unavailable"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
