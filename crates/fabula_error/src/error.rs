//! Top-level error wrapper types.

use crate::{ConfigError, ContractError, DriverError, PipelineError, StoreError};

/// The foundation error enum for the Fabula workspace.
///
/// # Examples
///
/// ```
/// use fabula_error::{DriverError, FabulaError};
///
/// let driver_err = DriverError::new("request timed out");
/// let err: FabulaError = driver_err.into();
/// assert!(format!("{}", err).contains("Driver Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// Contract extraction or validation error
    #[from(ContractError)]
    Contract(ContractError),
    /// Generative driver error
    #[from(DriverError)]
    Driver(DriverError),
    /// Asset store error
    #[from(StoreError)]
    Store(StoreError),
    /// Pipeline orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{ConfigError, FabulaResult};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("success"),
///     Err(e) => println!("error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{DriverError, FabulaResult};
///
/// fn call_model() -> FabulaResult<String> {
///     Err(DriverError::new("quota exceeded"))?
/// }
/// ```
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
