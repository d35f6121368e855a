//! Asset store error types.

/// Kinds of asset store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// No asset exists under the requested logical id
    #[display("asset not found: {}", _0)]
    NotFound(String),
    /// Failed to create a storage directory
    #[display("failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write an asset
    #[display("failed to write asset: {}", _0)]
    FileWrite(String),
    /// Failed to read an asset
    #[display("failed to read asset: {}", _0)]
    FileRead(String),
    /// Failed to list assets
    #[display("failed to list assets: {}", _0)]
    List(String),
}

/// Asset store error with location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound("char_kael".to_string()));
/// assert!(format!("{}", err).contains("char_kael"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
