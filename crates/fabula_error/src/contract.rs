//! Contract extraction and validation error types.

/// Specific error conditions for extracting a structured contract from a
/// free-text model response.
///
/// The `NotFound` and `Malformed` variants retain the raw response text so
/// that a failed extraction can be diagnosed after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ContractErrorKind {
    /// No JSON object delimiters were found in the response
    #[display("no JSON object found in response ({} bytes)", response.len())]
    NotFound {
        /// The raw response text, retained for diagnostics
        response: String,
    },
    /// Delimiters were found but the candidate text failed strict parsing
    #[display("malformed JSON contract: {}", message)]
    Malformed {
        /// The parse error message
        message: String,
        /// The raw response text, retained for diagnostics
        response: String,
    },
    /// A parsed contract lacks an expected key
    #[display("contract is missing required field '{}'", _0)]
    FieldMissing(String),
}

/// Contract error with source location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{ContractError, ContractErrorKind};
///
/// let err = ContractError::new(ContractErrorKind::FieldMissing("storyline".to_string()));
/// assert!(format!("{}", err).contains("storyline"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Contract Error: {} at line {} in {}", kind, line, file)]
pub struct ContractError {
    /// The specific error condition
    pub kind: ContractErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ContractError {
    /// Create a new ContractError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContractErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The raw response text, if this error retained one.
    pub fn raw_response(&self) -> Option<&str> {
        match &self.kind {
            ContractErrorKind::NotFound { response } => Some(response),
            ContractErrorKind::Malformed { response, .. } => Some(response),
            ContractErrorKind::FieldMissing(_) => None,
        }
    }
}
