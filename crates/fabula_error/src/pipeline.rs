//! Pipeline orchestration error types.

/// Specific error conditions for pipeline orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// A stage was invoked before its predecessor completed
    #[display("stage '{}' requires state '{}' but the run is at '{}'", stage, required, current)]
    StageNotReady {
        /// The stage that was invoked
        stage: String,
        /// The run state the stage requires
        required: String,
        /// The run state the invocation found
        current: String,
    },
    /// A scene composite was requested but no background assets exist
    #[display("no background asset available for scene {}", _0)]
    NoBackgroundAvailable(usize),
    /// The caller cancelled the run between batch items
    #[display("stage '{}' cancelled after {} items", stage, completed)]
    Cancelled {
        /// The stage that was cancelled
        stage: String,
        /// Items completed before cancellation
        completed: usize,
    },
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::NoBackgroundAvailable(3));
/// assert!(format!("{}", err).contains("scene 3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
