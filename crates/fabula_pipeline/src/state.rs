//! The run state machine gating stage order.

use fabula_error::{FabulaResult, PipelineError, PipelineErrorKind};

/// Progress ladder for one pipeline run.
///
/// States are strictly ordered and only ever advance. Re-running a
/// completed stage overwrites its outputs without rolling the state back,
/// which is how regeneration works.
///
/// # Examples
///
/// ```
/// use fabula_pipeline::RunState;
///
/// let mut state = RunState::Empty;
/// state.advance_to(RunState::StoryReady);
/// state.advance_to(RunState::Empty);
/// assert_eq!(state, RunState::StoryReady);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, derive_more::Display,
)]
pub enum RunState {
    /// No stage has completed
    #[default]
    #[display("empty")]
    Empty,
    /// The story contract has been accepted
    #[display("story_ready")]
    StoryReady,
    /// The character portrait batch has been attempted
    #[display("characters_ready")]
    CharactersReady,
    /// The background plate batch has been attempted
    #[display("backgrounds_ready")]
    BackgroundsReady,
    /// Scene descriptions have been accepted
    #[display("scenes_ready")]
    ScenesReady,
    /// The scene composite batch has been attempted
    #[display("composites_ready")]
    CompositesReady,
    /// The script contract has been accepted
    #[display("script_ready")]
    ScriptReady,
    /// The audio description batch has been attempted
    #[display("audio_ready")]
    AudioReady,
}

impl RunState {
    /// Advance to `next` if it is further along the ladder; never regress.
    pub fn advance_to(&mut self, next: RunState) {
        if next > *self {
            *self = next;
        }
    }

    /// Gate a stage on its prerequisite state.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` naming the stage, the required state, and
    /// the state the invocation found.
    pub fn require(self, required: RunState, stage: &str) -> FabulaResult<()> {
        if self >= required {
            Ok(())
        } else {
            Err(PipelineError::new(PipelineErrorKind::StageNotReady {
                stage: stage.to_string(),
                required: required.to_string(),
                current: self.to_string(),
            })
            .into())
        }
    }
}
