//! Character specifications extracted from the story contract.

use serde::{Deserialize, Serialize};

/// One character identified by the story stage.
///
/// `name` is the identity key for the character's portrait asset. Uniqueness
/// within a run is expected but not enforced; duplicate names overwrite one
/// another's asset under the same logical id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSpec {
    /// Character name, used as the asset identity key
    pub name: String,
    /// Personality traits
    #[serde(default)]
    pub traits: String,
    /// Visual appearance description
    #[serde(default)]
    pub appearance: String,
}
