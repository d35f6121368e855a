//! The story contract produced by the story stage.

use crate::CharacterSpec;
use fabula_error::{ContractError, ContractErrorKind, FabulaResult};
use serde::{Deserialize, Serialize};

/// Parsed story contract: storyline, cast, and background descriptions.
///
/// Deserialized directly from the model's JSON contract. Schema validation is
/// shallow: the lists default to empty when absent, and a missing `storyline`
/// only surfaces as an error when [`StoryData::storyline`] is called.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryData;
///
/// let json = r#"{
///   "storyline": "Kael strikes two stones together.",
///   "character_descriptions": [{"name": "Kael", "traits": "curious", "appearance": "fur cloak"}],
///   "background_descriptions": ["A dark cave lit by embers."]
/// }"#;
/// let story: StoryData = serde_json::from_str(json).unwrap();
/// assert_eq!(story.characters().len(), 1);
/// assert!(story.storyline().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoryData {
    /// The storyline text (~300 words, advisory only)
    storyline: Option<String>,
    /// Characters identified in the storyline
    #[serde(default)]
    character_descriptions: Vec<CharacterSpec>,
    /// Empty background plate descriptions, in narrative order
    #[serde(default)]
    background_descriptions: Vec<String>,
}

impl StoryData {
    /// The storyline text.
    ///
    /// # Errors
    ///
    /// Returns a `FieldMissing` contract error when the parsed contract did
    /// not carry a `storyline` key.
    pub fn storyline(&self) -> FabulaResult<&str> {
        self.storyline.as_deref().ok_or_else(|| {
            ContractError::new(ContractErrorKind::FieldMissing("storyline".to_string())).into()
        })
    }

    /// Characters in contract order. May be empty; downstream batch stages
    /// then produce zero items.
    pub fn characters(&self) -> &[CharacterSpec] {
        &self.character_descriptions
    }

    /// Background plate descriptions in narrative order. May be empty.
    pub fn backgrounds(&self) -> &[String] {
        &self.background_descriptions
    }
}
