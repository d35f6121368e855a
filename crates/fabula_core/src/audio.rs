//! Per-scene audio descriptions.

use fabula_error::{ContractError, ContractErrorKind, FabulaResult};
use serde::{Deserialize, Serialize};

/// Raw audio contract as returned by the model: `{"audio_description": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AudioContract {
    /// Background music and SFX description
    audio_description: Option<String>,
}

impl AudioContract {
    /// Bind the contract to its scene index.
    ///
    /// # Errors
    ///
    /// Returns a `FieldMissing` contract error when the parsed contract did
    /// not carry an `audio_description` key.
    pub fn into_description(self, scene_index: usize) -> FabulaResult<AudioDescription> {
        let audio_description = self.audio_description.ok_or_else(|| {
            ContractError::new(ContractErrorKind::FieldMissing(
                "audio_description".to_string(),
            ))
        })?;
        Ok(AudioDescription {
            scene_index,
            audio_description,
        })
    }
}

/// Background music and SFX description for one scene.
///
/// Audio descriptions are independent per scene and order-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDescription {
    /// Zero-based scene index
    pub scene_index: usize,
    /// Background music and SFX description
    pub audio_description: String,
}
