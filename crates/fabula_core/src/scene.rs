//! Scene descriptions produced by the scene-description stage.

use serde::{Deserialize, Serialize};

/// Raw scenes contract as returned by the model: `{"scenes": ["...", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenesContract {
    /// Scene descriptions in story order
    #[serde(default)]
    pub scenes: Vec<String>,
}

/// One scene description, indexed in story order.
///
/// The text embeds an implicit reference to one background and zero or more
/// characters; the pipeline does not parse which. When the contract supplies
/// an explicit `background` index it overrides the `index mod count`
/// selection fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSpec {
    /// Zero-based scene index
    pub index: usize,
    /// Scene description text
    pub text: String,
    /// Explicit background index, when the contract carries one
    #[serde(default)]
    pub background: Option<usize>,
}

impl SceneSpec {
    /// Create a scene spec without an explicit background mapping.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            background: None,
        }
    }
}

impl ScenesContract {
    /// Convert the raw contract into indexed scene specs.
    pub fn into_specs(self) -> Vec<SceneSpec> {
        self.scenes
            .into_iter()
            .enumerate()
            .map(|(index, text)| SceneSpec {
                index,
                text,
                background: None,
            })
            .collect()
    }
}
