//! Narration and dialogue script entries.

use fabula_error::{ContractError, ContractErrorKind, FabulaResult};
use serde::{Deserialize, Serialize};

/// Raw script contract as returned by the model:
/// `{"script": [{"scene": 1, "narration": "...", "dialogue": "..."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScriptContract {
    /// Script entries in scene order
    script: Option<Vec<ScriptEntry>>,
}

impl ScriptContract {
    /// The script entries.
    ///
    /// # Errors
    ///
    /// Returns a `FieldMissing` contract error when the parsed contract did
    /// not carry a `script` key.
    pub fn into_entries(self) -> FabulaResult<Vec<ScriptEntry>> {
        self.script.ok_or_else(|| {
            ContractError::new(ContractErrorKind::FieldMissing("script".to_string())).into()
        })
    }
}

/// Narration and dialogue for one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// One-based scene number, as written by the model
    pub scene: u32,
    /// Narration text
    #[serde(default)]
    pub narration: String,
    /// Dialogue text
    #[serde(default)]
    pub dialogue: String,
}
