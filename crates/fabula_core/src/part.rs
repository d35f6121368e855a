//! Multimodal prompt parts and model responses.

use serde::{Deserialize, Serialize};

/// One element of an ordered multimodal prompt.
///
/// Ordering of parts is preserved exactly when forwarded to the underlying
/// capability: instruction text must immediately precede the reference image
/// it describes, so reordering would change the meaning of the prompt.
///
/// # Examples
///
/// ```
/// use fabula_core::PromptPart;
///
/// let text = PromptPart::Text("Use this image as the background:".to_string());
/// let image = PromptPart::Image {
///     mime: Some("image/png".to_string()),
///     data: vec![0x89, 0x50, 0x4E, 0x47],
/// };
/// assert!(image.is_image());
/// assert!(!text.is_image());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PromptPart {
    /// Plain text instruction fragment.
    Text(String),

    /// Opaque image reference supplied to the model.
    Image {
        /// MIME type, e.g., "image/png"
        mime: Option<String>,
        /// Raw image bytes
        data: Vec<u8>,
    },
}

impl PromptPart {
    /// True if this part carries image data.
    pub fn is_image(&self) -> bool {
        matches!(self, PromptPart::Image { .. })
    }
}

/// One output element returned by a generative call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ModelOutput {
    /// Plain text output.
    Text(String),

    /// Generated image output.
    Image {
        /// MIME type of the image
        mime: Option<String>,
        /// Binary image data
        data: Vec<u8>,
    },
}

/// The unified response from a generative call.
///
/// A multimodal call may return text, an image, both, or neither; callers
/// scan the outputs for what they need.
///
/// # Examples
///
/// ```
/// use fabula_core::{ModelOutput, ModelResponse};
///
/// let response = ModelResponse {
///     outputs: vec![
///         ModelOutput::Text("Here is the portrait.".to_string()),
///         ModelOutput::Image { mime: None, data: vec![1, 2, 3] },
///     ],
/// };
/// assert_eq!(response.first_image(), Some(&[1u8, 2, 3][..]));
/// assert_eq!(response.text(), "Here is the portrait.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelResponse {
    /// The generated outputs from the model
    pub outputs: Vec<ModelOutput>,
}

impl ModelResponse {
    /// Build a response holding a single text output.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            outputs: vec![ModelOutput::Text(text.into())],
        }
    }

    /// Build a response holding a single image output.
    pub fn from_image(data: Vec<u8>) -> Self {
        Self {
            outputs: vec![ModelOutput::Image { mime: None, data }],
        }
    }

    /// The first output carrying binary image data, if any.
    pub fn first_image(&self) -> Option<&[u8]> {
        self.outputs.iter().find_map(|output| match output {
            ModelOutput::Image { data, .. } => Some(data.as_slice()),
            ModelOutput::Text(_) => None,
        })
    }

    /// All text outputs concatenated with newlines.
    pub fn text(&self) -> String {
        let texts: Vec<&str> = self
            .outputs
            .iter()
            .filter_map(|output| match output {
                ModelOutput::Text(text) => Some(text.as_str()),
                ModelOutput::Image { .. } => None,
            })
            .collect();
        texts.join("\n")
    }
}
