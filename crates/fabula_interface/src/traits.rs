//! Trait definitions for generative model drivers.

use async_trait::async_trait;
use fabula_core::{ModelResponse, PromptPart};
use fabula_error::FabulaResult;

/// Core trait that all generative drivers must implement.
///
/// This is the minimal interface the pipeline needs from the excluded
/// model collaborator: blocking text completion and multimodal synthesis.
/// Transport, credentials, and retry belong to the implementation.
#[async_trait]
pub trait GenerativeDriver: Send + Sync {
    /// Generate free text from a text prompt.
    ///
    /// No schema is enforced here; all structure is recovered downstream by
    /// contract extraction.
    async fn generate_text(&self, prompt: &str) -> FabulaResult<String>;

    /// Generate from an ordered multimodal prompt.
    ///
    /// Implementations must forward `parts` in the exact order given, since
    /// ordering communicates instruction-then-reference semantics. The
    /// response may carry text, an image, both, or neither.
    async fn generate_multimodal(&self, parts: &[PromptPart]) -> FabulaResult<ModelResponse>;

    /// Provider name (e.g., "gemini", "anthropic", "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}
