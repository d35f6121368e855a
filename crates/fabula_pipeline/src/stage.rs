//! Stage executor bridging the pipeline to a generative driver.

use fabula_core::PromptPart;
use fabula_error::{FabulaError, FabulaResult};
use fabula_interface::GenerativeDriver;

/// Per-item result of one multimodal generation call.
///
/// Batch stages treat all three variants as item outcomes: `NoImageData`
/// and `Failed` degrade the stage report but never abort the batch.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The call produced image bytes
    Image(Vec<u8>),
    /// The call succeeded but returned no image payload
    NoImageData,
    /// The call itself failed
    Failed(FabulaError),
}

impl ItemOutcome {
    /// True if this outcome carries image bytes.
    pub fn is_image(&self) -> bool {
        matches!(self, ItemOutcome::Image(_))
    }
}

/// Executes individual generative calls for the pipeline.
///
/// Owns the driver and narrows its responses to what stages consume: raw
/// text for contract stages, a per-item [`ItemOutcome`] for image stages.
pub struct StageExecutor<D> {
    driver: D,
}

impl<D: GenerativeDriver> StageExecutor<D> {
    /// Wrap a driver.
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run a text-generation call and return the raw response.
    ///
    /// # Errors
    ///
    /// Propagates any driver error; contract stages treat this as a stage
    /// failure.
    #[tracing::instrument(skip(self, prompt), fields(provider = self.driver.provider_name(), model = self.driver.model_name(), prompt_len = prompt.len()))]
    pub async fn run_text(&self, prompt: &str) -> FabulaResult<String> {
        let response = self.driver.generate_text(prompt).await?;
        tracing::debug!(response_len = response.len(), "text generation complete");
        Ok(response)
    }

    /// Run a multimodal call, forwarding `parts` in exact order, and scan
    /// the response for the first image payload.
    ///
    /// Driver errors surface as [`ItemOutcome::Failed`] rather than a
    /// `Result` so batch loops record them without aborting.
    #[tracing::instrument(skip(self, parts), fields(provider = self.driver.provider_name(), model = self.driver.model_name(), parts = parts.len()))]
    pub async fn run_multimodal(&self, parts: &[PromptPart]) -> ItemOutcome {
        match self.driver.generate_multimodal(parts).await {
            Ok(response) => match response.first_image() {
                Some(data) => ItemOutcome::Image(data.to_vec()),
                None => {
                    tracing::warn!("multimodal call returned no image data");
                    ItemOutcome::NoImageData
                }
            },
            Err(error) => {
                tracing::error!(%error, "multimodal call failed");
                ItemOutcome::Failed(error)
            }
        }
    }
}

impl<D> std::fmt::Debug for StageExecutor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageExecutor").finish_non_exhaustive()
    }
}
