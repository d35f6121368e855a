//! The caller-supplied story brief.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Caller input that seeds a pipeline run.
///
/// Immutable once created; consumed by the story stage.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryBriefBuilder;
///
/// let brief = StoryBriefBuilder::default()
///     .topic("The Discovery of Fire")
///     .description("A curious cave person discovers fire by accident.")
///     .style("Prehistoric cave painting style")
///     .build()
///     .unwrap();
/// assert_eq!(brief.topic(), "The Discovery of Fire");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct StoryBrief {
    /// Topic of the story
    topic: String,
    /// Free-text description of the desired story
    description: String,
    /// Art style label applied to every generated asset
    style: String,
}
