//! Core data types for the Fabula narrative pipeline.
//!
//! This crate provides the foundation data types used across all Fabula
//! interfaces: the story brief and its generated contracts, the asset id
//! scheme, and the multimodal prompt parts exchanged with generative drivers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod audio;
mod brief;
mod character;
mod part;
mod scene;
mod script;
mod story;

pub use asset::{AssetId, AssetKind, BackgroundAsset, CharacterAsset, SceneComposite};
pub use audio::{AudioContract, AudioDescription};
pub use brief::{StoryBrief, StoryBriefBuilder};
pub use character::CharacterSpec;
pub use part::{ModelOutput, ModelResponse, PromptPart};
pub use scene::{SceneSpec, ScenesContract};
pub use script::{ScriptContract, ScriptEntry};
pub use story::StoryData;
