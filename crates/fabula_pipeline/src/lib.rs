//! Stage orchestration for the Fabula narrative pipeline.
//!
//! A run moves a caller-supplied [`StoryBrief`](fabula_core::StoryBrief)
//! through seven generation stages: story contract, character portraits,
//! background plates, scene descriptions, scene composites, script, and
//! per-scene audio descriptions. Each stage consumes the outputs of its
//! predecessors, so the [`Pipeline`] gates stage order with a monotonic
//! [`RunState`] ladder and stores every generated image in an injected
//! [`AssetStore`](fabula_store::AssetStore) under deterministic logical
//! ids.
//!
//! Model responses carry their JSON contracts wrapped in prose;
//! [`extract_contract`] and [`parse_contract`] recover and type them.
//! Composite prompts are assembled by the [`composer`] with a fixed part
//! ordering that keeps instruction text adjacent to the reference image it
//! describes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod composer;
mod config;
mod extraction;
mod limiter;
mod pipeline;
pub mod prompts;
mod stage;
mod state;

pub use config::PipelineConfig;
pub use extraction::{extract_contract, parse_contract};
pub use limiter::Pacer;
pub use pipeline::Pipeline;
pub use stage::{ItemOutcome, StageExecutor};
pub use state::RunState;
