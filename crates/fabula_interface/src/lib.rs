//! Trait definitions for the Fabula narrative pipeline.
//!
//! This crate provides the driver trait that abstracts the generative model
//! collaborator, plus the plain result types shared by batch stages.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::GenerativeDriver;
pub use types::StageReport;
