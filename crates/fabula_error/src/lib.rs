//! Error types for the Fabula pipeline.
//!
//! This crate provides the foundation error types used throughout the Fabula
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fabula_error::{DriverError, FabulaResult};
//!
//! fn call_model() -> FabulaResult<String> {
//!     Err(DriverError::new("connection refused"))?
//! }
//!
//! match call_model() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod contract;
mod driver;
mod error;
mod pipeline;
mod store;

pub use config::ConfigError;
pub use contract::{ContractError, ContractErrorKind};
pub use driver::DriverError;
pub use error::{FabulaError, FabulaErrorKind, FabulaResult};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use store::{StoreError, StoreErrorKind};
