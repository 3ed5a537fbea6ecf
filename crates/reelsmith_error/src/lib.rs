//! Error types for the Reelsmith pipeline.
//!
//! This crate provides the foundation error types used throughout the Reelsmith workspace.
//!
//! # Error Hierarchy
//!
//! Stage errors (generation, architect, synthesis, asset) pair a `*ErrorKind` enum
//! with a wrapper struct recording where the error was raised. Plumbing
//! errors (JSON, backend, configuration, builder) carry a message instead.
//! Every constructor is `#[track_caller]`.
//!
//! # Examples
//!
//! ```
//! use reelsmith_error::{ReelsmithResult, GenerationError, GenerationErrorKind};
//!
//! fn call_model() -> ReelsmithResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::Request("connection refused".into())))?
//! }
//!
//! match call_model() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod architect;
mod asset;
mod error;
mod generation;
mod message;
mod synthesis;

pub use architect::{ArchitectError, ArchitectErrorKind};
pub use asset::{AssetError, AssetErrorKind};
pub use error::{ReelsmithError, ReelsmithErrorKind, ReelsmithResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use message::{BackendError, BuilderError, ConfigError, JsonError};
pub use synthesis::{SynthesisError, SynthesisErrorKind};
