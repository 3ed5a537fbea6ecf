//! Trait definitions for text generation backends.
//!
//! The pipeline never talks to a model directly; every external call goes
//! through [`TextGenerator`]. Two generators ship with the crate:
//! [`OfflineGenerator`] for template-only runs and [`ScriptedGenerator`] for
//! replaying recorded replies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod offline;
mod scripted;
mod traits;

pub use offline::OfflineGenerator;
pub use scripted::ScriptedGenerator;
pub use traits::TextGenerator;
