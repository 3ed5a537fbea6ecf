//! Tolerant JSON recovery for model replies.
//!
//! Model replies are untrusted: they arrive wrapped in prose or code fences,
//! with raw newlines inside strings, trailing commas, bare keys, or cut off
//! mid-document. [`TolerantParser`] runs an ordered chain of repair steps over
//! the reply and returns the first document that parses.
//!
//! # Example
//!
//! ```
//! use reelsmith_repair::TolerantParser;
//!
//! let parser = TolerantParser::default();
//! let value = parser.parse("{\"narration\": \"first line\nsecond line\"}").unwrap();
//! assert_eq!(value["narration"], "first line\nsecond line");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod parser;
mod scan;

pub use config::{RepairConfig, RepairConfigBuilder};
pub use parser::{RepairStrategy, Repaired, TolerantParser};
pub use scan::preview;
