//! Reelsmith - novel-to-storyboard pipeline
//!
//! Reelsmith turns a novel's extracted story bible into a short-drama
//! storyboard: it derives how many episodes the story supports, schedules the
//! story's events into episodes without breaking their dependencies, plans the
//! audience-payoff beats of every episode, and synthesizes a timed
//! image-generation prompt for every scripted clip.
//!
//! # Features
//!
//! - **Tolerant parsing**: model replies are recovered even when fenced,
//!   truncated or malformed
//! - **Dependency-aware scheduling**: no event lands after an event that needs it
//! - **Fallbacks everywhere**: generator failures degrade to algorithmic or
//!   template output, always marked as such
//! - **Anchor consistency**: a character keeps the same token in every clip
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reelsmith::{JobState, OfflineGenerator, Pipeline, ReelsmithConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(OfflineGenerator, ReelsmithConfig::load()?);
//!     let mut job: JobState = serde_json::from_str(&std::fs::read_to_string("job.json")?)?;
//!
//!     pipeline.architect(&mut job, None).await?;
//!     pipeline.assets(&mut job).await?;
//!     pipeline.storyboard(&mut job).await?;
//!     println!("{}", serde_json::to_string_pretty(&job)?);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `reelsmith_error` - Error types
//! - `reelsmith_core` - Data model and closed tables
//! - `reelsmith_interface` - `TextGenerator` trait
//! - `reelsmith_cache` - Per-job prompt cache
//! - `reelsmith_repair` - Tolerant reply parser
//! - `reelsmith_architect` - Episode count, event scheduling, beats and arcs
//! - `reelsmith_storyboard` - Clip timing, speech rate and prompt synthesis
//! - `reelsmith_assets` - Character, prop and location reference sheets
//!
//! This crate (`reelsmith`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod pipeline;

pub use config::ReelsmithConfig;
pub use pipeline::Pipeline;

pub use reelsmith_architect::*;
pub use reelsmith_assets::*;
pub use reelsmith_cache::*;
pub use reelsmith_core::*;
pub use reelsmith_error::*;
pub use reelsmith_interface::*;
pub use reelsmith_repair::*;
pub use reelsmith_storyboard::*;
