//! Episode architecture for Reelsmith.
//!
//! Turns a story bible into a per-episode plan: how many episodes, which
//! events each covers, which beats land where, and the arc structure across
//! the series. Generation goes through a [`reelsmith_interface::TextGenerator`]
//! first and falls back to a deterministic algorithm built from the pieces
//! exported here.
//!
//! # Example
//!
//! ```
//! use reelsmith_architect::{ArchitectConfig, EventScheduler, design_arcs, episode_count, plan_beat_map};
//! use reelsmith_core::{Event, EventType, RhythmTemplate};
//!
//! let events: Vec<Event> = (1..=5)
//!     .map(|i| Event::new(format!("E{:02}", i), "event", EventType::LoadBearing))
//!     .collect();
//! let config = ArchitectConfig::default();
//! let count = episode_count(&events, &config);
//! assert_eq!(count, 7);
//!
//! let schedule = EventScheduler::from_config(&config).schedule(&events, count);
//! assert_eq!(schedule.episodes.len(), 7);
//!
//! let beats = plan_beat_map(&schedule.episodes[0], RhythmTemplate::Standard90);
//! assert!(!beats.is_empty());
//! assert_eq!(design_arcs(count).mini_arcs.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod arcs;
mod architect;
mod beat_map;
mod config;
mod count;
mod prompt;
mod scheduler;

pub use arcs::{design_arcs, emotional_arc, episode_logline, episode_title, key_characters, overview};
pub use architect::{EpisodeAdjustments, EpisodeArchitect, adjust_episode};
pub use beat_map::{default_beat_map, hook_description, plan_beat_map, select_beat};
pub use config::{ArchitectConfig, ArchitectConfigBuilder};
pub use count::{count_formula, episode_count};
pub use prompt::{adjust_prompt, architecture_prompt};
pub use scheduler::{EventOrdering, EventScheduler, Schedule, schedule_events};
