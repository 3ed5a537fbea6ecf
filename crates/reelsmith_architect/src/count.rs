//! Episode-count derivation.

use crate::ArchitectConfig;
use reelsmith_core::Event;

// Absorbs float error so that 10 × 1.3 stays 13.
const EPSILON: f64 = 1e-9;

fn ceil_ratio(value: f64) -> u32 {
    (value - EPSILON).ceil().max(0.0) as u32
}

/// Number of episodes a story needs.
///
/// Load-bearing events times the multiplier, clamped to the configured range,
/// then raised when the story has more events than that many episodes can
/// hold at the configured average.
///
/// # Examples
///
/// ```
/// use reelsmith_architect::{ArchitectConfig, episode_count};
/// use reelsmith_core::{Event, EventType};
///
/// let events: Vec<Event> = (1..=10)
///     .map(|i| Event::new(format!("E{i:02}"), "x", EventType::LoadBearing))
///     .collect();
/// assert_eq!(episode_count(&events, &ArchitectConfig::default()), 13);
/// ```
pub fn episode_count(events: &[Event], config: &ArchitectConfig) -> u32 {
    let load_bearing = events.iter().filter(|e| e.is_load_bearing()).count();
    let by_structure = ceil_ratio(load_bearing as f64 * config.episode_multiplier())
        .clamp(*config.min_episodes(), *config.max_episodes());

    if events.is_empty() || *config.events_per_episode() <= 0.0 {
        return by_structure;
    }
    let by_volume = ceil_ratio(events.len() as f64 / config.events_per_episode());
    by_structure.max(by_volume)
}

/// The formula line recorded on an architecture.
pub fn count_formula(load_bearing: usize, config: &ArchitectConfig, count: u32) -> String {
    format!(
        "承重事件({}) × {} = {}",
        load_bearing,
        config.episode_multiplier(),
        count
    )
}
