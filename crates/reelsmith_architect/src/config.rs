//! Architect configuration.

use derive_getters::Getters;
use reelsmith_core::RhythmTemplate;
use serde::{Deserialize, Serialize};

/// Configuration for episode counting, scheduling and architecture generation.
///
/// # Examples
///
/// ```
/// use reelsmith_architect::ArchitectConfig;
///
/// let config: ArchitectConfig = toml::from_str("max_events_per_episode = 4").unwrap();
/// assert_eq!(*config.max_events_per_episode(), 4);
/// assert_eq!(*config.min_episodes(), 3);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct ArchitectConfig {
    /// Events an episode takes before placement falls back to the least-filled episode
    #[serde(default = "default_max_events")]
    #[builder(default = "default_max_events()")]
    max_events_per_episode: usize,

    /// Events every episode should end up with
    #[serde(default = "default_min_events")]
    #[builder(default = "default_min_events()")]
    min_events_per_episode: usize,

    /// Lower clamp of the derived episode count
    #[serde(default = "default_min_episodes")]
    #[builder(default = "default_min_episodes()")]
    min_episodes: u32,

    /// Upper clamp of the derived episode count
    #[serde(default = "default_max_episodes")]
    #[builder(default = "default_max_episodes()")]
    max_episodes: u32,

    /// Episodes per load-bearing event
    #[serde(default = "default_multiplier")]
    #[builder(default = "default_multiplier()")]
    episode_multiplier: f64,

    /// Average events per episode used to raise the count for event-heavy stories
    #[serde(default = "default_events_per_episode")]
    #[builder(default = "default_events_per_episode()")]
    events_per_episode: f64,

    /// Rhythm template every episode follows
    #[serde(default)]
    #[builder(default)]
    rhythm_template: RhythmTemplate,

    /// Ask the text generator first and fall back to the algorithm on failure
    #[serde(default = "default_use_llm")]
    #[builder(default = "default_use_llm()")]
    use_llm: bool,

    /// Token budget of an architecture request
    #[serde(default = "default_max_tokens")]
    #[builder(default = "default_max_tokens()")]
    max_tokens: u32,

    /// Token budget of a single-episode adjustment request
    #[serde(default = "default_adjust_max_tokens")]
    #[builder(default = "default_adjust_max_tokens()")]
    adjust_max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    #[builder(default = "default_temperature()")]
    temperature: f32,
}

fn default_max_events() -> usize {
    3
}

fn default_min_events() -> usize {
    1
}

fn default_min_episodes() -> u32 {
    3
}

fn default_max_episodes() -> u32 {
    20
}

fn default_multiplier() -> f64 {
    1.3
}

fn default_events_per_episode() -> f64 {
    2.5
}

fn default_use_llm() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_adjust_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ArchitectConfig {
    fn default() -> Self {
        Self {
            max_events_per_episode: default_max_events(),
            min_events_per_episode: default_min_events(),
            min_episodes: default_min_episodes(),
            max_episodes: default_max_episodes(),
            episode_multiplier: default_multiplier(),
            events_per_episode: default_events_per_episode(),
            rhythm_template: RhythmTemplate::default(),
            use_llm: default_use_llm(),
            max_tokens: default_max_tokens(),
            adjust_max_tokens: default_adjust_max_tokens(),
            temperature: default_temperature(),
        }
    }
}
