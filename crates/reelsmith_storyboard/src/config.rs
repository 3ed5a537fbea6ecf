//! Storyboard configuration.

use derive_getters::Getters;
use reelsmith_cache::PromptCacheConfig;
use reelsmith_core::{StylePreset, SynthesisMode};
use serde::{Deserialize, Serialize};

/// Configuration for clip timing, speech-rate checks and prompt synthesis.
///
/// # Examples
///
/// ```
/// use reelsmith_storyboard::StoryboardConfig;
///
/// let config: StoryboardConfig = toml::from_str(r#"
///     max_clip_duration = 8
///     style_preset = "hitchcock"
///
///     [cache]
///     ttl_seconds = 60
/// "#).unwrap();
/// assert_eq!(config.max_clip_duration(), &Some(8));
/// assert_eq!(*config.cache().ttl_seconds(), 60);
/// assert!(*config.use_batch());
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
pub struct StoryboardConfig {
    /// Longest clip a user allows, in seconds
    #[serde(default)]
    #[builder(default)]
    max_clip_duration: Option<u32>,

    /// Slowest acceptable narration, characters per second
    #[serde(default = "default_min_speech_rate")]
    #[builder(default = "default_min_speech_rate()")]
    min_speech_rate: f64,

    /// Fastest acceptable narration, characters per second
    #[serde(default = "default_max_speech_rate")]
    #[builder(default = "default_max_speech_rate()")]
    max_speech_rate: f64,

    /// Ask the text generator for visual descriptions
    #[serde(default = "default_true")]
    #[builder(default = "default_true()")]
    use_llm: bool,

    /// One call per episode instead of one per clip
    #[serde(default = "default_true")]
    #[builder(default = "default_true()")]
    use_batch: bool,

    /// Treat a batched reply of the wrong length as an error
    #[serde(default)]
    #[builder(default)]
    strict_batch_alignment: bool,

    /// Characters of each visual sent in a batched request
    #[serde(default = "default_visual_truncation")]
    #[builder(default = "default_visual_truncation()")]
    visual_truncation: usize,

    /// Style every prompt is composed in
    #[serde(default)]
    #[builder(default)]
    style_preset: StylePreset,

    /// Token budget of a batched request
    #[serde(default = "default_batch_max_tokens")]
    #[builder(default = "default_batch_max_tokens()")]
    batch_max_tokens: u32,

    /// Token budget of a single-clip request
    #[serde(default = "default_clip_max_tokens")]
    #[builder(default = "default_clip_max_tokens()")]
    clip_max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    #[builder(default = "default_temperature()")]
    temperature: f32,

    /// Characters of a raw reply quoted in error messages
    #[serde(default = "default_error_preview_len")]
    #[builder(default = "default_error_preview_len()")]
    error_preview_len: usize,

    /// Per-clip description cache
    #[serde(default)]
    #[builder(default)]
    cache: PromptCacheConfig,
}

fn default_min_speech_rate() -> f64 {
    2.5
}

fn default_max_speech_rate() -> f64 {
    5.5
}

fn default_true() -> bool {
    true
}

fn default_visual_truncation() -> usize {
    80
}

fn default_batch_max_tokens() -> u32 {
    8192
}

fn default_clip_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_error_preview_len() -> usize {
    200
}

impl Default for StoryboardConfig {
    fn default() -> Self {
        Self {
            max_clip_duration: None,
            min_speech_rate: default_min_speech_rate(),
            max_speech_rate: default_max_speech_rate(),
            use_llm: default_true(),
            use_batch: default_true(),
            strict_batch_alignment: false,
            visual_truncation: default_visual_truncation(),
            style_preset: StylePreset::default(),
            batch_max_tokens: default_batch_max_tokens(),
            clip_max_tokens: default_clip_max_tokens(),
            temperature: default_temperature(),
            error_preview_len: default_error_preview_len(),
            cache: PromptCacheConfig::default(),
        }
    }
}

impl StoryboardConfig {
    /// Synthesis mode selected by `use_llm` and `use_batch`.
    pub fn mode(&self) -> SynthesisMode {
        SynthesisMode::from_flags(self.use_llm, self.use_batch)
    }
}
