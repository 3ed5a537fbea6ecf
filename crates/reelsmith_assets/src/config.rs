//! Asset configuration.

use derive_getters::Getters;
use reelsmith_core::StylePreset;
use serde::{Deserialize, Serialize};

/// Configuration for asset extraction and reference-sheet prompts.
///
/// # Examples
///
/// ```
/// use reelsmith_assets::AssetConfig;
///
/// let config: AssetConfig = toml::from_str(r#"
///     style_preset = "kubrick"
///     max_props = 4
/// "#).unwrap();
/// assert_eq!(*config.max_props(), 4);
/// assert_eq!(*config.max_scenes(), 6);
/// assert!(*config.use_llm());
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
pub struct AssetConfig {
    /// Ask the text generator for asset lists and sheet prompts
    #[serde(default = "default_true")]
    #[builder(default = "default_true()")]
    use_llm: bool,

    /// Style every sheet is composed in
    #[serde(default)]
    #[builder(default)]
    style_preset: StylePreset,

    /// Props kept after extraction
    #[serde(default = "default_max_props")]
    #[builder(default = "default_max_props()")]
    max_props: usize,

    /// Locations kept after extraction
    #[serde(default = "default_max_scenes")]
    #[builder(default = "default_max_scenes()")]
    max_scenes: usize,

    /// Props keyword extraction pads up to
    #[serde(default = "default_min_props")]
    #[builder(default = "default_min_props()")]
    min_props: usize,

    /// Token budget of a character sheet request
    #[serde(default = "default_character_max_tokens")]
    #[builder(default = "default_character_max_tokens()")]
    character_max_tokens: u32,

    /// Token budget of a prop, scene or extraction request
    #[serde(default = "default_max_tokens")]
    #[builder(default = "default_max_tokens()")]
    max_tokens: u32,

    /// Sampling temperature of sheet requests
    #[serde(default = "default_temperature")]
    #[builder(default = "default_temperature()")]
    temperature: f32,

    /// Sampling temperature of the extraction request
    #[serde(default = "default_extraction_temperature")]
    #[builder(default = "default_extraction_temperature()")]
    extraction_temperature: f32,
}

fn default_true() -> bool {
    true
}

fn default_max_props() -> usize {
    8
}

fn default_max_scenes() -> usize {
    6
}

fn default_min_props() -> usize {
    3
}

fn default_character_max_tokens() -> u32 {
    4096
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

fn default_extraction_temperature() -> f32 {
    0.3
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            use_llm: default_true(),
            style_preset: StylePreset::default(),
            max_props: default_max_props(),
            max_scenes: default_max_scenes(),
            min_props: default_min_props(),
            character_max_tokens: default_character_max_tokens(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            extraction_temperature: default_extraction_temperature(),
        }
    }
}
