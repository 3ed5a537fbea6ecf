//! Layered TOML configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from reelsmith.toml)
//! - `~/.config/reelsmith/reelsmith.toml`
//! - `./reelsmith.toml`

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use reelsmith_architect::ArchitectConfig;
use reelsmith_assets::AssetConfig;
use reelsmith_error::{ConfigError, ReelsmithError, ReelsmithResult};
use reelsmith_repair::RepairConfig;
use reelsmith_storyboard::StoryboardConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../reelsmith.toml");

/// Configuration for every pipeline stage.
///
/// # Example
///
/// ```no_run
/// use reelsmith::ReelsmithConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ReelsmithConfig::load()?;
/// println!("Style: {}", config.storyboard().style_preset());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ReelsmithConfig {
    /// Episode architecture and scheduling
    #[serde(default)]
    architect: ArchitectConfig,

    /// Clip timing and prompt synthesis, including `[storyboard.cache]`
    #[serde(default)]
    storyboard: StoryboardConfig,

    /// Character, prop and location reference sheets
    #[serde(default)]
    assets: AssetConfig,

    /// Tolerant reply parser
    #[serde(default)]
    parser: RepairConfig,
}

fn build_error(e: config::ConfigError) -> ReelsmithError {
    ReelsmithError::from(ConfigError::new(format!(
        "Failed to build configuration: {}",
        e
    )))
}

fn parse_error(e: config::ConfigError) -> ReelsmithError {
    ReelsmithError::from(ConfigError::new(format!(
        "Failed to parse configuration: {}",
        e
    )))
}

impl ReelsmithConfig {
    /// Load bundled defaults overlaid with the user and working-directory files.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the merged
    /// values are inconsistent.
    #[instrument]
    pub fn load() -> ReelsmithResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/reelsmith/reelsmith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("reelsmith").required(false));

        let config: Self = builder
            .build()
            .map_err(build_error)?
            .try_deserialize()
            .map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Load bundled defaults overlaid with one explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ReelsmithResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ReelsmithError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Bundled defaults overlaid with TOML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith::ReelsmithConfig;
    ///
    /// let config = ReelsmithConfig::from_toml(r#"
    ///     [storyboard]
    ///     style_preset = "kurosawa"
    ///     max_clip_duration = 10
    /// "#).unwrap();
    /// assert_eq!(config.storyboard().max_clip_duration(), &Some(10));
    /// assert_eq!(*config.architect().max_episodes(), 20);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or values are inconsistent.
    pub fn from_toml(text: &str) -> ReelsmithResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .map_err(build_error)?
            .try_deserialize()
            .map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first violated bound.
    pub fn validate(&self) -> ReelsmithResult<()> {
        let storyboard = &self.storyboard;
        if storyboard.min_speech_rate() >= storyboard.max_speech_rate() {
            return Err(ConfigError::new(format!(
                "min_speech_rate ({}) must be below max_speech_rate ({})",
                storyboard.min_speech_rate(),
                storyboard.max_speech_rate()
            ))
            .into());
        }
        if storyboard.max_clip_duration() == &Some(0) {
            return Err(ConfigError::new("max_clip_duration must be positive").into());
        }

        let architect = &self.architect;
        if architect.min_episodes() > architect.max_episodes() {
            return Err(ConfigError::new(format!(
                "min_episodes ({}) must not exceed max_episodes ({})",
                architect.min_episodes(),
                architect.max_episodes()
            ))
            .into());
        }
        if architect.min_events_per_episode() > architect.max_events_per_episode() {
            return Err(ConfigError::new(format!(
                "min_events_per_episode ({}) must not exceed max_events_per_episode ({})",
                architect.min_events_per_episode(),
                architect.max_events_per_episode()
            ))
            .into());
        }

        let assets = &self.assets;
        if assets.min_props() > assets.max_props() {
            return Err(ConfigError::new(format!(
                "min_props ({}) must not exceed max_props ({})",
                assets.min_props(),
                assets.max_props()
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_struct_defaults() {
        let bundled = ReelsmithConfig::from_toml("").unwrap();
        assert_eq!(bundled, ReelsmithConfig::default());
    }

    #[test]
    fn inverted_speech_bounds_are_rejected() {
        let err = ReelsmithConfig::from_toml(
            r#"
            [storyboard]
            min_speech_rate = 6.0
            max_speech_rate = 3.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("min_speech_rate"));
    }

    #[test]
    fn asset_section_overrides_defaults() {
        let config = ReelsmithConfig::from_toml(
            r#"
            [assets]
            style_preset = "tarkovsky"
            max_scenes = 2
            "#,
        )
        .unwrap();
        assert_eq!(*config.assets().max_scenes(), 2);
        assert_eq!(*config.assets().max_props(), 8);
    }

    #[test]
    fn inverted_prop_bounds_are_rejected() {
        let err = ReelsmithConfig::from_toml(
            r#"
            [assets]
            min_props = 9
            max_props = 4
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("min_props"));
    }
}
