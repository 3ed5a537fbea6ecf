//! Parser configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Configuration for [`TolerantParser`](crate::TolerantParser).
///
/// # Examples
///
/// ```
/// use reelsmith_repair::RepairConfig;
///
/// let config = RepairConfig::default().with_raw_preview_len(200);
/// assert_eq!(*config.raw_preview_len(), 200);
/// assert!(config.partial_fields().contains(&"events".to_string()));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct RepairConfig {
    /// Characters of the raw reply kept in `_rawContent` on partial recovery
    #[serde(default = "default_raw_preview_len")]
    #[builder(default = "default_raw_preview_len()")]
    raw_preview_len: usize,

    /// Top-level fields salvaged when the document as a whole is unrecoverable
    #[serde(default = "default_partial_fields")]
    #[builder(default = "default_partial_fields()")]
    partial_fields: Vec<String>,
}

fn default_raw_preview_len() -> usize {
    1000
}

fn default_partial_fields() -> Vec<String> {
    ["characters", "events", "estimatedEpisodes", "title"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            raw_preview_len: default_raw_preview_len(),
            partial_fields: default_partial_fields(),
        }
    }
}
