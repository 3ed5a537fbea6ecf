//! Storyboard output: enriched clips and per-episode results.

use crate::{Clip, StylePreset};
use serde::{Deserialize, Serialize};

/// Where a clip's visual description came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionSource {
    /// Fresh text-generation reply
    #[display("llm")]
    Llm,
    /// Reused from the prompt cache
    #[display("cached")]
    Cached,
    /// Deterministic template (template-only mode)
    #[display("template")]
    Template,
    /// Template substituted because the generator fell short
    #[display("template_fallback")]
    TemplateFallback,
}

/// How clip descriptions are produced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMode {
    /// One call for every clip of the episode
    #[display("batched")]
    Batched,
    /// One cached call per clip
    #[display("per_clip")]
    PerClip,
    /// No external calls
    #[display("template_only")]
    TemplateOnly,
}

impl SynthesisMode {
    /// Resolve the mode from the `use_llm` and `use_batch` switches.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_core::SynthesisMode;
    ///
    /// assert_eq!(SynthesisMode::from_flags(true, true), SynthesisMode::Batched);
    /// assert_eq!(SynthesisMode::from_flags(true, false), SynthesisMode::PerClip);
    /// assert_eq!(SynthesisMode::from_flags(false, true), SynthesisMode::TemplateOnly);
    /// ```
    pub fn from_flags(use_llm: bool, use_batch: bool) -> Self {
        match (use_llm, use_batch) {
            (true, true) => SynthesisMode::Batched,
            (true, false) => SynthesisMode::PerClip,
            (false, _) => SynthesisMode::TemplateOnly,
        }
    }
}

/// Suggested narration length when the speech rate is out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeechRateSuggestion {
    /// Narration too short for the clip
    TooSlow {
        /// Minimum character count
        min_chars: u32,
    },
    /// Narration too long for the clip
    TooFast {
        /// Maximum character count
        max_chars: u32,
    },
}

/// Result of checking narration length against clip duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRateReport {
    /// Characters after stripping whitespace and punctuation
    pub char_count: usize,
    /// Characters per second
    pub rate: f64,
    /// Whether the rate is within bounds
    pub valid: bool,
    /// Suggested fix when invalid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<SpeechRateSuggestion>,
}

/// An invalid speech-rate report tied to its clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRateWarning {
    /// Clip identifier
    pub clip_id: String,
    /// The failing report
    #[serde(flatten)]
    pub report: SpeechRateReport,
}

/// Batched reply length did not match the clip count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMismatch {
    /// Clips sent
    pub expected: usize,
    /// Descriptions received
    pub received: usize,
}

/// A script clip with its storyboard prompt filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedClip {
    /// The clip, re-timed, with `prompt` set
    #[serde(flatten)]
    pub clip: Clip,
    /// Origin of the visual description
    pub source: DescriptionSource,
    /// Narration speech-rate check
    pub speech_rate: SpeechRateReport,
}

/// Storyboard of one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeStoryboard {
    /// 1-based episode number
    pub episode_number: u32,
    /// Style preset used
    pub style_preset: StylePreset,
    /// Synthesis mode used
    pub mode: SynthesisMode,
    /// Clips in script order
    pub clips: Vec<EnrichedClip>,
    /// Set when a batched reply was short or long
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_mismatch: Option<BatchMismatch>,
    /// Clips whose narration is out of bounds
    #[serde(default)]
    pub speech_rate_warnings: Vec<SpeechRateWarning>,
    /// True when the episode was produced by the template fallback after a failure
    #[serde(default)]
    pub fallback: bool,
    /// Generation time
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// An episode whose synthesis failed and was replaced by template output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEpisode {
    /// Episode number
    pub number: u32,
    /// Failure message
    pub error: String,
}

/// Storyboard for a whole job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    /// Episodes in ascending number
    pub episodes: Vec<EpisodeStoryboard>,
    /// Episodes that fell back to templates
    #[serde(default)]
    pub failed_episodes: Vec<FailedEpisode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_serializes_with_kind_tag() {
        let json = serde_json::to_value(SpeechRateSuggestion::TooFast { max_chars: 27 }).unwrap();
        assert_eq!(json["kind"], "too_fast");
        assert_eq!(json["max_chars"], 27);
    }

    #[test]
    fn enriched_clip_flattens_clip_fields() {
        let enriched = EnrichedClip {
            clip: Clip::new("C01", "rain", "calm"),
            source: DescriptionSource::Template,
            speech_rate: SpeechRateReport {
                char_count: 0,
                rate: 0.0,
                valid: false,
                suggestion: None,
            },
        };
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["id"], "C01");
        assert_eq!(json["source"], "template");
        assert_eq!(json["speechRate"]["valid"], false);
    }
}
