//! Episode architecture: per-episode plans and the series-level structure around them.

use crate::{BeatType, EventId, FourSteps, RhythmTemplate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where in an episode a beat lands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum BeatPosition {
    /// Hook in the first seconds
    #[display("opening")]
    Opening,
    /// Setup
    #[display("early")]
    Early,
    /// Escalation
    #[display("mid")]
    Mid,
    /// Main payoff
    #[display("climax")]
    Climax,
    /// Cliffhanger into the next episode
    #[display("closing")]
    Closing,
}

/// A beat placed at one position of an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatAssignment {
    /// Payoff category
    #[serde(rename = "type")]
    pub beat_type: BeatType,
    /// One-line hook
    #[serde(default)]
    pub hook_description: String,
    /// Four-step breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_steps: Option<FourSteps>,
}

impl BeatAssignment {
    /// Assignment with the beat's four-step template attached.
    pub fn new(beat_type: BeatType, hook_description: impl Into<String>) -> Self {
        Self {
            beat_type,
            hook_description: hook_description.into(),
            four_steps: Some(beat_type.four_steps()),
        }
    }
}

/// Beat assignments keyed by position.
pub type BeatMap = BTreeMap<BeatPosition, BeatAssignment>;

/// One planned episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct Episode {
    /// 1-based episode number
    pub number: u32,
    /// Episode title
    #[serde(default)]
    pub title: String,
    /// One-sentence selling point
    #[serde(default)]
    pub logline: String,
    /// Events covered by this episode
    #[serde(default)]
    pub assigned_events: Vec<EventId>,
    /// Beat plan
    #[serde(default)]
    pub beat_map: BeatMap,
    /// Emotional progression label
    #[serde(default)]
    pub emotional_arc: String,
    /// Up to three character ids
    #[serde(default)]
    pub key_characters: Vec<String>,
    /// Target length in seconds
    #[serde(default)]
    pub estimated_duration: u32,
}

impl Episode {
    /// Empty episode with the given number.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            title: String::new(),
            logline: String::new(),
            assigned_events: Vec::new(),
            beat_map: BeatMap::new(),
            emotional_arc: String::new(),
            key_characters: Vec::new(),
            estimated_duration: 0,
        }
    }
}

/// Episode range and focus of one act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Act {
    /// Episode range such as `1-3`
    pub episodes: String,
    /// What the act is about
    pub focus: String,
}

/// Three-act overview of the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Setup
    pub act1: Act,
    /// Escalation
    pub act2: Act,
    /// Climax and resolution
    pub act3: Act,
}

/// A run of consecutive episodes that forms its own small arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniArc {
    /// Arc label
    pub name: String,
    /// Episode numbers
    pub episodes: Vec<u32>,
    /// Where the arc is set up
    #[serde(default)]
    pub setup: String,
    /// Where it peaks
    #[serde(default)]
    pub climax: String,
    /// Where it resolves
    #[serde(default)]
    pub resolution: String,
}

/// Kind of series-level turning point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum TurningPointKind {
    /// Story midpoint reversal
    #[display("midpoint")]
    Midpoint,
    /// Darkest moment
    #[display("all_is_lost")]
    AllIsLost,
}

/// A series-level turning point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorTurningPoint {
    /// Episode number
    pub episode: u32,
    /// Kind of turn
    #[serde(rename = "type")]
    pub kind: TurningPointKind,
    /// Description
    pub description: String,
}

/// Arc structure across the series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arcs {
    /// Mini arcs of two or three episodes
    #[serde(default)]
    pub mini_arcs: Vec<MiniArc>,
    /// Midpoint and all-is-lost points
    #[serde(default)]
    pub major_turning_points: Vec<MajorTurningPoint>,
}

/// Complete episode architecture for a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Architecture {
    /// Number of episodes
    pub total_episodes: u32,
    /// How the count was derived
    #[serde(default)]
    pub formula: String,
    /// Three-act overview
    pub overview: Overview,
    /// Episodes in ascending number
    pub episodes: Vec<Episode>,
    /// Arc structure
    pub arcs: Arcs,
    /// How often each beat is used across all episodes
    #[serde(default)]
    pub beat_distribution: BTreeMap<BeatType, u32>,
    /// Rhythm template every episode follows
    #[serde(default)]
    pub rhythm_template: RhythmTemplate,
    /// Generation time
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// True when produced by the algorithmic fallback
    #[serde(default)]
    pub fallback: bool,
}

impl Architecture {
    /// Look up an episode by number.
    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.number == number)
    }

    /// Mutable lookup by number.
    pub fn episode_mut(&mut self, number: u32) -> Option<&mut Episode> {
        self.episodes.iter_mut().find(|e| e.number == number)
    }

    /// Count beat usage across every episode's beat map.
    pub fn compute_beat_distribution(episodes: &[Episode]) -> BTreeMap<BeatType, u32> {
        let mut distribution = BTreeMap::new();
        for assignment in episodes.iter().flat_map(|e| e.beat_map.values()) {
            *distribution.entry(assignment.beat_type).or_insert(0) += 1;
        }
        distribution
    }
}
