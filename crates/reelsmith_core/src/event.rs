//! Story events and their dependency relations.

use crate::BeatType;
use crate::beat::lenient_beats;
use serde::{Deserialize, Serialize};

/// Identifier of an event within one story bible (e.g. `E01`).
pub type EventId = String;

/// Structural weight of an event.
///
/// Unknown labels deserialize as [`EventType::Decorative`], so malformed model
/// output can never promote an event to load-bearing.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "snake_case", from = "String")]
pub enum EventType {
    /// Required to advance the main plot
    #[display("load_bearing")]
    LoadBearing,
    /// Deepens character or theme
    #[display("reinforcing")]
    Reinforcing,
    /// Texture only
    #[default]
    #[display("decorative")]
    Decorative,
}

impl From<String> for EventType {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "load_bearing" | "loadbearing" | "承重" | "承重事件" => EventType::LoadBearing,
            "reinforcing" | "强化" | "强化事件" => EventType::Reinforcing,
            _ => EventType::Decorative,
        }
    }
}

/// A plot event extracted from the manuscript.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Event, EventType};
///
/// let event: Event = serde_json::from_str(
///     r#"{"id":"E02","summary":"Lin is mocked","type":"load_bearing","depends_on":["E01"]}"#,
/// ).unwrap();
/// assert_eq!(event.event_type, EventType::LoadBearing);
/// assert_eq!(event.depends_on, vec!["E01".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct Event {
    /// Stable identifier
    pub id: EventId,
    /// One-line description
    #[serde(default)]
    pub summary: String,
    /// Structural weight
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    /// Events that must happen before this one
    #[serde(default, alias = "depends_on")]
    pub depends_on: Vec<EventId>,
    /// Events this one makes possible
    #[serde(default)]
    pub enables: Vec<EventId>,
    /// Payoff categories this event can deliver
    #[serde(default, alias = "beat_potential", deserialize_with = "lenient_beats")]
    pub beat_potential: Vec<BeatType>,
    /// Characters taking part
    #[serde(default)]
    pub characters: Vec<String>,
    /// Extra matching keywords
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Event {
    /// Create an event with no relations.
    pub fn new(id: impl Into<String>, summary: impl Into<String>, event_type: EventType) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            event_type,
            depends_on: Vec::new(),
            enables: Vec::new(),
            beat_potential: Vec::new(),
            characters: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Whether this event is load-bearing.
    pub fn is_load_bearing(&self) -> bool {
        self.event_type == EventType::LoadBearing
    }

    /// Fill in beat potential from the summary if none is recorded.
    pub fn annotate_beat_potential(&mut self) {
        if !self.beat_potential.is_empty() {
            return;
        }
        if let Some(beat) = BeatType::identify(&self.summary, &self.keywords) {
            self.beat_potential = vec![beat];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_event_type_is_decorative() {
        let event: Event =
            serde_json::from_str(r#"{"id":"E1","summary":"x","type":"keystone"}"#).unwrap();
        assert_eq!(event.event_type, EventType::Decorative);
        assert!(!event.is_load_bearing());
    }

    #[test]
    fn event_type_accepts_variants() {
        assert_eq!(EventType::from("Load-Bearing".to_string()), EventType::LoadBearing);
        assert_eq!(EventType::from("承重".to_string()), EventType::LoadBearing);
        assert_eq!(EventType::from("reinforcing".to_string()), EventType::Reinforcing);
    }

    #[test]
    fn serializes_camel_case() {
        let event = Event::new("E1", "start", EventType::LoadBearing)
            .with_depends_on(vec!["E0".to_string()]);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "load_bearing");
        assert_eq!(json["dependsOn"][0], "E0");
        assert!(json.get("beatPotential").is_some());
    }

    #[test]
    fn annotation_keeps_existing_potential() {
        let mut event = Event::new("E1", "身份揭示", EventType::Decorative)
            .with_beat_potential(vec![BeatType::Emotion]);
        event.annotate_beat_potential();
        assert_eq!(event.beat_potential, vec![BeatType::Emotion]);

        let mut event = Event::new("E2", "身份揭示", EventType::Decorative);
        event.annotate_beat_potential();
        assert_eq!(event.beat_potential, vec![BeatType::Identity]);
    }
}
