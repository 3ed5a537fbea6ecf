//! Story bible: the structured summary of a novel, and its normalization.

use crate::{Architecture, AssetSet, Character, Event, EventId, ScriptEpisode, Storyboard};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A turning point as described by the extraction step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurningPoint {
    /// Where in the story it happens
    #[serde(default)]
    pub position: String,
    /// What changes
    #[serde(default)]
    pub description: String,
}

/// A run of events linked through their first `enables` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChain {
    /// Event ids in chain order
    pub events: Vec<EventId>,
    /// Number of events
    pub length: usize,
}

/// Extracted structured summary of a novel.
///
/// # Examples
///
/// ```
/// use reelsmith_core::StoryBible;
///
/// let mut bible: StoryBible = serde_json::from_str(r#"{
///     "title": "Rain",
///     "characters": [{"id": "C01", "name": "Lin", "role": "protagonist"}],
///     "events": [
///         {"id": "E01", "summary": "Lin is mocked", "type": "load_bearing"},
///         {"id": "E02", "summary": "Lin reveals her identity", "type": "load_bearing"}
///     ]
/// }"#).unwrap();
/// bible.enhance();
/// assert_eq!(bible.events[1].depends_on, vec!["E01".to_string()]);
/// assert!(bible.characters[0].archetype.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBible {
    /// Novel title
    #[serde(default)]
    pub title: String,
    /// Main theme
    #[serde(default)]
    pub main_theme: String,
    /// Tone keywords
    #[serde(default)]
    pub tone_keywords: Vec<String>,
    /// Characters
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Events in story order
    #[serde(default)]
    pub events: Vec<Event>,
    /// Turning points
    #[serde(default)]
    pub turning_points: Vec<TurningPoint>,
    /// Episode count suggested by extraction
    #[serde(default)]
    pub estimated_episodes: u32,
    /// Event chains, longest first
    #[serde(default, rename = "_eventChains", skip_serializing_if = "Vec::is_empty")]
    pub event_chains: Vec<EventChain>,
    /// Set when the bible was recovered from malformed output
    #[serde(default, rename = "_parseError", skip_serializing_if = "std::ops::Not::not")]
    pub parse_error: bool,
}

impl StoryBible {
    /// Number of load-bearing events.
    pub fn load_bearing_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_load_bearing()).count()
    }

    /// The first protagonist, if any.
    pub fn protagonist(&self) -> Option<&Character> {
        self.characters
            .iter()
            .find(|c| c.role == crate::Role::Protagonist)
    }

    /// Normalize in place: archetypes, beat potential, relations and event chains.
    #[tracing::instrument(skip(self), fields(events = self.events.len(), characters = self.characters.len()))]
    pub fn enhance(&mut self) {
        for character in &mut self.characters {
            character.ensure_archetype();
        }
        for event in &mut self.events {
            event.annotate_beat_potential();
        }
        self.drop_dangling_relations();
        self.infer_relations();
        self.event_chains = identify_event_chains(&self.events);
        tracing::debug!(chains = self.event_chains.len(), "Story bible enhanced");
    }

    fn drop_dangling_relations(&mut self) {
        let ids: HashSet<EventId> = self.events.iter().map(|e| e.id.clone()).collect();
        for event in &mut self.events {
            let own = event.id.clone();
            event.depends_on.retain(|id| ids.contains(id) && *id != own);
            event.enables.retain(|id| ids.contains(id) && *id != own);
        }
    }

    fn infer_relations(&mut self) {
        let mut previous_load_bearing: Option<EventId> = None;
        for i in 0..self.events.len() {
            let next_id = self.events.get(i + 1).map(|e| e.id.clone());
            let event = &mut self.events[i];
            if event.enables.is_empty() && event.is_load_bearing() {
                if let Some(next) = next_id {
                    event.enables = vec![next];
                }
            }
            if event.depends_on.is_empty() {
                if let Some(prev) = &previous_load_bearing {
                    event.depends_on = vec![prev.clone()];
                }
            }
            if event.is_load_bearing() {
                previous_load_bearing = Some(event.id.clone());
            }
        }
    }

    /// Merge chunk-level bibles into one and normalize the result.
    ///
    /// Characters are deduplicated by name with traits unioned. Events are
    /// renumbered `E01..` in chunk order with relations remapped.
    #[tracing::instrument(skip_all, fields(chunks = partials.len()))]
    pub fn merge(title: impl Into<String>, partials: &[StoryBible]) -> StoryBible {
        let mut characters: Vec<Character> = Vec::new();
        for character in partials.iter().flat_map(|p| &p.characters) {
            match characters.iter_mut().find(|c| c.name == character.name) {
                Some(existing) => {
                    let mut traits = existing.traits.clone();
                    for t in &character.traits {
                        if !traits.contains(t) {
                            traits.push(t.clone());
                        }
                    }
                    *existing = Character {
                        id: existing.id.clone(),
                        traits,
                        ..character.clone()
                    };
                }
                None => characters.push(character.clone()),
            }
        }

        let mut events = Vec::new();
        for partial in partials {
            // Ids are only unique within one chunk.
            let mut renumbered: HashMap<&str, String> = HashMap::new();
            let start = events.len();
            for event in &partial.events {
                let new_id = format!("E{:02}", events.len() + 1);
                renumbered.insert(event.id.as_str(), new_id.clone());
                events.push(Event {
                    id: new_id,
                    ..event.clone()
                });
            }
            for event in &mut events[start..] {
                let remap = |ids: &[EventId]| -> Vec<EventId> {
                    ids.iter()
                        .filter_map(|id| renumbered.get(id.as_str()).cloned())
                        .collect()
                };
                event.depends_on = remap(&event.depends_on);
                event.enables = remap(&event.enables);
            }
        }

        let mut tone_keywords: Vec<String> = Vec::new();
        for keyword in partials.iter().flat_map(|p| &p.tone_keywords) {
            if !tone_keywords.contains(keyword) {
                tone_keywords.push(keyword.clone());
            }
        }
        tone_keywords.truncate(5);

        let load_bearing = events.iter().filter(|e| e.is_load_bearing()).count();
        let estimated_episodes = if load_bearing > 0 {
            (load_bearing as u32 * 13).div_ceil(10)
        } else if partials.is_empty() {
            0
        } else {
            let total: u32 = partials.iter().map(|p| p.estimated_episodes).sum();
            total.div_ceil(partials.len() as u32)
        };

        let mut merged = StoryBible {
            title: title.into(),
            main_theme: partials
                .iter()
                .map(|p| p.main_theme.clone())
                .find(|t| !t.is_empty())
                .unwrap_or_default(),
            tone_keywords,
            characters,
            events,
            turning_points: partials
                .iter()
                .flat_map(|p| p.turning_points.clone())
                .collect(),
            estimated_episodes,
            event_chains: Vec::new(),
            parse_error: partials.iter().any(|p| p.parse_error),
        };
        merged.enhance();
        merged
    }
}

/// Follow first-`enables` links from each unvisited event; keep chains of two or more.
pub fn identify_event_chains(events: &[Event]) -> Vec<EventChain> {
    let by_id: HashMap<&str, &Event> = events.iter().map(|e| (e.id.as_str(), e)).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut chains = Vec::new();

    for event in events {
        let mut chain = Vec::new();
        let mut current = Some(event);
        while let Some(e) = current {
            if !visited.insert(e.id.as_str()) {
                break;
            }
            chain.push(e.id.clone());
            current = e
                .enables
                .first()
                .and_then(|next| by_id.get(next.as_str()).copied());
        }
        if chain.len() > 1 {
            chains.push(EventChain {
                length: chain.len(),
                events: chain,
            });
        }
    }

    chains.sort_by(|a, b| b.length.cmp(&a.length));
    chains
}

/// Nested job state passed between pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    /// Extracted story bible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_bible: Option<StoryBible>,
    /// Episode architecture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Architecture>,
    /// Per-episode scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Vec<ScriptEpisode>>,
    /// Storyboard output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyboard: Option<Storyboard>,
    /// Reference-image asset sheets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetSet>,
}
