//! Episode architecture generation with an algorithmic fallback.

use crate::{
    ArchitectConfig, EventScheduler, arcs, beat_map, count_formula, episode_count, prompt,
};
use reelsmith_core::{
    Architecture, Arcs, BeatAssignment, BeatMap, BeatPosition, BeatType, Episode, EventId,
    GenerateRequest, Overview, StoryBible,
};
use reelsmith_error::{
    ArchitectError, ArchitectErrorKind, BuilderError, GenerationError,
    GenerationErrorKind, JsonError, ReelsmithResult,
};
use reelsmith_interface::TextGenerator;
use reelsmith_repair::TolerantParser;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Beat map entries that fail to deserialize are salvaged or dropped.
fn lenient_beat_map<'de, D>(deserializer: D) -> Result<Option<BeatMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut map = BeatMap::new();
    for (position, value) in raw {
        let Ok(position) = serde_json::from_value::<BeatPosition>(position.into()) else {
            continue;
        };
        let assignment = serde_json::from_value::<BeatAssignment>(value.clone())
            .ok()
            .or_else(|| {
                let beat = value.get("type")?.as_str()?.parse::<BeatType>().ok()?;
                let hook = value
                    .get("hookDescription")
                    .and_then(|h| h.as_str())
                    .unwrap_or_default();
                Some(BeatAssignment::new(beat, hook))
            });
        if let Some(assignment) = assignment {
            map.insert(position, assignment);
        }
    }
    Ok(Some(map))
}

/// An episode as proposed by the text generator; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EpisodeDraft {
    number: Option<u32>,
    title: Option<String>,
    logline: Option<String>,
    assigned_events: Option<Vec<EventId>>,
    #[serde(deserialize_with = "lenient_beat_map")]
    beat_map: Option<BeatMap>,
    emotional_arc: Option<String>,
    key_characters: Option<Vec<String>>,
    estimated_duration: Option<u32>,
}

/// An architecture as proposed by the text generator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ArchitectureDraft {
    formula: Option<String>,
    overview: Option<Overview>,
    episodes: Vec<EpisodeDraft>,
    arcs: Option<Arcs>,
}

/// Direct overrides for one episode, plus an optional rework instruction.
///
/// # Examples
///
/// ```
/// use reelsmith_architect::EpisodeAdjustments;
///
/// let adjustments = EpisodeAdjustments::default()
///     .with_title("第2集：觉醒")
///     .with_assigned_events(vec!["E03".to_string()]);
/// assert_eq!(adjustments.title.as_deref(), Some("第2集：觉醒"));
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters,
)]
#[serde(rename_all = "camelCase", default)]
#[setters(prefix = "with_", into, strip_option)]
pub struct EpisodeAdjustments {
    /// New title
    pub title: Option<String>,
    /// New logline
    pub logline: Option<String>,
    /// Replacement event list
    pub assigned_events: Option<Vec<EventId>>,
    /// Beat entries merged over the current map
    pub beat_map: Option<BeatMap>,
    /// Free-form rework request sent to the text generator
    pub instruction: Option<String>,
}

/// Apply direct overrides to one episode and recompute the beat distribution.
///
/// # Errors
///
/// Returns `ArchitectErrorKind::EpisodeNotFound` when no episode has `number`.
#[tracing::instrument(skip(architecture, adjustments))]
pub fn adjust_episode(
    architecture: &mut Architecture,
    number: u32,
    adjustments: &EpisodeAdjustments,
) -> ReelsmithResult<()> {
    let episode = architecture
        .episode_mut(number)
        .ok_or_else(|| ArchitectError::new(ArchitectErrorKind::EpisodeNotFound(number)))?;

    if let Some(title) = &adjustments.title {
        episode.title = title.clone();
    }
    if let Some(logline) = &adjustments.logline {
        episode.logline = logline.clone();
    }
    if let Some(events) = &adjustments.assigned_events {
        episode.assigned_events = events.clone();
    }
    if let Some(beats) = &adjustments.beat_map {
        for (position, assignment) in beats {
            episode.beat_map.insert(*position, assignment.clone());
        }
    }

    architecture.beat_distribution = Architecture::compute_beat_distribution(&architecture.episodes);
    tracing::debug!("Episode adjusted");
    Ok(())
}

/// Builds episode architectures from a story bible.
///
/// The text generator is asked first; any failure (call error, unparseable
/// reply, no episodes) falls back to the deterministic algorithm, and the
/// result is marked with `fallback: true`.
pub struct EpisodeArchitect<G> {
    generator: G,
    parser: TolerantParser,
    config: ArchitectConfig,
}

impl<G: TextGenerator> EpisodeArchitect<G> {
    /// Architect with the given generator and configuration.
    pub fn new(generator: G, config: ArchitectConfig) -> Self {
        Self {
            generator,
            parser: TolerantParser::default(),
            config,
        }
    }

    /// Replace the reply parser.
    pub fn with_parser(mut self, parser: TolerantParser) -> Self {
        self.parser = parser;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ArchitectConfig {
        &self.config
    }

    /// Generate an architecture for `bible`.
    ///
    /// `target_episodes` overrides the derived episode count.
    #[tracing::instrument(
        skip(self, bible),
        fields(
            provider = self.generator.provider_name(),
            events = bible.events.len(),
        )
    )]
    pub async fn generate(&self, bible: &StoryBible, target_episodes: Option<u32>) -> Architecture {
        let count = target_episodes
            .filter(|&n| n > 0)
            .unwrap_or_else(|| episode_count(&bible.events, &self.config));
        tracing::info!(episodes = count, "Planning architecture");

        if *self.config.use_llm() {
            match self.generated_architecture(bible, count).await {
                Ok(architecture) => return architecture,
                Err(e) => {
                    tracing::warn!(error = %e, "Generated architecture rejected, using algorithmic fallback")
                }
            }
        }
        self.algorithmic(bible, count)
    }

    async fn generated_architecture(
        &self,
        bible: &StoryBible,
        count: u32,
    ) -> ReelsmithResult<Architecture> {
        let text = prompt::architecture_prompt(bible, count, *self.config.rhythm_template())?;
        let request = GenerateRequest::builder()
            .prompt(text)
            .max_tokens(Some(*self.config.max_tokens()))
            .temperature(Some(*self.config.temperature()))
            .build()
            .map_err(|e| BuilderError::new(e.to_string()))?;

        let response = self.generator.generate(&request).await.inspect_err(|e| {
            tracing::error!(error = %e, "Architecture generation call failed");
        })?;
        let draft: ArchitectureDraft = self.parser.parse_as(&response.text())?;
        if draft.episodes.is_empty() {
            return Err(JsonError::new("Generated architecture has no episodes").into());
        }
        Ok(self.enhance(draft, bible))
    }

    /// Fill in whatever the generated architecture left out.
    fn enhance(&self, draft: ArchitectureDraft, bible: &StoryBible) -> Architecture {
        let total = draft.episodes.len() as u32;
        let known: HashSet<&str> = bible.events.iter().map(|e| e.id.as_str()).collect();
        let duration = self.config.rhythm_template().duration();

        let episodes: Vec<Episode> = draft
            .episodes
            .into_iter()
            .enumerate()
            .map(|(i, ep)| {
                let number = ep.number.unwrap_or(i as u32 + 1);
                let mut assigned = ep.assigned_events.unwrap_or_default();
                let before = assigned.len();
                assigned.retain(|id| known.contains(id.as_str()));
                if assigned.len() != before {
                    tracing::warn!(episode = number, dropped = before - assigned.len(), "Dropped unknown event ids");
                }
                Episode {
                    number,
                    title: ep.title.unwrap_or_else(|| format!("第{}集", number)),
                    logline: ep.logline.unwrap_or_default(),
                    assigned_events: assigned,
                    beat_map: ep
                        .beat_map
                        .filter(|map| !map.is_empty())
                        .unwrap_or_else(beat_map::default_beat_map),
                    emotional_arc: ep
                        .emotional_arc
                        .filter(|arc| !arc.is_empty())
                        .unwrap_or_else(|| arcs::emotional_arc(i as u32 + 1, total).to_string()),
                    key_characters: ep.key_characters.unwrap_or_default(),
                    estimated_duration: ep.estimated_duration.unwrap_or(duration),
                }
            })
            .collect();

        Architecture {
            total_episodes: total,
            formula: draft.formula.unwrap_or_else(|| {
                count_formula(bible.load_bearing_count(), &self.config, total)
            }),
            overview: draft.overview.unwrap_or_else(|| arcs::overview(total)),
            beat_distribution: Architecture::compute_beat_distribution(&episodes),
            episodes,
            arcs: draft.arcs.unwrap_or_else(|| arcs::design_arcs(total)),
            rhythm_template: *self.config.rhythm_template(),
            generated_at: chrono::Utc::now(),
            fallback: false,
        }
    }

    /// Deterministic architecture from the scheduler and the planning tables.
    #[tracing::instrument(skip(self, bible))]
    pub fn algorithmic(&self, bible: &StoryBible, count: u32) -> Architecture {
        let template = *self.config.rhythm_template();
        let schedule = EventScheduler::from_config(&self.config).schedule(&bible.events, count);
        let total = schedule.episodes.len() as u32;

        let episodes: Vec<Episode> = schedule
            .episodes
            .iter()
            .enumerate()
            .map(|(i, events)| {
                let number = i as u32 + 1;
                Episode {
                    number,
                    title: arcs::episode_title(number, events),
                    logline: arcs::episode_logline(events),
                    assigned_events: events.iter().map(|e| e.id.clone()).collect(),
                    beat_map: beat_map::plan_beat_map(events, template),
                    emotional_arc: arcs::emotional_arc(number, total).to_string(),
                    key_characters: arcs::key_characters(events, &bible.characters),
                    estimated_duration: template.duration(),
                }
            })
            .collect();

        tracing::warn!(
            episodes = total,
            ordering = ?schedule.ordering,
            "Using algorithmic architecture"
        );
        Architecture {
            total_episodes: total,
            formula: count_formula(bible.load_bearing_count(), &self.config, total),
            overview: arcs::overview(total),
            beat_distribution: Architecture::compute_beat_distribution(&episodes),
            episodes,
            arcs: arcs::design_arcs(total),
            rhythm_template: template,
            generated_at: chrono::Utc::now(),
            fallback: true,
        }
    }

    /// Adjust one episode against the story bible.
    ///
    /// Direct overrides are applied first. With an instruction and generation
    /// enabled, the generator then reworks the episode; a failed rework keeps
    /// the direct overrides.
    ///
    /// # Errors
    ///
    /// `EpisodeNotFound` for an unknown episode number, `UnknownEvents` when
    /// the override references events missing from the bible.
    #[tracing::instrument(skip(self, architecture, adjustments, bible))]
    pub async fn refine_episode(
        &self,
        architecture: &mut Architecture,
        number: u32,
        adjustments: &EpisodeAdjustments,
        bible: &StoryBible,
    ) -> ReelsmithResult<()> {
        if let Some(events) = &adjustments.assigned_events {
            let unknown: Vec<&str> = events
                .iter()
                .map(String::as_str)
                .filter(|id| !bible.events.iter().any(|e| e.id == *id))
                .collect();
            if !unknown.is_empty() {
                return Err(ArchitectError::new(ArchitectErrorKind::UnknownEvents {
                    episode: number,
                    events: unknown.join(", "),
                })
                .into());
            }
        }

        adjust_episode(architecture, number, adjustments)?;

        let Some(instruction) = adjustments.instruction.as_deref() else {
            return Ok(());
        };
        if !*self.config.use_llm() {
            tracing::debug!("Generation disabled, skipping episode rework");
            return Ok(());
        }
        match self.reworked_episode(architecture, number, instruction, bible).await {
            Ok(draft) => {
                if let Some(episode) = architecture.episode_mut(number) {
                    merge_draft(episode, draft);
                }
                architecture.beat_distribution =
                    Architecture::compute_beat_distribution(&architecture.episodes);
            }
            Err(e) => tracing::warn!(error = %e, "Episode rework failed, keeping direct adjustments"),
        }
        Ok(())
    }

    async fn reworked_episode(
        &self,
        architecture: &Architecture,
        number: u32,
        instruction: &str,
        bible: &StoryBible,
    ) -> ReelsmithResult<EpisodeDraft> {
        let episode = architecture
            .episode(number)
            .ok_or_else(|| ArchitectError::new(ArchitectErrorKind::EpisodeNotFound(number)))?;
        let request = GenerateRequest::builder()
            .prompt(prompt::adjust_prompt(episode, bible, instruction)?)
            .max_tokens(Some(*self.config.adjust_max_tokens()))
            .temperature(Some(*self.config.temperature()))
            .build()
            .map_err(|e| BuilderError::new(e.to_string()))?;
        let response = self.generator.generate(&request).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
        }
        self.parser.parse_as(&text)
    }
}

/// Overlay the fields a rework supplied; the episode number never changes.
fn merge_draft(episode: &mut Episode, draft: EpisodeDraft) {
    if let Some(title) = draft.title {
        episode.title = title;
    }
    if let Some(logline) = draft.logline {
        episode.logline = logline;
    }
    if let Some(events) = draft.assigned_events {
        episode.assigned_events = events;
    }
    if let Some(beats) = draft.beat_map.filter(|map| !map.is_empty()) {
        episode.beat_map = beats;
    }
    if let Some(arc) = draft.emotional_arc {
        episode.emotional_arc = arc;
    }
    if let Some(characters) = draft.key_characters {
        episode.key_characters = characters;
    }
    if let Some(duration) = draft.estimated_duration {
        episode.estimated_duration = duration;
    }
}
