//! Command handlers.
//!
//! Only this layer reads and writes files; the pipeline works on values.

use crate::cli::Commands;
use reelsmith::{
    BackendError, EpisodeAdjustments, EventScheduler, JobState, JsonError, OfflineGenerator,
    Pipeline, ReelsmithConfig, ReelsmithResult, ScriptedGenerator, TextGenerator, episode_count,
    validate_speech_rate_within,
};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

/// Generator and configuration shared by every command.
pub struct Session {
    pipeline: Pipeline<Box<dyn TextGenerator>>,
}

impl Session {
    /// Load configuration and pick the generator.
    ///
    /// Without recorded replies there is no model to call, so every stage is
    /// switched to its algorithmic or template path up front.
    pub fn open(config_path: Option<&Path>, replay: Option<&Path>) -> ReelsmithResult<Self> {
        let mut config = match config_path {
            Some(path) => ReelsmithConfig::from_file(path)?,
            None => ReelsmithConfig::load()?,
        };

        let generator: Box<dyn TextGenerator> = match replay {
            Some(path) => {
                let replies: Vec<String> = read_json(path)?;
                tracing::info!(replies = replies.len(), "Replaying recorded replies");
                Box::new(ScriptedGenerator::new(replies))
            }
            None => {
                tracing::debug!("No replies to replay, running offline");
                config = config
                    .clone()
                    .with_architect(config.architect().clone().with_use_llm(false))
                    .with_storyboard(config.storyboard().clone().with_use_llm(false))
                    .with_assets(config.assets().clone().with_use_llm(false));
                Box::new(OfflineGenerator)
            }
        };
        tracing::debug!(
            provider = generator.provider_name(),
            model = generator.model_name(),
            "Generator ready"
        );

        Ok(Self {
            pipeline: Pipeline::new(generator, config),
        })
    }

    /// Run one command.
    pub async fn run(self, command: Commands) -> ReelsmithResult<()> {
        match command {
            Commands::Repair { input } => self.repair(&input),
            Commands::Bible {
                inputs,
                title,
                output,
            } => self.bible(&inputs, title.as_deref(), output.as_deref()),
            Commands::Schedule { job, episodes } => self.schedule(&job, episodes),
            Commands::Architect {
                job,
                episodes,
                output,
            } => {
                let mut state: JobState = read_json(&job)?;
                self.pipeline.architect(&mut state, episodes).await?;
                write_json(&state, output.as_deref())
            }
            Commands::Refine {
                job,
                episode,
                title,
                logline,
                events,
                instruction,
                output,
            } => {
                let mut state: JobState = read_json(&job)?;
                let adjustments = EpisodeAdjustments {
                    title,
                    logline,
                    assigned_events: events,
                    beat_map: None,
                    instruction,
                };
                self.pipeline
                    .refine_episode(&mut state, episode, &adjustments)
                    .await?;
                write_json(&state, output.as_deref())
            }
            Commands::Assets { job, style, output } => self.assets(job, style, output).await,
            Commands::Storyboard {
                job,
                style,
                max_clip_duration,
                per_clip,
                output,
            } => {
                self.storyboard(job, style, max_clip_duration, per_clip, output)
                    .await
            }
            Commands::SpeechRate { text, duration } => {
                let storyboard = self.pipeline.config().storyboard();
                let report = validate_speech_rate_within(
                    &text,
                    duration,
                    *storyboard.min_speech_rate(),
                    *storyboard.max_speech_rate(),
                );
                write_json(&report, None)
            }
        }
    }

    fn repair(&self, input: &Path) -> ReelsmithResult<()> {
        let reply = read_text(input)?;
        let repaired = self.pipeline.parser().repair(&reply).ok_or_else(|| {
            JsonError::new(format!("No JSON recoverable from {}", input.display()))
        })?;
        tracing::info!(strategy = %repaired.strategy, "Reply recovered");
        write_json(&repaired.value, None)
    }

    fn bible(
        &self,
        inputs: &[PathBuf],
        title: Option<&str>,
        output: Option<&Path>,
    ) -> ReelsmithResult<()> {
        let replies = inputs
            .iter()
            .map(|path| read_text(path))
            .collect::<ReelsmithResult<Vec<_>>>()?;
        let Some((first, rest)) = replies.split_first() else {
            return Err(BackendError::new("No extraction replies given").into());
        };
        let mut bible = self.pipeline.recover_story_bible(first)?;
        if !rest.is_empty() {
            let title = title.map(str::to_string).unwrap_or(bible.title);
            bible = self.pipeline.recover_chunked_story_bible(&title, &replies)?;
        } else if let Some(title) = title {
            bible.title = title.to_string();
        }
        tracing::info!(
            characters = bible.characters.len(),
            events = bible.events.len(),
            chains = bible.event_chains.len(),
            "Story bible recovered"
        );
        let state = JobState {
            story_bible: Some(bible),
            ..Default::default()
        };
        write_json(&state, output)
    }

    fn schedule(&self, job: &Path, episodes: Option<u32>) -> ReelsmithResult<()> {
        let state: JobState = read_json(job)?;
        let bible = state.story_bible.unwrap_or_default();
        let architect = self.pipeline.config().architect();

        let schedule = match episodes {
            Some(count) => EventScheduler::from_config(architect).schedule(&bible.events, count),
            None => self.pipeline.schedule(&bible),
        };
        if schedule.ordering.is_fallback() {
            tracing::warn!(ordering = ?schedule.ordering, "Events scheduled in input order");
        }

        let summary = serde_json::json!({
            "derivedEpisodes": episode_count(&bible.events, architect),
            "ordering": schedule.ordering,
            "starved": schedule.starved,
            "episodes": schedule.event_ids(),
        });
        write_json(&summary, None)
    }

    async fn assets(
        self,
        job: PathBuf,
        style: Option<reelsmith::StylePreset>,
        output: Option<PathBuf>,
    ) -> ReelsmithResult<()> {
        let pipeline = match style {
            Some(style) => {
                let assets = self.pipeline.config().assets().clone().with_style_preset(style);
                let config = self.pipeline.config().clone().with_assets(assets);
                self.pipeline.with_config(config)
            }
            None => self.pipeline,
        };

        let mut state: JobState = read_json(&job)?;
        pipeline.assets(&mut state).await?;
        if let Some(assets) = &state.assets {
            tracing::info!(
                characters = assets.characters.len(),
                scenes = assets.scenes.len(),
                props = assets.props.len(),
                fallbacks = assets.fallback_count(),
                "Reference sheets designed"
            );
        }
        write_json(&state, output.as_deref())
    }

    async fn storyboard(
        self,
        job: PathBuf,
        style: Option<reelsmith::StylePreset>,
        max_clip_duration: Option<u32>,
        per_clip: bool,
        output: Option<PathBuf>,
    ) -> ReelsmithResult<()> {
        let mut storyboard = self.pipeline.config().storyboard().clone();
        if let Some(style) = style {
            storyboard = storyboard.with_style_preset(style);
        }
        if max_clip_duration.is_some() {
            storyboard = storyboard.with_max_clip_duration(max_clip_duration);
        }
        if per_clip {
            storyboard = storyboard.with_use_batch(false);
        }
        let config = self.pipeline.config().clone().with_storyboard(storyboard);
        config.validate()?;

        let pipeline = self.pipeline.with_config(config);

        let mut state: JobState = read_json(&job)?;
        pipeline.storyboard(&mut state).await?;
        if let Some(board) = &state.storyboard {
            for failed in &board.failed_episodes {
                tracing::warn!(episode = failed.number, error = %failed.error, "Episode used template fallback");
            }
        }
        write_json(&state, output.as_deref())
    }
}

fn read_text(path: &Path) -> ReelsmithResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        BackendError::new(format!("Failed to read {}: {}", path.display(), e)).into()
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ReelsmithResult<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| {
        JsonError::new(format!("Invalid JSON in {}: {}", path.display(), e)).into()
    })
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> ReelsmithResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to serialize output: {}", e)))?;
    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| {
                BackendError::new(format!("Failed to write {}: {}", path.display(), e))
            })?;
            tracing::info!(path = %path.display(), "Output written");
        }
        None => println!("{}", text),
    }
    Ok(())
}
