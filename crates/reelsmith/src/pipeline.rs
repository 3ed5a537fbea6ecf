//! Job pipeline over [`JobState`].
//!
//! Each stage reads what earlier stages left in the job state and writes its
//! own output back. Stages never touch the filesystem.

use crate::ReelsmithConfig;
use reelsmith_architect::{
    EpisodeAdjustments, EpisodeArchitect, EventScheduler, Schedule, episode_count,
};
use reelsmith_assets::AssetDesigner;
use reelsmith_core::{JobState, StoryBible};
use reelsmith_error::{
    ArchitectError, ArchitectErrorKind, AssetError, AssetErrorKind, ReelsmithResult,
    SynthesisError, SynthesisErrorKind,
};
use reelsmith_interface::TextGenerator;
use reelsmith_repair::TolerantParser;
use reelsmith_storyboard::{StoryboardDirector, fallback_script};

/// Runs the pipeline stages against one text generator.
///
/// # Examples
///
/// ```
/// use reelsmith::{OfflineGenerator, Pipeline, ReelsmithConfig};
///
/// let pipeline = Pipeline::new(OfflineGenerator, ReelsmithConfig::default());
/// let bible = pipeline
///     .recover_story_bible(r#"```json
/// {"title": "Rain", "events": [{"id": "E01", "summary": "Lin returns", "type": "load_bearing"}]}
/// ```"#)
///     .unwrap();
/// assert_eq!(bible.title, "Rain");
///
/// let schedule = pipeline.schedule(&bible);
/// assert_eq!(schedule.episodes.len(), 3);
/// ```
pub struct Pipeline<G> {
    generator: G,
    config: ReelsmithConfig,
}

impl<G: TextGenerator> Pipeline<G> {
    /// Pipeline with the given generator and configuration.
    pub fn new(generator: G, config: ReelsmithConfig) -> Self {
        Self { generator, config }
    }

    /// Same generator, different configuration.
    pub fn with_config(self, config: ReelsmithConfig) -> Self {
        Self {
            generator: self.generator,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ReelsmithConfig {
        &self.config
    }

    /// The text generator every stage calls.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Reply parser built from the `[parser]` section.
    pub fn parser(&self) -> TolerantParser {
        TolerantParser::new(self.config.parser().clone())
    }

    /// Recover a story bible from an extraction reply and normalize it.
    ///
    /// # Errors
    ///
    /// Returns a `JsonError` when nothing can be salvaged from the reply.
    #[tracing::instrument(skip_all, fields(reply_len = reply.len()))]
    pub fn recover_story_bible(&self, reply: &str) -> ReelsmithResult<StoryBible> {
        let mut bible: StoryBible = self.parser().parse_as(reply)?;
        if bible.parse_error {
            tracing::warn!(
                events = bible.events.len(),
                "Story bible recovered from malformed reply"
            );
        }
        bible.enhance();
        Ok(bible)
    }

    /// Recover one bible per chunk reply and merge them in order.
    ///
    /// # Errors
    ///
    /// Fails on the first reply nothing can be salvaged from.
    pub fn recover_chunked_story_bible<S: AsRef<str>>(
        &self,
        title: &str,
        replies: &[S],
    ) -> ReelsmithResult<StoryBible> {
        let partials = replies
            .iter()
            .map(|reply| self.parser().parse_as::<StoryBible>(reply.as_ref()))
            .collect::<ReelsmithResult<Vec<_>>>()?;
        Ok(StoryBible::merge(title, &partials))
    }

    /// Partition the bible's events into the derived number of episodes.
    pub fn schedule(&self, bible: &StoryBible) -> Schedule {
        let count = episode_count(&bible.events, self.config.architect());
        EventScheduler::from_config(self.config.architect()).schedule(&bible.events, count)
    }

    /// Generate the architecture of the job's story bible.
    ///
    /// # Errors
    ///
    /// `MissingStoryBible` when the job has none. Generator failures fall
    /// back to the algorithmic architecture and are not errors.
    #[tracing::instrument(skip_all, fields(target_episodes = ?target_episodes))]
    pub async fn architect(
        &self,
        state: &mut JobState,
        target_episodes: Option<u32>,
    ) -> ReelsmithResult<()> {
        let bible = state
            .story_bible
            .as_ref()
            .ok_or_else(|| ArchitectError::new(ArchitectErrorKind::MissingStoryBible))?;

        let architect = EpisodeArchitect::new(&self.generator, self.config.architect().clone());
        let architecture = architect.generate(bible, target_episodes).await;
        tracing::info!(
            episodes = architecture.total_episodes,
            fallback = architecture.fallback,
            "Architecture ready"
        );
        state.architecture = Some(architecture);
        Ok(())
    }

    /// Apply adjustments to one episode of the job's architecture.
    ///
    /// # Errors
    ///
    /// `MissingStoryBible` without a story bible or architecture; otherwise
    /// the errors of [`EpisodeArchitect::refine_episode`].
    pub async fn refine_episode(
        &self,
        state: &mut JobState,
        number: u32,
        adjustments: &EpisodeAdjustments,
    ) -> ReelsmithResult<()> {
        let (Some(bible), Some(architecture)) =
            (state.story_bible.as_ref(), state.architecture.as_mut())
        else {
            return Err(ArchitectError::new(ArchitectErrorKind::MissingStoryBible).into());
        };
        EpisodeArchitect::new(&self.generator, self.config.architect().clone())
            .refine_episode(architecture, number, adjustments, bible)
            .await
    }

    /// Design reference sheets for the job's characters, locations and props.
    ///
    /// # Errors
    ///
    /// `MissingStoryBible` when the job has none. Sheet failures fall back to
    /// template sheets and are not errors.
    #[tracing::instrument(skip_all)]
    pub async fn assets(&self, state: &mut JobState) -> ReelsmithResult<()> {
        let bible = state
            .story_bible
            .as_ref()
            .ok_or_else(|| AssetError::new(AssetErrorKind::MissingStoryBible))?;

        let designer = AssetDesigner::new(&self.generator, self.config.assets().clone())
            .with_parser(self.parser());
        state.assets = Some(designer.design(bible).await);
        Ok(())
    }

    /// Storyboard every episode of the job's script.
    ///
    /// Character names from the story bible, when present, are anchored even
    /// in clips where they do not speak. A job with an architecture but no
    /// script gets placeholder scripts first, stored back into the job.
    ///
    /// # Errors
    ///
    /// `MissingScript` when the job has neither a script nor an architecture
    /// with its story bible. Episode failures fall back to template output
    /// and are recorded in `failed_episodes`.
    #[tracing::instrument(skip_all)]
    pub async fn storyboard(&self, state: &mut JobState) -> ReelsmithResult<()> {
        if state.script.is_none() {
            if let (Some(architecture), Some(bible)) =
                (state.architecture.as_ref(), state.story_bible.as_ref())
            {
                state.script = Some(fallback_script(architecture, bible));
            }
        }
        let script = state
            .script
            .as_ref()
            .ok_or_else(|| SynthesisError::new(SynthesisErrorKind::MissingScript))?;

        let known_characters: Vec<String> = state
            .story_bible
            .as_ref()
            .map(|bible| bible.characters.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default();

        let mut director =
            StoryboardDirector::new(&self.generator, self.config.storyboard().clone());
        let storyboard = director.direct(script, &known_characters).await;
        state.storyboard = Some(storyboard);
        Ok(())
    }
}
