//! Job-level storyboard loop with per-episode fallback.

use crate::{PromptSynthesizer, StoryboardConfig};
use reelsmith_core::{EpisodeStoryboard, FailedEpisode, ScriptEpisode, Storyboard};
use reelsmith_error::{ReelsmithResult, SynthesisError, SynthesisErrorKind};
use reelsmith_interface::TextGenerator;

/// Storyboards every episode of a script.
///
/// An episode whose synthesis fails is recorded in `failed_episodes` and
/// replaced by template output marked `fallback: true`; the remaining
/// episodes are unaffected. One director (and so one cache) serves one job.
pub struct StoryboardDirector<G> {
    synthesizer: PromptSynthesizer<G>,
}

impl<G: TextGenerator> StoryboardDirector<G> {
    /// Director with the given generator and configuration.
    pub fn new(generator: G, config: StoryboardConfig) -> Self {
        Self {
            synthesizer: PromptSynthesizer::new(generator, config),
        }
    }

    /// Director around an existing synthesizer.
    pub fn from_synthesizer(synthesizer: PromptSynthesizer<G>) -> Self {
        Self { synthesizer }
    }

    /// Underlying synthesizer.
    pub fn synthesizer(&self) -> &PromptSynthesizer<G> {
        &self.synthesizer
    }

    /// Storyboard one episode, without fallback.
    ///
    /// # Errors
    ///
    /// `EmptyEpisode` when the episode has no clips, or any synthesis error.
    pub async fn storyboard_episode(
        &mut self,
        episode: &ScriptEpisode,
        known_characters: &[String],
    ) -> ReelsmithResult<EpisodeStoryboard> {
        if episode.clips.is_empty() {
            return Err(SynthesisError::new(SynthesisErrorKind::EmptyEpisode(episode.number)).into());
        }
        let preset = *self.synthesizer.config().style_preset();
        let synthesis = self
            .synthesizer
            .synthesize_episode_clips(&episode.clips, known_characters)
            .await?;
        Ok(synthesis.into_storyboard(episode.number, preset, false))
    }

    /// Template-only storyboard of one episode, marked as a fallback.
    pub fn fallback_episode(
        &self,
        episode: &ScriptEpisode,
        known_characters: &[String],
    ) -> EpisodeStoryboard {
        let preset = *self.synthesizer.config().style_preset();
        self.synthesizer
            .template_clips(&episode.clips, known_characters)
            .into_storyboard(episode.number, preset, true)
    }

    /// Storyboard every episode in ascending number.
    #[tracing::instrument(skip_all, fields(episodes = script.len()))]
    pub async fn direct(&mut self, script: &[ScriptEpisode], known_characters: &[String]) -> Storyboard {
        let mut ordered: Vec<&ScriptEpisode> = script.iter().collect();
        ordered.sort_by_key(|e| e.number);

        let mut storyboard = Storyboard::default();
        for episode in ordered {
            match self.storyboard_episode(episode, known_characters).await {
                Ok(board) => storyboard.episodes.push(board),
                Err(e) => {
                    tracing::warn!(
                        episode = episode.number,
                        error = %e,
                        "Episode synthesis failed, using template fallback"
                    );
                    storyboard.failed_episodes.push(FailedEpisode {
                        number: episode.number,
                        error: e.to_string(),
                    });
                    storyboard
                        .episodes
                        .push(self.fallback_episode(episode, known_characters));
                }
            }
        }
        tracing::info!(
            episodes = storyboard.episodes.len(),
            failed = storyboard.failed_episodes.len(),
            "Storyboard complete"
        );
        storyboard
    }
}
