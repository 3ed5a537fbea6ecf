//! Episode-level prompt synthesis.
//!
//! Every clip of an episode gets a five-field visual description, from one
//! batched call, one cached call per clip, or the template tables. Anchors are
//! collected from all clips before any description is produced and re-applied
//! to every description afterwards, so a character keeps the same token in
//! every clip regardless of how its description was made.

use crate::{
    AnchorRegistry, StoryboardConfig, TemplateComposer, assemble_prompt, decide_duration,
    prompt, validate_speech_rate_within,
};
use reelsmith_cache::{PromptCache, PromptKey};
use reelsmith_core::{
    BatchMismatch, Clip, DescriptionSource, EnrichedClip, EpisodeStoryboard, GenerateRequest,
    SpeechRateWarning, StyleConfig, StylePreset, SynthesisMode, TimeCode, VisualDescription,
};
use reelsmith_error::{
    BuilderError, ReelsmithResult, SynthesisError, SynthesisErrorKind,
};
use reelsmith_interface::TextGenerator;
use reelsmith_repair::{TolerantParser, preview};
use serde_json::Value;

const BATCH_SCOPE: &str = "batch";

/// Clips of one episode after synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSynthesis {
    /// Mode that produced the descriptions
    pub mode: SynthesisMode,
    /// Enriched clips in script order
    pub clips: Vec<EnrichedClip>,
    /// Set when a batched reply had the wrong length
    pub batch_mismatch: Option<BatchMismatch>,
    /// Clips whose narration is out of bounds
    pub speech_rate_warnings: Vec<SpeechRateWarning>,
}

impl EpisodeSynthesis {
    /// Wrap the clips into an episode storyboard.
    pub fn into_storyboard(
        self,
        episode_number: u32,
        style_preset: StylePreset,
        fallback: bool,
    ) -> EpisodeStoryboard {
        EpisodeStoryboard {
            episode_number,
            style_preset,
            mode: self.mode,
            clips: self.clips,
            batch_mismatch: self.batch_mismatch,
            speech_rate_warnings: self.speech_rate_warnings,
            fallback,
            generated_at: chrono::Utc::now(),
        }
    }
}

/// Description array out of a batched reply: a bare array, or an object
/// holding one under a common key.
fn description_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => ["clips", "descriptions", "prompts", "items"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }),
        _ => None,
    }
}

/// Description out of one reply object; `None` when it has no usable field.
fn description_from(value: Value) -> Option<VisualDescription> {
    let description: VisualDescription = serde_json::from_value(value).ok()?;
    (!description.parts().is_empty()).then_some(description)
}

/// Produces storyboard prompts for the clips of one episode at a time.
///
/// One synthesizer serves one job; its cache lives as long as it does.
pub struct PromptSynthesizer<G> {
    generator: G,
    parser: TolerantParser,
    config: StoryboardConfig,
    style: StyleConfig,
    composer: TemplateComposer,
    cache: PromptCache,
}

impl<G: TextGenerator> PromptSynthesizer<G> {
    /// Synthesizer with the given generator and configuration.
    pub fn new(generator: G, config: StoryboardConfig) -> Self {
        let style = config.style_preset().config();
        Self {
            generator,
            parser: TolerantParser::default(),
            composer: TemplateComposer::new(style.clone()),
            cache: PromptCache::new(config.cache().clone()),
            style,
            config,
        }
    }

    /// Replace the reply parser.
    pub fn with_parser(mut self, parser: TolerantParser) -> Self {
        self.parser = parser;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &StoryboardConfig {
        &self.config
    }

    /// Active style.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Per-clip description cache.
    pub fn cache(&self) -> &PromptCache {
        &self.cache
    }

    /// Drop every cached description.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Synthesize an episode in the configured mode.
    ///
    /// # Errors
    ///
    /// In the generator-backed modes, a failed call or an unparseable reply is
    /// returned as a [`SynthesisError`]; no template output is substituted.
    pub async fn synthesize_episode_clips(
        &mut self,
        clips: &[Clip],
        known_characters: &[String],
    ) -> ReelsmithResult<EpisodeSynthesis> {
        let mode = self.config.mode();
        self.synthesize_with_mode(clips, known_characters, mode).await
    }

    /// Synthesize an episode in an explicit mode.
    #[tracing::instrument(
        skip(self, clips, known_characters),
        fields(clips = clips.len(), style = %self.style.name())
    )]
    pub async fn synthesize_with_mode(
        &mut self,
        clips: &[Clip],
        known_characters: &[String],
        mode: SynthesisMode,
    ) -> ReelsmithResult<EpisodeSynthesis> {
        let anchors = AnchorRegistry::collect(clips, known_characters);
        if clips.is_empty() {
            return Ok(self.finish(clips, Vec::new(), &anchors, mode, None));
        }

        let (descriptions, mismatch) = match mode {
            SynthesisMode::Batched => self.describe_batch(clips, &anchors).await?,
            SynthesisMode::PerClip => {
                let mut descriptions = Vec::with_capacity(clips.len());
                for clip in clips {
                    descriptions.push(self.describe_clip(clip, &anchors).await?);
                }
                (descriptions, None)
            }
            SynthesisMode::TemplateOnly => (self.describe_from_templates(clips), None),
        };
        Ok(self.finish(clips, descriptions, &anchors, mode, mismatch))
    }

    /// Template-only synthesis; never calls the generator and never fails.
    pub fn template_clips(&self, clips: &[Clip], known_characters: &[String]) -> EpisodeSynthesis {
        let anchors = AnchorRegistry::collect(clips, known_characters);
        let descriptions = self.describe_from_templates(clips);
        self.finish(clips, descriptions, &anchors, SynthesisMode::TemplateOnly, None)
    }

    fn describe_from_templates(&self, clips: &[Clip]) -> Vec<(VisualDescription, DescriptionSource)> {
        clips
            .iter()
            .map(|clip| (self.composer.compose(clip), DescriptionSource::Template))
            .collect()
    }

    fn request(&self, text: String, max_tokens: u32) -> ReelsmithResult<GenerateRequest> {
        GenerateRequest::builder()
            .prompt(text)
            .max_tokens(Some(max_tokens))
            .temperature(Some(*self.config.temperature()))
            .build()
            .map_err(|e| BuilderError::new(e.to_string()).into())
    }

    /// Call the generator and return the raw reply text.
    async fn call(&self, scope: &str, request: &GenerateRequest) -> ReelsmithResult<String> {
        let response = self.generator.generate(request).await.map_err(|e| {
            tracing::error!(scope, error = %e, "Description request failed");
            SynthesisError::new(SynthesisErrorKind::GenerationFailed {
                scope: scope.to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(response.text())
    }

    fn unparseable(&self, scope: &str, text: &str) -> SynthesisError {
        tracing::error!(scope, "Description reply could not be parsed");
        SynthesisError::new(SynthesisErrorKind::UnparseableResponse {
            scope: scope.to_string(),
            preview: preview(text, *self.config.error_preview_len()),
        })
    }

    #[tracing::instrument(skip_all, fields(clips = clips.len()))]
    async fn describe_batch(
        &self,
        clips: &[Clip],
        anchors: &AnchorRegistry,
    ) -> ReelsmithResult<(Vec<(VisualDescription, DescriptionSource)>, Option<BatchMismatch>)> {
        let text = prompt::batch_prompt(clips, &self.style, anchors, *self.config.visual_truncation());
        let request = self.request(text, *self.config.batch_max_tokens())?;
        let reply = self.call(BATCH_SCOPE, &request).await?;

        let items = self
            .parser
            .parse(&reply)
            .and_then(description_array)
            .ok_or_else(|| self.unparseable(BATCH_SCOPE, &reply))?;

        let mismatch = (items.len() != clips.len()).then(|| BatchMismatch {
            expected: clips.len(),
            received: items.len(),
        });
        if let Some(mismatch) = mismatch {
            tracing::warn!(
                expected = mismatch.expected,
                received = mismatch.received,
                "Batched reply length does not match clip count"
            );
            if *self.config.strict_batch_alignment() {
                return Err(SynthesisError::new(SynthesisErrorKind::LengthMismatch {
                    expected: mismatch.expected,
                    received: mismatch.received,
                })
                .into());
            }
        }

        let mut items = items.into_iter();
        let descriptions = clips
            .iter()
            .map(|clip| match items.next().and_then(description_from) {
                Some(description) => (description, DescriptionSource::Llm),
                None => {
                    tracing::debug!(clip = %clip.id, "No batched description, using template");
                    (self.composer.compose(clip), DescriptionSource::TemplateFallback)
                }
            })
            .collect();
        Ok((descriptions, mismatch))
    }

    #[tracing::instrument(skip_all, fields(clip = %clip.id))]
    async fn describe_clip(
        &mut self,
        clip: &Clip,
        anchors: &AnchorRegistry,
    ) -> ReelsmithResult<(VisualDescription, DescriptionSource)> {
        let key = PromptKey::new(&clip.visual, &clip.emotion, &self.style.name());
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("Using cached description");
            return Ok((cached.clone(), DescriptionSource::Cached));
        }

        let text = prompt::clip_prompt(clip, &self.style, anchors);
        let request = self.request(text, *self.config.clip_max_tokens())?;
        let reply = self.call(&clip.id, &request).await?;
        let description = self
            .parser
            .parse(&reply)
            .and_then(|value| match value {
                Value::Array(mut items) if !items.is_empty() => Some(items.swap_remove(0)),
                other => Some(other),
            })
            .and_then(description_from)
            .ok_or_else(|| self.unparseable(&clip.id, &reply))?;

        self.cache.insert(key, description.clone());
        Ok((description, DescriptionSource::Llm))
    }

    /// Re-time, anchor, assemble and check every clip.
    fn finish(
        &self,
        clips: &[Clip],
        descriptions: Vec<(VisualDescription, DescriptionSource)>,
        anchors: &AnchorRegistry,
        mode: SynthesisMode,
        batch_mismatch: Option<BatchMismatch>,
    ) -> EpisodeSynthesis {
        let mut cursor = clips.first().map(|c| c.time_code.start).unwrap_or(0);
        let mut enriched = Vec::with_capacity(clips.len());
        let mut speech_rate_warnings = Vec::new();

        for (clip, (mut description, source)) in clips.iter().zip(descriptions) {
            let seconds = decide_duration(
                &clip.emotion,
                clip.beat_type.as_deref(),
                *self.config.max_clip_duration(),
            );
            let mut clip = clip.clone();
            clip.time_code = TimeCode::new(cursor, seconds);
            cursor += seconds;

            anchors.preserve(&clip, &mut description);
            clip.prompt = Some(assemble_prompt(&clip, &description, &self.style));

            let speech_rate = validate_speech_rate_within(
                &clip.narration,
                seconds,
                *self.config.min_speech_rate(),
                *self.config.max_speech_rate(),
            );
            if !speech_rate.valid {
                speech_rate_warnings.push(SpeechRateWarning {
                    clip_id: clip.id.clone(),
                    report: speech_rate.clone(),
                });
            }
            enriched.push(EnrichedClip {
                clip,
                source,
                speech_rate,
            });
        }

        if !speech_rate_warnings.is_empty() {
            tracing::warn!(
                count = speech_rate_warnings.len(),
                "Narration outside speech-rate bounds"
            );
        }
        tracing::debug!(clips = enriched.len(), %mode, "Episode clips synthesized");
        EpisodeSynthesis {
            mode,
            clips: enriched,
            batch_mismatch,
            speech_rate_warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrays_found_under_common_keys() {
        assert_eq!(description_array(json!([1, 2])).map(|v| v.len()), Some(2));
        assert_eq!(
            description_array(json!({"clips": [{"subject": "x"}]})).map(|v| v.len()),
            Some(1)
        );
        assert!(description_array(json!({"subject": "x"})).is_none());
    }

    #[test]
    fn empty_objects_are_not_descriptions() {
        assert!(description_from(json!({})).is_none());
        assert!(description_from(json!("text")).is_none());
        let description = description_from(json!({"d1_subject": "Lin"})).unwrap();
        assert_eq!(description.subject, "Lin");
    }
}
