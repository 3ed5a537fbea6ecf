//! Storyboard synthesis for Reelsmith.
//!
//! Takes scripted episodes and produces, for every clip, a timed
//! image-generation prompt built from a five-field visual description
//! (subject, environment, material, camera, mood):
//!
//! - [`decide_duration`] fits each clip into a 5, 10 or 15 second class.
//! - [`validate_speech_rate`] flags narration that will not fit its clip.
//! - [`AnchorRegistry`] keeps character and location tokens identical across clips.
//! - [`PromptSynthesizer`] produces descriptions in batched, per-clip or template mode.
//! - [`StoryboardDirector`] runs a whole script with per-episode template fallback.
//! - [`fallback_script`] lays out placeholder clips when only an architecture exists.
//!
//! # Example
//!
//! ```
//! use reelsmith_core::{Clip, Dialogue};
//! use reelsmith_interface::OfflineGenerator;
//! use reelsmith_storyboard::{PromptSynthesizer, StoryboardConfig};
//!
//! let config = StoryboardConfig::default().with_use_llm(false);
//! let synthesizer = PromptSynthesizer::new(OfflineGenerator, config);
//!
//! let clips = vec![
//!     Clip::new("C01", "Lin enters", "平静")
//!         .with_dialogue(Some(Dialogue::Text("Lin：我回来了".to_string()))),
//!     Clip::new("C02", "Lin draws a sword", "高潮")
//!         .with_dialogue(Some(Dialogue::Text("Lin：够了".to_string()))),
//! ];
//! let synthesis = synthesizer.template_clips(&clips, &[]);
//!
//! let first = synthesis.clips[0].clip.prompt.as_ref().unwrap();
//! let second = synthesis.clips[1].clip.prompt.as_ref().unwrap();
//! assert!(first.d1_subject.starts_with("{@char_Lin}"));
//! assert!(second.d1_subject.starts_with("{@char_Lin}"));
//! assert_eq!(synthesis.clips[1].clip.time_code.start, 15);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anchor;
mod assembly;
mod config;
mod director;
mod duration;
mod prompt;
mod script;
mod speech;
mod synthesis;
mod template;

pub use anchor::{AnchorRegistry, locations_in, mentions};
pub use assembly::{AI_ARTIFACTS, assemble_prompt, chinese_summary, negative_prompt};
pub use config::{StoryboardConfig, StoryboardConfigBuilder};
pub use director::StoryboardDirector;
pub use duration::{
    DURATION_CLASSES, LONG_CLIP, MEDIUM_CLIP, SHORT_CLIP, decide_duration, emotion_duration,
    fit_ceiling, intensity_score,
};
pub use prompt::{batch_prompt, clip_prompt};
pub use script::{fallback_episode_script, fallback_script};
pub use speech::{
    MAX_SPEECH_RATE, MIN_SPEECH_RATE, spoken_chars, validate_speech_rate,
    validate_speech_rate_within,
};
pub use synthesis::{EpisodeSynthesis, PromptSynthesizer};
pub use template::TemplateComposer;
