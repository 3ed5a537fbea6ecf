//! Core data types for the Reelsmith storyboard pipeline.
//!
//! This crate provides the data model shared by every pipeline stage: story
//! bibles, events, characters, episode architectures, script clips and
//! storyboard output, reference-image asset sheets, plus the closed tables (beat types, archetypes, style
//! presets, rhythm templates) the stages consult.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anchor;
mod asset;
mod beat;
mod character;
mod clip;
mod episode;
mod event;
mod request;
mod rhythm;
mod story_bible;
mod storyboard;
mod style;
mod telemetry;

pub use anchor::{Anchor, AnchorKind};
pub use asset::{
    AssetSet, AssetView, CharacterAsset, ColorPalette, Expression, ExpressionSheet, ExpressionView,
    PropAsset, SceneAsset, Turnaround, TurnaroundAngle, TurnaroundView,
};
pub use beat::{BeatType, FourSteps};
pub use character::{Archetype, Character, CharacterLook, Role};
pub use clip::{Clip, ClipPrompt, Dialogue, ScriptEpisode, TimeCode, VisualDescription};
pub use episode::{
    Act, Architecture, Arcs, BeatAssignment, BeatMap, BeatPosition, Episode, MajorTurningPoint,
    MiniArc, Overview, TurningPointKind,
};
pub use event::{Event, EventId, EventType};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, Message, MessageRole, Output,
};
pub use rhythm::{RhythmSegment, RhythmTemplate};
pub use story_bible::{EventChain, JobState, StoryBible, TurningPoint, identify_event_chains};
pub use storyboard::{
    BatchMismatch, DescriptionSource, EnrichedClip, EpisodeStoryboard, FailedEpisode,
    SpeechRateReport, SpeechRateSuggestion, SpeechRateWarning, Storyboard, SynthesisMode,
};
pub use style::{CameraStyle, Lighting, StyleConfig, StylePreset};
pub use telemetry::{init_telemetry, shutdown_telemetry};
