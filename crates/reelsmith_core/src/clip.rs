//! Script clips and their storyboard prompts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SPEAKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^\s：:「」“”\x22]{1,20})\s*[：:]").expect("Valid speaker regex")
});

fn seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.max(0.0).round() as u32)
}

fn flatten_text(value: serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Array(items) => join_texts(items),
        Value::Object(fields) => join_texts(fields.into_iter().map(|(_, v)| v)),
        other => other.to_string(),
    }
}

fn join_texts(values: impl IntoIterator<Item = serde_json::Value>) -> String {
    values
        .into_iter()
        .map(flatten_text)
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Model-written text field: `null` is empty, lists are joined with `", "`,
/// numbers and booleans are written out.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(flatten_text(serde_json::Value::deserialize(deserializer)?))
}

/// Start and end second of a clip within its episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeCode {
    /// Start second
    #[serde(deserialize_with = "seconds")]
    pub start: u32,
    /// End second
    #[serde(deserialize_with = "seconds")]
    pub end: u32,
}

impl TimeCode {
    /// Time code spanning `start..start + duration`.
    pub fn new(start: u32, duration: u32) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Length in seconds.
    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Spoken dialogue of a clip.
///
/// Script generators emit either a structured `{character, line}` object or a
/// plain `Name：line` string (possibly several lines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dialogue {
    /// One line by one named character
    Line {
        /// Speaker name
        character: String,
        /// Spoken text
        line: String,
    },
    /// Free-form dialogue text
    Text(String),
}

impl Dialogue {
    /// Speaker names in order of first appearance.
    pub fn speakers(&self) -> Vec<String> {
        match self {
            Dialogue::Line { character, .. } => {
                let name = character.trim();
                if name.is_empty() {
                    Vec::new()
                } else {
                    vec![name.to_string()]
                }
            }
            Dialogue::Text(text) => {
                let mut names: Vec<String> = Vec::new();
                for line in text.lines() {
                    if let Some(captures) = SPEAKER_LINE.captures(line) {
                        let name = captures[1].to_string();
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
                names
            }
        }
    }

    /// Dialogue rendered as `Name：line`.
    pub fn render(&self) -> String {
        match self {
            Dialogue::Line { character, line } => format!("{}：{}", character, line),
            Dialogue::Text(text) => text.clone(),
        }
    }
}

/// Five-dimension visual description of one clip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualDescription {
    /// D1: who or what is on screen
    #[serde(
        default,
        alias = "d1_subject",
        alias = "d1",
        deserialize_with = "lenient_text"
    )]
    pub subject: String,
    /// D2: setting and light
    #[serde(
        default,
        alias = "d2_environment",
        alias = "d2",
        deserialize_with = "lenient_text"
    )]
    pub environment: String,
    /// D3: textures and materials
    #[serde(
        default,
        alias = "d3_material",
        alias = "d3",
        deserialize_with = "lenient_text"
    )]
    pub material: String,
    /// D4: shot and camera movement
    #[serde(
        default,
        alias = "d4_camera",
        alias = "d4",
        deserialize_with = "lenient_text"
    )]
    pub camera: String,
    /// D5: mood
    #[serde(
        default,
        alias = "d5_mood",
        alias = "d5",
        deserialize_with = "lenient_text"
    )]
    pub mood: String,
}

impl VisualDescription {
    /// Non-empty fields in D1..D5 order.
    pub fn parts(&self) -> Vec<&str> {
        [
            &self.subject,
            &self.environment,
            &self.material,
            &self.camera,
            &self.mood,
        ]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
    }
}

/// Final image-generation prompt for a clip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipPrompt {
    /// Subject
    pub d1_subject: String,
    /// Environment and light
    pub d2_environment: String,
    /// Materials
    pub d3_material: String,
    /// Camera
    pub d4_camera: String,
    /// Mood
    pub d5_mood: String,
    /// All dimensions plus style modifiers
    pub combined: String,
    /// Negative prompt
    pub negative: String,
    /// Chinese summary line
    pub chinese: String,
}

impl ClipPrompt {
    /// The five dimensions as a [`VisualDescription`].
    pub fn description(&self) -> VisualDescription {
        VisualDescription {
            subject: self.d1_subject.clone(),
            environment: self.d2_environment.clone(),
            material: self.d3_material.clone(),
            camera: self.d4_camera.clone(),
            mood: self.d5_mood.clone(),
        }
    }
}

/// One timed visual+audio segment of an episode script.
///
/// # Examples
///
/// ```
/// use reelsmith_core::Clip;
///
/// let clip: Clip = serde_json::from_str(r#"{
///     "id": "C02",
///     "segmentName": "背景铺垫",
///     "timeCode": {"start": 5, "end": 20},
///     "narration": "...",
///     "visual": "Lin stands in the rain",
///     "dialogue": {"character": "Lin", "line": "I'm back."},
///     "emotion": "平稳"
/// }"#).unwrap();
/// assert_eq!(clip.time_code.duration(), 15);
/// assert_eq!(clip.speakers(), vec!["Lin".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct Clip {
    /// Clip identifier (e.g. `C01`)
    pub id: String,
    /// Segment label from the rhythm template
    #[serde(default)]
    pub segment_name: String,
    /// Timing within the episode
    #[serde(default)]
    pub time_code: TimeCode,
    /// Voice-over text
    #[serde(default)]
    pub narration: String,
    /// On-screen dialogue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<Dialogue>,
    /// Visual direction
    #[serde(default)]
    pub visual: String,
    /// Emotion label, optionally with an intensity score (`紧张 · 8`)
    #[serde(default)]
    pub emotion: String,
    /// Beat label (free-form; may be outside the closed beat set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beat_type: Option<String>,
    /// Storyboard prompt, filled in by synthesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<ClipPrompt>,
}

impl Clip {
    /// Minimal clip for tests and fallbacks.
    pub fn new(id: impl Into<String>, visual: impl Into<String>, emotion: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            segment_name: String::new(),
            time_code: TimeCode::default(),
            narration: String::new(),
            dialogue: None,
            visual: visual.into(),
            emotion: emotion.into(),
            beat_type: None,
            prompt: None,
        }
    }

    /// Names of characters who speak in this clip.
    pub fn speakers(&self) -> Vec<String> {
        self.dialogue
            .as_ref()
            .map(Dialogue::speakers)
            .unwrap_or_default()
    }
}

/// One scripted episode: the input to storyboard synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEpisode {
    /// 1-based episode number
    pub number: u32,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Selling point
    #[serde(default)]
    pub logline: String,
    /// Total length in seconds
    #[serde(default)]
    pub total_duration: u32,
    /// Clips in script order
    #[serde(default)]
    pub clips: Vec<Clip>,
}
