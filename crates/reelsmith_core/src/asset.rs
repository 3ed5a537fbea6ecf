//! Reference-image assets: character, prop and scene design sheets.

use crate::{Anchor, StylePreset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One image prompt of an asset sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetView {
    /// What the image shows
    #[serde(default)]
    pub description: String,
    /// Positive prompt
    #[serde(default)]
    pub prompt: String,
    /// Negative prompt
    #[serde(default)]
    pub negative: String,
}

/// Main colors of a character design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Dominant color
    #[serde(default)]
    pub primary: String,
    /// Secondary color
    #[serde(default)]
    pub secondary: String,
    /// Accent color
    #[serde(default)]
    pub accent: String,
}

/// Camera angle of a turnaround view.
#[derive(
    Debug,
    Clone,
    Copy,
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
#[serde(rename_all = "snake_case")]
pub enum TurnaroundAngle {
    /// Facing the camera
    #[display("front")]
    Front,
    /// Profile
    #[display("side")]
    Side,
    /// From behind
    #[display("back")]
    Back,
    /// 45 degrees
    #[display("three_quarter")]
    ThreeQuarter,
}

impl TurnaroundAngle {
    /// Chinese label.
    pub fn label(&self) -> &'static str {
        match self {
            TurnaroundAngle::Front => "正面",
            TurnaroundAngle::Side => "侧面",
            TurnaroundAngle::Back => "背面",
            TurnaroundAngle::ThreeQuarter => "四分之三",
        }
    }

    /// Camera phrase used in the view prompt.
    pub fn camera(&self) -> &'static str {
        match self {
            TurnaroundAngle::Front => "front view facing camera symmetrical",
            TurnaroundAngle::Side => "side view profile facing left",
            TurnaroundAngle::Back => "back view from behind",
            TurnaroundAngle::ThreeQuarter => "three-quarter view 45 degree angle",
        }
    }

    /// Pose phrase used in the view description.
    pub fn pose(&self) -> &'static str {
        match self {
            TurnaroundAngle::Front => "facing camera directly, symmetrical pose, neutral expression",
            TurnaroundAngle::Side => "profile view, facing left, standing straight",
            TurnaroundAngle::Back => "viewed from behind, showing back details",
            TurnaroundAngle::ThreeQuarter => "45 degree angle, dynamic pose",
        }
    }
}

/// Closed set of reference expressions.
///
/// # Examples
///
/// ```
/// use reelsmith_core::Expression;
/// use strum::IntoEnumIterator;
///
/// assert_eq!(Expression::iter().count(), 6);
/// assert_eq!(Expression::Angry.prompt(), "angry furious expression");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
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
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Calm
    #[display("neutral")]
    Neutral,
    /// Smiling
    #[display("happy")]
    Happy,
    /// Melancholic
    #[display("sad")]
    Sad,
    /// Furious
    #[display("angry")]
    Angry,
    /// Shocked
    #[display("surprised")]
    Surprised,
    /// Scared
    #[display("fearful")]
    Fearful,
}

impl Expression {
    /// Chinese name.
    pub fn name(&self) -> &'static str {
        match self {
            Expression::Neutral => "中性/平静",
            Expression::Happy => "喜悦",
            Expression::Sad => "悲伤",
            Expression::Angry => "愤怒",
            Expression::Surprised => "惊讶",
            Expression::Fearful => "恐惧",
        }
    }

    /// English prompt phrase.
    pub fn prompt(&self) -> &'static str {
        match self {
            Expression::Neutral => "neutral calm expression",
            Expression::Happy => "happy smiling expression",
            Expression::Sad => "sad melancholic expression",
            Expression::Angry => "angry furious expression",
            Expression::Surprised => "surprised shocked expression",
            Expression::Fearful => "fearful scared expression",
        }
    }

    /// Facial cues, in Chinese.
    pub fn cues(&self) -> &'static str {
        match self {
            Expression::Neutral => "面无表情，自然状态",
            Expression::Happy => "微笑，眼角上扬",
            Expression::Sad => "眉头紧锁，嘴角下垂",
            Expression::Angry => "眉毛紧皱，眼神凌厉",
            Expression::Surprised => "眼睛睁大，嘴巴微张",
            Expression::Fearful => "瞳孔收缩，面色紧张",
        }
    }
}

/// One view of a turnaround sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnaroundView {
    /// Camera angle
    pub angle: TurnaroundAngle,
    /// Chinese angle label
    pub label: String,
    /// What the view shows
    pub description: String,
    /// Positive prompt
    pub prompt: String,
}

/// Four-view character turnaround sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turnaround {
    /// Front, side, back and three-quarter views
    pub views: Vec<TurnaroundView>,
    /// Prompt for all four views on one sheet
    pub combined_prompt: String,
    /// Negative prompt shared by every view
    pub negative_prompt: String,
}

/// One expression of an expression sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionView {
    /// Expression
    pub expression: Expression,
    /// Chinese name
    pub name: String,
    /// Positive prompt
    pub prompt: String,
}

/// Facial expression reference sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionSheet {
    /// One prompt per expression
    pub expressions: Vec<ExpressionView>,
    /// Prompt for every expression on one grid
    pub combined_prompt: String,
    /// Negative prompt shared by every expression
    pub negative_prompt: String,
}

/// Design sheet of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAsset {
    /// Character id from the story bible
    pub character_id: String,
    /// Character name
    pub character_name: String,
    /// Token the storyboard uses for this character
    pub anchor: Anchor,
    /// Shared description every variation starts from
    pub base_prompt: String,
    /// Portrait, full body, action and expression images
    pub variations: BTreeMap<String, AssetView>,
    /// Main colors, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<ColorPalette>,
    /// Features that must stay recognizable
    #[serde(default)]
    pub key_features: Vec<String>,
    /// Four-view turnaround
    pub turnaround: Turnaround,
    /// Expression reference
    pub expressions: ExpressionSheet,
    /// True when produced by templates instead of the generator
    #[serde(default)]
    pub fallback: bool,
    /// Generation time
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Design sheet of one prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropAsset {
    /// Prop id (e.g. `P01`)
    pub prop_id: String,
    /// Prop name
    pub prop_name: String,
    /// Token the storyboard uses for this prop
    pub anchor: Anchor,
    /// Shared description every view starts from
    pub base_prompt: String,
    /// Main, detail and in-context images
    pub views: BTreeMap<String, AssetView>,
    /// Materials
    #[serde(default)]
    pub materials: Vec<String>,
    /// Colors
    #[serde(default)]
    pub colors: Vec<String>,
    /// True when produced by templates instead of the generator
    #[serde(default)]
    pub fallback: bool,
    /// Generation time
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Reference sheet of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneAsset {
    /// Scene id (e.g. `S01`)
    pub scene_id: String,
    /// Location name
    pub scene_name: String,
    /// Token the storyboard uses for this location
    pub anchor: Anchor,
    /// Shared description every variation starts from
    pub base_prompt: String,
    /// Wide, establishing, detail and atmosphere images
    pub variations: BTreeMap<String, AssetView>,
    /// Lighting summary
    #[serde(default)]
    pub lighting: String,
    /// Mood summary
    #[serde(default)]
    pub mood: String,
    /// True when produced by templates instead of the generator
    #[serde(default)]
    pub fallback: bool,
    /// Generation time
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Every asset sheet of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSet {
    /// Style every prompt was composed in
    pub style_preset: StylePreset,
    /// Character sheets in story bible order
    #[serde(default)]
    pub characters: Vec<CharacterAsset>,
    /// Prop sheets
    #[serde(default)]
    pub props: Vec<PropAsset>,
    /// Location sheets
    #[serde(default)]
    pub scenes: Vec<SceneAsset>,
    /// Generation time
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl AssetSet {
    /// Every anchor that has a reference sheet.
    pub fn anchors(&self) -> Vec<&Anchor> {
        self.characters
            .iter()
            .map(|c| &c.anchor)
            .chain(self.props.iter().map(|p| &p.anchor))
            .chain(self.scenes.iter().map(|s| &s.anchor))
            .collect()
    }

    /// Number of sheets that came from templates.
    pub fn fallback_count(&self) -> usize {
        self.characters.iter().filter(|c| c.fallback).count()
            + self.props.iter().filter(|p| p.fallback).count()
            + self.scenes.iter().filter(|s| s.fallback).count()
    }
}
