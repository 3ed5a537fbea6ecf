//! Visual style presets.

use serde::{Deserialize, Serialize};

/// Camera vocabulary of a style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraStyle {
    /// Preferred shot types, most typical first
    pub shots: Vec<String>,
    /// Preferred camera movements, most typical first
    pub movements: Vec<String>,
}

/// Lighting vocabulary of a style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lighting {
    /// Example lighting phrases, most typical first
    pub examples: Vec<String>,
}

/// Read-only style configuration consumed by prompt synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    /// Preset this configuration came from
    preset: StylePreset,
    /// Director the style imitates, if any
    director: Option<String>,
    /// Short characteristic phrases
    characteristics: Vec<String>,
    /// Camera vocabulary
    camera_style: CameraStyle,
    /// Lighting vocabulary
    lighting: Lighting,
    /// Color grading summary
    color_grading: String,
    /// Phrases appended to every combined prompt
    prompt_modifiers: Vec<String>,
    /// Phrases that go into every negative prompt
    negative_prompt: Vec<String>,
}

/// Closed set of style presets.
///
/// # Examples
///
/// ```
/// use reelsmith_core::StylePreset;
///
/// let style = StylePreset::Hitchcock.config();
/// assert_eq!(style.director().as_deref(), Some("Alfred Hitchcock"));
/// assert_eq!("wong_kar_wai".parse::<StylePreset>(), Ok(StylePreset::WongKarWai));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum StylePreset {
    /// Neutral film look
    #[default]
    #[display("neutral_cinematic")]
    NeutralCinematic,
    /// Suspense and psychological pressure
    #[display("hitchcock")]
    Hitchcock,
    /// Poetic long takes and natural elements
    #[display("tarkovsky")]
    Tarkovsky,
    /// Neon urban romance
    #[display("wong_kar_wai")]
    WongKarWai,
    /// Cold symmetry
    #[display("kubrick")]
    Kubrick,
    /// Epic motion and weather
    #[display("kurosawa")]
    Kurosawa,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl StylePreset {
    /// Human-readable preset name.
    pub fn display_name(&self) -> &'static str {
        match self {
            StylePreset::NeutralCinematic => "Neutral Cinematic",
            StylePreset::Hitchcock => "Hitchcock",
            StylePreset::Tarkovsky => "Tarkovsky",
            StylePreset::WongKarWai => "Wong Kar-wai",
            StylePreset::Kubrick => "Kubrick",
            StylePreset::Kurosawa => "Kurosawa",
        }
    }

    /// Full configuration for this preset.
    pub fn config(&self) -> StyleConfig {
        let (director, characteristics, shots, movements, lighting, grading, modifiers, negative) =
            match self {
                StylePreset::NeutralCinematic => (
                    None,
                    &["自然光感", "电影级色彩", "标准景别", "适度对比"][..],
                    &["medium shot", "close-up", "wide shot"][..],
                    &["static", "slow pan", "dolly"][..],
                    &["soft ambient light", "natural daylight", "golden hour"][..],
                    "neutral palette, medium saturation, medium contrast",
                    &[
                        "cinematic lighting",
                        "film grain",
                        "professional color grading",
                        "8K resolution",
                        "photorealistic",
                    ][..],
                    &["cartoon", "anime", "3d render", "oversaturated", "flat lighting"][..],
                ),
                StylePreset::Hitchcock => (
                    Some("Alfred Hitchcock"),
                    &["心理悬疑", "精心构图", "阴影运用", "紧张氛围"][..],
                    &["extreme close-up", "dutch angle", "long shot"][..],
                    &["slow zoom", "tracking shot", "dolly zoom"][..],
                    &["harsh shadows", "single light source", "noir lighting"][..],
                    "desaturated cool palette, low saturation, high contrast",
                    &[
                        "Hitchcockian suspense",
                        "dramatic shadows",
                        "psychological tension",
                        "precise framing",
                        "noir aesthetic",
                        "vertigo effect",
                    ][..],
                    &["bright colors", "cheerful", "casual", "warm tones", "soft lighting"][..],
                ),
                StylePreset::Tarkovsky => (
                    Some("Andrei Tarkovsky"),
                    &["诗意氛围", "自然元素", "长镜头美学", "哲学深度"][..],
                    &["long take", "tracking shot", "slow zoom"][..],
                    &["very slow", "floating", "meditative"][..],
                    &["diffused sunlight", "candlelight", "misty atmosphere"][..],
                    "earthy muted palette, low saturation, low contrast",
                    &[
                        "Tarkovsky style",
                        "poetic atmosphere",
                        "natural elements",
                        "water reflections",
                        "long take aesthetic",
                        "spiritual mood",
                        "meditative pacing",
                        "sepia tones",
                    ][..],
                    &["fast cuts", "action", "bright colors", "modern", "crisp detail"][..],
                ),
                StylePreset::WongKarWai => (
                    Some("王家卫"),
                    &["都市浪漫", "色彩浓郁", "慢镜头", "情感氛围"][..],
                    &["close-up", "medium shot", "handheld"][..],
                    &["step printing", "slow motion", "freeform handheld"][..],
                    &["neon lights", "rain reflections", "urban night"][..],
                    "rich saturated palette, high saturation, blooming highlights",
                    &[
                        "Wong Kar-wai style",
                        "Christopher Doyle cinematography",
                        "neon lights",
                        "urban melancholy",
                        "step printing effect",
                        "rain-soaked streets",
                        "romantic blur",
                        "saturated colors",
                        "In the Mood for Love aesthetic",
                    ][..],
                    &["clean", "daytime", "suburban", "bright", "documentary"][..],
                ),
                StylePreset::Kubrick => (
                    Some("Stanley Kubrick"),
                    &["完美对称", "广角镜头", "冷峻氛围", "精心设计"][..],
                    &["one-point perspective", "wide angle", "symmetric framing"][..],
                    &["steady tracking", "slow zoom", "precise"][..],
                    &["practical lighting", "candlelit scenes", "cold fluorescent"][..],
                    "cold controlled palette, precise contrast",
                    &[
                        "Kubrick style",
                        "one-point perspective",
                        "symmetric composition",
                        "wide angle lens",
                        "cold atmosphere",
                        "meticulous framing",
                        "bathroom tiles",
                        "overlook hotel aesthetic",
                    ][..],
                    &["warm", "casual", "handheld", "imperfect", "organic"][..],
                ),
                StylePreset::Kurosawa => (
                    Some("Akira Kurosawa"),
                    &["力量感", "动态构图", "自然元素", "史诗感"][..],
                    &["telephoto compression", "weather shots", "group compositions"][..],
                    &["dynamic tracking", "weather movement", "epic sweeps"][..],
                    &["stormy skies", "harsh sunlight", "wind and rain"][..],
                    "earthy bold palette, high contrast, deep shadows",
                    &[
                        "Kurosawa style",
                        "epic composition",
                        "weather elements",
                        "telephoto lens",
                        "dynamic movement",
                        "samurai aesthetic",
                        "widescreen",
                        "natural forces",
                        "rain and wind",
                    ][..],
                    &["static", "indoor", "modern", "subtle", "quiet"][..],
                ),
            };

        StyleConfig {
            preset: *self,
            director: director.map(str::to_string),
            characteristics: strings(characteristics),
            camera_style: CameraStyle {
                shots: strings(shots),
                movements: strings(movements),
            },
            lighting: Lighting {
                examples: strings(lighting),
            },
            color_grading: grading.to_string(),
            prompt_modifiers: strings(modifiers),
            negative_prompt: strings(negative),
        }
    }
}

impl std::str::FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "neutral_cinematic" | "neutral" => Ok(StylePreset::NeutralCinematic),
            "hitchcock" => Ok(StylePreset::Hitchcock),
            "tarkovsky" => Ok(StylePreset::Tarkovsky),
            "wong_kar_wai" | "wongkarwai" => Ok(StylePreset::WongKarWai),
            "kubrick" => Ok(StylePreset::Kubrick),
            "kurosawa" => Ok(StylePreset::Kurosawa),
            other => Err(format!("Unknown style preset: {}", other)),
        }
    }
}

impl StyleConfig {
    /// Name used in cache keys and logs.
    pub fn name(&self) -> String {
        self.preset.to_string()
    }

    /// First lighting example, or a neutral default.
    pub fn primary_lighting(&self) -> &str {
        self.lighting
            .examples
            .first()
            .map(String::as_str)
            .unwrap_or("natural lighting")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_preset_has_vocabulary() {
        for preset in StylePreset::iter() {
            let style = preset.config();
            assert!(style.prompt_modifiers().len() >= 3, "{preset}");
            assert!(!style.negative_prompt().is_empty());
            assert!(!style.camera_style().shots.is_empty());
            assert_eq!(style.preset(), &preset);
            assert_eq!(preset.to_string().parse::<StylePreset>(), Ok(preset));
        }
    }

    #[test]
    fn neutral_has_no_director() {
        assert!(StylePreset::NeutralCinematic.config().director().is_none());
        assert_eq!(StylePreset::default().config().primary_lighting(), "soft ambient light");
    }
}
