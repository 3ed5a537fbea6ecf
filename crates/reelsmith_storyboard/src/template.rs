//! Deterministic visual descriptions from keyword tables and a style preset.

use reelsmith_core::{Clip, StyleConfig, VisualDescription};

const SUBJECT_CHARS: usize = 100;

const ENVIRONMENT_PHRASES: &[(&[&str], &str)] = &[
    (&["雨", "rain"], "rain-soaked surroundings, wet reflections"),
    (&["雪", "snow"], "snow-covered ground, cold diffuse light"),
    (&["夜", "night"], "night scene, deep shadows"),
    (&["宴会", "banquet", "party"], "crowded banquet hall, warm chandeliers"),
    (&["办公室", "office"], "modern office, glass partitions"),
    (&["街", "street"], "busy street, layered background depth"),
    (&["森林", "树林", "forest"], "dense forest, dappled light through leaves"),
    (&["海", "sea", "beach"], "open sea horizon, salt haze"),
    (&["火", "fire", "flame"], "flickering firelight, drifting embers"),
    (&["医院", "hospital"], "sterile hospital corridor, fluorescent light"),
];

const MATERIAL_PHRASES: &[(&[&str], &str)] = &[
    (&["雨", "rain"], "wet fabric, water droplets on skin"),
    (&["丝", "silk"], "silk sheen, flowing folds"),
    (&["西装", "suit"], "tailored wool suit, crisp collar"),
    (&["铠甲", "盔甲", "armor"], "battered metal armor, scratched plates"),
    (&["旧", "破", "old", "worn"], "worn surfaces, faded paint"),
    (&["血", "blood"], "smeared blood, torn cloth"),
];

const DEFAULT_MATERIAL: &str = "natural skin texture, realistic fabric, environmental details";

const MOOD_PHRASES: &[(&[&str], &str)] = &[
    (&["高潮", "climax"], "climactic, explosive energy"),
    (&["震惊", "shock"], "stunned silence, electric tension"),
    (&["愤怒", "anger", "rage"], "simmering anger"),
    (&["紧张", "tense", "suspense"], "tense, suspenseful atmosphere"),
    (&["悲伤", "sad", "grief"], "melancholic, somber"),
    (&["温馨", "warm"], "warm, intimate"),
    (&["平静", "平稳", "calm"], "quiet, contemplative"),
];

fn first_match(text: &str, table: &[(&[&str], &'static str)]) -> Option<&'static str> {
    let text = text.to_lowercase();
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, phrase)| *phrase)
}

fn all_matches(text: &str, table: &[(&[&str], &'static str)]) -> Vec<&'static str> {
    let text = text.to_lowercase();
    table
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, phrase)| *phrase)
        .collect()
}

/// Emotion label without its trailing intensity score.
fn emotion_label(emotion: &str) -> &str {
    emotion
        .split(['·', '|'])
        .next()
        .unwrap_or_default()
        .trim()
}

/// Builds visual descriptions without any external call.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Clip, StylePreset};
/// use reelsmith_storyboard::TemplateComposer;
///
/// let composer = TemplateComposer::new(StylePreset::Hitchcock.config());
/// let description = composer.compose(&Clip::new("C01", "林默站在雨夜的街头", "紧张 · 7"));
/// assert_eq!(description.subject, "林默站在雨夜的街头");
/// assert!(description.environment.starts_with("rain-soaked surroundings"));
/// assert!(description.environment.ends_with("harsh shadows"));
/// assert_eq!(description.camera, "extreme close-up, slow zoom");
/// assert_eq!(description.mood, "紧张, tense, suspenseful atmosphere");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateComposer {
    style: StyleConfig,
}

impl TemplateComposer {
    /// Composer for a style.
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Active style.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Five-field description of one clip.
    pub fn compose(&self, clip: &Clip) -> VisualDescription {
        VisualDescription {
            subject: self.subject(clip),
            environment: self.environment(clip),
            material: self.material(clip),
            camera: self.camera(clip),
            mood: self.mood(clip),
        }
    }

    fn subject(&self, clip: &Clip) -> String {
        let visual = clip.visual.trim();
        if visual.is_empty() {
            return "subject in scene".to_string();
        }
        visual.chars().take(SUBJECT_CHARS).collect()
    }

    fn environment(&self, clip: &Clip) -> String {
        let mut parts = all_matches(&clip.visual, ENVIRONMENT_PHRASES);
        parts.push(self.style.primary_lighting());
        parts.join(", ")
    }

    fn material(&self, clip: &Clip) -> String {
        let parts = all_matches(&clip.visual, MATERIAL_PHRASES);
        if parts.is_empty() {
            DEFAULT_MATERIAL.to_string()
        } else {
            parts.join(", ")
        }
    }

    fn camera(&self, clip: &Clip) -> String {
        let camera = self.style.camera_style();
        let text = format!("{} {}", clip.visual, clip.emotion).to_lowercase();
        let shot = if text.contains("高潮") || text.contains("特写") || text.contains("close") {
            "close-up"
        } else if text.contains("全景") || text.contains("远景") || text.contains("wide") {
            "wide shot"
        } else {
            camera.shots.first().map(String::as_str).unwrap_or("medium shot")
        };
        let movement = if text.contains("紧张") || text.contains("tense") {
            "slow zoom"
        } else {
            camera.movements.first().map(String::as_str).unwrap_or("static")
        };
        format!("{}, {}", shot, movement)
    }

    fn mood(&self, clip: &Clip) -> String {
        let label = emotion_label(&clip.emotion);
        match (label.is_empty(), first_match(label, MOOD_PHRASES)) {
            (false, Some(phrase)) => format!("{}, {}", label, phrase),
            (false, None) => label.to_string(),
            (true, _) => self.style.characteristics().join(", "),
        }
    }
}
