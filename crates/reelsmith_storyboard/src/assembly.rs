//! Final prompt assembly for one clip.

use reelsmith_core::{Clip, ClipPrompt, StyleConfig, VisualDescription};

/// Traces of synthetic imagery excluded from every negative prompt.
pub const AI_ARTIFACTS: &[&str] = &[
    "3d render",
    "cgi",
    "digital art",
    "artificial",
    "plastic skin",
    "waxy skin",
    "airbrushed",
    "over-processed",
    "hdr",
    "oversaturated",
    "clipped highlights",
    "crushed blacks",
    "artificial lighting",
    "studio lighting",
    "flat lighting",
];

const STYLE_MODIFIERS_IN_PROMPT: usize = 3;

/// Style negatives followed by the artifact list, first occurrence kept.
pub fn negative_prompt(style: &StyleConfig) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let candidates = style
        .negative_prompt()
        .iter()
        .map(String::as_str)
        .chain(AI_ARTIFACTS.iter().copied());
    for part in candidates {
        let part = part.trim();
        if !part.is_empty() && !parts.contains(&part) {
            parts.push(part);
        }
    }
    parts.join(", ")
}

/// One-line Chinese summary of a clip.
pub fn chinese_summary(clip: &Clip, description: &VisualDescription) -> String {
    let dialogue = clip
        .dialogue
        .as_ref()
        .map(|d| d.render().replace('\n', " / "))
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "无".to_string());
    format!(
        "【{}s片段】画面：{} | 镜头：{} | 情绪：{} | 旁白：'{}' | 对白：{}",
        clip.time_code.duration(),
        clip.visual.trim(),
        description.camera,
        clip.emotion.trim(),
        clip.narration.trim(),
        dialogue
    )
}

/// Build the full prompt of a clip from its description and the style.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Clip, StylePreset, TimeCode, VisualDescription};
/// use reelsmith_storyboard::assemble_prompt;
///
/// let clip = Clip::new("C01", "林默转身", "紧张").with_time_code(TimeCode::new(0, 5));
/// let description = VisualDescription {
///     subject: "{@char_林默} turning".to_string(),
///     camera: "close-up".to_string(),
///     ..Default::default()
/// };
/// let prompt = assemble_prompt(&clip, &description, &StylePreset::NeutralCinematic.config());
/// assert_eq!(
///     prompt.combined,
///     "{@char_林默} turning, close-up, cinematic lighting, film grain, professional color grading"
/// );
/// assert!(prompt.chinese.starts_with("【5s片段】画面：林默转身 | 镜头：close-up"));
/// ```
pub fn assemble_prompt(
    clip: &Clip,
    description: &VisualDescription,
    style: &StyleConfig,
) -> ClipPrompt {
    let combined = description
        .parts()
        .into_iter()
        .chain(
            style
                .prompt_modifiers()
                .iter()
                .take(STYLE_MODIFIERS_IN_PROMPT)
                .map(String::as_str),
        )
        .collect::<Vec<_>>()
        .join(", ");

    ClipPrompt {
        d1_subject: description.subject.clone(),
        d2_environment: description.environment.clone(),
        d3_material: description.material.clone(),
        d4_camera: description.camera.clone(),
        d5_mood: description.mood.clone(),
        combined,
        negative: negative_prompt(style),
        chinese: chinese_summary(clip, description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::{Dialogue, StylePreset, TimeCode};

    #[test]
    fn negative_deduplicates_in_order() {
        let negative = negative_prompt(&StylePreset::NeutralCinematic.config());
        let parts: Vec<&str> = negative.split(", ").collect();
        assert_eq!(&parts[..3], &["cartoon", "anime", "3d render"]);
        assert_eq!(parts.iter().filter(|p| **p == "3d render").count(), 1);
        assert_eq!(parts.iter().filter(|p| **p == "flat lighting").count(), 1);
    }

    #[test]
    fn chinese_summary_renders_dialogue() {
        let clip = Clip::new("C02", "雨中对峙", "愤怒")
            .with_time_code(TimeCode::new(5, 10))
            .with_narration("他终于回来了")
            .with_dialogue(Some(Dialogue::Line {
                character: "林默".to_string(),
                line: "让开".to_string(),
            }));
        let description = VisualDescription {
            camera: "medium shot".to_string(),
            ..Default::default()
        };
        assert_eq!(
            chinese_summary(&clip, &description),
            "【10s片段】画面：雨中对峙 | 镜头：medium shot | 情绪：愤怒 | 旁白：'他终于回来了' | 对白：林默：让开"
        );
    }

    #[test]
    fn missing_dialogue_is_marked() {
        let clip = Clip::new("C01", "x", "calm");
        assert!(chinese_summary(&clip, &VisualDescription::default()).ends_with("对白：无"));
    }
}
