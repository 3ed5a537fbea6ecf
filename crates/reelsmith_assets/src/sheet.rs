//! Template sheets and negative prompts.
//!
//! Everything here is deterministic and never calls the generator. The
//! turnaround and expression sheets are always built this way; character,
//! prop and scene sheets fall back to it when generation fails.

use crate::{PropSpec, SceneSpec};
use reelsmith_core::{
    Anchor, AnchorKind, Archetype, AssetView, Character, CharacterAsset, Expression,
    ExpressionSheet, ExpressionView, PropAsset, SceneAsset, StyleConfig, Turnaround,
    TurnaroundAngle, TurnaroundView,
};
use reelsmith_storyboard::negative_prompt;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

const CHARACTER_NEGATIVES: &[&str] = &[
    "multiple people",
    "crowd",
    "blurry",
    "low quality",
    "bad anatomy",
    "deformed",
    "extra limbs",
    "watermark",
    "signature",
];

const PROP_NEGATIVES: &[&str] = &["blurry", "low quality", "watermark"];

const SCENE_NEGATIVES: &[&str] = &[
    "people",
    "characters",
    "text",
    "watermark",
    "blurry",
    "low quality",
];

const CONSISTENCY_NEGATIVES: &[&str] = &[
    "inconsistent design",
    "different faces",
    "asymmetrical features",
    "deformed",
    "distorted",
    "blurry",
    "low quality",
    "bad anatomy",
    "extra limbs",
    "missing limbs",
    "different clothing",
    "different hair",
];

const TIME_LIGHTING: &[(&str, &str)] = &[
    ("早晨", "golden hour lighting, warm tones"),
    ("上午", "natural daylight, soft shadows"),
    ("中午", "harsh midday sun, high contrast"),
    ("下午", "warm afternoon light"),
    ("傍晚", "golden hour, sunset colors"),
    ("夜晚", "night scene, artificial lighting, moonlight"),
];

fn modifiers(style: &StyleConfig, n: usize) -> impl Iterator<Item = &str> {
    style.prompt_modifiers().iter().take(n).map(String::as_str)
}

fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Asset-specific negatives, then the style's storyboard negatives.
///
/// # Examples
///
/// ```
/// use reelsmith_assets::asset_negative;
/// use reelsmith_core::StylePreset;
///
/// let negative = asset_negative(&StylePreset::NeutralCinematic.config(), &["crowd", "cartoon"]);
/// assert!(negative.starts_with("crowd, cartoon, anime"));
/// assert_eq!(negative.matches("cartoon").count(), 1);
/// ```
pub fn asset_negative(style: &StyleConfig, extras: &[&str]) -> String {
    let base = negative_prompt(style);
    let mut parts: Vec<&str> = Vec::new();
    for part in extras.iter().copied().chain(base.split(", ")) {
        let part = part.trim();
        if !part.is_empty() && !parts.contains(&part) {
            parts.push(part);
        }
    }
    parts.join(", ")
}

/// Negative prompt of character portraits.
pub fn character_negative(style: &StyleConfig) -> String {
    asset_negative(style, CHARACTER_NEGATIVES)
}

/// Negative prompt of prop images.
pub fn prop_negative(style: &StyleConfig) -> String {
    asset_negative(style, PROP_NEGATIVES)
}

/// Negative prompt of empty location images.
pub fn scene_negative(style: &StyleConfig) -> String {
    asset_negative(style, SCENE_NEGATIVES)
}

/// Negative prompt of multi-view sheets of one character.
pub fn sheet_negative(style: &StyleConfig) -> String {
    asset_negative(style, CONSISTENCY_NEGATIVES)
}

/// Visual shorthand of an archetype.
pub fn archetype_traits(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::Underdog => "humble appearance, determined eyes, resilient posture",
        Archetype::HiddenIdentity => "mysterious aura, composed expression, subtle confidence",
        Archetype::Gray => "complex expression, morally ambiguous vibe, sharp features",
        Archetype::Oppressor => "intimidating presence, arrogant posture, commanding aura",
        Archetype::Wildcard => "unpredictable energy, mischievous smile, dynamic pose",
        Archetype::Ally => "warm expression, trustworthy appearance, supportive posture",
    }
}

/// Description shared by every view of a character.
pub fn character_base(character: &Character) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(look) = &character.visual_description {
        if !look.appearance.trim().is_empty() {
            parts.push(look.appearance.trim().to_string());
        }
        if !look.clothing.trim().is_empty() {
            parts.push(format!("wearing {}", look.clothing.trim()));
        }
    }
    if let Some(archetype) = character.archetype {
        parts.push(archetype_traits(archetype).to_string());
    }
    if parts.is_empty() {
        parts.push(format!("{}, young adult, detailed design", character.name));
    }
    parts.join(", ")
}

/// Front, side, back and three-quarter views of one character.
pub fn turnaround(character: &Character, style: &StyleConfig) -> Turnaround {
    let base = character_base(character);
    let views = TurnaroundAngle::iter()
        .map(|angle| TurnaroundView {
            angle,
            label: angle.label().to_string(),
            description: format!("{}, {}", base, angle.pose()),
            prompt: join(
                [
                    base.as_str(),
                    angle.camera(),
                    "character turnaround sheet",
                    "consistent design",
                    "clean background",
                    "professional character design",
                    "full body",
                ]
                .into_iter()
                .chain(modifiers(style, 2)),
            ),
        })
        .collect();

    Turnaround {
        views,
        combined_prompt: join(
            [
                base.as_str(),
                "character turnaround sheet",
                "four views: front view, side view, back view, three-quarter view",
                "same character in all views",
                "consistent design across all angles",
                "white background",
                "reference sheet layout",
                "professional character design",
                "detailed anatomy",
                "clean lineart",
            ]
            .into_iter()
            .chain(modifiers(style, 3)),
        ),
        negative_prompt: sheet_negative(style),
    }
}

/// Close-up prompts of one character in every reference expression.
pub fn expression_sheet(character: &Character, style: &StyleConfig) -> ExpressionSheet {
    let base = character_base(character);
    let expressions: Vec<ExpressionView> = Expression::iter()
        .map(|expression| ExpressionView {
            expression,
            name: expression.name().to_string(),
            prompt: join(
                [
                    base.as_str(),
                    expression.prompt(),
                    "face close-up portrait",
                    "detailed facial features",
                    expression.cues(),
                ]
                .into_iter()
                .chain(modifiers(style, 2)),
            ),
        })
        .collect();
    let names = expressions
        .iter()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let listed = format!("expressions: {}", names);

    ExpressionSheet {
        combined_prompt: join(
            [
                base.as_str(),
                "expression sheet",
                listed.as_str(),
                "multiple facial expressions",
                "same character",
                "consistent design",
                "grid layout",
                "reference sheet",
                "professional character design",
            ]
            .into_iter()
            .chain(modifiers(style, 3)),
        ),
        expressions,
        negative_prompt: sheet_negative(style),
    }
}

fn view(description: &str, prompt: String, negative: &str) -> AssetView {
    AssetView {
        description: description.to_string(),
        prompt,
        negative: negative.to_string(),
    }
}

/// Character sheet built from the story bible alone, marked as a fallback.
///
/// # Examples
///
/// ```
/// use reelsmith_assets::character_template;
/// use reelsmith_core::{Character, Role, StylePreset};
///
/// let lin = Character::new("C01", "Lin", Role::Protagonist);
/// let sheet = character_template(&lin, &StylePreset::Hitchcock.config());
///
/// assert!(sheet.fallback);
/// assert_eq!(sheet.anchor.token(), "{@char_Lin}");
/// assert_eq!(sheet.variations.len(), 4);
/// assert_eq!(sheet.turnaround.views.len(), 4);
/// assert_eq!(sheet.expressions.expressions.len(), 6);
/// ```
pub fn character_template(character: &Character, style: &StyleConfig) -> CharacterAsset {
    let look = character.visual_description.clone().unwrap_or_default();
    let appearance = if look.appearance.trim().is_empty() {
        format!("{}, young adult", character.name)
    } else {
        look.appearance.clone()
    };
    let clothing = if look.clothing.trim().is_empty() {
        "casual clothing"
    } else {
        look.clothing.as_str()
    };
    let base = join(
        [appearance.as_str(), clothing, look.distinctive.as_str()]
            .into_iter()
            .chain(modifiers(style, 3)),
    );
    let negative = character_negative(style);

    let variations = BTreeMap::from([
        (
            "portrait".to_string(),
            view(
                "肖像特写",
                format!("{}, close-up portrait, detailed face, looking at camera", base),
                &negative,
            ),
        ),
        (
            "fullBody".to_string(),
            view(
                "全身立绘",
                format!("{}, full body standing, character sheet, white background", base),
                &negative,
            ),
        ),
        (
            "action".to_string(),
            view(
                "动态姿势",
                format!("{}, dynamic action pose, motion blur, dramatic lighting", base),
                &negative,
            ),
        ),
        (
            "expression".to_string(),
            view(
                "表情集",
                format!("{}, expression sheet, multiple expressions, character reference", base),
                &negative,
            ),
        ),
    ]);

    CharacterAsset {
        character_id: character.id.clone(),
        character_name: character.name.clone(),
        anchor: Anchor::new(AnchorKind::Char, &character.name),
        base_prompt: base,
        variations,
        color_palette: None,
        key_features: character.traits.clone(),
        turnaround: turnaround(character, style),
        expressions: expression_sheet(character, style),
        fallback: true,
        generated_at: chrono::Utc::now(),
    }
}

/// Prop sheet built from the extracted entry alone, marked as a fallback.
pub fn prop_template(prop: &PropSpec, style: &StyleConfig) -> PropAsset {
    let description = if prop.description.trim().is_empty() {
        "detailed object"
    } else {
        prop.description.as_str()
    };
    let base = join(
        [prop.name.as_str(), description, "product photography style"]
            .into_iter()
            .chain(modifiers(style, 2)),
    );
    let negative = prop_negative(style);

    let views = BTreeMap::from([
        (
            "main".to_string(),
            view("主视角", format!("{}, front view, white background", base), &negative),
        ),
        (
            "detail".to_string(),
            view("细节特写", format!("{}, close-up detail, macro shot", base), &negative),
        ),
        (
            "context".to_string(),
            view("使用场景", format!("{}, in use, environmental context", base), &negative),
        ),
    ]);

    PropAsset {
        prop_id: prop.id.clone(),
        prop_name: prop.name.clone(),
        anchor: Anchor::new(AnchorKind::Prop, &prop.name),
        base_prompt: base,
        views,
        materials: Vec::new(),
        colors: Vec::new(),
        fallback: true,
        generated_at: chrono::Utc::now(),
    }
}

/// Lighting phrase for a Chinese time-of-day label.
pub fn time_lighting(time_of_day: Option<&str>) -> &'static str {
    time_of_day
        .and_then(|time| {
            TIME_LIGHTING
                .iter()
                .find(|(label, _)| time.contains(label))
                .map(|(_, lighting)| *lighting)
        })
        .unwrap_or("natural lighting")
}

/// Location sheet built from the extracted entry alone, marked as a fallback.
pub fn scene_template(scene: &SceneSpec, style: &StyleConfig) -> SceneAsset {
    let lighting = time_lighting(scene.time_of_day.as_deref());
    let description = if scene.description.trim().is_empty() {
        scene.name.as_str()
    } else {
        scene.description.as_str()
    };
    let base = join(
        [scene.name.as_str(), description, lighting]
            .into_iter()
            .chain(modifiers(style, 3)),
    );
    let negative = scene_negative(style);

    let variations = BTreeMap::from([
        (
            "wide".to_string(),
            view("广角全景", format!("{}, wide establishing shot, panoramic view", base), &negative),
        ),
        (
            "establishing".to_string(),
            view(
                "建立镜头",
                format!("{}, establishing shot, environmental storytelling", base),
                &negative,
            ),
        ),
        (
            "detail".to_string(),
            view("细节特写", format!("{}, close-up detail, textural elements", base), &negative),
        ),
        (
            "atmosphere".to_string(),
            view(
                "氛围镜头",
                format!("{}, atmospheric shot, mood lighting, {}", base, style.primary_lighting()),
                &negative,
            ),
        ),
    ]);

    SceneAsset {
        scene_id: scene.id.clone(),
        scene_name: scene.name.clone(),
        anchor: Anchor::new(AnchorKind::Loc, &scene.name),
        base_prompt: base,
        variations,
        lighting: lighting.to_string(),
        mood: if scene.atmosphere.trim().is_empty() {
            "cinematic".to_string()
        } else {
            scene.atmosphere.clone()
        },
        fallback: true,
        generated_at: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::{CharacterLook, Role, StylePreset};

    fn lin() -> Character {
        Character::new("C01", "林默", Role::Protagonist)
            .with_archetype(Some(Archetype::HiddenIdentity))
            .with_visual_description(Some(CharacterLook {
                appearance: "lean young man, sharp eyes".to_string(),
                clothing: "worn grey coat".to_string(),
                distinctive: "scar over left brow".to_string(),
            }))
    }

    #[test]
    fn base_uses_look_and_archetype() {
        assert_eq!(
            character_base(&lin()),
            "lean young man, sharp eyes, wearing worn grey coat, mysterious aura, composed expression, subtle confidence"
        );
        let plain = Character::new("C02", "Chen", Role::Supporting);
        assert_eq!(character_base(&plain), "Chen, young adult, detailed design");
    }

    #[test]
    fn turnaround_covers_four_angles() {
        let style = StylePreset::Kubrick.config();
        let sheet = turnaround(&lin(), &style);
        let labels: Vec<&str> = sheet.views.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["正面", "侧面", "背面", "四分之三"]);
        assert!(sheet.views[1].prompt.contains("side view profile facing left"));
        assert!(sheet.views[0].prompt.ends_with("Kubrick style, one-point perspective"));
        assert!(sheet.combined_prompt.contains("four views"));
        assert!(sheet.negative_prompt.starts_with("inconsistent design, different faces"));
    }

    #[test]
    fn expression_sheet_lists_all_expressions() {
        let sheet = expression_sheet(&lin(), &StylePreset::default().config());
        assert_eq!(sheet.expressions.len(), 6);
        assert_eq!(sheet.expressions[3].name, "愤怒");
        assert!(sheet.expressions[3].prompt.contains("angry furious expression"));
        assert!(sheet.combined_prompt.contains("expressions: 中性/平静, 喜悦, 悲伤, 愤怒, 惊讶, 恐惧"));
    }

    #[test]
    fn character_negative_keeps_style_and_artifacts() {
        let negative = character_negative(&StylePreset::Hitchcock.config());
        assert!(negative.starts_with("multiple people, crowd"));
        assert!(negative.contains("bright colors"));
        assert!(negative.contains("plastic skin"));
        assert_eq!(negative.matches("blurry").count(), 1);
    }

    #[test]
    fn scene_lighting_follows_time_of_day() {
        assert_eq!(time_lighting(Some("夜晚")), "night scene, artificial lighting, moonlight");
        assert_eq!(time_lighting(Some("深夜")), "natural lighting");
        assert_eq!(time_lighting(None), "natural lighting");

        let scene = SceneSpec {
            id: "S01".to_string(),
            name: "码头".to_string(),
            description: String::new(),
            atmosphere: String::new(),
            time_of_day: Some("傍晚".to_string()),
        };
        let sheet = scene_template(&scene, &StylePreset::default().config());
        assert_eq!(sheet.anchor.token(), "{@loc_码头}");
        assert!(sheet.base_prompt.starts_with("码头, 码头, golden hour, sunset colors"));
        assert_eq!(sheet.mood, "cinematic");
        assert!(sheet.variations["wide"].negative.starts_with("people, characters"));
    }

    #[test]
    fn prop_template_has_three_views() {
        let prop = PropSpec {
            id: "P01".to_string(),
            name: "玉佩".to_string(),
            description: String::new(),
            kind: "道具".to_string(),
            importance: "重要".to_string(),
        };
        let sheet = prop_template(&prop, &StylePreset::default().config());
        assert_eq!(sheet.views.len(), 3);
        assert_eq!(sheet.anchor.token(), "{@prop_玉佩}");
        assert!(sheet.views["main"].prompt.starts_with("玉佩, detailed object, product photography style"));
        assert!(sheet.fallback);
    }
}
