use reelsmith_assets::{AssetConfig, AssetDesigner, PropSpec, character_negative, prop_negative};
use reelsmith_core::{Character, Event, EventType, Role, StoryBible, StylePreset};
use reelsmith_error::GenerationErrorKind;
use reelsmith_interface::{OfflineGenerator, ScriptedGenerator};

fn lin() -> Character {
    Character::new("C01", "Lin", Role::Protagonist)
        .with_traits(vec!["stubborn".to_string(), "quiet".to_string()])
}

fn bible() -> StoryBible {
    StoryBible {
        title: "雨夜".to_string(),
        characters: vec![lin(), Character::new("C02", "Zhao", Role::Antagonist)],
        events: vec![
            Event::new("E01", "Lin 在码头捡到一把钥匙", EventType::LoadBearing),
            Event::new("E02", "Zhao 在宴会大厅设下圈套", EventType::Reinforcing),
        ],
        ..Default::default()
    }
}

const CHARACTER_REPLY: &str = r#"Here is the sheet:
```json
{
  "basePrompt": "Lin, lean young man, grey trench coat",
  "variations": {
    "portrait": {"description": "肖像特写", "prompt": "Lin, close-up portrait", "negative": "blurry"},
    "fullBody": {"description": "全身立绘", "prompt": "Lin, full body, white background"}
  },
  "colorPalette": {"primary": "grey", "secondary": "navy", "accent": "red"},
  "keyFeatures": ["scar over left eye"]
}
```"#;

#[tokio::test]
async fn character_sheet_parsed_from_fenced_reply() {
    let generator = ScriptedGenerator::new(vec![CHARACTER_REPLY.to_string()]);
    let designer = AssetDesigner::new(generator.clone(), AssetConfig::default());

    let sheet = designer.character_sheet(&lin()).await;

    assert!(!sheet.fallback);
    assert_eq!(generator.call_count(), 1);
    assert_eq!(sheet.base_prompt, "Lin, lean young man, grey trench coat");
    assert_eq!(sheet.variations.len(), 2);
    assert_eq!(sheet.key_features, vec!["scar over left eye".to_string()]);
    assert_eq!(sheet.color_palette.as_ref().map(|p| p.accent.as_str()), Some("red"));
    assert_eq!(sheet.anchor.token(), "{@char_Lin}");
    assert_eq!(sheet.turnaround.views.len(), 4);
    assert_eq!(sheet.expressions.expressions.len(), 6);
    assert!(generator.prompts()[0].contains("\"name\": \"Lin\""));
}

#[tokio::test]
async fn short_character_negatives_are_replaced() {
    let generator = ScriptedGenerator::new(vec![CHARACTER_REPLY.to_string()]);
    let designer = AssetDesigner::new(generator, AssetConfig::default());
    let expected = character_negative(designer.style());

    let sheet = designer.character_sheet(&lin()).await;

    assert_eq!(sheet.variations["portrait"].negative, expected);
    assert_eq!(sheet.variations["fullBody"].negative, expected);
}

#[tokio::test]
async fn generator_failure_gives_template_sheet() {
    let generator = ScriptedGenerator::with_results(vec![Err(GenerationErrorKind::EmptyResponse)]);
    let designer = AssetDesigner::new(generator, AssetConfig::default());

    let sheet = designer.character_sheet(&lin()).await;

    assert!(sheet.fallback);
    assert_eq!(sheet.variations.len(), 4);
    assert_eq!(sheet.key_features, vec!["stubborn".to_string(), "quiet".to_string()]);
}

#[tokio::test]
async fn reply_without_prompts_falls_back() {
    let generator = ScriptedGenerator::new(vec![
        r#"{"basePrompt": "Lin", "variations": {"portrait": {"description": "肖像"}}}"#.to_string(),
    ]);
    let designer = AssetDesigner::new(generator, AssetConfig::default());

    let sheet = designer.character_sheet(&lin()).await;

    assert!(sheet.fallback);
    assert!(sheet.variations.values().all(|v| !v.prompt.is_empty()));
}

#[tokio::test]
async fn prop_prompts_carry_style_modifiers() {
    let generator = ScriptedGenerator::new(vec![
        r#"{"basePrompt": "old brass key", "views": {"main": {"prompt": "old brass key, studio shot"}}, "materials": ["brass"]}"#
            .to_string(),
    ]);
    let config = AssetConfig::default().with_style_preset(StylePreset::Kurosawa);
    let designer = AssetDesigner::new(generator, config);
    let prop = PropSpec {
        id: "P01".to_string(),
        name: "钥匙".to_string(),
        description: String::new(),
        kind: "道具".to_string(),
        importance: "重要".to_string(),
    };

    let sheet = designer.prop_sheet(&prop).await;

    assert!(!sheet.fallback);
    assert_eq!(sheet.anchor.token(), "{@prop_钥匙}");
    assert_eq!(
        sheet.views["main"].prompt,
        "old brass key, studio shot, Kurosawa style, epic composition"
    );
    assert_eq!(sheet.views["main"].negative, prop_negative(designer.style()));
    assert_eq!(sheet.materials, vec!["brass".to_string()]);
}

#[tokio::test]
async fn generated_extraction_is_used() {
    let generator = ScriptedGenerator::new(vec![
        r#"{"scenes": [{"name": "雨夜码头", "atmosphere": "阴冷", "timeOfDay": "夜晚"}], "props": [{"name": "铜钥匙", "type": "钥匙"}]}"#
            .to_string(),
    ]);
    let designer = AssetDesigner::new(generator, AssetConfig::default());

    let extraction = designer.extract(&bible()).await;

    assert_eq!(extraction.scenes.len(), 1);
    assert_eq!(extraction.scenes[0].id, "S01");
    assert_eq!(extraction.scenes[0].time_of_day.as_deref(), Some("夜晚"));
    assert_eq!(extraction.props[0].name, "铜钥匙");
    assert_eq!(extraction.props[0].kind, "钥匙");
}

#[tokio::test]
async fn empty_extraction_uses_keywords() {
    let generator = ScriptedGenerator::new(vec![r#"{"scenes": [], "props": []}"#.to_string()]);
    let designer = AssetDesigner::new(generator, AssetConfig::default());

    let extraction = designer.extract(&bible()).await;

    let scenes: Vec<&str> = extraction.scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(scenes, vec!["海边/港口", "宴会厅"]);
    let props: Vec<&str> = extraction.props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(props, vec!["钥匙", "信件", "放大镜"]);
}

#[tokio::test]
async fn offline_design_covers_every_anchor() {
    let config = AssetConfig::default().with_use_llm(false);
    let designer = AssetDesigner::new(OfflineGenerator, config);

    let assets = designer.design(&bible()).await;

    assert_eq!(assets.characters.len(), 2);
    assert_eq!(assets.scenes.len(), 2);
    assert_eq!(assets.props.len(), 3);
    assert_eq!(assets.fallback_count(), 7);
    let tokens: Vec<String> = assets.anchors().iter().map(|a| a.token().clone()).collect();
    assert_eq!(tokens.len(), 7);
    assert!(tokens.contains(&"{@char_Zhao}".to_string()));
    assert!(tokens.contains(&"{@loc_宴会厅}".to_string()));
}

#[tokio::test]
async fn generated_sheets_mix_with_fallbacks() {
    // Lin and the extraction succeed; Zhao and every sheet after fail.
    let generator = ScriptedGenerator::new(vec![
        CHARACTER_REPLY.to_string(),
        "no sheet".to_string(),
        r#"{"scenes": [{"name": "码头"}], "props": [{"name": "钥匙"}]}"#.to_string(),
    ]);
    let designer = AssetDesigner::new(generator.clone(), AssetConfig::default());

    let assets = designer.design(&bible()).await;

    assert_eq!(generator.call_count(), 5);
    assert!(!assets.characters[0].fallback);
    assert!(assets.characters[1].fallback);
    assert_eq!(assets.scenes[0].scene_name, "码头");
    assert!(assets.scenes[0].fallback);
    assert!(assets.props[0].fallback);
    assert_eq!(assets.fallback_count(), 3);
}
