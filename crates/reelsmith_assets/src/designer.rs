//! Asset sheet generation with per-sheet template fallback.

use crate::{
    AssetConfig, Extraction, PropSpec, SceneSpec, character_negative, character_template,
    expression_sheet, extract_locations, extract_props, prompt, prop_negative, prop_template,
    scene_negative, scene_template, turnaround,
};
use reelsmith_core::{
    Anchor, AnchorKind, AssetSet, AssetView, Character, CharacterAsset, ColorPalette,
    GenerateRequest, PropAsset, SceneAsset, StoryBible, StyleConfig,
};
use reelsmith_error::{AssetError, AssetErrorKind, BuilderError, ReelsmithResult};
use reelsmith_interface::TextGenerator;
use reelsmith_repair::TolerantParser;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

// Generated negatives shorter than this are replaced by the full list.
const MIN_NEGATIVE_LEN: usize = 50;

const PROP_MODIFIERS: usize = 2;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterDraft {
    #[serde(default)]
    base_prompt: String,
    #[serde(default)]
    variations: BTreeMap<String, AssetView>,
    #[serde(default)]
    color_palette: Option<ColorPalette>,
    #[serde(default)]
    key_features: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropDraft {
    #[serde(default)]
    base_prompt: String,
    #[serde(default)]
    views: BTreeMap<String, AssetView>,
    #[serde(default)]
    materials: Vec<String>,
    #[serde(default)]
    colors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneDraft {
    #[serde(default)]
    base_prompt: String,
    #[serde(default)]
    variations: BTreeMap<String, AssetView>,
    #[serde(default)]
    lighting: String,
    #[serde(default)]
    mood: String,
}

/// Views that carry a prompt; an error when none does.
fn usable_views(
    name: &str,
    mut views: BTreeMap<String, AssetView>,
) -> ReelsmithResult<BTreeMap<String, AssetView>> {
    views.retain(|_, view| !view.prompt.trim().is_empty());
    if views.is_empty() {
        return Err(AssetError::new(AssetErrorKind::EmptySheet(name.to_string())).into());
    }
    Ok(views)
}

/// Produces reference sheets for the characters, props and locations of a story.
///
/// Every sheet is requested separately; a failed request or unusable reply
/// replaces that one sheet by its template version, marked `fallback: true`.
/// Turnaround and expression sheets are always composed from templates so
/// that every view describes the same design.
pub struct AssetDesigner<G> {
    generator: G,
    parser: TolerantParser,
    config: AssetConfig,
    style: StyleConfig,
}

impl<G: TextGenerator> AssetDesigner<G> {
    /// Designer with the given generator and configuration.
    pub fn new(generator: G, config: AssetConfig) -> Self {
        Self {
            generator,
            parser: TolerantParser::default(),
            style: config.style_preset().config(),
            config,
        }
    }

    /// Replace the reply parser.
    pub fn with_parser(mut self, parser: TolerantParser) -> Self {
        self.parser = parser;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// Active style.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    async fn ask<T: DeserializeOwned>(
        &self,
        scope: &str,
        text: String,
        max_tokens: u32,
        temperature: f32,
    ) -> ReelsmithResult<T> {
        let request = GenerateRequest::builder()
            .prompt(text)
            .max_tokens(Some(max_tokens))
            .temperature(Some(temperature))
            .build()
            .map_err(|e| BuilderError::new(e.to_string()))?;
        let response = self.generator.generate(&request).await.inspect_err(|e| {
            tracing::error!(scope, error = %e, "Asset request failed");
        })?;
        self.parser.parse_as(&response.text())
    }

    /// Locations and props worth a sheet.
    ///
    /// The generator's list is used when it names anything; an empty or
    /// failed category is filled by keyword extraction.
    #[tracing::instrument(skip_all, fields(events = bible.events.len()))]
    pub async fn extract(&self, bible: &StoryBible) -> Extraction {
        let mut extraction = Extraction::default();
        if *self.config.use_llm() {
            let reply: ReelsmithResult<Extraction> = self
                .ask(
                    "extraction",
                    prompt::extraction_prompt(bible),
                    *self.config.max_tokens(),
                    *self.config.extraction_temperature(),
                )
                .await;
            match reply {
                Ok(found) => {
                    extraction = found.normalize(*self.config.max_scenes(), *self.config.max_props())
                }
                Err(e) => tracing::warn!(error = %e, "Asset extraction failed, using keywords"),
            }
        }

        if extraction.scenes.is_empty() {
            extraction.scenes = extract_locations(bible, *self.config.max_scenes());
        }
        if extraction.props.is_empty() {
            extraction.props =
                extract_props(bible, *self.config.min_props(), *self.config.max_props());
        }
        tracing::info!(
            scenes = extraction.scenes.len(),
            props = extraction.props.len(),
            "Assets extracted"
        );
        extraction
    }

    /// Design sheet of one character.
    #[tracing::instrument(skip_all, fields(character = %character.name))]
    pub async fn character_sheet(&self, character: &Character) -> CharacterAsset {
        if *self.config.use_llm() {
            match self.generated_character(character).await {
                Ok(sheet) => return sheet,
                Err(e) => tracing::warn!(error = %e, "Character sheet generation failed, using template"),
            }
        }
        character_template(character, &self.style)
    }

    async fn generated_character(&self, character: &Character) -> ReelsmithResult<CharacterAsset> {
        let text = prompt::character_prompt(character, &self.style)?;
        let draft: CharacterDraft = self
            .ask(
                &character.name,
                text,
                *self.config.character_max_tokens(),
                *self.config.temperature(),
            )
            .await?;

        let negative = character_negative(&self.style);
        let mut variations = usable_views(&character.name, draft.variations)?;
        for view in variations.values_mut() {
            if view.negative.trim().len() < MIN_NEGATIVE_LEN {
                view.negative = negative.clone();
            }
        }
        let base_prompt = if draft.base_prompt.trim().is_empty() {
            crate::character_base(character)
        } else {
            draft.base_prompt
        };

        Ok(CharacterAsset {
            character_id: character.id.clone(),
            character_name: character.name.clone(),
            anchor: Anchor::new(AnchorKind::Char, &character.name),
            base_prompt,
            variations,
            color_palette: draft.color_palette,
            key_features: if draft.key_features.is_empty() {
                character.traits.clone()
            } else {
                draft.key_features
            },
            turnaround: turnaround(character, &self.style),
            expressions: expression_sheet(character, &self.style),
            fallback: false,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Design sheet of one prop.
    #[tracing::instrument(skip_all, fields(prop = %prop.name))]
    pub async fn prop_sheet(&self, prop: &PropSpec) -> PropAsset {
        if *self.config.use_llm() {
            match self.generated_prop(prop).await {
                Ok(sheet) => return sheet,
                Err(e) => tracing::warn!(error = %e, "Prop sheet generation failed, using template"),
            }
        }
        prop_template(prop, &self.style)
    }

    async fn generated_prop(&self, prop: &PropSpec) -> ReelsmithResult<PropAsset> {
        let draft: PropDraft = self
            .ask(
                &prop.name,
                prompt::prop_prompt(prop, &self.style),
                *self.config.max_tokens(),
                *self.config.temperature(),
            )
            .await?;

        let modifiers = self
            .style
            .prompt_modifiers()
            .iter()
            .take(PROP_MODIFIERS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let negative = prop_negative(&self.style);
        let mut views = usable_views(&prop.name, draft.views)?;
        for view in views.values_mut() {
            if !modifiers.is_empty() {
                view.prompt = format!("{}, {}", view.prompt.trim(), modifiers);
            }
            if view.negative.trim().is_empty() {
                view.negative = negative.clone();
            }
        }

        Ok(PropAsset {
            prop_id: prop.id.clone(),
            prop_name: prop.name.clone(),
            anchor: Anchor::new(AnchorKind::Prop, &prop.name),
            base_prompt: draft.base_prompt,
            views,
            materials: draft.materials,
            colors: draft.colors,
            fallback: false,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Reference sheet of one location.
    #[tracing::instrument(skip_all, fields(scene = %scene.name))]
    pub async fn scene_sheet(&self, scene: &SceneSpec) -> SceneAsset {
        if *self.config.use_llm() {
            match self.generated_scene(scene).await {
                Ok(sheet) => return sheet,
                Err(e) => tracing::warn!(error = %e, "Scene sheet generation failed, using template"),
            }
        }
        scene_template(scene, &self.style)
    }

    async fn generated_scene(&self, scene: &SceneSpec) -> ReelsmithResult<SceneAsset> {
        let draft: SceneDraft = self
            .ask(
                &scene.name,
                prompt::scene_prompt(scene, &self.style),
                *self.config.max_tokens(),
                *self.config.temperature(),
            )
            .await?;

        let negative = scene_negative(&self.style);
        let mut variations = usable_views(&scene.name, draft.variations)?;
        for view in variations.values_mut() {
            if view.negative.trim().is_empty() {
                view.negative = negative.clone();
            }
        }

        Ok(SceneAsset {
            scene_id: scene.id.clone(),
            scene_name: scene.name.clone(),
            anchor: Anchor::new(AnchorKind::Loc, &scene.name),
            base_prompt: draft.base_prompt,
            variations,
            lighting: draft.lighting,
            mood: if draft.mood.trim().is_empty() {
                scene.atmosphere.clone()
            } else {
                draft.mood
            },
            fallback: false,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Every sheet of a story: characters first, then locations, then props.
    #[tracing::instrument(
        skip_all,
        fields(characters = bible.characters.len(), style = %self.style.name())
    )]
    pub async fn design(&self, bible: &StoryBible) -> AssetSet {
        let mut characters = Vec::with_capacity(bible.characters.len());
        for character in &bible.characters {
            characters.push(self.character_sheet(character).await);
        }

        let extraction = self.extract(bible).await;
        let mut scenes = Vec::with_capacity(extraction.scenes.len());
        for scene in &extraction.scenes {
            scenes.push(self.scene_sheet(scene).await);
        }
        let mut props = Vec::with_capacity(extraction.props.len());
        for prop in &extraction.props {
            props.push(self.prop_sheet(prop).await);
        }

        let assets = AssetSet {
            style_preset: *self.config.style_preset(),
            characters,
            props,
            scenes,
            generated_at: chrono::Utc::now(),
        };
        tracing::info!(
            sheets = assets.anchors().len(),
            fallbacks = assets.fallback_count(),
            "Asset sheets ready"
        );
        assets
    }
}
