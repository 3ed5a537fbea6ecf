//! Reference-sheet prompts for Reelsmith.
//!
//! Before a storyboard is rendered, every recurring character, location and
//! prop gets a sheet of image prompts so that the generated clips agree on
//! what they look like:
//!
//! - [`extract_props`] and [`extract_locations`] find sheet-worthy props and places by keyword.
//! - [`character_template`], [`prop_template`] and [`scene_template`] build sheets without a generator.
//! - [`turnaround`] and [`expression_sheet`] give four-angle and six-expression views of a character.
//! - [`AssetDesigner`] asks a text generator for each sheet and falls back to its template.
//!
//! Every sheet carries the same anchor token the storyboard uses, so a
//! renderer can bind `{@char_Lin}` in a clip prompt to Lin's sheet.
//!
//! # Example
//!
//! ```
//! use reelsmith_assets::{AssetConfig, AssetDesigner};
//! use reelsmith_core::{Character, Role, StoryBible};
//! use reelsmith_interface::OfflineGenerator;
//!
//! let bible = StoryBible {
//!     characters: vec![Character::new("C01", "Lin", Role::Protagonist)],
//!     ..Default::default()
//! };
//! let designer = AssetDesigner::new(OfflineGenerator, AssetConfig::default().with_use_llm(false));
//! let assets = tokio::runtime::Builder::new_current_thread()
//!     .build()
//!     .unwrap()
//!     .block_on(designer.design(&bible));
//!
//! assert_eq!(assets.characters[0].anchor.token(), "{@char_Lin}");
//! assert_eq!(assets.scenes[0].scene_name, "主场景");
//! assert_eq!(assets.props.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod designer;
mod extract;
mod prompt;
mod sheet;

pub use config::{AssetConfig, AssetConfigBuilder};
pub use designer::AssetDesigner;
pub use extract::{Extraction, PropSpec, SceneSpec, extract_locations, extract_props};
pub use prompt::{character_prompt, extraction_prompt, prop_prompt, scene_prompt};
pub use sheet::{
    archetype_traits, asset_negative, character_base, character_negative, character_template,
    expression_sheet, prop_negative, prop_template, scene_negative, scene_template,
    sheet_negative, time_lighting, turnaround,
};
