//! Anchors: stable placeholder tokens for recurring characters, locations and props.

use serde::{Deserialize, Serialize};

/// What an anchor stands for.
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
pub enum AnchorKind {
    /// A character
    #[display("char")]
    Char,
    /// A location
    #[display("loc")]
    Loc,
    /// A prop
    #[display("prop")]
    Prop,
}

/// A named entity with a token that stays identical across every clip of an episode.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Anchor, AnchorKind};
///
/// let lin = Anchor::new(AnchorKind::Char, "Lin");
/// assert_eq!(lin.token(), "{@char_Lin}");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct Anchor {
    /// Entity kind
    #[serde(rename = "type")]
    kind: AnchorKind,
    /// Entity name as written in the script
    name: String,
    /// Placeholder token
    token: String,
}

impl Anchor {
    /// Create an anchor; the token is derived from kind and name.
    pub fn new(kind: AnchorKind, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let token = format!("{{@{}_{}}}", kind, name.replace(char::is_whitespace, "_"));
        Self { kind, name, token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_stable_for_same_name() {
        let a = Anchor::new(AnchorKind::Loc, "Old Temple");
        let b = Anchor::new(AnchorKind::Loc, " Old Temple ");
        assert_eq!(a.token(), b.token());
        assert_eq!(a.token(), "{@loc_Old_Temple}");
    }
}
