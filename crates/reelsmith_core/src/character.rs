//! Characters, narrative roles, and archetypes.

use crate::BeatType;
use serde::{Deserialize, Serialize};

/// Narrative role of a character.
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
#[serde(rename_all = "snake_case", from = "String")]
pub enum Role {
    /// Main character
    #[display("protagonist")]
    Protagonist,
    /// Main opposing force
    #[display("antagonist")]
    Antagonist,
    /// Supports the protagonist
    #[display("ally")]
    Ally,
    /// Everyone else
    #[default]
    #[display("supporting")]
    Supporting,
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "protagonist" | "主角" => Role::Protagonist,
            "antagonist" | "反派" => Role::Antagonist,
            "ally" | "盟友" => Role::Ally,
            _ => Role::Supporting,
        }
    }
}

/// Closed set of character archetypes.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Archetype, Role};
///
/// let archetype = Archetype::infer(Role::Protagonist, &["神秘".to_string()], "", "");
/// assert_eq!(archetype, Archetype::HiddenIdentity);
/// assert_eq!(Archetype::infer(Role::Antagonist, &[], "", ""), Archetype::Oppressor);
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
pub enum Archetype {
    /// Rises from the bottom
    #[display("underdog")]
    Underdog,
    /// Conceals a true identity or power
    #[display("hidden_identity")]
    HiddenIdentity,
    /// Morally ambiguous
    #[display("gray")]
    Gray,
    /// Villain or obstacle
    #[display("oppressor")]
    Oppressor,
    /// Unpredictable disruptor
    #[display("wildcard")]
    Wildcard,
    /// Partner or mentor
    #[display("ally")]
    Ally,
}

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl Archetype {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Underdog => "逆袭型",
            Archetype::HiddenIdentity => "隐身份型",
            Archetype::Gray => "灰度型",
            Archetype::Oppressor => "压迫者",
            Archetype::Wildcard => "搅局者",
            Archetype::Ally => "盟友",
        }
    }

    /// Typical arc, stage by stage.
    pub fn arc_pattern(&self) -> &'static str {
        match self {
            Archetype::Underdog => "低谷→觉醒→磨砺→爆发→巅峰",
            Archetype::HiddenIdentity => "隐忍→暗示→危机→揭示→蜕变",
            Archetype::Gray => "灰色→挣扎→选择→代价→救赎/堕落",
            Archetype::Oppressor => "威胁→施压→得意→受挫→败落/反击",
            Archetype::Wildcard => "出现→搅局→混乱→选择→影响",
            Archetype::Ally => "相遇→信任→并肩→考验→深化/牺牲",
        }
    }

    /// Beats this archetype tends to deliver.
    pub fn beat_potential(&self) -> &'static [BeatType] {
        match self {
            Archetype::Underdog => &[BeatType::Slap, BeatType::Revenge, BeatType::Upgrade],
            Archetype::HiddenIdentity => &[BeatType::Identity, BeatType::Slap, BeatType::Revenge],
            Archetype::Gray => &[BeatType::Comeback, BeatType::Emotion, BeatType::Info],
            Archetype::Oppressor => &[BeatType::Revenge, BeatType::Slap, BeatType::Upgrade],
            Archetype::Wildcard => &[BeatType::Info, BeatType::Emotion, BeatType::Comeback],
            Archetype::Ally => &[BeatType::Emotion, BeatType::Upgrade, BeatType::Revenge],
        }
    }

    /// Infer an archetype from role, traits, desires and fears.
    pub fn infer(role: Role, traits: &[String], desires: &str, fears: &str) -> Archetype {
        let text = format!("{} {} {}", traits.join(" "), desires, fears).to_lowercase();
        match role {
            Role::Protagonist => {
                if matches_any(&text, &["逆袭", "弱", "废", "底层", "崛起", "成长", "underdog"]) {
                    Archetype::Underdog
                } else if matches_any(
                    &text,
                    &["隐藏", "神秘", "双重", "秘密", "身份", "伪装", "hidden", "secret"],
                ) {
                    Archetype::HiddenIdentity
                } else if matches_any(&text, &["灰色", "矛盾", "复杂", "道德", "挣扎", "conflicted"])
                {
                    Archetype::Gray
                } else {
                    Archetype::Underdog
                }
            }
            Role::Antagonist => Archetype::Oppressor,
            Role::Ally | Role::Supporting => {
                if matches_any(&text, &["不可预测", "任性", "神秘", "捣乱", "unpredictable"]) {
                    Archetype::Wildcard
                } else {
                    Archetype::Ally
                }
            }
        }
    }
}

impl std::str::FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "underdog" | "逆袭型" => Ok(Archetype::Underdog),
            "hidden_identity" | "隐身份型" => Ok(Archetype::HiddenIdentity),
            "gray" | "grey" | "灰度型" => Ok(Archetype::Gray),
            "oppressor" | "压迫者" => Ok(Archetype::Oppressor),
            "wildcard" | "搅局者" => Ok(Archetype::Wildcard),
            "ally" | "盟友" => Ok(Archetype::Ally),
            other => Err(format!("Unknown archetype: {}", other)),
        }
    }
}

fn lenient_archetype<'de, D>(deserializer: D) -> Result<Option<Archetype>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// How a character looks on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterLook {
    /// Face, build and age
    #[serde(default)]
    pub appearance: String,
    /// Usual clothing
    #[serde(default)]
    pub clothing: String,
    /// Features that make the character recognizable
    #[serde(default)]
    pub distinctive: String,
}

/// A story character.
///
/// The archetype is inferred once and cached; [`Character::ensure_archetype`]
/// never overwrites an assigned value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct Character {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Narrative role
    #[serde(default)]
    pub role: Role,
    /// Cached archetype
    #[serde(default, deserialize_with = "lenient_archetype")]
    pub archetype: Option<Archetype>,
    /// Personality traits
    #[serde(default)]
    pub traits: Vec<String>,
    /// Core desire
    #[serde(default)]
    pub desires: String,
    /// Core fear
    #[serde(default)]
    pub fears: String,
    /// On-screen look, when the extraction described one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_description: Option<CharacterLook>,
}

impl Character {
    /// Create a character with no traits.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            archetype: None,
            traits: Vec::new(),
            desires: String::new(),
            fears: String::new(),
            visual_description: None,
        }
    }

    /// Return the cached archetype, inferring and caching it on first use.
    pub fn ensure_archetype(&mut self) -> Archetype {
        match self.archetype {
            Some(archetype) => archetype,
            None => self.reinfer_archetype(),
        }
    }

    /// Recompute the archetype from the current traits, replacing any cached value.
    pub fn reinfer_archetype(&mut self) -> Archetype {
        let archetype = Archetype::infer(self.role, &self.traits, &self.desires, &self.fears);
        self.archetype = Some(archetype);
        archetype
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protagonist_defaults_to_underdog() {
        assert_eq!(Archetype::infer(Role::Protagonist, &[], "", ""), Archetype::Underdog);
    }

    #[test]
    fn supporting_wildcard_on_keywords() {
        let traits = vec!["任性".to_string()];
        assert_eq!(Archetype::infer(Role::Supporting, &traits, "", ""), Archetype::Wildcard);
        assert_eq!(Archetype::infer(Role::Ally, &[], "", ""), Archetype::Ally);
    }

    #[test]
    fn ensure_archetype_is_cached() {
        let mut lin = Character::new("C01", "Lin", Role::Protagonist)
            .with_traits(vec!["神秘".to_string()]);
        assert_eq!(lin.ensure_archetype(), Archetype::HiddenIdentity);

        lin.traits = vec!["底层".to_string()];
        assert_eq!(lin.ensure_archetype(), Archetype::HiddenIdentity);
        assert_eq!(lin.reinfer_archetype(), Archetype::Underdog);
    }

    #[test]
    fn unknown_archetype_label_is_dropped() {
        let c: Character = serde_json::from_str(
            r#"{"id":"C1","name":"Lin","role":"protagonist","archetype":"原型"}"#,
        )
        .unwrap();
        assert_eq!(c.archetype, None);
        assert_eq!(c.role, Role::Protagonist);
    }
}
