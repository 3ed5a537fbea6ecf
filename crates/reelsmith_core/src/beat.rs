//! Beat types: the audience-gratification payoffs an episode is built around.

use serde::{Deserialize, Serialize};

/// Closed set of payoff categories.
///
/// # Examples
///
/// ```
/// use reelsmith_core::BeatType;
///
/// assert_eq!(BeatType::Slap.name(), "打脸");
/// assert_eq!("identity".parse::<BeatType>(), Ok(BeatType::Identity));
/// assert_eq!("身份".parse::<BeatType>(), Ok(BeatType::Identity));
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
pub enum BeatType {
    /// Underestimated, then reveals true strength
    #[display("slap")]
    Slap,
    /// Sudden rise in power, status or wealth
    #[display("upgrade")]
    Upgrade,
    /// Punishment of a past wrongdoer
    #[display("revenge")]
    Revenge,
    /// A hidden identity is revealed
    #[display("identity")]
    Identity,
    /// Key information or truth is revealed
    #[display("info")]
    Info,
    /// Reversal from a hopeless position
    #[display("comeback")]
    Comeback,
    /// Breakthrough in a relationship
    #[display("emotion")]
    Emotion,
}

/// The four-step payoff structure: promise, suppress, elevate, reward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct FourSteps {
    /// Foreshadow the payoff
    promise: String,
    /// Build pressure or let others underestimate
    suppress: String,
    /// The reversal itself
    elevate: String,
    /// Show the consequences
    reward: String,
}

// Keyword matchers in priority order; the first hit wins.
const MATCHERS: &[(BeatType, &[&str])] = &[
    (
        BeatType::Identity,
        &["身份", "揭示", "隐藏", "真实", "大佬", "背景", "identity", "disguise"],
    ),
    (
        BeatType::Revenge,
        &["复仇", "报复", "仇恨", "血债", "讨回", "revenge", "vengeance"],
    ),
    (
        BeatType::Comeback,
        &["反杀", "逆转", "绝境", "翻盘", "底牌", "comeback", "turns the tables"],
    ),
    (
        BeatType::Slap,
        &["打脸", "轻视", "质疑", "嘲讽", "震惊", "humiliat", "mock"],
    ),
    (
        BeatType::Upgrade,
        &["升级", "突破", "实力", "获得", "觉醒", "breakthrough", "awaken"],
    ),
    (
        BeatType::Info,
        &["真相", "秘密", "发现", "得知", "揭示", "secret", "truth", "discover"],
    ),
    (
        BeatType::Emotion,
        &["情感", "爱情", "友情", "守护", "牺牲", "love", "sacrifice"],
    ),
];

impl BeatType {
    /// Stable identifier used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            BeatType::Slap => "slap",
            BeatType::Upgrade => "upgrade",
            BeatType::Revenge => "revenge",
            BeatType::Identity => "identity",
            BeatType::Info => "info",
            BeatType::Comeback => "comeback",
            BeatType::Emotion => "emotion",
        }
    }

    /// Display name used in Chinese prompts.
    pub fn name(&self) -> &'static str {
        match self {
            BeatType::Slap => "打脸",
            BeatType::Upgrade => "升级",
            BeatType::Revenge => "复仇",
            BeatType::Identity => "身份",
            BeatType::Info => "信息",
            BeatType::Comeback => "反杀",
            BeatType::Emotion => "情感",
        }
    }

    /// Payoff intensity on a 0-10 scale.
    pub fn intensity(&self) -> u8 {
        match self {
            BeatType::Identity | BeatType::Comeback => 10,
            BeatType::Slap | BeatType::Revenge => 9,
            BeatType::Upgrade | BeatType::Emotion => 8,
            BeatType::Info => 7,
        }
    }

    /// Four-step template for this beat.
    pub fn four_steps(&self) -> FourSteps {
        let (promise, suppress, elevate, reward) = match self {
            BeatType::Slap => (
                "立承诺：提前暗示主角有隐藏实力或即将展现",
                "先压：让对手/旁观者继续轻视，制造压力",
                "后扬：出其不意展现真正实力",
                "回报：对手震惊、道歉或后悔，观众满足",
            ),
            BeatType::Upgrade => (
                "立承诺：暗示即将有突破或机遇",
                "先压：遇到瓶颈或困难，似乎无法突破",
                "后扬：突破成功，获得新能力或资源",
                "回报：展示新实力带来的改变",
            ),
            BeatType::Revenge => (
                "立承诺：铺垫仇恨，建立复仇动机",
                "先压：敌人得意，主角隐忍",
                "后扬：反击成功，敌人受到惩罚",
                "回报：仇恨得报，心理满足",
            ),
            BeatType::Identity => (
                "立承诺：留下身份相关的暗示或线索",
                "先压：继续隐藏，他人误解加深",
                "后扬：身份揭示，所有人震惊",
                "回报：地位改变，态度反转",
            ),
            BeatType::Info => (
                "立承诺：暗示存在重要信息或秘密",
                "先压：信息获取困难或被误导",
                "后扬：成功获取或揭示真相",
                "回报：局面因此改变",
            ),
            BeatType::Comeback => (
                "立承诺：铺垫主角的隐藏底牌或计划",
                "先压：绝境，似乎必败",
                "后扬：底牌揭示，形势逆转",
                "回报：反败为胜，敌人震惊",
            ),
            BeatType::Emotion => (
                "立承诺：铺垫情感线索或张力",
                "先压：情感障碍或误会",
                "后扬：情感突破或确认",
                "回报：关系升华，观众共情",
            ),
        };
        FourSteps {
            promise: promise.to_string(),
            suppress: suppress.to_string(),
            elevate: elevate.to_string(),
            reward: reward.to_string(),
        }
    }

    /// Identify the beat an event summary most likely carries.
    ///
    /// Matchers run in a fixed priority order and the first hit wins.
    pub fn identify(summary: &str, keywords: &[String]) -> Option<BeatType> {
        let text = format!("{} {}", summary, keywords.join(" ")).to_lowercase();
        MATCHERS
            .iter()
            .find(|(_, words)| words.iter().any(|w| text.contains(w)))
            .map(|(beat, _)| *beat)
    }
}

impl std::str::FromStr for BeatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slap" | "打脸" => Ok(BeatType::Slap),
            "upgrade" | "升级" => Ok(BeatType::Upgrade),
            "revenge" | "复仇" => Ok(BeatType::Revenge),
            "identity" | "身份" => Ok(BeatType::Identity),
            "info" | "信息" => Ok(BeatType::Info),
            "comeback" | "反杀" => Ok(BeatType::Comeback),
            "emotion" | "情感" => Ok(BeatType::Emotion),
            other => Err(format!("Unknown beat type: {}", other)),
        }
    }
}

/// Deserialize a list of beat labels, dropping any that are not in the closed set.
pub(crate) fn lenient_beats<'de, D>(deserializer: D) -> Result<Vec<BeatType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn identify_prefers_identity_over_info() {
        // "揭示" appears in both identity and info matchers
        let beat = BeatType::identify("身份揭示", &[]);
        assert_eq!(beat, Some(BeatType::Identity));
        let beat = BeatType::identify("得知真相", &[]);
        assert_eq!(beat, Some(BeatType::Info));
    }

    #[test]
    fn identify_uses_keywords() {
        let beat = BeatType::identify("a quiet evening", &["复仇".to_string()]);
        assert_eq!(beat, Some(BeatType::Revenge));
        assert_eq!(BeatType::identify("a quiet evening", &[]), None);
    }

    #[test]
    fn as_str_round_trips_through_from_str() {
        for beat in BeatType::iter() {
            assert_eq!(beat.as_str().parse::<BeatType>(), Ok(beat));
            assert_eq!(beat.name().parse::<BeatType>(), Ok(beat));
            assert_eq!(beat.to_string(), beat.as_str());
        }
    }

    #[test]
    fn lenient_beats_drop_unknown_labels() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "lenient_beats")]
            beats: Vec<BeatType>,
        }
        let holder: Holder =
            serde_json::from_str(r#"{"beats":["slap","twist","身份"]}"#).unwrap();
        assert_eq!(holder.beats, vec![BeatType::Slap, BeatType::Identity]);
    }
}
