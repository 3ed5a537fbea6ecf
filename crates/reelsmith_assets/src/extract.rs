//! Props and locations worth a reference sheet, found in a story bible.

use reelsmith_core::StoryBible;
use serde::{Deserialize, Serialize};

/// A prop to design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropSpec {
    /// Identifier (e.g. `P01`)
    #[serde(default)]
    pub id: String,
    /// Name
    pub name: String,
    /// What it is and where it appears
    #[serde(default)]
    pub description: String,
    /// Kind of object
    #[serde(default, rename = "type")]
    pub kind: String,
    /// How much the story leans on it
    #[serde(default)]
    pub importance: String,
}

/// A location to design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSpec {
    /// Identifier (e.g. `S01`)
    #[serde(default)]
    pub id: String,
    /// Name
    pub name: String,
    /// What it looks like
    #[serde(default)]
    pub description: String,
    /// Mood of the place
    #[serde(default)]
    pub atmosphere: String,
    /// Time of day, when fixed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
}

/// Props and locations of one story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Locations
    #[serde(default)]
    pub scenes: Vec<SceneSpec>,
    /// Props
    #[serde(default)]
    pub props: Vec<PropSpec>,
}

const PROP_KEYWORDS: &[&str] = &[
    "剑", "枪", "刀", "武器", "匕首", "凶器", "手机", "电话", "信件", "信封", "信", "钥匙",
    "汽车", "马车", "车", "日记", "笔记本", "书籍", "书", "戒指", "项链", "手表", "怀表",
    "珠宝", "玉佩", "药瓶", "毒药", "药品", "药", "金币", "钞票", "钱", "照片", "画像",
    "肖像", "蜡烛", "油灯", "台灯", "灯", "镜子", "放大镜", "显微镜", "证据", "文件",
    "合同", "令牌",
];

const DEFAULT_PROPS: &[&str] = &["信件", "钥匙", "放大镜"];

const LOCATION_KEYWORDS: &[(&[&str], &str)] = &[
    (&["图书馆", "书馆", "书房", "藏书"], "图书馆/书房"),
    (&["街道", "马路", "巷", "街头"], "街道"),
    (&["公寓", "房间", "卧室", "起居室"], "公寓/房间"),
    (&["酒吧", "酒馆", "咖啡", "茶馆"], "酒吧/茶馆"),
    (&["办公室", "事务所", "侦探社", "公司"], "办公室/事务所"),
    (&["森林", "树林"], "森林"),
    (&["海边", "海滩", "港口", "码头"], "海边/港口"),
    (&["山顶", "山谷", "山"], "山区"),
    (&["医院", "诊所", "医务室"], "医院/诊所"),
    (&["学校", "大学", "教室", "校园"], "学校/校园"),
    (&["教堂", "寺庙", "神社"], "宗教场所"),
    (&["监狱", "牢房", "拘留所"], "监狱"),
    (&["银行", "金库"], "银行"),
    (&["餐厅", "饭馆", "厨房"], "餐厅/厨房"),
    (&["宴会", "大厅", "礼堂"], "宴会厅"),
    (&["花园", "公园", "庭院"], "花园/公园"),
    (&["地下室", "阁楼", "屋顶"], "地下室/阁楼"),
    (&["尸体", "凶案", "现场", "命案"], "案发现场"),
    (&["宫", "殿", "府"], "宫殿/府邸"),
];

const TONE_LOCATIONS: &[(&str, &str)] = &[
    ("古典", "古典建筑"),
    ("哥特", "哥特式建筑"),
    ("恐怖", "阴暗场景"),
    ("悬疑", "神秘场所"),
];

const DEFAULT_ATMOSPHERE: &str = "悬疑";

fn excerpt(text: &str) -> String {
    text.chars().take(80).collect()
}

fn numbered(prefix: char, n: usize) -> String {
    format!("{}{:02}", prefix, n)
}

fn add(props: &mut Vec<PropSpec>, name: &str, description: String, importance: &str) {
    // A shorter keyword ("信") is covered once a longer one ("信件") is found.
    if props.iter().any(|p| p.name.contains(name)) {
        return;
    }
    props.push(PropSpec {
        id: numbered('P', props.len() + 1),
        name: name.to_string(),
        description,
        kind: "道具".to_string(),
        importance: importance.to_string(),
    });
}

/// Props named in event summaries, then in character traits.
///
/// Padded with generic props up to `min` and cut to `max`.
///
/// # Examples
///
/// ```
/// use reelsmith_assets::extract_props;
/// use reelsmith_core::{Event, EventType, StoryBible};
///
/// let bible = StoryBible {
///     events: vec![Event::new("E01", "林默捡起一封信件和一把钥匙", EventType::LoadBearing)],
///     ..Default::default()
/// };
/// let props = extract_props(&bible, 3, 8);
/// let names: Vec<&str> = props.iter().map(|p| p.name.as_str()).collect();
/// assert_eq!(names, vec!["信件", "钥匙", "放大镜"]);
/// assert_eq!(props[2].id, "P03");
/// ```
pub fn extract_props(bible: &StoryBible, min: usize, max: usize) -> Vec<PropSpec> {
    let mut props: Vec<PropSpec> = Vec::new();

    for event in &bible.events {
        for keyword in PROP_KEYWORDS.iter().filter(|k| event.summary.contains(**k)) {
            add(
                &mut props,
                keyword,
                format!("来自事件: {}", excerpt(&event.summary)),
                "普通",
            );
        }
    }
    for character in &bible.characters {
        let mut text = character.traits.join(" ");
        if let Some(look) = &character.visual_description {
            text = format!("{} {} {}", text, look.clothing, look.distinctive);
        }
        for keyword in PROP_KEYWORDS.iter().filter(|k| text.contains(**k)) {
            add(
                &mut props,
                keyword,
                format!("{} 相关道具", character.name),
                "重要",
            );
        }
    }
    for name in DEFAULT_PROPS {
        if props.len() >= min {
            break;
        }
        add(&mut props, name, "故事相关道具".to_string(), "普通");
    }

    props.truncate(max);
    tracing::debug!(props = props.len(), "Props extracted by keyword");
    props
}

/// Locations named in event summaries, then implied by tone keywords.
///
/// At most one location is taken from each event. A bible with no location
/// at all gets a single main scene.
///
/// # Examples
///
/// ```
/// use reelsmith_assets::extract_locations;
/// use reelsmith_core::{Event, EventType, StoryBible};
///
/// let bible = StoryBible {
///     events: vec![
///         Event::new("E01", "林默在宴会大厅被羞辱", EventType::LoadBearing),
///         Event::new("E02", "深夜的街头，他独自离开", EventType::Reinforcing),
///     ],
///     tone_keywords: vec!["悬疑".to_string()],
///     ..Default::default()
/// };
/// let names: Vec<String> = extract_locations(&bible, 6).into_iter().map(|s| s.name).collect();
/// assert_eq!(names, vec!["宴会厅", "街道", "神秘场所"]);
/// ```
pub fn extract_locations(bible: &StoryBible, max: usize) -> Vec<SceneSpec> {
    let mut scenes: Vec<SceneSpec> = Vec::new();

    for event in &bible.events {
        let found = LOCATION_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| event.summary.contains(k)));
        if let Some((_, name)) = found {
            if scenes.iter().all(|s| s.name != *name) {
                scenes.push(SceneSpec {
                    id: numbered('S', scenes.len() + 1),
                    name: name.to_string(),
                    description: format!("来自事件: {}", excerpt(&event.summary)),
                    atmosphere: DEFAULT_ATMOSPHERE.to_string(),
                    time_of_day: None,
                });
            }
        }
    }

    for tone in &bible.tone_keywords {
        let implied = TONE_LOCATIONS
            .iter()
            .find(|(keyword, _)| tone.contains(keyword));
        if let Some((_, name)) = implied {
            if scenes.iter().all(|s| s.name != *name) {
                scenes.push(SceneSpec {
                    id: numbered('S', scenes.len() + 1),
                    name: name.to_string(),
                    description: format!("基于故事氛围: {}", tone),
                    atmosphere: tone.clone(),
                    time_of_day: None,
                });
            }
        }
    }

    if scenes.is_empty() {
        scenes.push(SceneSpec {
            id: numbered('S', 1),
            name: "主场景".to_string(),
            description: if bible.title.trim().is_empty() {
                "故事主场景".to_string()
            } else {
                bible.title.clone()
            },
            atmosphere: DEFAULT_ATMOSPHERE.to_string(),
            time_of_day: None,
        });
    }

    scenes.truncate(max);
    tracing::debug!(scenes = scenes.len(), "Locations extracted by keyword");
    scenes
}

impl Extraction {
    /// Give every entry an id and drop nameless ones.
    pub(crate) fn normalize(mut self, max_scenes: usize, max_props: usize) -> Self {
        self.scenes.retain(|s| !s.name.trim().is_empty());
        self.props.retain(|p| !p.name.trim().is_empty());
        self.scenes.truncate(max_scenes);
        self.props.truncate(max_props);
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            if scene.id.trim().is_empty() {
                scene.id = numbered('S', i + 1);
            }
        }
        for (i, prop) in self.props.iter_mut().enumerate() {
            if prop.id.trim().is_empty() {
                prop.id = numbered('P', i + 1);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::{Character, CharacterLook, Event, EventType, Role};

    #[test]
    fn character_traits_contribute_important_props() {
        let bible = StoryBible {
            characters: vec![Character::new("C01", "林默", Role::Protagonist)
                .with_visual_description(Some(CharacterLook {
                    distinctive: "腰间挂着玉佩".to_string(),
                    ..Default::default()
                }))],
            ..Default::default()
        };
        let props = extract_props(&bible, 0, 8);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "玉佩");
        assert_eq!(props[0].importance, "重要");
        assert_eq!(props[0].description, "林默 相关道具");
    }

    #[test]
    fn props_are_capped() {
        let bible = StoryBible {
            events: vec![Event::new(
                "E01",
                "剑、枪、刀、匕首、手机、钥匙、戒指、项链、手表、照片",
                EventType::Decorative,
            )],
            ..Default::default()
        };
        assert_eq!(extract_props(&bible, 3, 8).len(), 8);
    }

    #[test]
    fn one_location_per_event() {
        let bible = StoryBible {
            events: vec![Event::new("E01", "街头的酒吧里", EventType::Decorative)],
            ..Default::default()
        };
        let scenes = extract_locations(&bible, 6);
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].name, "街道");
    }

    #[test]
    fn empty_bible_gets_main_scene() {
        let bible = StoryBible {
            title: "雨夜".to_string(),
            ..Default::default()
        };
        let scenes = extract_locations(&bible, 6);
        assert_eq!(scenes[0].name, "主场景");
        assert_eq!(scenes[0].description, "雨夜");
    }

    #[test]
    fn normalize_fills_ids() {
        let extraction: Extraction = serde_json::from_str(
            r#"{"scenes": [{"name": "码头"}, {"name": ""}], "props": [{"id": "P07", "name": "刀"}]}"#,
        )
        .unwrap();
        let extraction = extraction.normalize(6, 8);
        assert_eq!(extraction.scenes.len(), 1);
        assert_eq!(extraction.scenes[0].id, "S01");
        assert_eq!(extraction.props[0].id, "P07");
    }
}
