//! Prompt builders for asset requests.

use crate::{PropSpec, SceneSpec};
use reelsmith_core::{Character, StoryBible, StyleConfig};
use reelsmith_error::{JsonError, ReelsmithResult};

const EVENTS_IN_EXTRACTION: usize = 20;
const CHARACTERS_IN_EXTRACTION: usize = 5;

fn style_line(style: &StyleConfig, modifiers: usize) -> String {
    format!(
        "{}: {}",
        style.preset().display_name(),
        style
            .prompt_modifiers()
            .iter()
            .take(modifiers)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn or_default<'a>(text: &'a str, default: &'a str) -> &'a str {
    if text.trim().is_empty() { default } else { text }
}

/// Prompt asking which locations and props of a story deserve a sheet.
pub fn extraction_prompt(bible: &StoryBible) -> String {
    let events = bible
        .events
        .iter()
        .take(EVENTS_IN_EXTRACTION)
        .map(|e| format!("- {}: {}", e.id, e.summary))
        .collect::<Vec<_>>()
        .join("\n");
    let characters = bible
        .characters
        .iter()
        .take(CHARACTERS_IN_EXTRACTION)
        .map(|c| {
            let traits: Vec<&str> = c.traits.iter().take(3).map(String::as_str).collect();
            format!("- {}: {}", c.name, traits.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"你是一个专业的资产提取助手。请从以下故事信息中提取出重要的场景和道具。

## 故事标题
{title}

## 故事主题
{theme}

## 故事氛围
{tone}

## 主要角色
{characters}

## 主要事件
{events}

## 任务
1. **场景**: 故事中出现的地点、场所、环境。提取3-6个最重要的场景。
2. **道具**: 故事中重要的物品、器具、证据等。提取3-8个最重要的道具。

## 输出格式（纯JSON，无代码块）
{{
  "scenes": [
    {{ "name": "场景名称", "description": "场景描述", "atmosphere": "氛围", "timeOfDay": "早晨/中午/傍晚/夜晚" }}
  ],
  "props": [
    {{ "name": "道具名称", "description": "道具描述", "type": "道具类型", "importance": "高/中/低" }}
  ]
}}

只提取故事中明确提及或暗示的内容，不要凭空创造。"#,
        title = or_default(&bible.title, "未命名"),
        theme = bible.main_theme,
        tone = bible.tone_keywords.join(", "),
        characters = characters,
        events = events,
    )
}

/// Prompt asking for the design sheet of one character.
pub fn character_prompt(character: &Character, style: &StyleConfig) -> ReelsmithResult<String> {
    let json = serde_json::to_string_pretty(character)
        .map_err(|e| JsonError::new(format!("Failed to serialize character: {}", e)))?;
    Ok(format!(
        r#"为以下角色生成设定图提示词：

## 角色信息
```json
{json}
```

## 风格要求
{style}

## 输出要求
只返回 JSON，提示词用英文：
{{
  "basePrompt": "基础角色描述",
  "variations": {{
    "portrait": {{ "description": "肖像特写", "prompt": "完整提示词", "negative": "Negative Prompt" }},
    "fullBody": {{ "description": "全身立绘", "prompt": "完整提示词", "negative": "Negative Prompt" }},
    "action": {{ "description": "动态姿势", "prompt": "完整提示词", "negative": "Negative Prompt" }},
    "expression": {{ "description": "表情集", "prompt": "完整提示词", "negative": "Negative Prompt" }}
  }},
  "colorPalette": {{ "primary": "主色", "secondary": "辅色", "accent": "强调色" }},
  "keyFeatures": ["关键特征1", "关键特征2"]
}}"#,
        json = json,
        style = style_line(style, 5),
    ))
}

/// Prompt asking for the design sheet of one prop.
pub fn prop_prompt(prop: &PropSpec, style: &StyleConfig) -> String {
    format!(
        r#"为以下道具生成设定图提示词：

## 道具信息
名称: {name}
描述: {description}
类型: {kind}
重要性: {importance}

## 风格要求
{style}

## 输出要求
只返回 JSON，提示词用英文：
{{
  "basePrompt": "基础道具描述",
  "views": {{
    "main": {{ "prompt": "主视角提示词", "negative": "Negative" }},
    "detail": {{ "prompt": "细节特写提示词", "negative": "Negative" }},
    "context": {{ "prompt": "场景中使用提示词", "negative": "Negative" }}
  }},
  "materials": ["材质1", "材质2"],
  "colors": ["颜色1", "颜色2"]
}}"#,
        name = prop.name,
        description = or_default(&prop.description, "无"),
        kind = or_default(&prop.kind, "道具"),
        importance = or_default(&prop.importance, "普通"),
        style = style_line(style, 3),
    )
}

/// Prompt asking for the reference sheet of one location.
pub fn scene_prompt(scene: &SceneSpec, style: &StyleConfig) -> String {
    format!(
        r#"为以下场景生成参考图提示词：

## 场景信息
名称: {name}
描述: {description}
氛围: {atmosphere}
时间: {time}

## 风格要求
{style}
导演风格: {director}

## 输出要求
只返回 JSON，提示词用英文，画面中不要出现人物：
{{
  "basePrompt": "基础场景描述",
  "variations": {{
    "wide": {{ "prompt": "广角全景提示词", "negative": "Negative" }},
    "establishing": {{ "prompt": "建立镜头提示词", "negative": "Negative" }},
    "detail": {{ "prompt": "细节特写提示词", "negative": "Negative" }},
    "atmosphere": {{ "prompt": "氛围镜头提示词", "negative": "Negative" }}
  }},
  "lighting": "光线描述",
  "mood": "氛围描述"
}}"#,
        name = scene.name,
        description = or_default(&scene.description, "无"),
        atmosphere = or_default(&scene.atmosphere, "中性"),
        time = scene.time_of_day.as_deref().unwrap_or("日间"),
        style = style_line(style, 3),
        director = style.director().as_deref().unwrap_or("通用"),
    )
}
