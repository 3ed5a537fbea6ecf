//! Prompt builders for visual-description requests.

use crate::AnchorRegistry;
use reelsmith_core::{Clip, StyleConfig};

const FIELDS: &str = r#"{"subject": "主体", "environment": "环境与光线", "material": "材质细节", "camera": "景别与运镜", "mood": "氛围情感"}"#;

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut head: String = text.chars().take(max_chars).collect();
    head.push('…');
    head
}

fn style_block(style: &StyleConfig) -> String {
    format!(
        "{}：{}\n镜头：{}\n光线：{}",
        style.preset().display_name(),
        style.prompt_modifiers().join(", "),
        style.camera_style().shots.join(", "),
        style.lighting().examples.join(", ")
    )
}

fn anchor_block(anchors: &AnchorRegistry) -> String {
    if anchors.is_empty() {
        return "无".to_string();
    }
    anchors
        .anchors()
        .iter()
        .map(|a| format!("- {} = {}", a.token(), a.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One request describing every clip of an episode.
pub fn batch_prompt(
    clips: &[Clip],
    style: &StyleConfig,
    anchors: &AnchorRegistry,
    visual_truncation: usize,
) -> String {
    let listing = clips
        .iter()
        .enumerate()
        .map(|(i, clip)| {
            format!(
                "{}. [{}] 情绪：{} | 画面：{}",
                i + 1,
                clip.segment_name,
                clip.emotion,
                truncate(&clip.visual, visual_truncation)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"你是专业的漫剧分镜师。请为以下 {count} 个片段逐一生成 5D 视觉描述。

## 风格
{style}

## 锚点（出现的角色和地点必须原样使用这些标记）
{anchors}

## 片段
{listing}

## 输出要求
只返回 JSON 数组，共 {count} 个对象，顺序与片段编号一致，每个对象格式：
{fields}"#,
        count = clips.len(),
        style = style_block(style),
        anchors = anchor_block(anchors),
        listing = listing,
        fields = FIELDS,
    )
}

/// One request describing a single clip.
pub fn clip_prompt(clip: &Clip, style: &StyleConfig, anchors: &AnchorRegistry) -> String {
    let dialogue = clip
        .dialogue
        .as_ref()
        .map(|d| d.render())
        .unwrap_or_else(|| "无".to_string());
    format!(
        r#"为以下片段生成 5D 视觉描述。

## 片段
段落：{segment}
情绪：{emotion}
画面：{visual}
对白：{dialogue}

## 风格
{style}

## 锚点（出现的角色和地点必须原样使用这些标记）
{anchors}

## 输出要求
只返回一个 JSON 对象：
{fields}"#,
        segment = clip.segment_name,
        emotion = clip.emotion,
        visual = clip.visual.trim(),
        dialogue = dialogue,
        style = style_block(style),
        anchors = anchor_block(anchors),
        fields = FIELDS,
    )
}
