//! Prompt builders for architecture requests.

use reelsmith_core::{BeatType, Episode, RhythmTemplate, StoryBible};
use reelsmith_error::{JsonError, ReelsmithResult};
use strum::IntoEnumIterator;

fn to_json<T: serde::Serialize>(value: &T) -> ReelsmithResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to serialize prompt context: {}", e)).into())
}

fn beat_list() -> String {
    BeatType::iter()
        .map(|b| format!("- {}({}) [强度:{}]", b.name(), b, b.intensity()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rhythm_list(template: RhythmTemplate) -> String {
    template
        .segments()
        .iter()
        .map(|s| {
            format!(
                "- {}({}-{}s) [强度:{}]",
                s.name(),
                s.start(),
                s.end(),
                s.intensity()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for a complete architecture of `episode_count` episodes.
pub fn architecture_prompt(
    bible: &StoryBible,
    episode_count: u32,
    template: RhythmTemplate,
) -> ReelsmithResult<String> {
    Ok(format!(
        r#"你是一个专业的漫剧分集架构师。请根据以下故事圣经，设计完整的分集架构。
**目标集数**：{count} 集

## 故事圣经
```json
{bible}
```

## 爽点类型
{beats}

## 节奏模板（{template} - {duration}秒）
{rhythm}

## 输出要求
只返回 JSON，格式如下：
{{
  "totalEpisodes": {count},
  "formula": "承重事件数(X) × 1.3 = Y集",
  "overview": {{ "act1": {{ "episodes": "1-2", "focus": "..." }}, "act2": {{ ... }}, "act3": {{ ... }} }},
  "episodes": [
    {{
      "number": 1,
      "title": "集标题",
      "logline": "一句话卖点",
      "assignedEvents": ["E01"],
      "beatMap": {{
        "opening": {{ "type": "identity", "hookDescription": "钩子描述" }},
        "climax": {{ "type": "slap", "hookDescription": "..." }},
        "closing": {{ "type": "info", "hookDescription": "..." }}
      }},
      "emotionalArc": "情绪弧线",
      "keyCharacters": ["C01"],
      "estimatedDuration": {duration}
    }}
  ],
  "arcs": {{ "miniArcs": [], "majorTurningPoints": [] }}
}}

## 分集原则
- 按故事时间顺序分配事件；若事件B dependsOn 事件A，A必须在B之前或同一集
- 每集 1-3 个主要事件，承重事件优先分配
- 开场必须有钩子，结尾必须有悬念，主爽点放在高潮位置"#,
        count = episode_count,
        bible = to_json(bible)?,
        beats = beat_list(),
        template = template,
        duration = template.duration(),
        rhythm = rhythm_list(template),
    ))
}

/// Prompt asking to rework one episode according to an instruction.
pub fn adjust_prompt(
    episode: &Episode,
    bible: &StoryBible,
    instruction: &str,
) -> ReelsmithResult<String> {
    let names: Vec<&str> = bible.characters.iter().map(|c| c.name.as_str()).collect();
    let ids: Vec<&str> = bible.events.iter().map(|e| e.id.as_str()).collect();
    Ok(format!(
        r#"请调整以下分集设计：

## 当前集设计
```json
{episode}
```

## 故事圣经上下文
角色: {names}
事件: {ids}

## 调整要求
{instruction}

## 输出要求
返回调整后的完整集设计 JSON，保持原有格式。"#,
        episode = to_json(episode)?,
        names = names.join(", "),
        ids = ids.join(", "),
        instruction = instruction,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_prompt_names_count_and_template() {
        let prompt =
            architecture_prompt(&StoryBible::default(), 7, RhythmTemplate::Fast60).unwrap();
        assert!(prompt.contains("**目标集数**：7 集"));
        assert!(prompt.contains("fast_60 - 60秒"));
        assert!(prompt.contains("打脸(slap) [强度:9]"));
    }

    #[test]
    fn adjust_prompt_lists_context() {
        let mut bible = StoryBible::default();
        bible.events.push(reelsmith_core::Event::new(
            "E01",
            "x",
            reelsmith_core::EventType::LoadBearing,
        ));
        let prompt = adjust_prompt(&Episode::new(2), &bible, "加强开场").unwrap();
        assert!(prompt.contains("事件: E01"));
        assert!(prompt.contains("加强开场"));
    }
}
