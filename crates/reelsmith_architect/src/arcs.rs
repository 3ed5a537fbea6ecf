//! Series-level structure: acts, mini arcs, turning points and per-episode text.

use reelsmith_core::{
    Act, Arcs, Character, Event, MajorTurningPoint, MiniArc, Overview, Role, TurningPointKind,
};

const MINI_ARC_LENGTH: u32 = 3;

/// Three-act overview split at 25% and 75% of the run.
pub fn overview(total: u32) -> Overview {
    let act1_end = total.div_ceil(4);
    let act2_end = (total * 3).div_ceil(4);
    Overview {
        act1: Act {
            episodes: format!("1-{}", act1_end),
            focus: "铺垫与建立".to_string(),
        },
        act2: Act {
            episodes: format!("{}-{}", act1_end + 1, act2_end),
            focus: "冲突升级".to_string(),
        },
        act3: Act {
            episodes: format!("{}-{}", act2_end + 1, total),
            focus: "高潮与解决".to_string(),
        },
    }
}

/// Mini arcs of three episodes (a trailing arc of two is kept, of one dropped)
/// plus the midpoint and all-is-lost turning points.
///
/// # Examples
///
/// ```
/// use reelsmith_architect::design_arcs;
///
/// let arcs = design_arcs(8);
/// let lengths: Vec<usize> = arcs.mini_arcs.iter().map(|a| a.episodes.len()).collect();
/// assert_eq!(lengths, vec![3, 3, 2]);
/// assert_eq!(arcs.major_turning_points[0].episode, 4);
/// assert_eq!(arcs.major_turning_points[1].episode, 6);
/// ```
pub fn design_arcs(total: u32) -> Arcs {
    let mut mini_arcs = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + MINI_ARC_LENGTH).min(total);
        if end - start >= 2 {
            mini_arcs.push(MiniArc {
                name: format!("小弧线 {}", mini_arcs.len() + 1),
                episodes: (start + 1..=end).collect(),
                setup: format!("第{}集建立", start + 1),
                climax: format!("第{}集高潮", (start + end) / 2 + 1),
                resolution: format!("第{}集解决", end),
            });
        }
        start += MINI_ARC_LENGTH;
    }

    let mut major_turning_points = Vec::new();
    let midpoint = total.div_ceil(2);
    if midpoint > 1 && midpoint < total {
        major_turning_points.push(MajorTurningPoint {
            episode: midpoint,
            kind: TurningPointKind::Midpoint,
            description: "故事中点，局势反转".to_string(),
        });
    }
    let lowpoint = (total * 3).div_ceil(4);
    if lowpoint != midpoint && lowpoint < total {
        major_turning_points.push(MajorTurningPoint {
            episode: lowpoint,
            kind: TurningPointKind::AllIsLost,
            description: "至暗时刻，最大危机".to_string(),
        });
    }

    Arcs {
        mini_arcs,
        major_turning_points,
    }
}

/// Emotional progression label by quarter of the run.
pub fn emotional_arc(number: u32, total: u32) -> &'static str {
    let total = total.max(1);
    if number * 4 <= total {
        "建立 -> 期待"
    } else if number * 2 <= total {
        "期待 -> 紧张"
    } else if number * 4 <= total * 3 {
        "紧张 -> 危机"
    } else {
        "危机 -> 释放"
    }
}

/// Title from the first load-bearing event, or the first event.
pub fn episode_title(number: u32, events: &[Event]) -> String {
    let main = events
        .iter()
        .find(|e| e.is_load_bearing())
        .or_else(|| events.first());
    match main {
        Some(event) if !event.summary.is_empty() => {
            let head: String = event.summary.chars().take(10).collect();
            format!("第{}集：{}", number, head)
        }
        Some(_) => format!("第{}集：未命名", number),
        None => format!("第{}集", number),
    }
}

/// Logline from the first two event summaries.
pub fn episode_logline(events: &[Event]) -> String {
    if events.is_empty() {
        return "故事继续展开".to_string();
    }
    events
        .iter()
        .take(2)
        .map(|e| e.summary.as_str())
        .collect::<Vec<_>>()
        .join("；")
        .chars()
        .take(50)
        .collect()
}

/// Up to three character ids, always including the protagonist.
pub fn key_characters(events: &[Event], characters: &[Character]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in events.iter().flat_map(|e| &e.characters) {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }

    let protagonist = characters.iter().find(|c| c.role == Role::Protagonist);
    match protagonist {
        Some(p) if !ids.iter().take(3).any(|id| *id == p.id) => {
            ids.truncate(2);
            ids.push(p.id.clone());
        }
        _ => ids.truncate(3),
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::EventType;

    #[test]
    fn overview_splits_at_quarters() {
        let acts = overview(8);
        assert_eq!(acts.act1.episodes, "1-2");
        assert_eq!(acts.act2.episodes, "3-6");
        assert_eq!(acts.act3.episodes, "7-8");
    }

    #[test]
    fn short_run_has_no_turning_points_past_end() {
        let arcs = design_arcs(2);
        assert_eq!(arcs.mini_arcs.len(), 1);
        assert!(arcs.major_turning_points.is_empty());
    }

    #[test]
    fn single_trailing_episode_forms_no_arc() {
        let arcs = design_arcs(7);
        assert_eq!(arcs.mini_arcs.len(), 2);
        assert_eq!(arcs.mini_arcs[1].climax, "第5集高潮");
    }

    #[test]
    fn emotional_arc_by_quarter() {
        let labels: Vec<&str> = (1..=8).map(|n| emotional_arc(n, 8)).collect();
        assert_eq!(
            labels,
            vec![
                "建立 -> 期待",
                "建立 -> 期待",
                "期待 -> 紧张",
                "期待 -> 紧张",
                "紧张 -> 危机",
                "紧张 -> 危机",
                "危机 -> 释放",
                "危机 -> 释放",
            ]
        );
    }

    #[test]
    fn title_prefers_load_bearing_event() {
        let events = vec![
            Event::new("E1", "a quiet morning", EventType::Decorative),
            Event::new("E2", "林默被当众羞辱后愤然离开宴会厅", EventType::LoadBearing),
        ];
        assert_eq!(episode_title(3, &events), "第3集：林默被当众羞辱后愤然");
        assert_eq!(episode_title(4, &[]), "第4集");
    }

    #[test]
    fn logline_joins_two_summaries() {
        let events = vec![
            Event::new("E1", "甲", EventType::Decorative),
            Event::new("E2", "乙", EventType::Decorative),
            Event::new("E3", "丙", EventType::Decorative),
        ];
        assert_eq!(episode_logline(&events), "甲；乙");
        assert_eq!(episode_logline(&[]), "故事继续展开");
    }

    #[test]
    fn protagonist_always_kept() {
        let events = vec![
            Event::new("E1", "x", EventType::Decorative).with_characters(vec![
                "C2".to_string(),
                "C3".to_string(),
                "C4".to_string(),
                "C5".to_string(),
            ]),
        ];
        let characters = vec![Character::new("C1", "Lin", Role::Protagonist)];
        assert_eq!(key_characters(&events, &characters), vec!["C2", "C3", "C1"]);
        assert_eq!(key_characters(&[], &characters), vec!["C1"]);
    }
}
