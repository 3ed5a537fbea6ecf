//! Placeholder scripts for planned episodes that were never scripted.

use reelsmith_core::{
    Architecture, Clip, Episode, Event, RhythmTemplate, ScriptEpisode, StoryBible, TimeCode,
};

const UNNAMED_PROTAGONIST: &str = "主角";

/// Script of one planned episode: one clip per rhythm segment.
///
/// The opening segment introduces the protagonist. Each later segment
/// narrates the assigned event at its position; once events run out the last
/// one is repeated.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Episode, Event, EventType, RhythmTemplate, StoryBible};
/// use reelsmith_storyboard::fallback_episode_script;
///
/// let bible = StoryBible {
///     events: vec![Event::new("E01", "Lin returns", EventType::LoadBearing)],
///     ..Default::default()
/// };
/// let episode = Episode::new(1).with_assigned_events(vec!["E01".to_string()]);
/// let script = fallback_episode_script(&episode, &bible, RhythmTemplate::Fast60);
///
/// assert_eq!(script.clips.len(), 5);
/// assert_eq!(script.total_duration, 60);
/// assert_eq!(script.clips[1].narration, "Lin returns");
/// ```
pub fn fallback_episode_script(
    episode: &Episode,
    bible: &StoryBible,
    template: RhythmTemplate,
) -> ScriptEpisode {
    let protagonist = bible
        .protagonist()
        .map(|c| c.name.as_str())
        .unwrap_or(UNNAMED_PROTAGONIST);
    let events: Vec<&Event> = episode
        .assigned_events
        .iter()
        .filter_map(|id| bible.events.iter().find(|e| &e.id == id))
        .collect();

    let clips = template
        .segments()
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let (narration, visual) = if i == 0 {
                (
                    format!("你敢信？{}的故事，就从这里开始...", protagonist),
                    format!("{}登场", protagonist),
                )
            } else {
                match events.get((i - 1).min(events.len().saturating_sub(1))) {
                    Some(event) if !event.summary.trim().is_empty() => {
                        (event.summary.clone(), event.summary.clone())
                    }
                    _ => ("故事还在继续...".to_string(), segment.name().to_string()),
                }
            };
            Clip::new(
                format!("C{:02}", i + 1),
                visual,
                format!("{} · {}", segment.name(), segment.intensity()),
            )
            .with_segment_name(segment.name())
            .with_time_code(TimeCode::new(*segment.start(), segment.duration()))
            .with_narration(narration)
        })
        .collect();

    ScriptEpisode {
        number: episode.number,
        title: if episode.title.trim().is_empty() {
            "待定".to_string()
        } else {
            episode.title.clone()
        },
        logline: if episode.logline.trim().is_empty() {
            "故事继续".to_string()
        } else {
            episode.logline.clone()
        },
        total_duration: template.duration(),
        clips,
    }
}

/// Placeholder script for every episode of an architecture.
#[tracing::instrument(skip_all, fields(episodes = architecture.episodes.len()))]
pub fn fallback_script(architecture: &Architecture, bible: &StoryBible) -> Vec<ScriptEpisode> {
    tracing::warn!("No script in job, storyboarding placeholder scripts");
    architecture
        .episodes
        .iter()
        .map(|episode| fallback_episode_script(episode, bible, architecture.rhythm_template))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::{Character, EventType, Role};

    fn bible() -> StoryBible {
        StoryBible {
            characters: vec![Character::new("C01", "林默", Role::Protagonist)],
            events: vec![
                Event::new("E01", "林默被逐出家门", EventType::LoadBearing),
                Event::new("E02", "林默在宴会上亮明身份", EventType::LoadBearing),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn segments_become_timed_clips() {
        let episode = Episode::new(2)
            .with_assigned_events(vec!["E01".to_string(), "E02".to_string()]);
        let script = fallback_episode_script(&episode, &bible(), RhythmTemplate::Standard90);

        let ids: Vec<&str> = script.clips.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C01", "C02", "C03", "C04", "C05", "C06"]);
        assert_eq!(script.clips[0].narration, "你敢信？林默的故事，就从这里开始...");
        assert_eq!(script.clips[1].narration, "林默被逐出家门");
        assert_eq!(script.clips[2].narration, "林默在宴会上亮明身份");
        assert_eq!(script.clips[5].narration, "林默在宴会上亮明身份");
        assert_eq!(script.clips[1].time_code, TimeCode { start: 5, end: 20 });
        assert_eq!(script.clips[1].segment_name, "背景铺垫");
        assert_eq!(script.clips[4].emotion, "高潮回报 · 10");
        assert_eq!(script.title, "待定");
        assert_eq!(script.number, 2);
    }

    #[test]
    fn episode_without_events_still_has_clips() {
        let bible = StoryBible::default();
        let script =
            fallback_episode_script(&Episode::new(1), &bible, RhythmTemplate::UltraFast45);
        assert_eq!(script.clips.len(), 5);
        assert!(script.clips[0].narration.contains("主角"));
        assert_eq!(script.clips[3].narration, "故事还在继续...");
        assert_eq!(script.logline, "故事继续");
    }
}
