//! Clip duration decisions.
//!
//! Every clip lasts 5, 10 or 15 seconds. The class comes from the clip's
//! emotion label, is overridden by its beat type, and is finally fitted under
//! an optional user ceiling.

use regex::Regex;
use reelsmith_core::BeatType;
use std::sync::LazyLock;

/// Intense clips.
pub const SHORT_CLIP: u32 = 5;
/// Default length.
pub const MEDIUM_CLIP: u32 = 10;
/// Calm or introductory clips.
pub const LONG_CLIP: u32 = 15;

/// The three duration classes, ascending.
pub const DURATION_CLASSES: [u32; 3] = [SHORT_CLIP, MEDIUM_CLIP, LONG_CLIP];

// Substring triggers checked in order; the first hit wins.
const EMOTION_TRIGGERS: &[(&str, u32)] = &[
    ("高潮", SHORT_CLIP),
    ("爆发", SHORT_CLIP),
    ("打脸", SHORT_CLIP),
    ("反杀", SHORT_CLIP),
    ("震惊", SHORT_CLIP),
    ("愤怒", SHORT_CLIP),
    ("激烈", SHORT_CLIP),
    ("climax", SHORT_CLIP),
    ("slap", SHORT_CLIP),
    ("explosive", SHORT_CLIP),
    ("shock", SHORT_CLIP),
    ("rage", SHORT_CLIP),
    ("平静", LONG_CLIP),
    ("平稳", LONG_CLIP),
    ("舒缓", LONG_CLIP),
    ("温馨", LONG_CLIP),
    ("回忆", LONG_CLIP),
    ("铺垫", LONG_CLIP),
    ("calm", LONG_CLIP),
    ("peaceful", LONG_CLIP),
    ("serene", LONG_CLIP),
    ("establishing", LONG_CLIP),
    ("紧张", MEDIUM_CLIP),
    ("悬疑", MEDIUM_CLIP),
    ("冲突", MEDIUM_CLIP),
    ("期待", MEDIUM_CLIP),
    ("tense", MEDIUM_CLIP),
    ("suspense", MEDIUM_CLIP),
    ("conflict", MEDIUM_CLIP),
];

static INTENSITY_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?:\s*/\s*10)?\s*$").expect("Valid intensity regex")
});

/// Duration class carried by a beat label, if it is one of the known beats.
fn beat_duration(beat: &str) -> Option<u32> {
    let beat: BeatType = beat.parse().ok()?;
    Some(match beat {
        BeatType::Slap | BeatType::Revenge | BeatType::Comeback | BeatType::Identity => SHORT_CLIP,
        BeatType::Upgrade | BeatType::Info => MEDIUM_CLIP,
        BeatType::Emotion => LONG_CLIP,
    })
}

/// Trailing 0-10 intensity score of an emotion label such as `紧张 · 8`.
pub fn intensity_score(emotion: &str) -> Option<u8> {
    let captures = INTENSITY_SCORE.captures(emotion.trim())?;
    let score: u8 = captures[1].parse().ok()?;
    (score <= 10).then_some(score)
}

/// Duration class suggested by an emotion label alone.
pub fn emotion_duration(emotion: &str) -> u32 {
    let text = emotion.to_lowercase();
    let triggered = EMOTION_TRIGGERS
        .iter()
        .find(|(trigger, _)| text.contains(trigger))
        .map(|(_, seconds)| *seconds);
    if let Some(seconds) = triggered {
        return seconds;
    }
    match intensity_score(emotion) {
        Some(score) if score >= 8 => SHORT_CLIP,
        Some(score) if score <= 3 => LONG_CLIP,
        _ => MEDIUM_CLIP,
    }
}

/// Fit a duration under a ceiling.
///
/// Picks the closest duration class not above the ceiling; a ceiling below
/// every class is used as is.
pub fn fit_ceiling(seconds: u32, ceiling: Option<u32>) -> u32 {
    let Some(ceiling) = ceiling else {
        return seconds;
    };
    DURATION_CLASSES
        .iter()
        .copied()
        .filter(|&class| class <= ceiling)
        .min_by_key(|&class| class.abs_diff(seconds))
        .unwrap_or(ceiling.min(LONG_CLIP))
}

/// Decide how long a clip lasts.
///
/// # Examples
///
/// ```
/// use reelsmith_storyboard::decide_duration;
///
/// assert_eq!(decide_duration("high climax", Some("slap"), Some(8)), 5);
/// assert_eq!(decide_duration("平静的清晨", None, None), 15);
/// assert_eq!(decide_duration("平静的清晨", Some("slap"), None), 5);
/// assert_eq!(decide_duration("紧张 · 8", None, Some(12)), 10);
/// assert_eq!(decide_duration("", None, Some(3)), 3);
/// ```
pub fn decide_duration(emotion: &str, beat: Option<&str>, ceiling: Option<u32>) -> u32 {
    let seconds = beat
        .and_then(beat_duration)
        .unwrap_or_else(|| emotion_duration(emotion));
    fit_ceiling(seconds, ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_trigger_wins() {
        // "高潮" is listed before "紧张"
        assert_eq!(emotion_duration("紧张到高潮"), SHORT_CLIP);
        assert_eq!(emotion_duration("Calm before the storm"), LONG_CLIP);
        assert_eq!(emotion_duration("suspense"), MEDIUM_CLIP);
    }

    #[test]
    fn intensity_score_used_without_trigger() {
        assert_eq!(emotion_duration("压抑 · 9"), SHORT_CLIP);
        assert_eq!(emotion_duration("忧郁 · 2"), LONG_CLIP);
        assert_eq!(emotion_duration("忧郁 · 5"), MEDIUM_CLIP);
        assert_eq!(emotion_duration("忧郁"), MEDIUM_CLIP);
        assert_eq!(intensity_score("wistful 7/10"), Some(7));
        assert_eq!(intensity_score("year 2024"), None);
    }

    #[test]
    fn unknown_beat_label_does_not_override() {
        assert_eq!(decide_duration("平静", Some("twist"), None), LONG_CLIP);
        assert_eq!(decide_duration("高潮", Some("emotion"), None), LONG_CLIP);
        assert_eq!(decide_duration("高潮", Some("信息"), None), MEDIUM_CLIP);
    }

    #[test]
    fn ceiling_picks_closest_allowed_class() {
        assert_eq!(fit_ceiling(LONG_CLIP, Some(12)), MEDIUM_CLIP);
        assert_eq!(fit_ceiling(LONG_CLIP, Some(9)), SHORT_CLIP);
        assert_eq!(fit_ceiling(SHORT_CLIP, Some(20)), SHORT_CLIP);
        assert_eq!(fit_ceiling(MEDIUM_CLIP, Some(0)), 0);
        assert_eq!(fit_ceiling(MEDIUM_CLIP, None), MEDIUM_CLIP);
    }

    #[test]
    fn decisions_are_deterministic() {
        for _ in 0..3 {
            assert_eq!(decide_duration("紧张 · 8", Some("upgrade"), Some(12)), MEDIUM_CLIP);
        }
    }
}
