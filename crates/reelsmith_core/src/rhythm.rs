//! Rhythm templates: fixed per-duration segment layouts for one episode.

use crate::BeatPosition;
use serde::{Deserialize, Serialize};

/// One timed segment of a rhythm template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct RhythmSegment {
    /// Segment label
    #[getter(skip)]
    name: &'static str,
    /// Start second
    start: u32,
    /// End second
    end: u32,
    /// Target intensity 0-10
    intensity: u8,
}

impl RhythmSegment {
    const fn new(name: &'static str, start: u32, end: u32, intensity: u8) -> Self {
        Self {
            name,
            start,
            end,
            intensity,
        }
    }

    /// Segment label.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Segment length in seconds.
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

/// Closed set of episode rhythm templates.
///
/// # Examples
///
/// ```
/// use reelsmith_core::RhythmTemplate;
///
/// assert_eq!(RhythmTemplate::for_duration(60), RhythmTemplate::Fast60);
/// assert_eq!(RhythmTemplate::Standard90.duration(), 90);
/// assert_eq!(RhythmTemplate::Standard90.intensity_at(65), 10);
/// ```
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
pub enum RhythmTemplate {
    /// 45 second single-beat cut
    #[serde(rename = "ultra_fast_45")]
    #[display("ultra_fast_45")]
    UltraFast45,
    /// 60 second dense cut
    #[serde(rename = "fast_60")]
    #[display("fast_60")]
    Fast60,
    /// 90 second standard cut
    #[default]
    #[serde(rename = "standard_90")]
    #[display("standard_90")]
    Standard90,
    /// 120 second two-beat cut
    #[serde(rename = "extended_120")]
    #[display("extended_120")]
    Extended120,
}

impl RhythmTemplate {
    /// Pick the template closest to a target duration in seconds.
    pub fn for_duration(seconds: u32) -> Self {
        match seconds {
            0..=50 => RhythmTemplate::UltraFast45,
            51..=70 => RhythmTemplate::Fast60,
            71..=100 => RhythmTemplate::Standard90,
            _ => RhythmTemplate::Extended120,
        }
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> u32 {
        match self {
            RhythmTemplate::UltraFast45 => 45,
            RhythmTemplate::Fast60 => 60,
            RhythmTemplate::Standard90 => 90,
            RhythmTemplate::Extended120 => 120,
        }
    }

    /// Segment layout.
    pub fn segments(&self) -> Vec<RhythmSegment> {
        match self {
            RhythmTemplate::UltraFast45 => vec![
                RhythmSegment::new("钩子", 0, 2, 10),
                RhythmSegment::new("铺垫", 2, 12, 4),
                RhythmSegment::new("冲突", 12, 28, 6),
                RhythmSegment::new("高潮", 28, 40, 10),
                RhythmSegment::new("钩子", 40, 45, 6),
            ],
            RhythmTemplate::Fast60 => vec![
                RhythmSegment::new("爆炸开场", 0, 3, 10),
                RhythmSegment::new("快速铺垫", 3, 15, 4),
                RhythmSegment::new("连续冲突", 15, 35, 6),
                RhythmSegment::new("高潮爆发", 35, 50, 10),
                RhythmSegment::new("悬念收尾", 50, 60, 7),
            ],
            RhythmTemplate::Standard90 => vec![
                RhythmSegment::new("开场钩子", 0, 5, 8),
                RhythmSegment::new("背景铺垫", 5, 20, 3),
                RhythmSegment::new("冲突展开", 20, 40, 5),
                RhythmSegment::new("升级转折", 40, 60, 7),
                RhythmSegment::new("高潮回报", 60, 80, 10),
                RhythmSegment::new("悬置钩子", 80, 90, 6),
            ],
            RhythmTemplate::Extended120 => vec![
                RhythmSegment::new("开场钩子", 0, 5, 7),
                RhythmSegment::new("背景铺垫", 5, 25, 3),
                RhythmSegment::new("第一冲突", 25, 50, 5),
                RhythmSegment::new("第一高潮", 50, 70, 8),
                RhythmSegment::new("升级转折", 70, 90, 7),
                RhythmSegment::new("主高潮", 90, 110, 10),
                RhythmSegment::new("悬置钩子", 110, 120, 6),
            ],
        }
    }

    /// Beat positions the template has room for.
    pub fn beat_slots(&self) -> &'static [BeatPosition] {
        match self {
            RhythmTemplate::UltraFast45 => &[BeatPosition::Opening, BeatPosition::Climax],
            RhythmTemplate::Fast60 => &[
                BeatPosition::Opening,
                BeatPosition::Mid,
                BeatPosition::Climax,
            ],
            RhythmTemplate::Standard90 | RhythmTemplate::Extended120 => &[
                BeatPosition::Opening,
                BeatPosition::Early,
                BeatPosition::Mid,
                BeatPosition::Climax,
                BeatPosition::Closing,
            ],
        }
    }

    /// Intensity at a point in time; 5 outside every segment.
    pub fn intensity_at(&self, second: u32) -> u8 {
        self.segments()
            .iter()
            .find(|s| second >= s.start && second < s.end)
            .map(|s| s.intensity)
            .unwrap_or(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn segments_cover_full_duration() {
        for template in RhythmTemplate::iter() {
            let segments = template.segments();
            assert_eq!(segments[0].start, 0);
            assert_eq!(segments.last().map(|s| s.end), Some(template.duration()));
            for pair in segments.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }

    #[test]
    fn for_duration_thresholds() {
        assert_eq!(RhythmTemplate::for_duration(50), RhythmTemplate::UltraFast45);
        assert_eq!(RhythmTemplate::for_duration(70), RhythmTemplate::Fast60);
        assert_eq!(RhythmTemplate::for_duration(100), RhythmTemplate::Standard90);
        assert_eq!(RhythmTemplate::for_duration(101), RhythmTemplate::Extended120);
    }

    #[test]
    fn serde_uses_template_ids() {
        let json = serde_json::to_string(&RhythmTemplate::Standard90).unwrap();
        assert_eq!(json, "\"standard_90\"");
        let parsed: RhythmTemplate = serde_json::from_str("\"fast_60\"").unwrap();
        assert_eq!(parsed, RhythmTemplate::Fast60);
    }
}
