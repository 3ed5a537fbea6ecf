//! Beat-map planning for one episode.

use reelsmith_core::{BeatAssignment, BeatMap, BeatPosition, BeatType, Event, RhythmTemplate};

/// Positions in the order they are filled.
const FILL_ORDER: [BeatPosition; 5] = [
    BeatPosition::Opening,
    BeatPosition::Climax,
    BeatPosition::Closing,
    BeatPosition::Early,
    BeatPosition::Mid,
];

/// Beats that suit each position, best first.
fn preferred(position: BeatPosition) -> &'static [BeatType] {
    match position {
        BeatPosition::Opening => &[BeatType::Identity, BeatType::Info, BeatType::Slap],
        BeatPosition::Early => &[BeatType::Info, BeatType::Upgrade, BeatType::Emotion],
        BeatPosition::Mid => &[BeatType::Upgrade, BeatType::Emotion, BeatType::Revenge],
        BeatPosition::Climax => &[
            BeatType::Slap,
            BeatType::Revenge,
            BeatType::Comeback,
            BeatType::Identity,
        ],
        BeatPosition::Closing => &[BeatType::Info, BeatType::Emotion, BeatType::Identity],
    }
}

/// Positions every episode must have, with their default beat and hook.
fn mandatory_default(position: BeatPosition) -> Option<(BeatType, &'static str)> {
    match position {
        BeatPosition::Opening => Some((BeatType::Info, "揭示关键信息，吸引观众")),
        BeatPosition::Climax => Some((BeatType::Slap, "关键转折，情绪高潮")),
        BeatPosition::Closing => Some((BeatType::Info, "留下悬念，引导下一集")),
        BeatPosition::Early | BeatPosition::Mid => None,
    }
}

/// Pick an unused beat for a position.
///
/// Preferred beats the episode's events can deliver come first, then any
/// deliverable beat, then the first unused preferred beat.
pub fn select_beat(
    position: BeatPosition,
    potentials: &[BeatType],
    used: &[BeatType],
) -> Option<BeatType> {
    let ranked = preferred(position);
    ranked
        .iter()
        .find(|&b| potentials.contains(b) && !used.contains(b))
        .or_else(|| potentials.iter().find(|&b| !used.contains(b)))
        .or_else(|| ranked.iter().find(|&b| !used.contains(b)))
        .copied()
}

/// One-line hook for a beat at a position.
pub fn hook_description(beat: BeatType, events: &[Event], position: BeatPosition) -> String {
    let lead = events
        .first()
        .map(|e| e.summary.as_str())
        .filter(|s| !s.is_empty());
    let name = beat.name();
    match position {
        BeatPosition::Opening => {
            format!("开场{}：通过{}吸引观众", name, lead.unwrap_or("关键信息"))
        }
        BeatPosition::Early => format!("早期铺垫：为{}做准备", name),
        BeatPosition::Mid => format!("中段升级：{}深入发展", name),
        BeatPosition::Climax => format!("高潮{}：{}", name, lead.unwrap_or("情绪顶点")),
        BeatPosition::Closing => format!("结尾钩子：留下{}引导下集", name),
    }
}

/// Plan the beat map of one episode from its events.
///
/// Each beat is used at most once. Opening, climax and closing are always
/// present; early and mid appear when the rhythm template has room for them.
///
/// # Examples
///
/// ```
/// use reelsmith_architect::plan_beat_map;
/// use reelsmith_core::{BeatPosition, BeatType, Event, EventType, RhythmTemplate};
///
/// let events = vec![
///     Event::new("E01", "Lin reveals her identity", EventType::LoadBearing)
///         .with_beat_potential(vec![BeatType::Identity]),
/// ];
/// let map = plan_beat_map(&events, RhythmTemplate::Standard90);
/// assert_eq!(map[&BeatPosition::Opening].beat_type, BeatType::Identity);
/// assert_eq!(map[&BeatPosition::Climax].beat_type, BeatType::Slap);
/// assert_eq!(map.len(), 5);
/// ```
pub fn plan_beat_map(events: &[Event], template: RhythmTemplate) -> BeatMap {
    let mut potentials: Vec<BeatType> = Vec::new();
    for beat in events.iter().flat_map(|e| &e.beat_potential) {
        if !potentials.contains(beat) {
            potentials.push(*beat);
        }
    }

    let slots = template.beat_slots();
    let mut used: Vec<BeatType> = Vec::new();
    let mut map = BeatMap::new();
    for position in FILL_ORDER {
        let mandatory = mandatory_default(position);
        if mandatory.is_none() && !slots.contains(&position) {
            continue;
        }
        let assignment = match (select_beat(position, &potentials, &used), mandatory) {
            (Some(beat), _) => {
                used.push(beat);
                BeatAssignment::new(beat, hook_description(beat, events, position))
            }
            (None, Some((beat, hook))) => BeatAssignment::new(beat, hook),
            (None, None) => continue,
        };
        map.insert(position, assignment);
    }
    map
}

/// Minimal beat map for an episode that arrived without one.
pub fn default_beat_map() -> BeatMap {
    [
        (BeatPosition::Opening, BeatType::Info, "开场钩子"),
        (BeatPosition::Climax, BeatType::Slap, "高潮点"),
        (BeatPosition::Closing, BeatType::Info, "结尾钩子"),
    ]
    .into_iter()
    .map(|(position, beat, hook)| (position, BeatAssignment::new(beat, hook)))
    .collect()
}
