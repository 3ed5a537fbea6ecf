use reelsmith_core::{Archetype, BeatType, EventType, JobState, StoryBible};

const BIBLE: &str = r#"{
    "title": "雨夜",
    "mainTheme": "逆袭",
    "characters": [
        {"id": "C01", "name": "林", "role": "protagonist", "traits": ["隐藏", "冷静"]},
        {"id": "C02", "name": "赵", "role": "antagonist", "archetype": "oppressor"}
    ],
    "events": [
        {"id": "E01", "summary": "林被众人嘲讽", "type": "load_bearing", "dependsOn": [], "enables": ["E02"]},
        {"id": "E02", "summary": "林得知真相", "type": "reinforcing", "dependsOn": ["E01", "E99"]},
        {"id": "E03", "summary": "林身份揭示", "type": "load_bearing", "beatPotential": ["identity", "twist"]}
    ],
    "estimatedEpisodes": 4
}"#;

#[test]
fn enhance_normalizes_extracted_bible() {
    let mut bible: StoryBible = serde_json::from_str(BIBLE).unwrap();
    bible.enhance();

    assert_eq!(bible.characters[0].archetype, Some(Archetype::HiddenIdentity));
    assert_eq!(bible.characters[1].archetype, Some(Archetype::Oppressor));

    assert_eq!(bible.events[0].beat_potential, vec![BeatType::Slap]);
    assert_eq!(bible.events[1].beat_potential, vec![BeatType::Info]);
    assert_eq!(bible.events[2].beat_potential, vec![BeatType::Identity]);

    assert_eq!(bible.events[1].depends_on, vec!["E01".to_string()]);
    assert_eq!(bible.events[2].depends_on, vec!["E01".to_string()]);
    assert_eq!(bible.load_bearing_count(), 2);
    assert_eq!(bible.events[2].event_type, EventType::LoadBearing);

    assert_eq!(bible.event_chains.len(), 1);
    assert_eq!(bible.event_chains[0].events, vec!["E01", "E02"]);
}

#[test]
fn enhance_is_stable_on_second_pass() {
    let mut bible: StoryBible = serde_json::from_str(BIBLE).unwrap();
    bible.enhance();
    let once = bible.clone();
    bible.enhance();
    assert_eq!(bible, once);
}

#[test]
fn job_state_round_trips_partial_state() {
    let bible: StoryBible = serde_json::from_str(BIBLE).unwrap();
    let state = JobState {
        story_bible: Some(bible),
        ..Default::default()
    };
    let json = serde_json::to_value(&state).unwrap();
    assert!(json.get("storyBible").is_some());
    assert!(json.get("architecture").is_none());

    let back: JobState = serde_json::from_value(json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn merge_renumbers_chunk_events_and_unions_characters() {
    let first: StoryBible = serde_json::from_str(
        r#"{
            "toneKeywords": ["压抑", "逆袭"],
            "characters": [{"id": "C01", "name": "林", "traits": ["隐忍"]}],
            "events": [
                {"id": "E01", "summary": "林被赶出家门", "type": "load_bearing", "enables": ["E02"]},
                {"id": "E02", "summary": "林流落街头", "type": "reinforcing", "dependsOn": ["E01"]}
            ]
        }"#,
    )
    .unwrap();
    let second: StoryBible = serde_json::from_str(
        r#"{
            "toneKeywords": ["逆袭", "爽快"],
            "characters": [
                {"id": "C01", "name": "林", "traits": ["果断"]},
                {"id": "C02", "name": "赵", "role": "antagonist"}
            ],
            "events": [
                {"id": "E01", "summary": "林身份揭示", "type": "load_bearing"},
                {"id": "E02", "summary": "赵跪地求饶", "type": "reinforcing", "dependsOn": ["E01", "E09"]}
            ]
        }"#,
    )
    .unwrap();

    let merged = StoryBible::merge("雨夜", &[first, second]);

    assert_eq!(merged.title, "雨夜");
    assert_eq!(merged.characters.len(), 2);
    assert_eq!(merged.characters[0].traits, vec!["隐忍", "果断"]);

    let ids: Vec<&str> = merged.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["E01", "E02", "E03", "E04"]);
    assert_eq!(merged.events[1].depends_on, vec!["E01".to_string()]);
    assert_eq!(merged.events[3].depends_on, vec!["E03".to_string()]);

    assert_eq!(merged.tone_keywords, vec!["压抑", "逆袭", "爽快"]);
    assert_eq!(merged.estimated_episodes, 3);
}
