use reelsmith_architect::{
    ArchitectConfig, EpisodeAdjustments, EpisodeArchitect, adjust_episode, default_beat_map,
};
use reelsmith_core::{
    BeatAssignment, BeatMap, BeatPosition, BeatType, Character, Event, EventType, Role, StoryBible,
};
use reelsmith_error::{ArchitectErrorKind, GenerationErrorKind, ReelsmithErrorKind};
use reelsmith_interface::{OfflineGenerator, ScriptedGenerator};

fn bible() -> StoryBible {
    let mut bible = StoryBible {
        title: "逆袭".to_string(),
        ..Default::default()
    };
    bible.characters = vec![
        Character::new("C01", "林默", Role::Protagonist),
        Character::new("C02", "赵凯", Role::Antagonist),
    ];
    bible.events = vec![
        Event::new("E01", "林默在宴会上被赵凯当众羞辱", EventType::LoadBearing)
            .with_characters(vec!["C01".to_string(), "C02".to_string()])
            .with_beat_potential(vec![BeatType::Slap]),
        Event::new("E02", "林默得知家族秘密", EventType::LoadBearing)
            .with_depends_on(vec!["E01".to_string()])
            .with_beat_potential(vec![BeatType::Info]),
        Event::new("E03", "林默闭关修炼", EventType::Reinforcing)
            .with_depends_on(vec!["E02".to_string()]),
        Event::new("E04", "林默揭示真实身份", EventType::LoadBearing)
            .with_depends_on(vec!["E03".to_string()])
            .with_beat_potential(vec![BeatType::Identity]),
    ];
    bible
}

const GENERATED: &str = r#"Here is the architecture:
```json
{
  "totalEpisodes": 2,
  "episodes": [
    {
      "number": 1,
      "title": "第1集：羞辱",
      "assignedEvents": ["E01", "E02", "E99"],
      "beatMap": {
        "opening": {"type": "slap", "hookDescription": "宴会开场"},
        "climax": {"type": "info", "hookDescription": "秘密"}
      }
    },
    {
      "title": "第2集：觉醒",
      "assignedEvents": ["E03", "E04"],
      "emotionalArc": "压抑 -> 爆发",
      "estimatedDuration": 60
    }
  ]
}
```"#;

#[tokio::test]
async fn generated_architecture_is_enhanced() {
    let generator = ScriptedGenerator::new(vec![GENERATED.to_string()]);
    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default());

    let architecture = architect.generate(&bible(), Some(2)).await;

    assert!(!architecture.fallback);
    assert_eq!(generator.call_count(), 1);
    assert!(generator.prompts()[0].contains("**目标集数**：2 集"));
    assert_eq!(architecture.total_episodes, 2);

    let first = &architecture.episodes[0];
    assert_eq!(first.assigned_events, vec!["E01", "E02"]);
    assert_eq!(first.estimated_duration, 90);
    assert_eq!(first.emotional_arc, "期待 -> 紧张");

    let second = &architecture.episodes[1];
    assert_eq!(second.number, 2);
    assert_eq!(second.beat_map, default_beat_map());
    assert_eq!(second.emotional_arc, "压抑 -> 爆发");
    assert_eq!(second.estimated_duration, 60);

    assert_eq!(architecture.beat_distribution.get(&BeatType::Info), Some(&3));
    assert_eq!(architecture.beat_distribution.get(&BeatType::Slap), Some(&2));
    assert_eq!(architecture.overview.act1.episodes, "1-1");
    assert_eq!(architecture.formula, "承重事件(3) × 1.3 = 2");
}

#[tokio::test]
async fn generation_error_falls_back_to_algorithm() {
    let generator = ScriptedGenerator::with_results(vec![Err(GenerationErrorKind::Status {
        status_code: 503,
        message: "overloaded".to_string(),
    })]);
    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default());

    let architecture = architect.generate(&bible(), None).await;

    assert!(architecture.fallback);
    assert_eq!(architecture.total_episodes, 4);
    let assigned: Vec<String> = architecture
        .episodes
        .iter()
        .flat_map(|e| e.assigned_events.clone())
        .collect();
    assert_eq!(assigned, vec!["E01", "E02", "E03", "E04"]);
    assert!(architecture.episodes.iter().all(|e| e.key_characters.contains(&"C01".to_string())));
    assert!(architecture.episodes.iter().all(|e| e.beat_map.contains_key(&BeatPosition::Climax)));
}

#[tokio::test]
async fn unparseable_reply_falls_back() {
    let generator = ScriptedGenerator::new(vec!["I cannot help with that.".to_string()]);
    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default());

    let architecture = architect.generate(&bible(), Some(3)).await;
    assert!(architecture.fallback);
    assert_eq!(architecture.episodes.len(), 3);
}

#[tokio::test]
async fn reply_without_episodes_falls_back() {
    let generator = ScriptedGenerator::new(vec![r#"{"episodes": []}"#.to_string()]);
    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default());

    let architecture = architect.generate(&bible(), Some(3)).await;
    assert!(architecture.fallback);
}

#[tokio::test]
async fn disabled_generation_never_calls_generator() {
    let generator = ScriptedGenerator::new(vec![GENERATED.to_string()]);
    let config = ArchitectConfig::default().with_use_llm(false);
    let architect = EpisodeArchitect::new(&generator, config);

    let architecture = architect.generate(&bible(), Some(2)).await;
    assert!(architecture.fallback);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn refine_rejects_unknown_events() {
    let architect = EpisodeArchitect::new(OfflineGenerator, ArchitectConfig::default());
    let bible = bible();
    let mut architecture = architect.generate(&bible, Some(2)).await;

    let adjustments = EpisodeAdjustments::default().with_assigned_events(vec!["E77".to_string()]);
    let err = architect
        .refine_episode(&mut architecture, 1, &adjustments, &bible)
        .await
        .unwrap_err();
    match err.kind() {
        ReelsmithErrorKind::Architect(e) => assert!(matches!(
            &e.kind,
            ArchitectErrorKind::UnknownEvents { episode: 1, events } if events == "E77"
        )),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn refine_keeps_direct_adjustments_when_rework_fails() {
    let generator = ScriptedGenerator::new(vec!["not json at all".to_string()]);
    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default().with_use_llm(false));
    let bible = bible();
    let mut architecture = architect.generate(&bible, Some(2)).await;

    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default());
    let adjustments = EpisodeAdjustments::default()
        .with_title("第1集：新开场")
        .with_instruction("加强开场钩子");
    architect
        .refine_episode(&mut architecture, 1, &adjustments, &bible)
        .await
        .unwrap();

    assert_eq!(generator.call_count(), 1);
    assert_eq!(architecture.episodes[0].title, "第1集：新开场");
}

#[tokio::test]
async fn refine_merges_reworked_episode() {
    let generator = ScriptedGenerator::new(vec![
        r#"{"number": 1, "logline": "更强的卖点", "beatMap": {"opening": {"type": "revenge"}}}"#
            .to_string(),
    ]);
    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default().with_use_llm(false));
    let bible = bible();
    let mut architecture = architect.generate(&bible, Some(2)).await;

    let architect = EpisodeArchitect::new(&generator, ArchitectConfig::default());
    let adjustments = EpisodeAdjustments::default().with_instruction("加强卖点");
    architect
        .refine_episode(&mut architecture, 1, &adjustments, &bible)
        .await
        .unwrap();

    let episode = &architecture.episodes[0];
    assert_eq!(episode.logline, "更强的卖点");
    assert_eq!(episode.beat_map.len(), 1);
    assert_eq!(architecture.beat_distribution.get(&BeatType::Revenge), Some(&1));
    assert!(generator.prompts()[0].contains("加强卖点"));
}

#[test]
fn adjust_unknown_episode_is_an_error() {
    let architect = EpisodeArchitect::new(OfflineGenerator, ArchitectConfig::default());
    let mut architecture = architect.algorithmic(&bible(), 2);

    let err = adjust_episode(&mut architecture, 9, &EpisodeAdjustments::default()).unwrap_err();
    match err.kind() {
        ReelsmithErrorKind::Architect(e) => {
            assert_eq!(e.kind, ArchitectErrorKind::EpisodeNotFound(9))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn adjusting_beats_recomputes_distribution() {
    let architect = EpisodeArchitect::new(OfflineGenerator, ArchitectConfig::default());
    let mut architecture = architect.algorithmic(&bible(), 2);
    let before = architecture.beat_distribution.get(&BeatType::Comeback).copied();
    assert_eq!(before, None);

    let mut beats = BeatMap::new();
    beats.insert(
        BeatPosition::Climax,
        BeatAssignment::new(BeatType::Comeback, "绝地反击"),
    );
    adjust_episode(
        &mut architecture,
        2,
        &EpisodeAdjustments::default().with_beat_map(beats),
    )
    .unwrap();

    assert_eq!(architecture.beat_distribution.get(&BeatType::Comeback), Some(&1));
    let climax = &architecture.episodes[1].beat_map[&BeatPosition::Climax];
    assert_eq!(climax.hook_description, "绝地反击");
}
