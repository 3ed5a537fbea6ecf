use reelsmith_core::{Clip, DescriptionSource, ScriptEpisode, SynthesisMode};
use reelsmith_interface::ScriptedGenerator;
use reelsmith_storyboard::{StoryboardConfig, StoryboardDirector};

fn episode(number: u32, clips: usize) -> ScriptEpisode {
    ScriptEpisode {
        number,
        title: format!("第{}集", number),
        logline: String::new(),
        total_duration: 60,
        clips: (1..=clips)
            .map(|i| Clip::new(format!("E{number}C{i:02}"), "Lin waits in the Great Hall", "紧张"))
            .collect(),
    }
}

fn batch(count: usize) -> String {
    let items = vec![r#"{"subject": "Lin", "camera": "close-up"}"#; count];
    format!("[{}]", items.join(","))
}

#[tokio::test]
async fn failed_episode_falls_back_without_affecting_others() {
    // Episode 2 gets a reply that cannot be parsed.
    let generator = ScriptedGenerator::new(vec![
        batch(2),
        "no descriptions today".to_string(),
        batch(1),
    ]);
    let mut director = StoryboardDirector::new(generator.clone(), StoryboardConfig::default());

    let script = vec![episode(3, 1), episode(1, 2), episode(2, 2)];
    let storyboard = director.direct(&script, &[]).await;

    let numbers: Vec<u32> = storyboard.episodes.iter().map(|e| e.episode_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(generator.call_count(), 3);

    assert_eq!(storyboard.failed_episodes.len(), 1);
    assert_eq!(storyboard.failed_episodes[0].number, 2);
    assert!(storyboard.failed_episodes[0].error.contains("Unparseable"));

    let first = &storyboard.episodes[0];
    assert!(!first.fallback);
    assert_eq!(first.mode, SynthesisMode::Batched);
    assert!(first.clips.iter().all(|c| c.source == DescriptionSource::Llm));

    let second = &storyboard.episodes[1];
    assert!(second.fallback);
    assert_eq!(second.mode, SynthesisMode::TemplateOnly);
    assert_eq!(second.clips.len(), 2);
    assert!(second.clips.iter().all(|c| c.clip.prompt.is_some()));

    assert!(!storyboard.episodes[2].fallback);
}

#[tokio::test]
async fn empty_episode_is_recorded_as_failed() {
    let generator = ScriptedGenerator::new(vec![batch(1)]);
    let mut director = StoryboardDirector::new(generator, StoryboardConfig::default());

    let script = vec![episode(1, 1), episode(2, 0)];
    let storyboard = director.direct(&script, &[]).await;

    assert_eq!(storyboard.episodes.len(), 2);
    assert_eq!(storyboard.failed_episodes.len(), 1);
    assert_eq!(storyboard.failed_episodes[0].number, 2);
    assert!(storyboard.episodes[1].fallback);
    assert!(storyboard.episodes[1].clips.is_empty());
}

#[tokio::test]
async fn template_configuration_never_fails() {
    let generator = ScriptedGenerator::default();
    let config = StoryboardConfig::default().with_use_llm(false);
    let mut director = StoryboardDirector::new(generator.clone(), config);

    let storyboard = director.direct(&[episode(1, 3)], &[]).await;
    assert!(storyboard.failed_episodes.is_empty());
    assert_eq!(generator.call_count(), 0);
    let clips = &storyboard.episodes[0].clips;
    assert_eq!(
        clips.iter().map(|c| c.clip.time_code.start).collect::<Vec<_>>(),
        vec![0, 10, 20]
    );
    assert!(clips.iter().all(|c| {
        c.clip.prompt.as_ref().unwrap().d2_environment.starts_with("{@loc_")
    }));
}
