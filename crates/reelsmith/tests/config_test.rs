use reelsmith::{ReelsmithConfig, RhythmTemplate, StylePreset};
use std::path::PathBuf;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("reelsmith-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn file_values_override_bundled_defaults() {
    let path = temp_config(
        "override",
        r#"
        [architect]
        max_episodes = 12
        rhythm_template = "fast_60"

        [storyboard]
        style_preset = "wong_kar_wai"
        use_batch = false

        [storyboard.cache]
        enabled = false
        "#,
    );

    let config = ReelsmithConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(*config.architect().max_episodes(), 12);
    assert_eq!(*config.architect().min_episodes(), 3);
    assert_eq!(*config.architect().rhythm_template(), RhythmTemplate::Fast60);
    assert_eq!(*config.storyboard().style_preset(), StylePreset::WongKarWai);
    assert!(!*config.storyboard().use_batch());
    assert!(!*config.storyboard().cache().enabled());
    assert_eq!(*config.storyboard().cache().max_size(), 500);
    assert_eq!(config.parser(), ReelsmithConfig::default().parser());
}

#[test]
fn missing_file_is_a_config_error() {
    let err = ReelsmithConfig::from_file("/nonexistent/reelsmith.toml").unwrap_err();
    assert!(err.to_string().contains("Configuration"));
}

#[test]
fn unknown_preset_is_rejected() {
    let result = ReelsmithConfig::from_toml(
        r#"
        [storyboard]
        style_preset = "spielberg"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn inverted_episode_bounds_are_rejected() {
    let err = ReelsmithConfig::from_toml(
        r#"
        [architect]
        min_episodes = 10
        max_episodes = 4
        "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("min_episodes"));
}

#[test]
fn zero_clip_ceiling_is_rejected() {
    assert!(
        ReelsmithConfig::from_toml(
            r#"
            [storyboard]
            max_clip_duration = 0
            "#
        )
        .is_err()
    );
}
