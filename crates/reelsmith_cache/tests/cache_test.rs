use reelsmith_cache::{PromptCache, PromptCacheConfig, PromptCacheConfigBuilder, PromptKey};
use reelsmith_core::VisualDescription;

fn description(subject: &str) -> VisualDescription {
    VisualDescription {
        subject: subject.to_string(),
        ..Default::default()
    }
}

#[test]
fn hit_returns_inserted_description() {
    let mut cache = PromptCache::default();
    let key = PromptKey::new("rain", "calm", "neutral_cinematic");
    cache.insert(key.clone(), description("Lin"));

    let hit = cache.get(&key).cloned();
    assert_eq!(hit.map(|d| d.subject), Some("Lin".to_string()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn key_ignores_surrounding_whitespace() {
    assert_eq!(
        PromptKey::new(" rain ", "calm", "kubrick"),
        PromptKey::new("rain", "calm ", "kubrick")
    );
    assert_ne!(
        PromptKey::new("rain", "calm", "kubrick"),
        PromptKey::new("rain", "tense", "kubrick")
    );
}

#[test]
fn disabled_cache_stores_nothing() {
    let mut cache = PromptCache::new(PromptCacheConfig::default().with_enabled(false));
    let key = PromptKey::new("rain", "calm", "kubrick");
    cache.insert(key.clone(), description("Lin"));
    assert!(cache.get(&key).is_none());
    assert!(cache.is_empty());
}

#[test]
fn evicts_least_recently_used() {
    let config = PromptCacheConfigBuilder::default().max_size(2).build().unwrap();
    let mut cache = PromptCache::new(config);
    let a = PromptKey::new("a", "", "s");
    let b = PromptKey::new("b", "", "s");
    let c = PromptKey::new("c", "", "s");

    cache.insert(a.clone(), description("a"));
    cache.insert(b.clone(), description("b"));
    // Touch `a` so `b` becomes the eviction candidate.
    assert!(cache.get(&a).is_some());
    cache.insert(c.clone(), description("c"));

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&a).is_some());
    assert!(cache.get(&b).is_none());
    assert!(cache.get(&c).is_some());
}

#[test]
fn zero_ttl_entries_expire() {
    let mut cache = PromptCache::new(PromptCacheConfig::default().with_ttl_seconds(0));
    let key = PromptKey::new("rain", "calm", "kubrick");
    cache.insert(key.clone(), description("Lin"));
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert!(cache.get(&key).is_none());
    assert_eq!(cache.cleanup_expired(), 0);
}

#[test]
fn config_deserializes_with_defaults() {
    let config: PromptCacheConfig = toml::from_str("max_size = 10").unwrap();
    assert_eq!(*config.max_size(), 10);
    assert_eq!(*config.ttl_seconds(), 3600);
    assert!(*config.enabled());
}

#[test]
fn clear_empties_cache() {
    let mut cache = PromptCache::default();
    cache.insert(PromptKey::new("a", "", "s"), description("a"));
    cache.clear();
    assert!(cache.is_empty());
}
