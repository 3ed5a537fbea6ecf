//! Prompt cache implementation.

use derive_getters::Getters;
use reelsmith_core::VisualDescription;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: VisualDescription,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }
}

/// Content-derived cache key for one clip description.
///
/// Two clips with the same visual text, emotion and style share a key
/// regardless of their ids or positions.
///
/// # Examples
///
/// ```
/// use reelsmith_cache::PromptKey;
///
/// let a = PromptKey::new("Lin in the rain", "紧张", "hitchcock");
/// let b = PromptKey::new("Lin in the rain", "紧张", "hitchcock");
/// let c = PromptKey::new("Lin in the rain", "紧张", "kubrick");
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptKey {
    style: String,
    content_hash: u64,
}

impl PromptKey {
    /// Derive a key from clip content and style name.
    pub fn new(visual: &str, emotion: &str, style: &str) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        visual.trim().hash(&mut hasher);
        emotion.trim().hash(&mut hasher);
        Self {
            style: style.to_string(),
            content_hash: hasher.finish(),
        }
    }
}

/// Configuration for the prompt cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct PromptCacheConfig {
    /// TTL for cached entries (seconds)
    #[serde(default = "default_ttl")]
    #[builder(default = "default_ttl()")]
    ttl_seconds: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    #[builder(default = "default_max_size()")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    #[builder(default = "default_enabled()")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    3600
}

fn default_max_size() -> usize {
    500
}

fn default_enabled() -> bool {
    true
}

impl Default for PromptCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

/// Cache of synthesized visual descriptions.
///
/// Owned by one synthesizer for the lifetime of one job; never shared
/// process-wide.
///
/// # Example
///
/// ```
/// use reelsmith_cache::{PromptCache, PromptCacheConfig, PromptKey};
/// use reelsmith_core::VisualDescription;
///
/// let mut cache = PromptCache::new(PromptCacheConfig::default());
/// let key = PromptKey::new("Lin in the rain", "紧张", "hitchcock");
///
/// cache.insert(key.clone(), VisualDescription::default());
/// assert!(cache.get(&key).is_some());
/// ```
#[derive(Debug)]
pub struct PromptCache {
    config: PromptCacheConfig,
    entries: HashMap<PromptKey, CacheEntry>,
    access_order: Vec<PromptKey>,
}

impl PromptCache {
    /// Create a new prompt cache with configuration.
    pub fn new(config: PromptCacheConfig) -> Self {
        tracing::debug!(
            ttl_seconds = config.ttl_seconds,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new PromptCache"
        );
        Self {
            config,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Insert a description into the cache.
    #[tracing::instrument(
        skip(self, value),
        fields(style = %key.style, cache_size = self.entries.len())
    )]
    pub fn insert(&mut self, key: PromptKey, value: VisualDescription) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }
        if self.config.max_size == 0 {
            return;
        }

        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl: Duration::from_secs(self.config.ttl_seconds),
        };

        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(&key) {
            self.evict_lru();
        }

        self.touch(&key);
        self.entries.insert(key, entry);
        tracing::debug!("Inserted entry into cache");
    }

    /// Get a cached description.
    ///
    /// Returns None if the entry doesn't exist, is expired, or the cache is disabled.
    #[tracing::instrument(skip(self), fields(style = %key.style, cache_size = self.entries.len()))]
    pub fn get(&mut self, key: &PromptKey) -> Option<&VisualDescription> {
        if !self.config.enabled {
            return None;
        }

        let expired = self.entries.get(key)?.is_expired();
        if expired {
            tracing::debug!("Cache entry expired, removing");
            self.entries.remove(key);
            self.access_order.retain(|k| k != key);
            return None;
        }

        self.touch(key);
        let entry = self.entries.get(key)?;
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(&entry.value)
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let entries = &self.entries;
        self.access_order.retain(|k| entries.contains_key(k));

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = self.entries.len(), "Cleaned up expired cache entries");
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &PromptKey) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
        self.access_order.push(key.clone());
    }

    fn evict_lru(&mut self) {
        if self.access_order.is_empty() {
            return;
        }
        let key = self.access_order.remove(0);
        tracing::debug!(style = %key.style, "Evicting LRU entry");
        self.entries.remove(&key);
    }
}

impl Default for PromptCache {
    fn default() -> Self {
        Self::new(PromptCacheConfig::default())
    }
}
