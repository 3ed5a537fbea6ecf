//! Prompt caching with TTL and LRU eviction.
//!
//! Per-clip synthesis caches each visual description under a key derived from
//! the clip's content, so identical clips in one job cost one external call.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheEntry, PromptCache, PromptCacheConfig, PromptCacheConfigBuilder, PromptKey};
