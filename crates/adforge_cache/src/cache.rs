//! Context document cache implementation.

use adforge_interface::ContextDocument;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    document: ContextDocument,
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

/// Configuration for the context cache.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder)]
#[setters(prefix = "with_")]
pub struct ContextCacheConfig {
    /// Default TTL for cached entries (seconds)
    #[serde(default = "default_ttl")]
    default_ttl: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    300 // 5 minutes
}

fn default_max_size() -> usize {
    256
}

fn default_enabled() -> bool {
    true
}

impl ContextCacheConfig {
    /// Creates a new config builder.
    pub fn builder() -> ContextCacheConfigBuilder {
        ContextCacheConfigBuilder::default()
    }
}

impl Default for ContextCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

/// Cache for context documents.
///
/// Stores documents with TTL-based expiration and LRU eviction, keyed by
/// document id.
///
/// # Example
///
/// ```
/// use adforge_cache::{ContextCache, ContextCacheConfig};
/// use adforge_interface::{ContextDocument, ContextKind};
///
/// let mut cache = ContextCache::new(ContextCacheConfig::default());
///
/// let doc = ContextDocument::new("strat-1", ContextKind::Strategy, "Q3 plan", "...");
/// cache.insert(doc, Some(60));
///
/// if let Some(entry) = cache.get("strat-1") {
///     println!("Cached: {}", entry.document().title);
/// }
/// ```
pub struct ContextCache {
    config: ContextCacheConfig,
    entries: HashMap<String, CacheEntry>,
    access_order: Vec<String>,
}

impl ContextCache {
    /// Create a new context cache with configuration.
    pub fn new(config: ContextCacheConfig) -> Self {
        tracing::debug!(
            default_ttl = config.default_ttl,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new ContextCache"
        );
        Self {
            config,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Insert a document into the cache.
    ///
    /// # Arguments
    ///
    /// * `document` - The context document to cache (keyed by its id)
    /// * `ttl_seconds` - TTL in seconds (uses default if None)
    pub fn insert(&mut self, document: ContextDocument, ttl_seconds: Option<u64>) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let key = document.id.clone();
        let ttl = Duration::from_secs(ttl_seconds.unwrap_or(self.config.default_ttl));

        let entry = CacheEntry {
            document,
            created_at: Instant::now(),
            ttl,
        };

        // Evict if at capacity
        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(&key) {
            self.evict_lru();
        }

        // Track access order for LRU
        if let Some(pos) = self.access_order.iter().position(|k| k == &key) {
            self.access_order.remove(pos);
        }
        self.access_order.push(key.clone());

        tracing::debug!(id = %key, ttl = ?ttl, "Inserted document into cache");

        self.entries.insert(key, entry);
    }

    /// Get a cached document by id.
    ///
    /// Returns None if:
    /// - Entry doesn't exist
    /// - Entry is expired
    /// - Cache is disabled
    pub fn get(&mut self, id: &str) -> Option<&CacheEntry> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, returning None");
            return None;
        }

        let entry = self.entries.get(id)?;
        if entry.is_expired() {
            tracing::debug!(id, "Cache entry expired, removing");
            self.entries.remove(id);
            if let Some(pos) = self.access_order.iter().position(|k| k == id) {
                self.access_order.remove(pos);
            }
            return None;
        }

        // Update access order for LRU
        if let Some(pos) = self.access_order.iter().position(|k| k == id) {
            let key = self.access_order.remove(pos);
            self.access_order.push(key);
        }

        self.entries.get(id)
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();

        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired();
            if !keep
                && let Some(pos) = self.access_order.iter().position(|k| k == key)
            {
                self.access_order.remove(pos);
            }
            keep
        });

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

    /// Evict least recently used entry.
    fn evict_lru(&mut self) {
        if let Some(key) = self.access_order.first().cloned() {
            tracing::debug!(id = %key, "Evicting LRU entry");
            self.entries.remove(&key);
            self.access_order.remove(0);
        }
    }
}

impl Default for ContextCache {
    fn default() -> Self {
        Self::new(ContextCacheConfig::default())
    }
}
