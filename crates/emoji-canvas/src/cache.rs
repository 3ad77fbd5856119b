//! Emoji bitmap cache.
//!
//! Decoded emoji are kept for the lifetime of the cache, keyed by the image
//! identifier the mapper produced (usually a URL). Entries are never
//! evicted.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use emoji_canvas::EmojiCache;
//!
//! // Process-wide cache shared by default renderers.
//! let global: Arc<EmojiCache> = EmojiCache::global();
//!
//! // Or an isolated one, e.g. per test.
//! let local = Arc::new(EmojiCache::new());
//! assert!(local.is_empty());
//! # let _ = global;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::trace;

use crate::bitmap::EmojiBitmap;
use crate::logging::targets;

static GLOBAL_CACHE: OnceLock<Arc<EmojiCache>> = OnceLock::new();

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of lookups that found an entry.
    pub hits: u64,
    /// Number of lookups that found nothing.
    pub misses: u64,
    /// Number of cached entries.
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups that were hits, or 0 if there were none.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Append-only map from image identifier to decoded bitmap.
///
/// Safe for concurrent reads and inserts. Inserting an identifier twice
/// replaces the entry.
#[derive(Debug, Default)]
pub struct EmojiCache {
    entries: RwLock<HashMap<String, Arc<EmojiBitmap>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmojiCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    ///
    /// Created on first use and never cleared.
    pub fn global() -> Arc<EmojiCache> {
        GLOBAL_CACHE
            .get_or_init(|| Arc::new(EmojiCache::new()))
            .clone()
    }

    /// Look up `identifier`, counting a hit or a miss.
    pub fn get(&self, identifier: &str) -> Option<Arc<EmojiBitmap>> {
        let found = self.entries.read().get(identifier).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        trace!(
            target: targets::CACHE,
            identifier,
            hit = found.is_some(),
            "emoji cache lookup"
        );
        found
    }

    /// Store `bitmap` under `identifier` and return the shared handle.
    pub fn insert(&self, identifier: impl Into<String>, bitmap: EmojiBitmap) -> Arc<EmojiBitmap> {
        let identifier = identifier.into();
        let bitmap = Arc::new(bitmap);
        trace!(
            target: targets::CACHE,
            identifier = identifier.as_str(),
            width = bitmap.natural_width(),
            height = bitmap.natural_height(),
            "caching emoji bitmap"
        );
        self.entries.write().insert(identifier, Arc::clone(&bitmap));
        bitmap
    }

    /// Returns `true` if `identifier` is cached. Does not touch the counters.
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.read().contains_key(identifier)
    }

    /// Number of cached bitmaps.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
