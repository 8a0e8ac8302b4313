//! Bounded memo of normalization results keyed by the exact input string

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use super::NormalizedText;

pub struct NormalizationCache {
    entries: Mutex<LruCache<String, NormalizedText>>,
}

impl NormalizationCache {
    /// `None` when `capacity` is zero, meaning caching is disabled
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(|cap| Self {
            entries: Mutex::new(LruCache::new(cap)),
        })
    }

    pub fn get_or_insert_with<F>(&self, raw: &str, normalize: F) -> NormalizedText
    where
        F: FnOnce(&str) -> NormalizedText,
    {
        if let Some(hit) = self.entries.lock().get(raw) {
            return hit.clone();
        }

        // Normalize outside the lock; a racing insert of the same key is harmless
        let normalized = normalize(raw);
        self.entries.lock().put(raw.to_string(), normalized.clone());
        normalized
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

impl std::fmt::Debug for NormalizationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("NormalizationCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
