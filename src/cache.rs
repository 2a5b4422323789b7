//! Translation cache layers.
//!
//! Both layers are keyed by the same `(source, target, text)` triple:
//!
//! - `TranslationCache` is the UI-level cache. It has no eviction and is
//!   cleared wholesale whenever the current language changes.
//! - `BoundedCache` belongs to the remote client. It survives language
//!   changes and evicts the oldest half of its entries, by insertion order,
//!   once it grows past its maximum.

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Source language sent when the caller lets the service detect it.
pub const AUTO_SOURCE: &str = "auto";

/// Identity of one unit of translatable content.
///
/// Equality is exact on all three parts; the text is not normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TranslationKey {
    pub source: String,
    pub target: String,
    pub text: String,
}

impl TranslationKey {
    pub fn new(source: impl Into<String>, target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            text: text.into(),
        }
    }
}

/// UI-level cache of finished translations.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: Mutex<HashMap<TranslationKey, String>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TranslationKey) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn set(&self, key: TranslationKey, value: String) {
        self.entries.lock().insert(key, value);
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insertion-ordered cache with coarse half eviction.
#[derive(Debug)]
pub struct BoundedCache {
    entries: IndexMap<TranslationKey, String>,
    max_size: usize,
}

impl BoundedCache {
    /// `max_size` is clamped to at least 1.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn get(&self, key: &TranslationKey) -> Option<&String> {
        self.entries.get(key)
    }

    /// Insert or overwrite an entry, then evict if over capacity.
    ///
    /// Overwriting keeps the entry's original insertion position. Returns the
    /// number of entries evicted by this insert.
    pub fn insert(&mut self, key: TranslationKey, value: String) -> usize {
        self.entries.insert(key, value);
        if self.entries.len() <= self.max_size {
            return 0;
        }

        let keep = self.max_size / 2;
        let evict = self.entries.len() - keep;
        self.entries.drain(..evict);
        debug!(evicted = evict, remaining = keep, "remote translation cache evicted oldest entries");
        evict
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
