use std::collections::HashMap;
use std::num::NonZeroUsize;

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::shared::encoded_crop::ContentHash;
use crate::shared::identity::IdentityLabel;

/// Which recognition outcomes get remembered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Cache every answer the service gave, including "Unknown".
    /// Failed calls are not cached and get retried on the next sighting.
    #[default]
    ServerResponses,
    /// Also cache the "Unknown" substituted for a failed call, so that
    /// exact crop is never sent again.
    IncludeFailures,
}

impl CachePolicy {
    pub fn caches_failures(self) -> bool {
        self == CachePolicy::IncludeFailures
    }
}

enum Entries {
    Unbounded(HashMap<ContentHash, IdentityLabel>),
    Bounded(LruCache<ContentHash, IdentityLabel>),
}

/// In-memory map from crop content hash to the label obtained for it.
///
/// Lives as long as its owner; nothing is persisted. Unbounded unless
/// built with a capacity, in which case the least recently used entry is
/// evicted first.
pub struct ResponseCache {
    entries: Entries,
}

impl ResponseCache {
    pub fn unbounded() -> Self {
        Self {
            entries: Entries::Unbounded(HashMap::new()),
        }
    }

    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Entries::Bounded(LruCache::new(capacity)),
        }
    }

    /// `None` or `Some(0)` gives an unbounded cache.
    pub fn with_capacity_limit(capacity: Option<usize>) -> Self {
        match capacity.and_then(NonZeroUsize::new) {
            Some(cap) => Self::bounded(cap),
            None => Self::unbounded(),
        }
    }

    pub fn get(&mut self, hash: &ContentHash) -> Option<IdentityLabel> {
        match &mut self.entries {
            Entries::Unbounded(map) => map.get(hash).cloned(),
            Entries::Bounded(lru) => lru.get(hash).cloned(),
        }
    }

    pub fn put(&mut self, hash: ContentHash, label: IdentityLabel) {
        match &mut self.entries {
            Entries::Unbounded(map) => {
                map.insert(hash, label);
            }
            Entries::Bounded(lru) => {
                lru.put(hash, label);
            }
        }
    }

    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Unbounded(map) => map.len(),
            Entries::Bounded(lru) => lru.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
