//! Process-scoped secret cache
//!
//! Entries never expire and are only replaced by a newer successful fetch
//! of the same identifier. Implementations must be safe to share between
//! concurrent resolutions; redundant writes of the same value are expected.

use crate::security::SecureString;
use crate::types::SecretId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Minimal capability set the resolver needs from a cache
pub trait SecretCache: Send + Sync {
    /// Look up a cached value. Absence is a normal outcome.
    fn get(&self, id: &SecretId) -> Option<SecureString>;

    /// Store a value, replacing any previous one for `id`
    fn set(&self, id: &SecretId, value: SecureString);
}

/// Statistics about cache usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// In-memory cache guarded by a reader/writer lock
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<SecretId, SecureString>>,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check for an entry without touching the hit/miss counters
    pub fn contains(&self, id: &SecretId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl SecretCache for MemoryCache {
    fn get(&self, id: &SecretId) -> Option<SecureString> {
        let value = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned();

        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    fn set(&self, id: &SecretId, value: SecureString) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), value);
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("stats", &self.stats())
            .finish()
    }
}
