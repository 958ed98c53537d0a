use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Cache statistics snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries physically held, including expired ones not yet purged.
    pub stored_entries: usize,
    /// Entries a `get` would return right now.
    pub live_entries: usize,
    /// `get` calls that returned a value.
    pub hits: u64,
    /// `get` calls that returned nothing.
    pub misses: u64,
    /// Expired entries removed by reads, counts, purges, and sweeps.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of `get` calls that hit, or `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Entries held in memory that are already expired.
    pub fn expired_entries(&self) -> usize {
        self.stored_entries.saturating_sub(self.live_entries)
    }
}

/// Running counters, updated outside the store lock.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Counters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evictions(&self, count: usize) {
        if count > 0 {
            self.evictions.fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self, stored_entries: usize, live_entries: usize) -> CacheStats {
        CacheStats {
            stored_entries,
            live_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
