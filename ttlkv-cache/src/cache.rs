//! Concurrent TTL cache.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use ttlkv_core::clock::SystemClock;
use ttlkv_core::config::CacheConfig;
use ttlkv_core::constants::MIN_SWEEP_INTERVAL;
use ttlkv_core::error::{CacheError, Result};
use ttlkv_core::traits::Clock;
use ttlkv_core::types::Ttl;

use crate::entry::Entry;
use crate::stats::{CacheStats, Counters};
use crate::sweeper::SweeperHandle;

/// Shared state behind every handle of one cache.
pub(crate) struct CacheInner<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    clock: Arc<dyn Clock>,
    default_ttl: Option<Ttl>,
    counters: Counters,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl<K: Eq + Hash, V> CacheInner<K, V> {
    fn new(clock: Arc<dyn Clock>, default_ttl: Option<Ttl>, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            clock,
            default_ttl,
            counters: Counters::default(),
            sweeper: Mutex::new(None),
        }
    }

    /// Removes every expired entry, returning how many were dropped.
    pub(crate) fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let now = self.clock.now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        self.counters.record_evictions(removed);
        removed
    }
}

/// In-memory key-value cache with optional per-entry expiry.
///
/// Thread-safe; clone the handle to share it. Every clone sees the same
/// entries, and independent caches never share state.
///
/// # Expiry
///
/// An entry written with TTL `d` at instant `t` is expired at every instant
/// `>= t + d`, so a zero TTL is expired immediately. Expired entries are never
/// returned. They are removed:
/// - lazily, when a read finds them
/// - during [`count`](Self::count), so the count reflects live entries only
/// - by [`purge_expired`](Self::purge_expired) or the background sweeper
///
/// # Locking
///
/// One `RwLock` guards the map. Reads of live entries share the lock; removing
/// an expired entry found by a read is a separate exclusive step that re-checks
/// expiry, so a concurrent overwrite is never discarded.
pub struct TtlCache<K, V> {
    inner: Arc<CacheInner<K, V>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// Creates a cache on the system clock with no default TTL and no sweeper.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a cache driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(CacheInner::new(clock, None, 0)),
        }
    }

    /// Stores `value` under `key`, replacing any previous entry and its expiry.
    ///
    /// The entry never expires unless the cache was configured with a default
    /// TTL, in which case that TTL applies.
    pub fn set(&self, key: K, value: V) {
        self.insert(key, value, self.inner.default_ttl);
    }

    /// Stores `value` under `key` with an expiry of `now + ttl`.
    ///
    /// Accepts a [`Duration`], whole seconds, fractional seconds, or a signed
    /// `chrono::Duration`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NegativeTtl`], [`CacheError::InvalidTtl`] or
    /// [`CacheError::TtlOutOfRange`] when the TTL is unusable. The cache is
    /// left untouched in that case.
    pub fn set_with_ttl<T>(&self, key: K, value: V, ttl: T) -> Result<()>
    where
        T: TryInto<Ttl, Error = CacheError>,
    {
        let ttl = ttl.try_into()?;
        self.insert(key, value, Some(ttl));
        Ok(())
    }

    /// Stores `value` under `key` with an already validated, optional TTL.
    ///
    /// `None` means the entry never expires; the default TTL is not applied.
    pub fn insert(&self, key: K, value: V, ttl: Option<Ttl>) {
        let mut entries = self.inner.entries.write();
        let now = self.inner.clock.now();
        let expires_at = ttl.and_then(|ttl| ttl.expires_at(now));
        trace!(ttl = ?ttl.map(|t| t.as_duration()), "Storing entry");
        entries.insert(key, Entry::new(value, expires_at));
    }

    /// Returns a copy of the live value stored under `key`.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.read_live(key, |entry, _| entry.value().clone());
        match value {
            Some(_) => self.inner.counters.record_hit(),
            None => self.inner.counters.record_miss(),
        }
        value
    }

    /// Returns true if a live entry exists for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read_live(key, |_, _| ()).is_some()
    }

    /// Time left before `key` expires.
    ///
    /// `None` if there is no live entry, `Some(None)` if the entry never
    /// expires.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read_live(key, |entry, now| entry.remaining(now))
    }

    /// Replaces the expiry of a live entry with `now + ttl` (`None` makes it
    /// permanent). Returns false if there is no live entry.
    pub fn touch<Q>(&self, key: &Q, ttl: Option<Ttl>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut entries = self.inner.entries.write();
        let now = self.inner.clock.now();
        let expired = match entries.get_mut(key) {
            None => return false,
            Some(entry) if entry.is_expired_at(now) => true,
            Some(entry) => {
                entry.set_expires_at(ttl.and_then(|ttl| ttl.expires_at(now)));
                false
            }
        };
        if expired {
            entries.remove(key);
            self.inner.counters.record_evictions(1);
        }
        !expired
    }

    /// Removes `key`. Returns whether an entry (live or not) was present.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.entries.write().remove(key).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut entries = self.inner.entries.write();
        let removed = entries.len();
        entries.clear();
        debug!(removed, "Cleared cache");
    }

    /// Number of live entries. Expired entries are purged along the way.
    pub fn count(&self) -> usize {
        let mut entries = self.inner.entries.write();
        let now = self.inner.clock.now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        self.inner.counters.record_evictions(before - entries.len());
        entries.len()
    }

    /// Returns true if there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Removes all expired entries now. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.inner.purge_expired()
    }

    /// Returns a statistics snapshot without mutating the store.
    pub fn stats(&self) -> CacheStats {
        let entries = self.inner.entries.read();
        let now = self.inner.clock.now();
        let live = entries.values().filter(|e| !e.is_expired_at(now)).count();
        self.inner.counters.snapshot(entries.len(), live)
    }

    /// Runs `f` on the live entry for `key`, evicting it instead if expired.
    fn read_live<Q, R>(&self, key: &Q, f: impl FnOnce(&Entry<V>, Instant) -> R) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let observed = {
            let entries = self.inner.entries.read();
            let now = self.inner.clock.now();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired_at(now) => return Some(f(entry, now)),
                Some(_) => now,
            }
        };

        // Compare-and-delete: a writer may have replaced the entry since.
        let mut entries = self.inner.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired_at(observed)) {
            entries.remove(key);
            self.inner.counters.record_evictions(1);
            trace!("Evicted expired entry on read");
        }
        None
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache on the system clock from `config`.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid, or if it enables sweeping and no Tokio
    /// runtime is running.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        Self::with_config_and_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache driven by `clock` from `config`.
    pub fn with_config_and_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let default_ttl = config.default_ttl.map(Ttl::try_from).transpose()?;

        let cache = Self {
            inner: Arc::new(CacheInner::new(clock, default_ttl, config.initial_capacity)),
        };
        if let Some(interval) = config.sweep_interval {
            cache.start_sweeper(interval)?;
        }
        Ok(cache)
    }

    /// Starts purging expired entries every `interval` on the current Tokio
    /// runtime, replacing any sweeper already running for this cache.
    ///
    /// The sweeper stops on [`stop_sweeper`](Self::stop_sweeper),
    /// [`shutdown`](Self::shutdown), or when the last handle is dropped.
    pub fn start_sweeper(&self, interval: Duration) -> Result<()> {
        if interval < MIN_SWEEP_INTERVAL {
            return Err(CacheError::ConfigError(format!(
                "sweep interval {interval:?} is below the minimum of {MIN_SWEEP_INTERVAL:?}"
            )));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CacheError::NoRuntime(e.to_string()))?;

        let handle = SweeperHandle::spawn(&runtime, Arc::downgrade(&self.inner), interval);
        let previous = self.inner.sweeper.lock().replace(handle);
        // Dropping the old handle signals its task
        drop(previous);

        debug!(?interval, "Started sweeper");
        Ok(())
    }

    /// Signals the sweeper to stop without waiting. Returns whether one was running.
    pub fn stop_sweeper(&self) -> bool {
        self.inner.sweeper.lock().take().is_some()
    }

    /// Stops the sweeper and waits for its task to finish.
    pub async fn shutdown(&self) {
        let handle = self.inner.sweeper.lock().take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    /// Returns true while a sweeper task is running.
    pub fn is_sweeping(&self) -> bool {
        self.inner
            .sweeper
            .lock()
            .as_ref()
            .is_some_and(SweeperHandle::is_running)
    }
}

impl<K: Eq + Hash, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ttlkv_core::clock::ManualClock;

    fn cache_with_clock<V: Clone>() -> (TtlCache<String, V>, ManualClock) {
        let clock = ManualClock::new();
        (TtlCache::with_clock(Arc::new(clock.clone())), clock)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_set_get_round_trip() {
        let (cache, _) = cache_with_clock();
        cache.set("k".to_string(), "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<String, u32> = TtlCache::new();
        assert_eq!(cache.get("nonexistent"), None);
        assert!(!cache.contains_key("nonexistent"));
    }

    #[test]
    fn test_ttl_expiry() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("k".to_string(), "v", secs(5)).unwrap();

        clock.advance(Duration::from_millis(4_999));
        assert_eq!(cache.get("k"), Some("v"));

        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_expired_entry_evicted_on_read() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("k".to_string(), 1u8, secs(1)).unwrap();
        clock.advance(secs(2));

        assert_eq!(cache.stats().stored_entries, 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats().stored_entries, 0);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_non_expiring_entry() {
        let (cache, clock) = cache_with_clock();
        cache.set("k".to_string(), "v");
        clock.advance(secs(10 * 365 * 24 * 3600));
        assert_eq!(cache.get("k"), Some("v"));
        assert_eq!(cache.ttl_remaining("k"), Some(None));
    }

    #[test]
    fn test_overwrite_resets_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("k".to_string(), "v1", secs(5)).unwrap();
        clock.advance(secs(3));
        cache.set("k".to_string(), "v2");
        clock.advance(secs(7));
        assert_eq!(cache.get("k"), Some("v2"));
    }

    #[test]
    fn test_overwrite_with_shorter_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k".to_string(), "forever");
        cache.set_with_ttl("k".to_string(), "brief", secs(1)).unwrap();
        clock.advance(secs(1));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_zero_ttl_is_immediately_absent() {
        let (cache, _) = cache_with_clock();
        cache.set_with_ttl("k".to_string(), "v", Duration::ZERO).unwrap();
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_negative_ttl_rejected_without_mutation() {
        let (cache, _) = cache_with_clock();
        cache.set("k".to_string(), "old");

        let err = cache.set_with_ttl("k".to_string(), "new", -3i64).unwrap_err();
        assert!(matches!(err, CacheError::NegativeTtl(_)));
        assert_eq!(cache.get("k"), Some("old"));

        let err = cache
            .set_with_ttl("k".to_string(), "new", chrono::Duration::milliseconds(-1))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(cache.get("k"), Some("old"));
    }

    #[test]
    fn test_ttl_accepts_seconds() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("a".to_string(), 1, 2u64).unwrap();
        cache.set_with_ttl("b".to_string(), 2, 0.5f64).unwrap();
        clock.advance(Duration::from_millis(500));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_delete() {
        let (cache, _) = cache_with_clock();
        cache.set("k".to_string(), 1);
        assert!(cache.delete("k"));
        assert_eq!(cache.get("k"), None);
        // Deleting an absent key is a no-op
        assert!(!cache.delete("k"));
    }

    #[test]
    fn test_clear() {
        let (cache, _) = cache_with_clock();
        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.set_with_ttl("c".to_string(), 3, secs(60)).unwrap();
        cache.clear();
        assert_eq!(cache.count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_count_only_live_entries() {
        let (cache, clock) = cache_with_clock();
        cache.set("a".to_string(), 1);
        cache.set_with_ttl("b".to_string(), 2, secs(1)).unwrap();
        assert_eq!(cache.count(), 2);

        clock.advance(Duration::from_millis(1_001));
        assert_eq!(cache.stats().live_entries, 1);
        assert_eq!(cache.count(), 1);
        assert_eq!(cache.stats().stored_entries, 1);
    }

    #[test]
    fn test_ttl_remaining() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("k".to_string(), (), secs(10)).unwrap();
        clock.advance(secs(4));
        assert_eq!(cache.ttl_remaining("k"), Some(Some(secs(6))));
        clock.advance(secs(6));
        assert_eq!(cache.ttl_remaining("k"), None);
    }

    #[test]
    fn test_touch() {
        let (cache, clock) = cache_with_clock();
        let ttl = Ttl::try_from(secs(5)).unwrap();
        cache.insert("k".to_string(), 1, Some(ttl));

        clock.advance(secs(4));
        assert!(cache.touch("k", Some(ttl)));
        clock.advance(secs(4));
        assert_eq!(cache.get("k"), Some(1));

        assert!(cache.touch("k", None));
        clock.advance(secs(100));
        assert_eq!(cache.get("k"), Some(1));

        assert!(!cache.touch("missing", None));
    }

    #[test]
    fn test_touch_does_not_revive_expired() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("k".to_string(), 1, secs(1)).unwrap();
        clock.advance(secs(1));
        assert!(!cache.touch("k", None));
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats().stored_entries, 0);
    }

    #[test]
    fn test_purge_expired() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("a".to_string(), 1, secs(1)).unwrap();
        cache.set_with_ttl("b".to_string(), 2, secs(1)).unwrap();
        cache.set("c".to_string(), 3);
        clock.advance(secs(1));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_stats_hits_and_misses() {
        let (cache, _) = cache_with_clock();
        cache.set("a".to_string(), 1);
        cache.get("a");
        cache.get("a");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.live_entries, 1);
    }

    #[test]
    fn test_clones_share_store() {
        let (cache, _) = cache_with_clock();
        let other = cache.clone();
        cache.set("k".to_string(), 7);
        assert_eq!(other.get("k"), Some(7));

        let independent: TtlCache<String, i32> = TtlCache::new();
        assert_eq!(independent.get("k"), None);
    }

    #[test]
    fn test_default_ttl_from_config() {
        let clock = ManualClock::new();
        let config = CacheConfig::default().with_default_ttl(secs(30));
        let cache: TtlCache<String, &str> =
            TtlCache::with_config_and_clock(config, Arc::new(clock.clone())).unwrap();

        cache.set("default".to_string(), "d");
        cache.insert("forever".to_string(), "f", None);
        clock.advance(secs(30));

        assert_eq!(cache.get("default"), None);
        assert_eq!(cache.get("forever"), Some("f"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CacheConfig::default().with_sweep_interval(Duration::from_millis(1));
        let result: Result<TtlCache<String, u8>> = TtlCache::with_config(config);
        assert!(matches!(result, Err(CacheError::ConfigError(_))));
    }

    #[test]
    fn test_sweeper_requires_runtime() {
        let cache: TtlCache<String, u8> = TtlCache::new();
        let result = cache.start_sweeper(secs(1));
        assert!(matches!(result, Err(CacheError::NoRuntime(_))));
        assert!(!cache.is_sweeping());
    }

    #[test]
    fn test_concurrent_set_get_distinct_keys() {
        let cache: TtlCache<String, usize> = TtlCache::new();

        std::thread::scope(|scope| {
            for i in 0..32 {
                let cache = cache.clone();
                scope.spawn(move || {
                    for round in 0..200 {
                        let key = format!("thread-{i}");
                        let value = i * 1_000 + round;
                        cache.set(key.clone(), value);
                        assert_eq!(cache.get(&key), Some(value));
                    }
                });
            }
        });

        assert_eq!(cache.count(), 32);
        for i in 0..32 {
            assert_eq!(cache.get(&format!("thread-{i}")), Some(i * 1_000 + 199));
        }
    }

    #[test]
    fn test_concurrent_eviction_never_drops_fresh_write() {
        let clock = ManualClock::new();
        let cache: TtlCache<&str, u32> = TtlCache::with_clock(Arc::new(clock.clone()));

        for _ in 0..100 {
            cache.set_with_ttl("hot", 0, Duration::ZERO).unwrap();
            std::thread::scope(|scope| {
                let reader = cache.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        reader.get("hot");
                    }
                });
                cache.set("hot", 1);
            });
            // The non-expiring write must survive any racing eviction
            assert_eq!(cache.get("hot"), Some(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_unread_entries() {
        let clock = ManualClock::new();
        let cache: TtlCache<String, u32> = TtlCache::with_clock(Arc::new(clock.clone()));
        cache.set_with_ttl("a".to_string(), 1, secs(1)).unwrap();
        cache.set("b".to_string(), 2);

        cache.start_sweeper(Duration::from_millis(50)).unwrap();
        assert!(cache.is_sweeping());

        clock.advance(secs(2));
        tokio::time::sleep(Duration::from_millis(200)).await;

        let stats = cache.stats();
        assert_eq!(stats.stored_entries, 1);
        assert_eq!(stats.evictions, 1);

        cache.shutdown().await;
        assert!(!cache.is_sweeping());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_from_config() {
        let clock = ManualClock::new();
        let config = CacheConfig::default().with_sweep_interval(Duration::from_millis(100));
        let cache: TtlCache<String, u32> =
            TtlCache::with_config_and_clock(config, Arc::new(clock.clone())).unwrap();
        assert!(cache.is_sweeping());

        assert!(cache.stop_sweeper());
        assert!(!cache.stop_sweeper());
        assert!(!cache.is_sweeping());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarting_sweeper_replaces_previous() {
        let cache: TtlCache<String, u32> = TtlCache::new();
        cache.start_sweeper(Duration::from_millis(100)).unwrap();
        cache.start_sweeper(Duration::from_millis(200)).unwrap();
        assert!(cache.is_sweeping());
        cache.shutdown().await;
        assert!(!cache.is_sweeping());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_does_not_keep_cache_alive() {
        let cache: TtlCache<String, u32> = TtlCache::new();
        cache.start_sweeper(Duration::from_millis(10)).unwrap();
        let weak = Arc::downgrade(&cache.inner);

        drop(cache);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(weak.upgrade().is_none());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Set(u8, u32, Option<u64>),
        Get(u8),
        Delete(u8),
        Advance(u64),
        Count,
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6, any::<u32>(), proptest::option::of(0u64..8))
                .prop_map(|(k, v, ttl)| Op::Set(k, v, ttl)),
            (0u8..6).prop_map(Op::Get),
            (0u8..6).prop_map(Op::Delete),
            (0u64..6).prop_map(Op::Advance),
            Just(Op::Count),
            Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_reference_model(ops in proptest::collection::vec(op_strategy(), 1..120)) {
            let clock = ManualClock::new();
            let cache: TtlCache<u8, u32> = TtlCache::with_clock(Arc::new(clock.clone()));
            // key -> (value, absolute expiry in seconds)
            let mut model: HashMap<u8, (u32, Option<u64>)> = HashMap::new();
            let mut now = 0u64;

            let live = |model: &HashMap<u8, (u32, Option<u64>)>, now: u64, k: u8| {
                model
                    .get(&k)
                    .filter(|(_, exp)| exp.map_or(true, |exp| exp > now))
                    .map(|(v, _)| *v)
            };

            for op in ops {
                match op {
                    Op::Set(k, v, ttl) => {
                        match ttl {
                            Some(t) => cache.set_with_ttl(k, v, t).unwrap(),
                            None => cache.set(k, v),
                        }
                        model.insert(k, (v, ttl.map(|t| now + t)));
                    }
                    Op::Get(k) => {
                        prop_assert_eq!(cache.get(&k), live(&model, now, k));
                    }
                    Op::Delete(k) => {
                        cache.delete(&k);
                        model.remove(&k);
                    }
                    Op::Advance(by) => {
                        clock.advance(Duration::from_secs(by));
                        now += by;
                    }
                    Op::Count => {
                        let expected = model.keys().filter(|k| live(&model, now, **k).is_some()).count();
                        prop_assert_eq!(cache.count(), expected);
                    }
                    Op::Clear => {
                        cache.clear();
                        model.clear();
                    }
                }
            }
        }
    }
}
