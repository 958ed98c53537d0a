use std::time::{Duration, Instant};

/// Stored value with its optional expiry.
#[derive(Clone, Debug)]
pub(crate) struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    pub(crate) fn new(value: V, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn set_expires_at(&mut self, expires_at: Option<Instant>) {
        self.expires_at = expires_at;
    }

    /// An entry expiring exactly at `now` is already expired.
    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// `None` for entries that never expire.
    pub(crate) fn remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at.map(|at| at.saturating_duration_since(now))
    }
}
