//! Session ids and the session store.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use ttlkv_cache::TtlCache;
use ttlkv_core::constants::DEFAULT_SESSION_TTL;
use ttlkv_core::error::Result;
use ttlkv_core::traits::Clock;
use ttlkv_core::types::Ttl;

/// Random, unguessable session identifier (UUID v4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Session store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of a session from creation or last refresh.
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl SessionConfig {
    /// Sets the session lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Maps session ids to user ids, forgetting them after a fixed lifetime.
///
/// Cloning yields another handle to the same sessions.
#[derive(Clone)]
pub struct SessionStore<U> {
    cache: TtlCache<SessionId, U>,
    ttl: Ttl,
}

impl<U: Clone> SessionStore<U> {
    /// Creates a store with a one hour session lifetime.
    pub fn new() -> Self {
        Self {
            cache: TtlCache::new(),
            ttl: Ttl::saturating(DEFAULT_SESSION_TTL),
        }
    }

    /// Creates a store on the system clock.
    ///
    /// # Errors
    ///
    /// Fails if the configured TTL is out of range.
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        Self::with_cache(TtlCache::new(), config)
    }

    /// Creates a store driven by `clock`.
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::with_cache(TtlCache::with_clock(clock), config)
    }

    /// Creates a store over an existing cache.
    pub fn with_cache(cache: TtlCache<SessionId, U>, config: SessionConfig) -> Result<Self> {
        let ttl = Ttl::try_from(config.ttl)?;
        Ok(Self { cache, ttl })
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl.as_duration()
    }

    /// Starts a session for `user` and returns its id.
    #[instrument(skip_all)]
    pub fn create_session(&self, user: U) -> SessionId {
        let id = SessionId::generate();
        self.cache.insert(id, user, Some(self.ttl));
        debug!(session = %id, ttl = ?self.ttl.as_duration(), "Created session");
        id
    }

    /// Returns the user a live session belongs to.
    pub fn get_user(&self, id: &SessionId) -> Option<U> {
        self.cache.get(id)
    }

    /// Restarts the lifetime of a live session. Returns false if it is gone.
    pub fn refresh(&self, id: &SessionId) -> bool {
        self.cache.touch(id, Some(self.ttl))
    }

    /// Ends a session. Returns whether it existed.
    pub fn delete_session(&self, id: &SessionId) -> bool {
        let removed = self.cache.delete(id);
        if removed {
            debug!(session = %id, "Deleted session");
        }
        removed
    }

    /// Ends every session.
    pub fn clear_sessions(&self) {
        self.cache.clear();
    }

    /// Number of sessions that have not expired.
    pub fn active_sessions(&self) -> usize {
        self.cache.count()
    }
}

impl<U: Clone> Default for SessionStore<U> {
    fn default() -> Self {
        Self::new()
    }
}
