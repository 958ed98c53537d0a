//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ENV_DEFAULT_TTL_SECS, ENV_INITIAL_CAPACITY, ENV_SWEEP_INTERVAL_SECS, MAX_TTL, MIN_SWEEP_INTERVAL,
};
use crate::error::{CacheError, Result};

/// Configuration for a cache instance.
///
/// # Example
///
/// ```rust
/// use ttlkv_core::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default()
///     .with_sweep_interval(Duration::from_secs(30))
///     .with_default_ttl(Duration::from_secs(300));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Interval between background sweeps. `None` disables the sweeper.
    pub sweep_interval: Option<Duration>,
    /// TTL applied by `set` when the caller gives none. `None` keeps entries forever.
    pub default_ttl: Option<Duration>,
    /// Capacity to preallocate for the entry map.
    pub initial_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: None,
            default_ttl: None,
            initial_capacity: 0,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the environment (and `.env`, if present).
    ///
    /// | Variable                    | Meaning                          |
    /// |-----------------------------|----------------------------------|
    /// | `TTLKV_SWEEP_INTERVAL_SECS` | sweep interval, `0` disables     |
    /// | `TTLKV_DEFAULT_TTL_SECS`    | TTL used by `set`                |
    /// | `TTLKV_INITIAL_CAPACITY`    | preallocated map capacity        |
    ///
    /// Unset variables keep their defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(secs) = env_u64(ENV_SWEEP_INTERVAL_SECS)? {
            config.sweep_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = env_u64(ENV_DEFAULT_TTL_SECS)? {
            config.default_ttl = Some(Duration::from_secs(secs));
        }
        if let Some(capacity) = env_u64(ENV_INITIAL_CAPACITY)? {
            config.initial_capacity = usize::try_from(capacity)
                .map_err(|e| CacheError::ConfigError(format!("{ENV_INITIAL_CAPACITY}: {e}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Enables background sweeping at the given interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Disables background sweeping.
    pub fn without_sweeper(mut self) -> Self {
        self.sweep_interval = None;
        self
    }

    /// Sets the TTL used by `set` when none is given.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets the preallocated capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if let Some(interval) = self.sweep_interval {
            if interval < MIN_SWEEP_INTERVAL {
                return Err(CacheError::ConfigError(format!(
                    "sweep interval {interval:?} is below the minimum of {MIN_SWEEP_INTERVAL:?}"
                )));
            }
        }
        if let Some(ttl) = self.default_ttl {
            if ttl > MAX_TTL {
                return Err(CacheError::ConfigError(format!(
                    "default TTL {ttl:?} exceeds the maximum of {MAX_TTL:?}"
                )));
            }
        }
        Ok(())
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| CacheError::ConfigError(format!("{name}={raw:?}: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(CacheError::ConfigError(format!("{name}: {e}"))),
    }
}
