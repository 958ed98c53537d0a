//! Validated time-to-live.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_TTL, MAX_TTL_SECS};
use crate::error::{CacheError, Result};

/// A non-negative time-to-live no longer than [`MAX_TTL`].
///
/// Construct with `TryFrom` from any of the duration shapes callers tend to
/// hold: [`Duration`], whole seconds (`u64`/`i64`), fractional seconds (`f64`)
/// or a signed [`chrono::Duration`].
///
/// A zero TTL is valid and describes an entry that is expired the moment it
/// is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Duration", into = "Duration")]
pub struct Ttl(Duration);

impl Ttl {
    /// TTL of zero: expires immediately.
    pub const ZERO: Ttl = Ttl(Duration::ZERO);

    /// Builds a TTL from `duration`, clamping it to [`MAX_TTL`].
    pub fn saturating(duration: Duration) -> Self {
        Self(duration.min(MAX_TTL))
    }

    /// Returns the TTL as a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Returns true for a zero TTL.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Computes the absolute expiry for an entry written at `now`.
    ///
    /// Returns `None` when the expiry lies past the platform's representable
    /// horizon, which callers treat as "never expires".
    pub fn expires_at(&self, now: Instant) -> Option<Instant> {
        now.checked_add(self.0)
    }

    fn checked(duration: Duration) -> Result<Self> {
        if duration > MAX_TTL {
            return Err(CacheError::TtlOutOfRange {
                seconds: duration.as_secs(),
                max_seconds: MAX_TTL_SECS,
            });
        }
        Ok(Self(duration))
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Ttl> for Duration {
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl TryFrom<Duration> for Ttl {
    type Error = CacheError;

    fn try_from(duration: Duration) -> Result<Self> {
        Self::checked(duration)
    }
}

impl TryFrom<u64> for Ttl {
    type Error = CacheError;

    fn try_from(secs: u64) -> Result<Self> {
        Self::checked(Duration::from_secs(secs))
    }
}

impl TryFrom<i64> for Ttl {
    type Error = CacheError;

    fn try_from(secs: i64) -> Result<Self> {
        let secs = u64::try_from(secs).map_err(|_| CacheError::NegativeTtl(format!("{secs}s")))?;
        Self::checked(Duration::from_secs(secs))
    }
}

impl TryFrom<f64> for Ttl {
    type Error = CacheError;

    fn try_from(secs: f64) -> Result<Self> {
        if !secs.is_finite() {
            return Err(CacheError::InvalidTtl(format!("{secs}")));
        }
        if secs < 0.0 {
            return Err(CacheError::NegativeTtl(format!("{secs}s")));
        }
        if secs > MAX_TTL_SECS as f64 {
            return Err(CacheError::TtlOutOfRange {
                seconds: secs as u64,
                max_seconds: MAX_TTL_SECS,
            });
        }
        Self::checked(Duration::from_secs_f64(secs))
    }
}

impl TryFrom<chrono::Duration> for Ttl {
    type Error = CacheError;

    fn try_from(delta: chrono::Duration) -> Result<Self> {
        if delta < chrono::Duration::zero() {
            return Err(CacheError::NegativeTtl(delta.to_string()));
        }
        let duration = delta
            .to_std()
            .map_err(|e| CacheError::InvalidTtl(e.to_string()))?;
        Self::checked(duration)
    }
}
