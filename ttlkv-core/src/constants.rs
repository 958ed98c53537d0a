//! Constants shared across ttlkv crates.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// TTL LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Largest accepted TTL in seconds (~100 years).
/// Keeps `Instant + ttl` far away from overflow on every platform.
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Largest accepted TTL.
pub const MAX_TTL: Duration = Duration::from_secs(MAX_TTL_SECS);

// ═══════════════════════════════════════════════════════════════════════════════
// SWEEPER
// ═══════════════════════════════════════════════════════════════════════════════

/// Suggested sweep interval when sweeping is enabled without an explicit value.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest sweep interval accepted by configuration.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

// ═══════════════════════════════════════════════════════════════════════════════
// SESSIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default session lifetime (1 hour).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Sweep interval in seconds; `0` disables the sweeper.
pub const ENV_SWEEP_INTERVAL_SECS: &str = "TTLKV_SWEEP_INTERVAL_SECS";

/// Default TTL in seconds applied by `set` when no TTL is given.
pub const ENV_DEFAULT_TTL_SECS: &str = "TTLKV_DEFAULT_TTL_SECS";

/// Initial map capacity.
pub const ENV_INITIAL_CAPACITY: &str = "TTLKV_INITIAL_CAPACITY";
