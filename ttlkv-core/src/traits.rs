//! Common traits for ttlkv.
//!
//! These traits define the seams that let callers swap implementations,
//! most importantly the time source used for expiry decisions.

use std::fmt::Debug;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of "now" for expiry computations.
///
/// Implementations might use:
/// - The monotonic system clock (production)
/// - A manually advanced clock (deterministic tests)
///
/// Must be monotonic: successive calls never go backwards.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}
