//! Error types for ttlkv.
//!
//! Absence of a key is never an error; lookups return `Option`. Everything in
//! here is an invalid argument or a misconfiguration reported at the call site.

use thiserror::Error;

/// Result type alias using `CacheError`.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Main error type for all ttlkv operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // ARGUMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// TTL was negative, which would describe an already-expired entry.
    #[error("Negative TTL: {0}")]
    NegativeTtl(String),

    /// TTL could not be interpreted (NaN, infinite).
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// TTL exceeds the supported maximum.
    #[error("TTL out of range: {seconds}s exceeds maximum of {max_seconds}s")]
    TtlOutOfRange { seconds: u64, max_seconds: u64 },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration value rejected.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Background sweeping was requested outside a Tokio runtime.
    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),
}

impl CacheError {
    /// Returns true if the caller passed a bad argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            CacheError::NegativeTtl(_)
                | CacheError::InvalidTtl(_)
                | CacheError::TtlOutOfRange { .. }
        )
    }
}
