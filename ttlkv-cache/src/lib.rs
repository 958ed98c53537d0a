//! # ttlkv Cache
//!
//! Concurrent in-process key-value cache where each entry may carry an
//! absolute expiry.
//!
//! - Expired entries are never returned; they are dropped lazily on read,
//!   while counting, or by an optional background sweeper.
//! - Time comes from an injected [`Clock`](ttlkv_core::Clock), so expiry can
//!   be driven deterministically in tests.
//! - Handles are cheap to clone and share one store.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ttlkv_cache::TtlCache;
//! use ttlkv_core::ManualClock;
//!
//! let clock = ManualClock::new();
//! let cache = TtlCache::with_clock(Arc::new(clock.clone()));
//!
//! cache.set("username", "john_doe");
//! cache.set_with_ttl("otp", "123456", Duration::from_secs(5)).unwrap();
//! assert_eq!(cache.count(), 2);
//!
//! clock.advance(Duration::from_secs(6));
//! assert_eq!(cache.get("otp"), None);
//! assert_eq!(cache.get("username"), Some("john_doe"));
//! assert_eq!(cache.count(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod entry;
mod stats;
mod sweeper;

pub use cache::TtlCache;
pub use stats::CacheStats;
