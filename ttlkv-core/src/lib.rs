//! # ttlkv Core
//!
//! Core types, errors, and traits shared by the ttlkv crates.
//!
//! This crate provides the foundational building blocks used by the cache and
//! everything layered on top of it:
//!
//! - **Types**: [`Ttl`], a validated time-to-live
//! - **Errors**: [`CacheError`] and the crate-wide [`Result`] alias
//! - **Clocks**: the [`Clock`] trait with [`SystemClock`] and [`ManualClock`]
//! - **Config**: [`CacheConfig`], loadable from the environment
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use ttlkv_core::{Ttl, CacheError};
//!
//! let ttl = Ttl::try_from(Duration::from_secs(5)).unwrap();
//! assert_eq!(ttl.as_duration(), Duration::from_secs(5));
//!
//! // Negative TTLs are rejected up front
//! assert!(matches!(Ttl::try_from(-1i64), Err(CacheError::NegativeTtl(_))));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{ManualClock, SystemClock};
pub use config::CacheConfig;
pub use constants::*;
pub use error::{CacheError, Result};
pub use traits::*;
pub use types::*;
