//! Domain types for ttlkv.
//!
//! - [`Ttl`]: validated, non-negative time-to-live

mod ttl;

pub use ttl::*;
