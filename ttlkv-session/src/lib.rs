//! # ttlkv Session
//!
//! Expiring session store on top of [`ttlkv_cache::TtlCache`].
//!
//! Each session maps a random [`SessionId`] to an opaque user identifier and
//! disappears once its TTL elapses. This crate does not authenticate anyone;
//! it only remembers who a session id was issued to.
//!
//! ## Example
//!
//! ```rust
//! use ttlkv_session::SessionStore;
//!
//! let sessions: SessionStore<u64> = SessionStore::new();
//! let id = sessions.create_session(123);
//! assert_eq!(sessions.get_user(&id), Some(123));
//!
//! sessions.delete_session(&id);
//! assert_eq!(sessions.get_user(&id), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod session;

pub use session::{SessionConfig, SessionId, SessionStore};
