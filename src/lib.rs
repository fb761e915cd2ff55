//! # Cookie Mirror
//!
//! An in-memory cookie mirror kept in sync with a host cookie store, with
//! change notifications filtered by the cookie names each consumer cares
//! about.
//!
//! ## Core Concepts
//!
//! - **Mirror**: an immutable [`Jar`] snapshot, replaced (never mutated) on
//!   every write or erase
//! - **Host**: the persistent cookie store behind the mirror, probed once in
//!   the background; while unavailable the mirror is authoritative
//! - **Change events**: delivered synchronously to every listener on each
//!   write and erase
//! - **Bindings**: per-consumer snapshots that only update when a cookie
//!   the consumer depends on changes
//!
//! ## Example
//!
//! ```ignore
//! use cookie_mirror::{BindingConfig, CookieAttributes, CookieBinding, CookieStore, ReadOptions};
//!
//! let store = Arc::new(CookieStore::default());
//! store.write("user", json!({"id": 7}), CookieAttributes::default().with_path("/"));
//!
//! assert_eq!(store.read("user", ReadOptions::json()), Some(json!({"id": 7})));
//!
//! let binding = CookieBinding::observe(&store, BindingConfig::watching(["session"]));
//! store.write("session", "abc", CookieAttributes::default());
//! assert_eq!(binding.snapshot()["session"], "abc");
//! ```

pub mod codec;
pub mod context;
pub mod error;
pub mod host;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use codec::{decode_value, Codec, ParseOptions, WireCodec};
pub use context::{use_cookies, CookieContext};
pub use error::{CookieError, Result};
pub use host::{HostStore, MemoryHost};
pub use store::{CookieStore, InitialCookies, Listener, StoreConfig};
pub use subscriptions::{
    should_update, BindingConfig, CookieBinding, CookieRemover, CookieSetter, SelectiveUpdate,
    Surface,
};
pub use types::*;
