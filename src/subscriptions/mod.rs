//! Selective updates for cookie consumers.
//!
//! A consumer declares which cookie names it depends on and gets a
//! [`CookieBinding`]: a snapshot of the store that is replaced only when a
//! change touches one of those names.
//!
//! Per change event the binding:
//! - re-reads the full store,
//! - compares the dependencies against its baseline ([`should_update`]),
//! - delivers the new snapshot if anything relevant changed,
//! - makes the new snapshot its baseline either way.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(CookieStore::default());
//! let binding = CookieBinding::observe(&store, BindingConfig::watching(["session"]));
//!
//! store.write("theme", "dark", CookieAttributes::default()); // not delivered
//! store.write("session", "abc", CookieAttributes::default()); // delivered
//!
//! let snapshot = binding.recv_timeout(Duration::from_millis(10))?;
//! assert_eq!(snapshot["session"], "abc");
//! ```

mod binding;
mod protocol;
mod types;

pub use binding::{CookieBinding, CookieRemover, CookieSetter};
pub use protocol::{should_update, SelectiveUpdate};
pub use types::{BindingConfig, Surface};
