//! Explicit store lookup for consumers.

use crate::error::{CookieError, Result};
use crate::store::{CookieStore, StoreConfig};
use crate::subscriptions::{BindingConfig, CookieBinding};
use std::sync::Arc;

/// Hands a shared [`CookieStore`] to consumers.
///
/// Looking up a store in an empty context is a configuration error, never a
/// silently empty store.
#[derive(Clone, Debug, Default)]
pub struct CookieContext {
    store: Option<Arc<CookieStore>>,
}

impl CookieContext {
    /// A context with no store.
    pub fn empty() -> Self {
        Self { store: None }
    }

    /// A context serving `store`.
    pub fn provide(store: Arc<CookieStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A context serving a fresh mirror-only store.
    pub fn with_default_store() -> Self {
        Self::provide(Arc::new(CookieStore::new(StoreConfig::default())))
    }

    /// The store, or `MissingStore`.
    pub fn store(&self) -> Result<Arc<CookieStore>> {
        self.store.clone().ok_or(CookieError::MissingStore)
    }
}

/// Look up the context's store and bind to it.
pub fn use_cookies(context: &CookieContext, config: BindingConfig) -> Result<CookieBinding> {
    let store = context.store()?;
    Ok(CookieBinding::observe(&store, config))
}
