//! Tests for snapshot isolation.
//!
//! These tests verify that:
//! 1. Decoded snapshots from `read_all` never change after they are returned
//! 2. Raw jars are copy-on-write
//! 3. Binding snapshots are independent of later writes they did not deliver

use cookie_mirror::{
    BindingConfig, CookieAttributes, CookieBinding, CookieStore, MemoryHost, ReadOptions,
    StoreConfig,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// STORE SNAPSHOTS
// =============================================================================

#[test]
fn test_held_snapshot_is_unchanged_by_write() {
    let store = CookieStore::default();
    let s0 = store.read_all(ReadOptions::default());

    store.write("k", "v", CookieAttributes::default());

    assert!(s0.is_empty());
    assert_eq!(store.read_all(ReadOptions::default())["k"], json!("v"));
}

#[test]
fn test_held_jar_is_unchanged_by_write_and_erase() {
    let store = CookieStore::new(StoreConfig::from_header("a=1; b=2"));
    let before = store.jar();

    store.write("a", "changed", CookieAttributes::default());
    store.erase("b", CookieAttributes::default());
    store.write("c", "3", CookieAttributes::default());

    assert_eq!(before.len(), 2);
    assert_eq!(before["a"], "1");
    assert_eq!(before["b"], "2");

    let after = store.jar();
    assert_eq!(after.len(), 2);
    assert_eq!(after["a"], "changed");
    assert_eq!(after["c"], "3");
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn test_reads_without_changes_share_the_jar() {
    let store = CookieStore::default();
    store.write("a", "1", CookieAttributes::default());

    assert!(Arc::ptr_eq(&store.jar(), &store.jar()));
}

#[test]
fn test_host_refresh_does_not_touch_held_jar() {
    let host = Arc::new(MemoryHost::available());
    let store = CookieStore::with_host(StoreConfig::default(), host.clone());
    store.await_probe(Duration::from_secs(5));

    store.write("a", "1", CookieAttributes::default());
    let held = store.jar();

    host.seed("a", "from-host");
    let fresh = store.jar();

    assert_eq!(held["a"], "1");
    assert_eq!(fresh["a"], "from-host");
}

// =============================================================================
// BINDING SNAPSHOTS
// =============================================================================

#[test]
fn test_binding_snapshot_outlives_updates() {
    let store = Arc::new(CookieStore::default());
    let binding = CookieBinding::observe(&store, BindingConfig::default());

    store.write("a", "1", CookieAttributes::default());
    let first = binding.snapshot();

    store.write("a", "2", CookieAttributes::default());
    let second = binding.snapshot();

    assert_eq!(first["a"], json!("1"));
    assert_eq!(second["a"], json!("2"));
}

#[test]
fn test_undelivered_change_does_not_leak_into_binding() {
    let store = Arc::new(CookieStore::default());
    let binding = CookieBinding::observe(&store, BindingConfig::watching(["x"]));

    store.write("y", "1", CookieAttributes::default());

    assert!(binding.snapshot().get("y").is_none());
    assert_eq!(store.read_all(ReadOptions::default())["y"], json!("1"));
}
