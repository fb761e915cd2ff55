//! Property tests for the store and the selective update protocol.

use cookie_mirror::{
    BindingConfig, CookieAttributes, CookieBinding, CookieStore, ReadOptions, StoreConfig,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
enum Op {
    Write(String, String),
    Erase(String),
}

fn name() -> impl Strategy<Value = String> {
    "[a-d]"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (name(), "[a-z0-9]{0,8}").prop_map(|(n, v)| Op::Write(n, v)),
        name().prop_map(Op::Erase),
    ]
}

fn apply(store: &CookieStore, op: &Op) {
    match op {
        Op::Write(n, v) => store.write(n, v.as_str(), CookieAttributes::default()),
        Op::Erase(n) => store.erase(n, CookieAttributes::default()),
    }
}

proptest! {
    #[test]
    fn prop_write_then_read_all_contains(
        ops in prop::collection::vec(op(), 0..20),
        n in name(),
        v in "[a-z0-9]{0,8}",
    ) {
        let store = CookieStore::new(StoreConfig::default());
        for op in &ops {
            apply(&store, op);
        }

        store.write(&n, v.as_str(), CookieAttributes::default());
        let all = store.read_all(ReadOptions::default());
        prop_assert_eq!(&all[&n], &json!(v));
    }

    #[test]
    fn prop_erase_removes(ops in prop::collection::vec(op(), 0..20), n in name()) {
        let store = CookieStore::new(StoreConfig::default());
        for op in &ops {
            apply(&store, op);
        }

        store.erase(&n, CookieAttributes::default());
        prop_assert!(!store.read_all(ReadOptions::default()).contains_key(&n));
    }

    #[test]
    fn prop_mirror_matches_model(ops in prop::collection::vec(op(), 0..40)) {
        let store = CookieStore::new(StoreConfig::default());
        let mut model = BTreeMap::new();

        for op in &ops {
            apply(&store, op);
            match op {
                Op::Write(n, v) => { model.insert(n.clone(), v.clone()); }
                Op::Erase(n) => { model.remove(n); }
            }
        }

        prop_assert_eq!(&*store.jar(), &model);
    }

    #[test]
    fn prop_held_snapshots_never_change(ops in prop::collection::vec(op(), 1..20)) {
        let store = CookieStore::new(StoreConfig::default());
        let mut held = Vec::new();

        for op in &ops {
            held.push((store.jar(), (*store.jar()).clone()));
            apply(&store, op);
        }

        for (jar, copy) in &held {
            prop_assert_eq!(&**jar, copy);
        }
    }

    #[test]
    fn prop_deliveries_match_dependency_changes(ops in prop::collection::vec(op(), 0..30)) {
        let store = Arc::new(CookieStore::new(StoreConfig::default()));
        let binding = CookieBinding::observe(&store, BindingConfig::watching(["a", "b"]));

        let mut expected = 0;
        for op in &ops {
            let before = store.jar();
            apply(&store, op);
            let after = store.jar();
            if ["a", "b"].iter().any(|k| before.get(*k) != after.get(*k)) {
                expected += 1;
            }
        }

        let mut delivered = 0;
        while binding.try_recv().is_ok() {
            delivered += 1;
        }
        prop_assert_eq!(delivered, expected);
    }
}
