//! Performance benchmarks for the cookie store.

use cookie_mirror::{
    BindingConfig, CookieAttributes, CookieBinding, CookieStore, MemoryHost, ReadOptions,
    StoreConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn populated_store(cookies: usize) -> CookieStore {
    let store = CookieStore::new(StoreConfig::default());
    for i in 0..cookies {
        store.write(&format!("cookie{}", i), json!({"n": i}), CookieAttributes::default());
    }
    store
}

/// Benchmark copy-on-write writes with varying jar sizes
fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::new("jar_size", size), &size, |b, &size| {
            let store = populated_store(size);
            b.iter(|| {
                store.write(black_box("session"), black_box("abc"), CookieAttributes::default());
            });
        });
    }

    group.finish();
}

/// Benchmark full decoded reads, mirror-only and host-backed
fn bench_read_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_all");

    let store = populated_store(50);
    group.bench_function("mirror_raw", |b| {
        b.iter(|| black_box(store.read_all(ReadOptions::raw())));
    });
    group.bench_function("mirror_json", |b| {
        b.iter(|| black_box(store.read_all(ReadOptions::json())));
    });

    let host = Arc::new(MemoryHost::available());
    let backed = CookieStore::with_host(StoreConfig::default(), host);
    backed.await_probe(Duration::from_secs(5));
    for i in 0..50 {
        backed.write(&format!("cookie{}", i), json!({"n": i}), CookieAttributes::default());
    }
    group.bench_function("host_json", |b| {
        b.iter(|| black_box(backed.read_all(ReadOptions::json())));
    });

    group.finish();
}

/// Benchmark event fan-out to many selective bindings
fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout");

    for bindings in [1, 10, 50] {
        group.bench_with_input(
            BenchmarkId::new("bindings", bindings),
            &bindings,
            |b, &count| {
                let store = Arc::new(populated_store(20));
                let observers: Vec<CookieBinding> = (0..count)
                    .map(|i| {
                        CookieBinding::observe(
                            &store,
                            BindingConfig::watching([format!("cookie{}", i % 20)]),
                        )
                    })
                    .collect();

                b.iter(|| {
                    store.write(
                        black_box("unrelated"),
                        black_box("x"),
                        CookieAttributes::default(),
                    );
                });

                drop(observers);
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_write, bench_read_all, bench_fanout);
criterion_main!(benches);
