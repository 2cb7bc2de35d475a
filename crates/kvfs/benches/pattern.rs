use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kvfs::{Kvfs, MemoryStore, Pattern};
use std::hint::black_box;

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_compile");

    for spec in ["/users/ada", "/users/*", r"/*ba*\**ll", "/logs/*/2024/*/app*"] {
        group.bench_with_input(BenchmarkId::from_parameter(spec), spec, |b, spec| {
            b.iter(|| Pattern::compile(black_box("/kvfs"), black_box(spec)));
        });
    }

    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let mut group = c.benchmark_group("kvfs_list");

    for size in [100usize, 1_000, 10_000] {
        let store = MemoryStore::with_entries(
            (0..size).map(|i| (format!("/kvfs/items/{i:05}"), "null".to_owned())),
        );
        let fs = Kvfs::new(store, "/kvfs").expect("Kvfs setup failed");

        group.bench_with_input(BenchmarkId::new("trailing_wildcard", size), &fs, |b, fs| {
            b.to_async(&rt).iter(|| async { fs.list(Some("/items/001*")).await });
        });
        group.bench_with_input(BenchmarkId::new("inner_wildcard", size), &fs, |b, fs| {
            b.to_async(&rt).iter(|| async { fs.list(Some("/items/*9")).await });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_list);
criterion_main!(benches);
