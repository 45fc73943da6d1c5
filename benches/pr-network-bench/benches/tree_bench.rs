//! Downline tree benchmarks.
//!
//! Measures:
//! - Child index construction over the full snapshot
//! - Tree building for random, wide and chain-shaped networks
//! - Depth cap cost on deep chains
//! - Generation summaries and total counts over a built forest

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pr_network_bench::helpers::{make_chain, make_random_network, make_wide_network, wallet};
use pr_network_engine::{count_total_users, summarize_by_generation, TreeBuilder};

// ---------------------------------------------------------------------------
// Index construction
// ---------------------------------------------------------------------------

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/index");

    for &n in &[1_000usize, 10_000, 100_000] {
        let users = make_random_network(n, 7);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("random", n), &users, |b, users| {
            b.iter(|| TreeBuilder::new(users))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Tree building
// ---------------------------------------------------------------------------

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/build");
    let root = wallet(0);

    for &n in &[1_000usize, 10_000, 100_000] {
        let random = make_random_network(n, 11);
        let builder = TreeBuilder::new(&random);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("random", n), &n, |b, _| {
            b.iter(|| builder.build(&root))
        });

        let wide = make_wide_network(n, 5);
        let builder = TreeBuilder::new(&wide);
        group.bench_with_input(BenchmarkId::new("fanout_5", n), &n, |b, _| {
            b.iter(|| builder.build(&root))
        });
    }

    group.finish();
}

fn bench_depth_cap(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/depth_cap");
    let chain = make_chain(10_000);
    let builder = TreeBuilder::new(&chain);
    let root = wallet(0);

    for &depth in &[1u32, 10, 32, 64] {
        let capped = builder.clone().with_max_depth(depth);
        group.throughput(Throughput::Elements(u64::from(depth)));
        group.bench_with_input(BenchmarkId::new("chain", depth), &depth, |b, _| {
            b.iter(|| capped.build(&root))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Aggregation over a built forest
// ---------------------------------------------------------------------------

fn bench_summaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/summaries");
    let users = make_random_network(50_000, 13);
    let builder = TreeBuilder::new(&users);
    let forest = builder.build(&wallet(0));
    let members = count_total_users(&forest);

    group.throughput(Throughput::Elements(members as u64));
    group.bench_function("summarize_by_generation", |b| {
        b.iter(|| summarize_by_generation(&forest))
    });
    group.bench_function("count_total_users", |b| b.iter(|| count_total_users(&forest)));

    group.finish();
}

criterion_group!(
    benches,
    bench_index,
    bench_build,
    bench_depth_cap,
    bench_summaries,
);
criterion_main!(benches);
