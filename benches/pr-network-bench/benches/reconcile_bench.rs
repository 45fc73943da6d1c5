//! Bonus reconciliation benchmarks.
//!
//! Measures:
//! - Per-wallet receipt lookups against logs of growing size
//! - Recipient totals over a whole log
//! - Full three-scheme statements for a root wallet

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pr_network_bench::helpers::{make_payout_log, make_random_network, wallet};
use pr_network_engine::{EngineConfig, PayoutLogs, ReconciliationEngine};

// ---------------------------------------------------------------------------
// Log lookups
// ---------------------------------------------------------------------------

fn bench_receipts(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/receipts_for");

    for &n in &[1_000usize, 10_000, 100_000] {
        let users = make_random_network(n, 3);
        let log = make_payout_log(&users, 1, 5);
        let target = wallet(n / 2);
        group.throughput(Throughput::Elements(log.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| log.receipts_for(&target))
        });
    }

    group.finish();
}

fn bench_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/totals_by_recipient");
    let users = make_random_network(20_000, 17);
    let log = make_payout_log(&users, 3, 19);

    group.throughput(Throughput::Elements(log.len() as u64));
    group.bench_function("60k_rows", |b| b.iter(|| log.totals_by_recipient()));

    group.finish();
}

// ---------------------------------------------------------------------------
// Full statements
// ---------------------------------------------------------------------------

fn bench_statement(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/statement");
    let engine = match ReconciliationEngine::new(EngineConfig::default()) {
        Ok(engine) => engine,
        Err(err) => panic!("default config rejected: {err}"),
    };
    let root = wallet(0);

    for &n in &[1_000usize, 10_000, 50_000] {
        let users = make_random_network(n, 23);
        let logs = PayoutLogs {
            pr_bonus: make_payout_log(&users[..1], 20, 29),
            caring_bonus: make_payout_log(&users, 1, 31),
            return_bonus: make_payout_log(&users, 1, 37),
        };
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("reconcile_all", n), &n, |b, _| {
            b.iter(|| engine.reconcile_all(&root, &users, &logs))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_receipts, bench_totals, bench_statement);
criterion_main!(benches);
