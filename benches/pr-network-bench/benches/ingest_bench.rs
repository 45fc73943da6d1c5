//! Snapshot ingestion benchmarks.
//!
//! Measures:
//! - User snapshot parsing
//! - Polygonscan export parsing (UTC timestamps, plain decimal amounts)
//! - Send-report parsing (wall-clock timestamps, comma-grouped amounts)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pr_network_bench::helpers::{make_random_network, polygonscan_json, send_report_json, users_json};
use pr_network_engine::{TransactionLog, UserSnapshot};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn bench_users(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest/users");

    for &n in &[1_000usize, 10_000, 50_000] {
        let json = users_json(&make_random_network(n, 41));
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &json, |b, json| {
            b.iter(|| UserSnapshot::parse(json))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Payout logs
// ---------------------------------------------------------------------------

fn bench_logs(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest/payout_log");

    for &n in &[1_000usize, 10_000, 50_000] {
        let polygonscan = polygonscan_json(n, 500);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("polygonscan", n), &polygonscan, |b, json| {
            b.iter(|| TransactionLog::parse(json))
        });

        let report = send_report_json(n, 500);
        group.bench_with_input(BenchmarkId::new("send_report", n), &report, |b, json| {
            b.iter(|| TransactionLog::parse(json))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_users, bench_logs);
criterion_main!(benches);
