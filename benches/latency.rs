//! Latency benchmarks for per-cell parsing.
//!
//! Run with: `cargo bench --bench latency`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use page_collector::RecordBuilder;
use profile_aggregator::{extract_profit, extract_symbol, ProfileAggregator};
use profiler_core::config::RowLayout;
use profiler_core::types::TokenRecord;

/// Benchmark profit cell extraction across the shapes the table renders.
fn bench_extract_profit(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_profit");

    let cells = [
        ("matched", "+$1,500.25+150.5%"),
        ("fallback", "$500"),
        ("placeholder", "--"),
    ];

    for (label, cell) in cells {
        group.bench_with_input(BenchmarkId::new("cell", label), cell, |b, cell| {
            b.iter(|| extract_profit(black_box(cell)))
        });
    }

    group.finish();
}

/// Benchmark symbol extraction with and without a window suffix.
fn bench_extract_symbol(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_symbol");

    for name in ["PEPE24h", "RandomName"] {
        group.bench_with_input(BenchmarkId::new("name", name), name, |b, name| {
            b.iter(|| extract_symbol(black_box(name)))
        });
    }

    group.finish();
}

/// Benchmark turning one rendered row into a token record.
fn bench_build_record(c: &mut Criterion) {
    let builder = RecordBuilder::new(RowLayout::default());
    let cells: Vec<String> = [
        "TOK", "+$500+20%", "-$100-5%", "$400", "$2000", "3", "$1$0.01", "$2$0.02", "10/5",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    c.bench_function("build_record", |b| {
        b.iter(|| builder.build(black_box("w1"), black_box(&cells)))
    });
}

/// Benchmark the full per-record decision: extract, threshold, symbol.
fn bench_evaluate_record(c: &mut Criterion) {
    let aggregator = ProfileAggregator::default();
    let record = TokenRecord {
        wallet: "w1".to_string(),
        name: "PEPE24h".to_string(),
        realized_profit: "+$1,500+150%".to_string(),
        unrealized_pnl: "-$20-3%".to_string(),
        ..Default::default()
    };

    c.bench_function("evaluate_record", |b| {
        b.iter(|| aggregator.evaluate(black_box(&record)))
    });
}

criterion_group!(
    benches,
    bench_extract_profit,
    bench_extract_symbol,
    bench_build_record,
    bench_evaluate_record,
);
criterion_main!(benches);
