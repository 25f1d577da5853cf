//! Pipeline benchmarks
//!
//! Benchmarks for the ingestion hot paths:
//! - Delimited counter extraction
//! - Report pattern extraction
//! - Mean/SEM summarization
//! - Full analysis over a synthetic artifact set
//!
//! Run with: cargo bench --bench pipeline

use coherency_stats::config::PipelineConfig;
use coherency_stats::extract::extract;
use coherency_stats::ingest::{analyze, SourceFile};
use coherency_stats::key::{Condition, ExperimentKey, MetricFamily};
use coherency_stats::stats::summarize;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write;

const ROW_COUNTS: [usize; 3] = [100, 1_000, 10_000];

/// Create an L2 counter capture with a header and `rows` records
fn create_l2_capture(rows: usize, rng: &mut StdRng) -> String {
    let mut content = String::from("l2_all,l2_hits,l2_misses\n");
    for _ in 0..rows {
        let requests: u32 = rng.gen_range(1_000..100_000);
        let misses = rng.gen_range(0..requests);
        let _ = writeln!(content, "{requests},{},{misses}", requests - misses);
    }
    content
}

/// Create a cache report with `runs` timing lines and the counter summary
fn create_cache_report(runs: usize, rng: &mut StdRng) -> String {
    let mut content = String::new();
    for _ in 0..runs {
        let _ = writeln!(content, "Time for bad coherency: {:.3} ms", rng.gen_range(5.0..50.0));
    }
    content.push_str("      12,345,678      cache-references          ( +-  1.25% )\n");
    content.push_str("       1,234,567      cache-misses              ( +-  2.50% )\n");
    content.push_str("     987,654,321      instructions              ( +-  0.10% )\n");
    content
}

fn bench_line_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_lines");
    let mut rng = StdRng::seed_from_u64(42);
    let config = PipelineConfig::default();

    for rows in ROW_COUNTS {
        let content = create_l2_capture(rows, &mut rng);
        group.bench_with_input(BenchmarkId::new("perf_l2", rows), &content, |b, content| {
            b.iter(|| extract(black_box(content), MetricFamily::PerfL2, &config));
        });
    }

    group.finish();
}

fn bench_report_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_report");
    let mut rng = StdRng::seed_from_u64(7);
    let config = PipelineConfig::default();

    for runs in [10, 100] {
        let content = create_cache_report(runs, &mut rng);
        group.bench_with_input(BenchmarkId::new("cache_report", runs), &content, |b, content| {
            b.iter(|| extract(black_box(content), MetricFamily::CacheReport, &config));
        });
    }

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");
    let mut rng = StdRng::seed_from_u64(1);

    for n in ROW_COUNTS {
        let values: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..100.0)).collect();
        group.bench_with_input(BenchmarkId::new("mean_sem", n), &values, |b, values| {
            b.iter(|| summarize(black_box(values)));
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(99);
    let mut files = Vec::new();
    for threads in [1u32, 2, 4, 8] {
        for size in [1_000u64, 10_000, 100_000] {
            for condition in Condition::ALL {
                let key = ExperimentKey::new(threads, size, 0, condition);
                files.push(SourceFile::new(
                    key.file_name(MetricFamily::PerfL2),
                    create_l2_capture(50, &mut rng),
                ));
                files.push(SourceFile::new(
                    key.file_name(MetricFamily::CacheReport),
                    create_cache_report(10, &mut rng),
                ));
            }
        }
    }
    let config = PipelineConfig::default();

    c.bench_function("analyze_48_files", |b| {
        b.iter(|| analyze(black_box(&files), &config));
    });
}

criterion_group!(
    benches,
    bench_line_extraction,
    bench_report_extraction,
    bench_summarize,
    bench_analyze
);
criterion_main!(benches);
