//! Coherency Report Example
//!
//! Ingests a small in-memory artifact set covering both naming
//! conventions, then prints per-configuration summaries and the
//! good/bad comparison the plotting stage consumes.
//!
//! Run with: RUST_LOG=debug cargo run --example coherency_report

use coherency_stats::config::PipelineConfig;
use coherency_stats::ingest::{analyze, SourceFile};
use coherency_stats::key::{Condition, ExperimentKey, MetricFamily};
use coherency_stats::query::{global_ratio, SummaryQuery};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Coherency Benchmark Summary ===\n");

    // -------------------------------------------------------------------------
    // 1. Assemble artifacts
    // -------------------------------------------------------------------------
    let mut files = Vec::new();
    for threads in [1u32, 2, 4] {
        for (condition, scale) in [(Condition::Good, 1.0), (Condition::Bad, 3.5)] {
            let key = ExperimentKey::new(threads, 100_000, 0, condition);
            let base = f64::from(threads) * 10.0 * scale;
            files.push(SourceFile::new(
                key.file_name(MetricFamily::Time),
                format!("{:.2}\n{:.2}\n{:.2}\n", base, base * 1.05, base * 0.95),
            ));
            files.push(SourceFile::new(
                key.file_name(MetricFamily::PerfL2),
                format!(
                    "l2_all,l2_hits,l2_misses\n1000,{hits},{misses}\n1000,{hits},{misses}\n",
                    hits = 1000 - threads * 50,
                    misses = threads * 50,
                ),
            ));
        }
    }
    files.push(SourceFile::new(
        "good_results_cache_4_threads_100000_executions.txt",
        "Time for good coherency: 41.0 ms\n\
         Time for good coherency: 39.0 ms\n\
         \x20     2,000,000      cache-references          ( +-  1.50% )\n\
         \x20       150,000      cache-misses              ( +-  4.00% )\n",
    ));
    files.push(SourceFile::new("README.txt", "not an artifact"));

    // -------------------------------------------------------------------------
    // 2. Analyze
    // -------------------------------------------------------------------------
    let analysis = analyze(&files, &PipelineConfig::default())?;
    let report = &analysis.report;
    println!(
        "Files: {} accepted, {} skipped, {} failed; {} derived series\n",
        report.accepted.len(),
        report.skipped.len(),
        report.failed.len(),
        report.derived_fields
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.file, skipped.reason);
    }

    // -------------------------------------------------------------------------
    // 3. Per-thread series
    // -------------------------------------------------------------------------
    let summary = &analysis.summary;
    for field in ["time", "l2_miss_rate"] {
        println!("\n{field} (mode 0, size 100000):");
        for condition in Condition::ALL {
            for (threads, stat) in summary.series_by_threads(field, 0, 100_000, condition) {
                println!(
                    "  {condition:>4} {threads:>2} threads: {:>8.3} ± {:.3} (n={})",
                    stat.mean, stat.standard_error, stat.count
                );
            }
        }
    }

    // -------------------------------------------------------------------------
    // 4. Good/bad comparison
    // -------------------------------------------------------------------------
    println!("\nBad/good time ratio:");
    let mut ratios = Vec::new();
    for threads in summary.thread_counts("time") {
        let key = ExperimentKey::new(threads, 100_000, 0, Condition::Good);
        let cmp = summary.compare(&key, "time");
        println!("  {threads:>2} threads: {:.2}x", cmp.ratio);
        ratios.push(cmp.ratio);
    }
    println!("  spread across threads: {:.2}", global_ratio(ratios));

    let cache_key = ExperimentKey::new(4, 100_000, 0, Condition::Good);
    let miss_rate = summary.get(&cache_key, "cache_miss_rate");
    println!("\nCache miss rate at {cache_key}: {:.2}%", miss_rate.mean);

    println!("\nSummary JSON: {} rows", summary.len());
    println!("{}", summary.to_json()?);

    Ok(())
}
