//! # coherency-stats: Benchmark Artifact Statistics
//!
//! Turns raw benchmark-run artifacts (per-run timing, energy and
//! performance-counter captures under varying thread counts, workload
//! sizes, contention modes and good/bad coherency conditions) into a
//! normalized table of mean ± standard error per configuration point.
//!
//! ## Pipeline
//!
//! ```text
//! file name ──► key::parse_key ──► (ExperimentKey, MetricFamily)
//! content   ──► extract::extract ──► RawFields
//!                                     │
//!                           store::MetricStore  (append-only)
//!                                     │
//!                           derive::derive      (miss rates, accesses)
//!                                     │
//!                           stats::SummaryTable (mean, SEM, count)
//!                                     │
//!                           query::SummaryQuery (grouping, ratios)
//! ```
//!
//! ## Design Principles
//!
//! - **Per-file isolation**: an unrecognized name is skipped, a corrupted
//!   capture is discarded whole; neither aborts the batch
//! - **Explicit absence**: one flat `(key, field)` map; absent reads are
//!   empty sequences and zero-count summaries, not errors
//! - **Degenerate samples are data**: n = 0 and n = 1 summarize without
//!   raising
//!
//! ## Example Usage
//!
//! ```rust
//! use coherency_stats::config::PipelineConfig;
//! use coherency_stats::ingest::{analyze, SourceFile};
//! use coherency_stats::key::{Condition, ExperimentKey};
//!
//! let files = vec![
//!     SourceFile::new("perf_l2_4_1000_mode0_good.txt", "l2_all,l2_hits,l2_misses\n100,80,20\n100,80,20\n"),
//!     SourceFile::new("time_4_1000_mode0_good.txt", "0.51\n0.49\n"),
//! ];
//! let analysis = analyze(&files, &PipelineConfig::default())?;
//!
//! let key = ExperimentKey::new(4, 1000, 0, Condition::Good);
//! let miss_rate = analysis.summary.get(&key, "l2_miss_rate");
//! assert_eq!(miss_rate.mean, 20.0);
//! assert_eq!(miss_rate.standard_error, 0.0);
//! assert_eq!(miss_rate.count, 2);
//! # Ok::<(), coherency_stats::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod derive;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod key;
pub mod query;
pub mod stats;
pub mod store;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use ingest::{analyze, Analysis, Ingestor, SourceFile};
pub use key::{parse_key, Condition, ExperimentKey, MetricFamily, SkipReason};
pub use stats::{summarize, SummaryStat, SummaryTable};
pub use store::{MetricStore, SampleSequence};
