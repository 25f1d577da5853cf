//! Query/Selection layer over the summary table
//!
//! Pure read-only helpers answering the grouping questions a report needs:
//! which sizes/threads/modes exist for a field, the largest workload size
//! shared across thread counts, and bad/good ratios guarded against a zero
//! denominator. Nothing here mutates the table.
//!
//! ## Usage
//!
//! ```rust
//! use coherency_stats::key::{Condition, ExperimentKey};
//! use coherency_stats::query::SummaryQuery;
//! use coherency_stats::stats::SummaryTable;
//! use coherency_stats::store::MetricStore;
//!
//! let mut store = MetricStore::new();
//! let good = ExperimentKey::new(2, 1000, 0, Condition::Good);
//! store.append(good, "time", &[1.0]);
//! store.append(good.with_condition(Condition::Bad), "time", &[3.0]);
//! store.append(ExperimentKey::new(4, 1000, 0, Condition::Good), "time", &[0.5]);
//! store.append(ExperimentKey::new(4, 5000, 0, Condition::Good), "time", &[2.5]);
//!
//! let table = SummaryTable::from_store(&store);
//! assert_eq!(table.largest_common_size("time", 0), Some(1000));
//! assert_eq!(table.largest_size("time", 0), Some(5000));
//! assert_eq!(table.compare(&good, "time").ratio, 3.0);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::key::{Condition, ExperimentKey};
use crate::stats::{guarded_ratio, SummaryStat, SummaryTable};

/// Both conditions at one configuration point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Summary under `good`
    pub good: SummaryStat,
    /// Summary under `bad`
    pub bad: SummaryStat,
    /// `bad.mean / good.mean`, `0` when `good.mean == 0`
    pub ratio: f64,
}

/// Read-only grouping queries.
pub trait SummaryQuery {
    /// Thread counts with samples of `field`.
    fn thread_counts(&self, field: &str) -> BTreeSet<u32>;

    /// Modes with samples of `field`.
    fn modes(&self, field: &str) -> BTreeSet<u32>;

    /// Workload sizes with samples of `field` for one (thread, mode) pair.
    fn workload_sizes(&self, field: &str, thread_count: u32, mode: u32) -> BTreeSet<u64>;

    /// Largest workload size present for every thread count in `mode`.
    ///
    /// `None` when the mode has no samples or the thread counts share no size.
    fn largest_common_size(&self, field: &str, mode: u32) -> Option<u64>;

    /// Largest workload size present for any thread count in `mode`.
    fn largest_size(&self, field: &str, mode: u32) -> Option<u64>;

    /// Per thread count, the sizes present in all of its modes; the largest over threads.
    fn largest_size_common_to_all_modes(&self, field: &str) -> Option<u64>;

    /// Good and bad summaries at `key`'s point and their guarded ratio.
    ///
    /// The condition of `key` is ignored.
    fn compare(&self, key: &ExperimentKey, field: &str) -> Comparison;

    /// Summary per thread count at a fixed (mode, size, condition), ascending threads.
    fn series_by_threads(
        &self,
        field: &str,
        mode: u32,
        workload_size: u64,
        condition: Condition,
    ) -> Vec<(u32, SummaryStat)>;

    /// Summary per workload size at a fixed (threads, mode, condition), ascending sizes.
    fn series_by_size(
        &self,
        field: &str,
        thread_count: u32,
        mode: u32,
        condition: Condition,
    ) -> Vec<(u64, SummaryStat)>;
}

impl SummaryQuery for SummaryTable {
    fn thread_counts(&self, field: &str) -> BTreeSet<u32> {
        self.keys_with(field).map(ExperimentKey::thread_count).collect()
    }

    fn modes(&self, field: &str) -> BTreeSet<u32> {
        self.keys_with(field).map(ExperimentKey::mode).collect()
    }

    fn workload_sizes(&self, field: &str, thread_count: u32, mode: u32) -> BTreeSet<u64> {
        self.keys_with(field)
            .filter(|k| k.thread_count() == thread_count && k.mode() == mode)
            .map(ExperimentKey::workload_size)
            .collect()
    }

    fn largest_common_size(&self, field: &str, mode: u32) -> Option<u64> {
        let per_thread = sizes_by(self, field, |k| (k.mode() == mode).then_some(k.thread_count()));
        intersect_all(per_thread.into_values()).and_then(|common| common.last().copied())
    }

    fn largest_size(&self, field: &str, mode: u32) -> Option<u64> {
        self.keys_with(field)
            .filter(|k| k.mode() == mode)
            .map(ExperimentKey::workload_size)
            .max()
    }

    fn largest_size_common_to_all_modes(&self, field: &str) -> Option<u64> {
        let per_thread_mode = sizes_by(self, field, |k| Some((k.thread_count(), k.mode())));
        let mut by_thread: BTreeMap<u32, Vec<BTreeSet<u64>>> = BTreeMap::new();
        for ((thread, _mode), sizes) in per_thread_mode {
            by_thread.entry(thread).or_default().push(sizes);
        }
        by_thread
            .into_values()
            .filter_map(|sets| intersect_all(sets.into_iter()))
            .filter_map(|common| common.last().copied())
            .max()
    }

    fn compare(&self, key: &ExperimentKey, field: &str) -> Comparison {
        let good = self.get(&key.with_condition(Condition::Good), field);
        let bad = self.get(&key.with_condition(Condition::Bad), field);
        Comparison {
            good,
            bad,
            ratio: guarded_ratio(bad.mean, good.mean),
        }
    }

    fn series_by_threads(
        &self,
        field: &str,
        mode: u32,
        workload_size: u64,
        condition: Condition,
    ) -> Vec<(u32, SummaryStat)> {
        self.keys_with(field)
            .filter(|k| {
                k.mode() == mode && k.workload_size() == workload_size && k.condition() == condition
            })
            .map(|k| (k.thread_count(), self.get(k, field)))
            .collect()
    }

    fn series_by_size(
        &self,
        field: &str,
        thread_count: u32,
        mode: u32,
        condition: Condition,
    ) -> Vec<(u64, SummaryStat)> {
        let mut series: Vec<_> = self
            .keys_with(field)
            .filter(|k| {
                k.thread_count() == thread_count && k.mode() == mode && k.condition() == condition
            })
            .map(|k| (k.workload_size(), self.get(k, field)))
            .collect();
        series.sort_by_key(|(size, _)| *size);
        series
    }
}

/// Largest over smallest strictly positive value; `0` if none is positive.
///
/// # Example
///
/// ```rust
/// use coherency_stats::query::global_ratio;
///
/// assert_eq!(global_ratio([0.0, 2.0, 8.0, 4.0]), 4.0);
/// assert_eq!(global_ratio([0.0, -1.0]), 0.0);
/// ```
#[must_use]
pub fn global_ratio(values: impl IntoIterator<Item = f64>) -> f64 {
    let (min, max) = values
        .into_iter()
        .filter(|v| *v > 0.0)
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min.is_finite() {
        max / min
    } else {
        0.0
    }
}

fn sizes_by<G: Ord>(
    table: &SummaryTable,
    field: &str,
    group: impl Fn(&ExperimentKey) -> Option<G>,
) -> BTreeMap<G, BTreeSet<u64>> {
    let mut groups: BTreeMap<G, BTreeSet<u64>> = BTreeMap::new();
    for key in table.keys_with(field) {
        if let Some(g) = group(key) {
            groups.entry(g).or_default().insert(key.workload_size());
        }
    }
    groups
}

fn intersect_all(mut sets: impl Iterator<Item = BTreeSet<u64>>) -> Option<BTreeSet<u64>> {
    let first = sets.next()?;
    let common = sets.fold(first, |acc, s| acc.intersection(&s).copied().collect());
    (!common.is_empty()).then_some(common)
}
