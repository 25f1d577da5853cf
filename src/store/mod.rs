//! Metric Store - in-memory (key, field) → samples table
//!
//! A single flat map keyed by `(ExperimentKey, field)`. Raw and derived
//! fields share storage; only their provenance differs. Reads of an absent
//! pair return an empty sequence, never an error.
//!
//! ## Usage
//!
//! ```rust
//! use coherency_stats::key::{Condition, ExperimentKey};
//! use coherency_stats::store::MetricStore;
//!
//! let key = ExperimentKey::new(4, 1000, 0, Condition::Good);
//! let mut store = MetricStore::new();
//! store.append(key, "time", &[0.51, 0.49]);
//! store.append(key, "time", &[0.50]);
//!
//! assert_eq!(store.get(&key, "time").as_slice(), &[0.51, 0.49, 0.50]);
//! assert!(store.get(&key, "energy").is_empty());
//! ```

mod sequence;

pub use sequence::SampleSequence;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::extract::RawFields;
use crate::key::{ExperimentKey, MetricFamily};

static EMPTY: SampleSequence = SampleSequence::new();

/// Composite address of one sample sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Experiment configuration point
    pub key: ExperimentKey,
    /// Raw or derived field name
    pub field: String,
}

impl SeriesKey {
    /// Create a series key.
    #[must_use]
    pub fn new(key: ExperimentKey, field: impl Into<String>) -> Self {
        Self {
            key,
            field: field.into(),
        }
    }
}

/// In-memory store of sample sequences.
#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    series: FxHashMap<SeriesKey, SampleSequence>,
}

impl MetricStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no sequence has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of (key, field) sequences.
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Append every fragment one file produced under `key`.
    ///
    /// Files contributing to the same key accumulate into the same sequences.
    pub fn record(&mut self, key: ExperimentKey, family: MetricFamily, fields: RawFields) {
        for (field, values) in fields {
            tracing::trace!(%key, %family, field, samples = values.len(), "record");
            self.append(key, field, &values);
        }
    }

    /// Append samples to one sequence, creating it if absent.
    pub fn append(&mut self, key: ExperimentKey, field: &str, values: &[f64]) {
        self.series
            .entry(SeriesKey::new(key, field))
            .or_default()
            .extend_from_slice(values);
    }

    /// Replace one sequence wholesale. Used for derived fields, which are
    /// recomputed rather than merged.
    pub fn replace(&mut self, key: ExperimentKey, field: &str, values: SampleSequence) {
        self.series.insert(SeriesKey::new(key, field), values);
    }

    /// Accumulated samples for `(key, field)`; empty if absent.
    #[must_use]
    pub fn get(&self, key: &ExperimentKey, field: &str) -> &SampleSequence {
        self.series
            .get(&SeriesKey::new(*key, field))
            .unwrap_or(&EMPTY)
    }

    /// True if `(key, field)` has at least one sample.
    #[must_use]
    pub fn contains(&self, key: &ExperimentKey, field: &str) -> bool {
        !self.get(key, field).is_empty()
    }

    /// Every experiment key with at least one sequence, in key order.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<ExperimentKey> {
        self.series.keys().map(|s| s.key).collect()
    }

    /// Field names recorded under `key`, sorted.
    #[must_use]
    pub fn fields(&self, key: &ExperimentKey) -> BTreeSet<&str> {
        self.series
            .keys()
            .filter(|s| s.key == *key)
            .map(|s| s.field.as_str())
            .collect()
    }

    /// Iterate all sequences (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&SeriesKey, &SampleSequence)> {
        self.series.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Condition;

    fn key() -> ExperimentKey {
        ExperimentKey::new(2, 100, 1, Condition::Bad)
    }

    #[test]
    fn test_store_default() {
        let store = MetricStore::new();
        assert!(store.is_empty());
        assert_eq!(store.series_count(), 0);
        assert!(store.get(&key(), "time").is_empty());
    }

    #[test]
    fn test_record_accumulates_across_files() {
        let mut store = MetricStore::new();
        let mut first = RawFields::for_family(MetricFamily::PerfL3);
        first.push("l3_accesses", 10.0);
        first.push("l3_misses", 1.0);
        let mut second = RawFields::for_family(MetricFamily::PerfL3);
        second.push("l3_accesses", 20.0);
        second.push("l3_misses", 4.0);

        store.record(key(), MetricFamily::PerfL3, first);
        store.record(key(), MetricFamily::PerfL3, second);

        assert_eq!(store.get(&key(), "l3_accesses").as_slice(), &[10.0, 20.0]);
        assert_eq!(store.get(&key(), "l3_misses").as_slice(), &[1.0, 4.0]);
        assert_eq!(store.series_count(), 2);
    }

    #[test]
    fn test_replace_overwrites() {
        let mut store = MetricStore::new();
        store.append(key(), "l3_miss_rate", &[1.0, 2.0]);
        store.replace(key(), "l3_miss_rate", vec![5.0].into());
        assert_eq!(store.get(&key(), "l3_miss_rate").as_slice(), &[5.0]);
    }

    #[test]
    fn test_keys_and_fields_sorted() {
        let mut store = MetricStore::new();
        let other = ExperimentKey::new(1, 100, 1, Condition::Good);
        store.append(key(), "time", &[1.0]);
        store.append(key(), "energy", &[2.0]);
        store.append(other, "time", &[3.0]);

        let keys: Vec<_> = store.keys().into_iter().collect();
        assert_eq!(keys, vec![other, key()]);
        let fields: Vec<_> = store.fields(&key()).into_iter().collect();
        assert_eq!(fields, vec!["energy", "time"]);
        assert!(store.contains(&other, "time"));
        assert!(!store.contains(&other, "energy"));
    }
}
