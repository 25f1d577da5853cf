//! Summary Table - read-only (key, field) → `SummaryStat` view
//!
//! Built once from a [`MetricStore`] after derivation. This is the table the
//! rendering collaborator consumes, either directly, as JSON rows, or as an
//! Arrow `RecordBatch`.

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{summarize, SummaryStat};
use crate::key::ExperimentKey;
use crate::store::{MetricStore, SeriesKey};
use crate::Result;

/// One flattened row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Experiment configuration point
    #[serde(flatten)]
    pub key: ExperimentKey,
    /// Raw or derived field name
    pub field: String,
    /// Summary statistic
    #[serde(flatten)]
    pub stat: SummaryStat,
}

/// Summary statistics for every (key, field) in a store, ordered by key then field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    stats: BTreeMap<SeriesKey, SummaryStat>,
}

impl SummaryTable {
    /// Summarize every sequence in `store`.
    #[must_use]
    pub fn from_store(store: &MetricStore) -> Self {
        Self {
            stats: store
                .iter()
                .map(|(series, samples)| (series.clone(), summarize(samples.as_slice())))
                .collect(),
        }
    }

    /// Number of (key, field) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// True if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Summary for `(key, field)`; a zero-count stat if absent.
    #[must_use]
    pub fn get(&self, key: &ExperimentKey, field: &str) -> SummaryStat {
        self.stats
            .get(&SeriesKey::new(*key, field))
            .copied()
            .unwrap_or_default()
    }

    /// Iterate entries in key, then field order.
    pub fn iter(&self) -> impl Iterator<Item = (&SeriesKey, &SummaryStat)> {
        self.stats.iter()
    }

    /// Keys with at least one sample of `field`, in key order.
    pub fn keys_with<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ExperimentKey> + 'a {
        self.stats
            .iter()
            .filter(move |(series, stat)| series.field == field && !stat.is_empty())
            .map(|(series, _)| &series.key)
    }

    /// Flattened rows in table order.
    #[must_use]
    pub fn rows(&self) -> Vec<SummaryRow> {
        self.stats
            .iter()
            .map(|(series, stat)| SummaryRow {
                key: series.key,
                field: series.field.clone(),
                stat: *stat,
            })
            .collect()
    }

    /// Rows as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.rows())?)
    }

    /// Arrow schema of [`to_record_batch`](Self::to_record_batch).
    #[must_use]
    pub fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("thread_count", DataType::UInt32, false),
            Field::new("workload_size", DataType::UInt64, false),
            Field::new("mode", DataType::UInt32, false),
            Field::new("condition", DataType::Utf8, false),
            Field::new("field", DataType::Utf8, false),
            Field::new("mean", DataType::Float64, false),
            Field::new("standard_error", DataType::Float64, false),
            Field::new("count", DataType::UInt64, false),
        ]))
    }

    /// Export the table as one columnar batch, in table order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Arrow`] if the batch cannot be assembled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use coherency_stats::key::{Condition, ExperimentKey};
    /// use coherency_stats::stats::SummaryTable;
    /// use coherency_stats::store::MetricStore;
    ///
    /// let mut store = MetricStore::new();
    /// store.append(ExperimentKey::new(2, 10, 0, Condition::Good), "time", &[1.0, 3.0]);
    ///
    /// let batch = SummaryTable::from_store(&store).to_record_batch()?;
    /// assert_eq!(batch.num_rows(), 1);
    /// assert_eq!(batch.num_columns(), 8);
    /// # Ok::<(), coherency_stats::Error>(())
    /// ```
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let entries = || self.stats.iter();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt32Array::from_iter_values(entries().map(|(s, _)| s.key.thread_count()))),
            Arc::new(UInt64Array::from_iter_values(entries().map(|(s, _)| s.key.workload_size()))),
            Arc::new(UInt32Array::from_iter_values(entries().map(|(s, _)| s.key.mode()))),
            Arc::new(StringArray::from_iter_values(entries().map(|(s, _)| s.key.condition().as_str()))),
            Arc::new(StringArray::from_iter_values(entries().map(|(s, _)| s.field.as_str()))),
            Arc::new(Float64Array::from_iter_values(entries().map(|(_, st)| st.mean))),
            Arc::new(Float64Array::from_iter_values(entries().map(|(_, st)| st.standard_error))),
            Arc::new(UInt64Array::from_iter_values(entries().map(|(_, st)| st.count as u64))),
        ];
        Ok(RecordBatch::try_new(Self::schema(), columns)?)
    }
}
