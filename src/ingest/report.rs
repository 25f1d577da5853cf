//! Ingest Report - per-file outcome of one ingestion pass

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::{ExperimentKey, MetricFamily};

/// A file whose samples were recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedFile {
    /// Bare file name
    pub file: String,
    /// Decoded experiment key
    pub key: ExperimentKey,
    /// Decoded metric family
    pub family: MetricFamily,
    /// Samples recorded across all fields
    pub samples: usize,
}

/// A file whose name was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Bare file name
    pub file: String,
    /// Rendered skip reason
    pub reason: String,
}

/// A file whose content was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    /// Bare file name
    pub file: String,
    /// 1-based line of the first bad record
    pub line: usize,
    /// Rendered failure
    pub reason: String,
}

/// Outcome of an ingestion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    /// When the pass started
    pub started_at: DateTime<Utc>,
    /// When derivation and summarization finished
    pub finished_at: Option<DateTime<Utc>>,
    /// Files recorded into the store
    pub accepted: Vec<AcceptedFile>,
    /// Files skipped by the key codec
    pub skipped: Vec<SkippedFile>,
    /// Files discarded by extraction
    pub failed: Vec<FailedFile>,
    /// Derived sequences written
    pub derived_fields: usize,
}

impl IngestReport {
    /// Empty report for a pass starting at `started_at`.
    #[must_use]
    pub const fn started(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            accepted: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            derived_fields: 0,
        }
    }

    /// Files seen, whatever their outcome.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.accepted.len() + self.skipped.len() + self.failed.len()
    }

    /// True if every file was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_counts() {
        let mut report = IngestReport::started(Utc::now());
        assert!(report.is_clean());
        report.skipped.push(SkippedFile {
            file: "bogus.txt".to_string(),
            reason: "too few segments".to_string(),
        });
        assert_eq!(report.total_files(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_serialization() {
        let started = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let report = IngestReport::started(started);
        let json = serde_json::to_string(&report).unwrap();
        let back: IngestReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
