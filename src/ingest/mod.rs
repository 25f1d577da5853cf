//! Ingestion pass: (file name, content) pairs → metric store → summary
//!
//! Every file is a bounded unit of work. A name the key codec rejects is
//! skipped; content that fails extraction is discarded whole. Both are
//! logged and recorded in the [`IngestReport`], and the rest of the batch
//! proceeds. Nothing is fatal to the run.
//!
//! ```text
//! name ──parse_key──► (key, family)
//! content ──extract──► RawFields ──record──► MetricStore ──derive──► SummaryTable
//! ```

mod report;

pub use report::{AcceptedFile, FailedFile, IngestReport, SkippedFile};

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::derive::derive_all;
use crate::extract::extract;
use crate::key::parse_key;
use crate::stats::SummaryTable;
use crate::store::MetricStore;
use crate::{Error, Result};

/// One candidate input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name (a leading directory path is ignored)
    pub name: String,
    /// Full text content
    pub content: String,
}

impl SourceFile {
    /// Create a source file.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Accumulates files into a metric store.
#[derive(Debug)]
pub struct Ingestor {
    config: PipelineConfig,
    store: MetricStore,
    report: IngestReport,
}

impl Ingestor {
    /// Create an ingestor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `config` fails validation.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: MetricStore::new(),
            report: IngestReport::started(Utc::now()),
        })
    }

    /// Ingest one file. Returns the number of samples recorded.
    ///
    /// The outcome is also recorded in the report, so callers may ignore
    /// the error and continue with the next file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Skipped`] if the name is not recognized and
    /// [`Error::Extraction`] if the content is corrupted. In both cases the
    /// store is left untouched.
    pub fn ingest_file(&mut self, name: &str, content: &str) -> Result<usize> {
        let name = bare_name(name);

        let (key, family) = match parse_key(name) {
            Ok(parsed) => parsed,
            Err(reason) => {
                tracing::warn!(file = name, %reason, "skipping file");
                self.report.skipped.push(SkippedFile {
                    file: name.to_string(),
                    reason: reason.to_string(),
                });
                return Err(Error::Skipped {
                    file: name.to_string(),
                    reason,
                });
            }
        };

        let fields = match extract(content, family, &self.config) {
            Ok(fields) => fields,
            Err(source) => {
                tracing::warn!(file = name, %family, error = %source, "discarding file");
                self.report.failed.push(FailedFile {
                    file: name.to_string(),
                    line: source.line,
                    reason: source.kind.to_string(),
                });
                return Err(Error::Extraction {
                    file: name.to_string(),
                    source,
                });
            }
        };

        let samples = fields.sample_count();
        tracing::debug!(file = name, %family, %key, samples, "ingested");
        self.store.record(key, family, fields);
        self.report.accepted.push(AcceptedFile {
            file: name.to_string(),
            key,
            family,
            samples,
        });
        Ok(samples)
    }

    /// Ingest every file, continuing past skipped and failed ones.
    pub fn ingest<I, N, C>(&mut self, files: I)
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        for (name, content) in files {
            // Outcome is already logged and recorded in the report.
            let _ = self.ingest_file(name.as_ref(), content.as_ref());
        }
    }

    /// Raw store accumulated so far.
    #[must_use]
    pub const fn store(&self) -> &MetricStore {
        &self.store
    }

    /// Report accumulated so far.
    #[must_use]
    pub const fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Run derivations (if enabled) and summarize.
    #[must_use]
    pub fn finish(mut self) -> Analysis {
        if self.config.derive {
            self.report.derived_fields = derive_all(&mut self.store);
        }
        let summary = SummaryTable::from_store(&self.store);
        self.report.finished_at = Some(Utc::now());

        tracing::info!(
            accepted = self.report.accepted.len(),
            skipped = self.report.skipped.len(),
            failed = self.report.failed.len(),
            derived = self.report.derived_fields,
            series = summary.len(),
            "ingestion complete"
        );

        Analysis {
            store: self.store,
            summary,
            report: self.report,
        }
    }
}

/// Result of one ingestion pass.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Raw and derived samples, for callers needing per-sample data
    pub store: MetricStore,
    /// Summary statistics per (key, field)
    pub summary: SummaryTable,
    /// What was accepted, skipped and discarded
    pub report: IngestReport,
}

/// Run the whole pipeline over an in-memory file set.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] only if `config` is invalid; per-file
/// problems are reported in [`Analysis::report`].
///
/// # Example
///
/// ```rust
/// use coherency_stats::config::PipelineConfig;
/// use coherency_stats::ingest::{analyze, SourceFile};
/// use coherency_stats::key::{Condition, ExperimentKey};
///
/// let files = vec![
///     SourceFile::new("time_4_1000_mode2_good.txt", "0.5\n0.7\n"),
///     SourceFile::new("bogus.txt", "ignored"),
/// ];
/// let analysis = analyze(&files, &PipelineConfig::default())?;
///
/// let key = ExperimentKey::new(4, 1000, 2, Condition::Good);
/// assert!((analysis.summary.get(&key, "time").mean - 0.6).abs() < 1e-12);
/// assert_eq!(analysis.report.skipped.len(), 1);
/// # Ok::<(), coherency_stats::Error>(())
/// ```
pub fn analyze<'a>(
    files: impl IntoIterator<Item = &'a SourceFile>,
    config: &PipelineConfig,
) -> Result<Analysis> {
    let mut ingestor = Ingestor::new(config.clone())?;
    ingestor.ingest(files.into_iter().map(|f| (&f.name, &f.content)));
    Ok(ingestor.finish())
}

fn bare_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Condition, ExperimentKey};

    #[test]
    fn test_skip_leaves_store_untouched() {
        let mut ingestor = Ingestor::new(PipelineConfig::default()).unwrap();
        let err = ingestor.ingest_file("bogus.txt", "1.0\n").unwrap_err();
        assert!(matches!(err, Error::Skipped { .. }));
        assert!(ingestor.store().is_empty());
        assert_eq!(ingestor.report().skipped[0].file, "bogus.txt");
    }

    #[test]
    fn test_extraction_failure_discards_whole_file() {
        let mut ingestor = Ingestor::new(PipelineConfig::default()).unwrap();
        let content = "l2_all,l2_hits,l2_misses\n100,80,20\n100,80\n";
        let err = ingestor
            .ingest_file("perf_l2_2_10_mode0_good.txt", content)
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
        assert!(ingestor.store().is_empty());
        assert_eq!(ingestor.report().failed[0].line, 3);
    }

    #[test]
    fn test_directory_prefix_ignored() {
        let mut ingestor = Ingestor::new(PipelineConfig::default()).unwrap();
        let samples = ingestor
            .ingest_file("results/raw/time_1_10_mode0_bad.txt", "1.0\n2.0\n")
            .unwrap();
        assert_eq!(samples, 2);
        let key = ExperimentKey::new(1, 10, 0, Condition::Bad);
        assert_eq!(ingestor.store().get(&key, "time").len(), 2);
    }

    #[test]
    fn test_derive_can_be_disabled() {
        let config = PipelineConfig {
            derive: false,
            ..PipelineConfig::default()
        };
        let mut ingestor = Ingestor::new(config).unwrap();
        ingestor
            .ingest_file("perf_l3_2_10_mode0_good.txt", "h\n10,1\n")
            .unwrap();
        let analysis = ingestor.finish();
        let key = ExperimentKey::new(2, 10, 0, Condition::Good);
        assert!(analysis.summary.get(&key, "l3_miss_rate").is_empty());
        assert_eq!(analysis.report.derived_fields, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            nan_literal: String::new(),
            ..PipelineConfig::default()
        };
        assert!(matches!(Ingestor::new(config), Err(Error::InvalidInput(_))));
    }
}
