//! Content extractors: raw file text → named sample fragments
//!
//! Two disciplines, selected by [`MetricFamily::discipline`]:
//!
//! - **Line-oriented** ([`lines`]): one record per non-blank line, a fixed
//!   number of delimited numeric tokens per record. A line with the wrong
//!   token count fails the whole file.
//! - **Pattern-oriented** ([`report`]): labeled values inside free-form
//!   `perf stat` style text, each paired with a `+- <pct>%` relative error.
//!   Missing labels read as zero.
//!
//! Extraction is all-or-nothing: a file either yields every declared field
//! or an [`ExtractionError`], never a partial fragment.

pub mod lines;
pub mod report;

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::key::{Discipline, MetricFamily};

/// Why a file's content could not be extracted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ExtractionError {
    /// 1-based line number
    pub line: usize,
    /// What went wrong on that line
    pub kind: ExtractionErrorKind,
}

/// Line-level extraction failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionErrorKind {
    /// Record had the wrong number of tokens for its family
    #[error("expected {expected} tokens, found {found}")]
    TokenCount {
        /// Tokens the family declares
        expected: usize,
        /// Tokens present
        found: usize,
    },

    /// Token is neither a finite number nor the NaN sentinel
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// Raw fields produced from one file, in the family's declared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    fields: Vec<(&'static str, Vec<f64>)>,
}

impl RawFields {
    /// Create empty fragments for every field `family` declares.
    #[must_use]
    pub fn for_family(family: MetricFamily) -> Self {
        Self {
            fields: family
                .raw_fields()
                .iter()
                .map(|name| (*name, Vec::new()))
                .collect(),
        }
    }

    /// Append a value to a field, adding the field if it is not declared yet.
    pub fn push(&mut self, field: &'static str, value: f64) {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((field, vec![value])),
        }
    }

    /// Values extracted for `field` (empty if none).
    #[must_use]
    pub fn get(&self, field: &str) -> &[f64] {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of values across all fields.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.fields.iter().map(|(_, values)| values.len()).sum()
    }

    /// Iterate `(field, values)` in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[f64])> {
        self.fields.iter().map(|(name, values)| (*name, values.as_slice()))
    }
}

impl IntoIterator for RawFields {
    type Item = (&'static str, Vec<f64>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Extract the raw fields of `family` from a file's full text.
///
/// # Errors
///
/// Returns [`ExtractionError`] when a line-oriented file has a record with
/// the wrong token count or a non-numeric token. Pattern-oriented
/// extraction never fails.
///
/// # Example
///
/// ```rust
/// use coherency_stats::config::PipelineConfig;
/// use coherency_stats::extract::extract;
/// use coherency_stats::key::MetricFamily;
///
/// let content = "l2_all,l2_hits,l2_misses\n100,80,20\n";
/// let fields = extract(content, MetricFamily::PerfL2, &PipelineConfig::default())?;
/// assert_eq!(fields.get("l2_misses"), &[20.0]);
/// # Ok::<(), coherency_stats::extract::ExtractionError>(())
/// ```
pub fn extract(
    content: &str,
    family: MetricFamily,
    config: &PipelineConfig,
) -> Result<RawFields, ExtractionError> {
    match family.discipline() {
        Discipline::Lines { columns, header } => {
            let skip = if header { config.header_lines } else { 0 };
            lines::extract_records(content, family, columns, skip, config)
        }
        Discipline::Report => Ok(report::extract_report(content, family)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_fields_declared_order() {
        let fields = RawFields::for_family(MetricFamily::PerfL2);
        let names: Vec<_> = fields.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["l2_requests", "l2_hits", "l2_misses"]);
        assert_eq!(fields.sample_count(), 0);
    }

    #[test]
    fn test_raw_fields_push_and_get() {
        let mut fields = RawFields::default();
        fields.push("time", 1.5);
        fields.push("time", 2.5);
        assert_eq!(fields.get("time"), &[1.5, 2.5]);
        assert!(fields.get("energy").is_empty());
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_dispatch_by_family() {
        let config = PipelineConfig::default();
        let time = extract("1.0\n2.0\n", MetricFamily::Time, &config).unwrap();
        assert_eq!(time.get("time"), &[1.0, 2.0]);

        let energy = extract("no labels here", MetricFamily::EnergyReport, &config).unwrap();
        assert_eq!(energy.get("energy"), &[0.0]);
        assert_eq!(energy.get("energy_err"), &[0.0]);
    }

    #[test]
    fn test_error_display() {
        let err = ExtractionError {
            line: 3,
            kind: ExtractionErrorKind::TokenCount {
                expected: 4,
                found: 2,
            },
        };
        assert_eq!(err.to_string(), "line 3: expected 4 tokens, found 2");
    }
}
