//! Line-oriented extraction (scalar and counter-tuple files)

use super::{ExtractionError, ExtractionErrorKind, RawFields};
use crate::config::PipelineConfig;
use crate::key::MetricFamily;

/// Parse every non-blank record after `skip` header lines into `columns` values.
///
/// Scalar families (`columns == 1`) take the whole trimmed line as the token;
/// counter families split on the configured delimiter.
///
/// # Errors
///
/// Returns [`ExtractionError`] on the first record with a wrong token count
/// or an unparseable token.
pub fn extract_records(
    content: &str,
    family: MetricFamily,
    columns: usize,
    skip: usize,
    config: &PipelineConfig,
) -> Result<RawFields, ExtractionError> {
    let names = family.raw_fields();
    let mut fields = RawFields::for_family(family);

    for (idx, line) in content.lines().enumerate().skip(skip) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let tokens: Vec<&str> = if columns == 1 {
            vec![line]
        } else {
            line.split(config.delimiter).map(str::trim).collect()
        };
        if tokens.len() != columns {
            return Err(ExtractionError {
                line: line_no,
                kind: ExtractionErrorKind::TokenCount {
                    expected: columns,
                    found: tokens.len(),
                },
            });
        }

        // Parse the whole record before appending so columns stay aligned.
        let mut record = Vec::with_capacity(columns);
        for token in tokens {
            record.push(parse_token(token, &config.nan_literal).ok_or_else(|| {
                ExtractionError {
                    line: line_no,
                    kind: ExtractionErrorKind::InvalidNumber(token.to_string()),
                }
            })?);
        }
        for (name, value) in names.iter().copied().zip(record) {
            fields.push(name, value);
        }
    }

    Ok(fields)
}

/// Integer or float token; the NaN sentinel reads as zero. Non-finite values are rejected.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn parse_token(token: &str, nan_literal: &str) -> Option<f64> {
    if token == nan_literal {
        return Some(0.0);
    }
    if let Ok(int) = token.parse::<i64>() {
        return Some(int as f64);
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn test_scalar_lines_skip_blanks() {
        let fields =
            extract_records("0.51\n\n0.49\n  0.50  \n", MetricFamily::Time, 1, 0, &config()).unwrap();
        assert_eq!(fields.get("time"), &[0.51, 0.49, 0.50]);
    }

    #[test]
    fn test_counter_header_skipped() {
        let content = "remote_fills,demand_remote_fills,conflicts,cache_misses\n10,5,0,2\n";
        let fields = extract_records(content, MetricFamily::PerfCache, 4, 1, &config()).unwrap();
        assert_eq!(fields.get("remote_fills"), &[10.0]);
        assert_eq!(fields.get("remote_cache_fills"), &[5.0]);
        assert_eq!(fields.get("conflicts"), &[0.0]);
        assert_eq!(fields.get("perf_cache_misses"), &[2.0]);
    }

    #[test]
    fn test_nan_sentinel_reads_zero() {
        let content = "l1_fills,l1_l2_hits\n100,NaN\nNaN,7\n";
        let fields = extract_records(content, MetricFamily::PerfL1, 2, 1, &config()).unwrap();
        assert_eq!(fields.get("l1_fills"), &[100.0, 0.0]);
        assert_eq!(fields.get("l1_l2_hits"), &[0.0, 7.0]);
    }

    #[test]
    fn test_wrong_token_count_is_hard_failure() {
        let content = "a,b,c\n100,80,20\n100,80\n";
        let err = extract_records(content, MetricFamily::PerfL2, 3, 1, &config()).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(
            err.kind,
            ExtractionErrorKind::TokenCount {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = extract_records("1.0\nfast\n", MetricFamily::Time, 1, 0, &config()).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ExtractionErrorKind::InvalidNumber("fast".to_string()));
    }

    #[test]
    fn test_parse_token_rejects_non_finite() {
        assert_eq!(parse_token("42", "NaN"), Some(42.0));
        assert_eq!(parse_token("4.5e1", "NaN"), Some(45.0));
        assert_eq!(parse_token("NaN", "NaN"), Some(0.0));
        assert_eq!(parse_token("nan", "NaN"), None);
        assert_eq!(parse_token("inf", "NaN"), None);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = PipelineConfig {
            delimiter: ';',
            ..PipelineConfig::default()
        };
        let fields =
            extract_records("hdr\n30;3\n", MetricFamily::PerfL3, 2, 1, &config).unwrap();
        assert_eq!(fields.get("l3_accesses"), &[30.0]);
        assert_eq!(fields.get("l3_misses"), &[3.0]);
    }
}
