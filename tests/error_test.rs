//! Tests for error types

use coherency_stats::extract::{ExtractionError, ExtractionErrorKind};
use coherency_stats::key::SkipReason;
use coherency_stats::Error;
use std::error::Error as _;

#[test]
fn test_skipped_error() {
    let error = Error::Skipped {
        file: "bogus.txt".to_string(),
        reason: SkipReason::TooFewSegments {
            found: 1,
            expected: 5,
        },
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Skipped bogus.txt"));
    assert!(error_str.contains("too few segments"));
    assert_eq!(error.file(), Some("bogus.txt"));
}

#[test]
fn test_extraction_error_has_source() {
    let error = Error::Extraction {
        file: "perf_l2_2_10_mode0_good.txt".to_string(),
        source: ExtractionError {
            line: 4,
            kind: ExtractionErrorKind::TokenCount {
                expected: 3,
                found: 5,
            },
        },
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Extraction failed for perf_l2_2_10_mode0_good.txt"));
    assert!(error_str.contains("line 4: expected 3 tokens, found 5"));
    assert!(error.source().is_some());
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("nan_literal must not be empty".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("nan_literal"));
    assert_eq!(error.file(), None);
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("Config error"));
}

#[test]
fn test_arrow_error_conversion() {
    let arrow_error = arrow::error::ArrowError::SchemaError("bad schema".to_string());
    let error: Error = arrow_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("Arrow error"));
    assert!(error_str.contains("bad schema"));
}

#[test]
fn test_invalid_number_display() {
    let kind = ExtractionErrorKind::InvalidNumber("12x".to_string());
    assert_eq!(kind.to_string(), "invalid number '12x'");
}

#[test]
fn test_error_debug() {
    let error = Error::InvalidInput("test".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidInput"));
}
