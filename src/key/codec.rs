//! File name → (`ExperimentKey`, `MetricFamily`) codec

use thiserror::Error;

use super::{Condition, ExperimentKey, MetricFamily};

/// Why a file name was not recognized. Skipping is never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No `.<ext>` suffix
    #[error("missing file extension")]
    MissingExtension,

    /// Fewer `_`-delimited segments than the convention needs
    #[error("too few segments: found {found}, expected {expected}")]
    TooFewSegments {
        /// Segments present
        found: usize,
        /// Segments required
        expected: usize,
    },

    /// More `_`-delimited segments than the convention allows
    #[error("too many segments: found {found}, expected {expected}")]
    TooManySegments {
        /// Segments present
        found: usize,
        /// Segments allowed
        expected: usize,
    },

    /// Leading token names no known family
    #[error("unknown metric family '{0}'")]
    UnknownFamily(String),

    /// A literal separator word was not where the convention puts it
    #[error("expected '{expected}', found '{found}'")]
    UnexpectedToken {
        /// Literal the convention requires
        expected: &'static str,
        /// Token actually present
        found: String,
    },

    /// Integer field did not parse
    #[error("invalid {field} '{token}'")]
    InvalidInteger {
        /// Which key component
        field: &'static str,
        /// Offending token
        token: String,
    },

    /// Thread count of zero
    #[error("thread count must be positive")]
    ZeroThreads,

    /// Mode token lacks the `mode` prefix
    #[error("mode token '{0}' lacks the 'mode' prefix")]
    MissingModePrefix(String),

    /// Condition is neither `good` nor `bad`
    #[error("unknown condition '{0}'")]
    UnknownCondition(String),
}

const MODE_PREFIX: &str = "mode";

/// Decode a bare file name into its experiment key and metric family.
///
/// # Errors
///
/// Returns a [`SkipReason`] when the name matches neither naming convention,
/// has the wrong number of segments, or carries a non-integer where an
/// integer is required.
///
/// # Example
///
/// ```rust
/// use coherency_stats::key::{parse_key, MetricFamily, SkipReason};
///
/// let (key, family) = parse_key("good_results_energy_2_threads_500_executions.txt")?;
/// assert_eq!(family, MetricFamily::EnergyReport);
/// assert_eq!(key.mode(), 0);
///
/// assert!(matches!(parse_key("bogus.txt"), Err(SkipReason::TooFewSegments { .. })));
/// # Ok::<(), SkipReason>(())
/// ```
pub fn parse_key(file_name: &str) -> Result<(ExperimentKey, MetricFamily), SkipReason> {
    let (stem, ext) = file_name
        .rsplit_once('.')
        .ok_or(SkipReason::MissingExtension)?;
    if stem.is_empty() || ext.is_empty() {
        return Err(SkipReason::MissingExtension);
    }

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() >= 2 && parts[1] == "results" && parts[0].parse::<Condition>().is_ok() {
        parse_descriptive(&parts)
    } else {
        parse_positional(&parts)
    }
}

/// `<family>_<threads>_<size>_mode<m>_<condition>` or `perf_<sub>_...`
fn parse_positional(parts: &[&str]) -> Result<(ExperimentKey, MetricFamily), SkipReason> {
    const MIN_SEGMENTS: usize = 5;
    if parts.len() < MIN_SEGMENTS {
        return Err(SkipReason::TooFewSegments {
            found: parts.len(),
            expected: MIN_SEGMENTS,
        });
    }

    let (family, offset) = match parts[0] {
        "perf" => {
            let family = match parts[1] {
                "cache" => MetricFamily::PerfCache,
                "l1" => MetricFamily::PerfL1,
                "l2" => MetricFamily::PerfL2,
                "l3" => MetricFamily::PerfL3,
                other => return Err(SkipReason::UnknownFamily(format!("perf_{other}"))),
            };
            (family, 2)
        }
        "time" => (MetricFamily::Time, 1),
        "energy" => (MetricFamily::Energy, 1),
        other => return Err(SkipReason::UnknownFamily(other.to_string())),
    };

    let expected = offset + 4;
    check_segment_count(parts.len(), expected)?;

    let thread_count = parse_threads(parts[offset])?;
    let workload_size = parse_int::<u64>("workload_size", parts[offset + 1])?;
    let mode = parse_mode(parts[offset + 2])?;
    let condition = parts[offset + 3].parse::<Condition>()?;

    Ok((
        ExperimentKey::new(thread_count, workload_size, mode, condition),
        family,
    ))
}

/// `<condition>_results_<cache|energy>_<threads>_threads_<n>_executions[_mode<m>]`
fn parse_descriptive(parts: &[&str]) -> Result<(ExperimentKey, MetricFamily), SkipReason> {
    const BASE_SEGMENTS: usize = 7;
    if parts.len() < BASE_SEGMENTS {
        return Err(SkipReason::TooFewSegments {
            found: parts.len(),
            expected: BASE_SEGMENTS,
        });
    }
    if parts.len() > BASE_SEGMENTS + 1 {
        return Err(SkipReason::TooManySegments {
            found: parts.len(),
            expected: BASE_SEGMENTS + 1,
        });
    }

    let condition = parts[0].parse::<Condition>()?;
    let family = match parts[2] {
        "cache" => MetricFamily::CacheReport,
        "energy" => MetricFamily::EnergyReport,
        other => return Err(SkipReason::UnknownFamily(other.to_string())),
    };
    let thread_count = parse_threads(parts[3])?;
    expect_literal(parts[4], "threads")?;
    let workload_size = parse_int::<u64>("workload_size", parts[5])?;
    expect_literal(parts[6], "executions")?;
    let mode = match parts.get(BASE_SEGMENTS) {
        Some(token) => parse_mode(token)?,
        None => 0,
    };

    Ok((
        ExperimentKey::new(thread_count, workload_size, mode, condition),
        family,
    ))
}

fn check_segment_count(found: usize, expected: usize) -> Result<(), SkipReason> {
    match found.cmp(&expected) {
        std::cmp::Ordering::Less => Err(SkipReason::TooFewSegments { found, expected }),
        std::cmp::Ordering::Greater => Err(SkipReason::TooManySegments { found, expected }),
        std::cmp::Ordering::Equal => Ok(()),
    }
}

fn expect_literal(token: &str, expected: &'static str) -> Result<(), SkipReason> {
    if token == expected {
        Ok(())
    } else {
        Err(SkipReason::UnexpectedToken {
            expected,
            found: token.to_string(),
        })
    }
}

fn parse_int<T: std::str::FromStr>(field: &'static str, token: &str) -> Result<T, SkipReason> {
    // Reject signs and whitespace that FromStr would otherwise accept.
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SkipReason::InvalidInteger {
            field,
            token: token.to_string(),
        });
    }
    token.parse::<T>().map_err(|_| SkipReason::InvalidInteger {
        field,
        token: token.to_string(),
    })
}

fn parse_threads(token: &str) -> Result<u32, SkipReason> {
    match parse_int::<u32>("thread_count", token)? {
        0 => Err(SkipReason::ZeroThreads),
        n => Ok(n),
    }
}

fn parse_mode(token: &str) -> Result<u32, SkipReason> {
    let digits = token
        .strip_prefix(MODE_PREFIX)
        .ok_or_else(|| SkipReason::MissingModePrefix(token.to_string()))?;
    parse_int::<u32>("mode", digits)
}
