//! Pattern-oriented extraction from `perf stat` style reports
//!
//! ```text
//! Time for good coherency: 12.5 ms
//! Time for bad coherency (mode 2): 48.1 ms
//!      1,234      cache-references                 ( +-  2.50% )
//!        321      cache-misses   # 26.0 % of all cache refs  ( +-  1.10% )
//!      12.34 Joules power/energy-pkg/             ( +-  0.80% )
//! ```

use regex::Regex;
use std::sync::LazyLock;

use super::RawFields;
use crate::key::MetricFamily;

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Time for [^\n]*?coherency[^:\n]*:\s*([0-9]+(?:\.[0-9]+)?)\s*ms")
        .expect("static time pattern")
});
static CACHE_REFERENCES: LazyLock<Regex> = LazyLock::new(|| counter_pattern("cache-references"));
static CACHE_MISSES: LazyLock<Regex> = LazyLock::new(|| counter_pattern("cache-misses"));
static INSTRUCTIONS: LazyLock<Regex> = LazyLock::new(|| counter_pattern("instructions"));
static JOULES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)([0-9]+(?:\.[0-9]+)?)\s+Joules.*?\+-\s*([0-9]+(?:\.[0-9]+)?)\s*%")
        .expect("static energy pattern")
});

fn counter_pattern(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?s)([0-9]+(?:,[0-9]+)*)\s+{}.*?\+-\s*([0-9]+(?:\.[0-9]+)?)\s*%",
        regex::escape(label)
    ))
    .expect("static counter pattern")
}

/// A reported value with its absolute error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurement {
    /// Reported value
    pub value: f64,
    /// Absolute error: `value * pct / 100`
    pub error: f64,
}

/// A labeled counter in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// `cache-references`
    CacheReferences,
    /// `cache-misses`
    CacheMisses,
    /// `instructions`
    Instructions,
    /// `Joules` (energy unit)
    Joules,
}

impl Label {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::CacheReferences => &*CACHE_REFERENCES,
            Self::CacheMisses => &*CACHE_MISSES,
            Self::Instructions => &*INSTRUCTIONS,
            Self::Joules => &*JOULES,
        }
    }
}

/// First occurrence of `label`, or zero value and error when absent.
///
/// # Example
///
/// ```rust
/// use coherency_stats::extract::report::{measurement, Label};
///
/// let m = measurement("  1,234  cache-references  ( +- 2.5% )", Label::CacheReferences);
/// assert_eq!(m.value, 1234.0);
/// assert!((m.error - 30.85).abs() < 1e-9);
/// ```
#[must_use]
pub fn measurement(content: &str, label: Label) -> Measurement {
    let Some(caps) = label.pattern().captures(content) else {
        return Measurement::default();
    };
    let value = caps[1].replace(',', "").parse::<f64>().unwrap_or(0.0);
    let pct = caps[2].parse::<f64>().unwrap_or(0.0);
    Measurement {
        value,
        error: value * pct / 100.0,
    }
}

/// Every `Time for ... coherency: <ms> ms` occurrence, in report order.
#[must_use]
pub fn times(content: &str) -> Vec<f64> {
    TIME.captures_iter(content)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .collect()
}

/// Population standard deviation (divisor `n`), zero for fewer than two values.
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Extract every field of a report family. Absent labels read as zero.
#[must_use]
pub fn extract_report(content: &str, family: MetricFamily) -> RawFields {
    let mut fields = RawFields::for_family(family);
    match family {
        MetricFamily::CacheReport => {
            let times = times(content);
            fields.push("time_std", population_std(&times));
            for t in times {
                fields.push("time", t);
            }
            for (label, value_field, err_field) in [
                (Label::CacheReferences, "cache_references", "cache_references_err"),
                (Label::CacheMisses, "cache_misses", "cache_misses_err"),
                (Label::Instructions, "instructions", "instructions_err"),
            ] {
                let m = measurement(content, label);
                fields.push(value_field, m.value);
                fields.push(err_field, m.error);
            }
        }
        MetricFamily::EnergyReport => {
            let m = measurement(content, Label::Joules);
            fields.push("energy", m.value);
            fields.push("energy_err", m.error);
        }
        _ => {}
    }
    fields
}
