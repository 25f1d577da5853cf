//! Experiment identity decoded from artifact file names
//!
//! ## Naming Conventions
//!
//! ```text
//! positional:   <family>_<threads>_<size>_mode<m>_<condition>.<ext>
//!               perf_<sub>_<threads>_<size>_mode<m>_<condition>.<ext>
//! descriptive:  <condition>_results_<cache|energy>_<threads>_threads_<n>_executions[_mode<m>].<ext>
//! ```
//!
//! Both conventions may coexist in one ingestion pass.
//!
//! ## Usage
//!
//! ```rust
//! use coherency_stats::key::{parse_key, Condition, MetricFamily};
//!
//! let (key, family) = parse_key("time_4_1000_mode2_good.txt")?;
//! assert_eq!(key.thread_count(), 4);
//! assert_eq!(key.workload_size(), 1000);
//! assert_eq!(key.mode(), 2);
//! assert_eq!(key.condition(), Condition::Good);
//! assert_eq!(family, MetricFamily::Time);
//! # Ok::<(), coherency_stats::key::SkipReason>(())
//! ```

mod codec;

pub use codec::{parse_key, SkipReason};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two-valued comparison axis: the variant under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Coherency-friendly access pattern (cache-aligned data)
    Good,
    /// Coherency-unfriendly access pattern (false sharing)
    Bad,
}

impl Condition {
    /// Both conditions, `Good` first.
    pub const ALL: [Self; 2] = [Self::Good, Self::Bad];

    /// Literal used in file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }

    /// The other condition.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Good => Self::Bad,
            Self::Bad => Self::Good,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = SkipReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "bad" => Ok(Self::Bad),
            other => Err(SkipReason::UnknownCondition(other.to_string())),
        }
    }
}

/// One experiment configuration point.
///
/// Equality and ordering are structural, field by field in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExperimentKey {
    thread_count: u32,
    workload_size: u64,
    mode: u32,
    condition: Condition,
}

impl ExperimentKey {
    /// Create a new experiment key.
    ///
    /// # Arguments
    ///
    /// * `thread_count` - Number of worker threads (positive)
    /// * `workload_size` - Scale parameter, e.g. number of executions
    /// * `mode` - Contention/placement configuration
    /// * `condition` - Variant under comparison
    #[must_use]
    pub const fn new(thread_count: u32, workload_size: u64, mode: u32, condition: Condition) -> Self {
        Self {
            thread_count,
            workload_size,
            mode,
            condition,
        }
    }

    /// Get the thread count.
    #[must_use]
    pub const fn thread_count(&self) -> u32 {
        self.thread_count
    }

    /// Get the workload size.
    #[must_use]
    pub const fn workload_size(&self) -> u64 {
        self.workload_size
    }

    /// Get the contention mode.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Get the condition.
    #[must_use]
    pub const fn condition(&self) -> Condition {
        self.condition
    }

    /// Same configuration point under a different condition.
    #[must_use]
    pub const fn with_condition(self, condition: Condition) -> Self {
        Self { condition, ..self }
    }

    /// Render the canonical file name for this key in the convention `family` belongs to.
    ///
    /// Descriptive names omit the `_mode<m>` suffix for mode 0.
    #[must_use]
    pub fn file_name(&self, family: MetricFamily) -> String {
        match family.report_kind() {
            Some(kind) => {
                let mut name = format!(
                    "{}_results_{kind}_{}_threads_{}_executions",
                    self.condition, self.thread_count, self.workload_size
                );
                if self.mode != 0 {
                    name.push_str(&format!("_mode{}", self.mode));
                }
                name.push_str(".txt");
                name
            }
            None => format!(
                "{}_{}_{}_mode{}_{}.txt",
                family.prefix(),
                self.thread_count,
                self.workload_size,
                self.mode,
                self.condition
            ),
        }
    }
}

impl fmt::Display for ExperimentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "threads={} size={} mode={} condition={}",
            self.thread_count, self.workload_size, self.mode, self.condition
        )
    }
}

/// How a family's file content is turned into samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// One record per line, `columns` tokens each
    Lines {
        /// Tokens per line
        columns: usize,
        /// Whether the file starts with a header
        header: bool,
    },
    /// Labeled values embedded in free-form report text
    Report,
}

/// Which extraction strategy and which raw fields a source file yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    /// Wall-clock time, one scalar per line
    Time,
    /// Energy, one scalar per line
    Energy,
    /// Remote fill / conflict counters
    PerfCache,
    /// L1 fill and L2-hit counters
    PerfL1,
    /// L2 request, hit and miss counters
    PerfL2,
    /// L3 access and miss counters
    PerfL3,
    /// `perf stat` style cache report (descriptive convention)
    CacheReport,
    /// `perf stat` style energy report (descriptive convention)
    EnergyReport,
}

impl MetricFamily {
    /// Every family.
    pub const ALL: [Self; 8] = [
        Self::Time,
        Self::Energy,
        Self::PerfCache,
        Self::PerfL1,
        Self::PerfL2,
        Self::PerfL3,
        Self::CacheReport,
        Self::EnergyReport,
    ];

    /// Names of the raw fields this family produces.
    ///
    /// For line families these are in column order.
    #[must_use]
    pub const fn raw_fields(self) -> &'static [&'static str] {
        match self {
            Self::Time => &["time"],
            Self::Energy => &["energy"],
            Self::PerfCache => &["remote_fills", "remote_cache_fills", "conflicts", "perf_cache_misses"],
            Self::PerfL1 => &["l1_fills", "l1_l2_hits"],
            Self::PerfL2 => &["l2_requests", "l2_hits", "l2_misses"],
            Self::PerfL3 => &["l3_accesses", "l3_misses"],
            Self::CacheReport => &[
                "time",
                "time_std",
                "cache_references",
                "cache_references_err",
                "cache_misses",
                "cache_misses_err",
                "instructions",
                "instructions_err",
            ],
            Self::EnergyReport => &["energy", "energy_err"],
        }
    }

    /// Extraction discipline for this family.
    #[must_use]
    pub const fn discipline(self) -> Discipline {
        match self {
            Self::Time | Self::Energy => Discipline::Lines {
                columns: 1,
                header: false,
            },
            Self::PerfCache | Self::PerfL1 | Self::PerfL2 | Self::PerfL3 => Discipline::Lines {
                columns: self.raw_fields().len(),
                header: true,
            },
            Self::CacheReport | Self::EnergyReport => Discipline::Report,
        }
    }

    /// File name prefix in the positional convention.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Energy => "energy",
            Self::PerfCache => "perf_cache",
            Self::PerfL1 => "perf_l1",
            Self::PerfL2 => "perf_l2",
            Self::PerfL3 => "perf_l3",
            Self::CacheReport => "cache",
            Self::EnergyReport => "energy",
        }
    }

    /// Report type token (`cache`/`energy`) for descriptive-convention families.
    #[must_use]
    pub const fn report_kind(self) -> Option<&'static str> {
        match self {
            Self::CacheReport => Some("cache"),
            Self::EnergyReport => Some("energy"),
            _ => None,
        }
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.report_kind() {
            Some(kind) => write!(f, "{kind}_report"),
            None => f.write_str(self.prefix()),
        }
    }
}
