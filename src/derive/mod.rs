//! Derived Metric Engine
//!
//! Composite metrics computed element-wise from raw counters that are only
//! meaningful together. Each derivation is a pure, index-aligned function of
//! its inputs:
//!
//! ```text
//! l1_accesses     := l1_fills
//! l1_miss_rate    := 100 * (l1_fills - l1_l2_hits) / l1_fills      (0 where l1_fills == 0)
//! l2_accesses     := l2_requests
//! l2_miss_rate    := 100 * l2_misses / l2_requests                 (0 where l2_requests == 0)
//! l3_miss_rate    := 100 * l3_misses / l3_accesses                 (0 where l3_accesses == 0)
//! cache_miss_rate := 100 * cache_misses / cache_references         (0 where cache_references == 0)
//! ```
//!
//! Inputs of unequal length are truncated to the shortest; trailing samples
//! of a longer input are ignored. A derivation whose input is absent for a
//! key is not computed. Results replace any prior value, so [`derive`] is
//! idempotent.

use crate::key::ExperimentKey;
use crate::store::{MetricStore, SampleSequence};

/// The element-wise function of a derived field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
    /// `out[i] = input[i]`
    Identity {
        /// Source field
        input: &'static str,
    },
    /// `out[i] = 100 * (total[i] - hits[i]) / total[i]`, `0` where `total[i] == 0`
    MissRateFromHits {
        /// Access count (denominator)
        total: &'static str,
        /// Hit count
        hits: &'static str,
    },
    /// `out[i] = 100 * misses[i] / total[i]`, `0` where `total[i] == 0`
    MissRate {
        /// Access count (denominator)
        total: &'static str,
        /// Miss count
        misses: &'static str,
    },
}

impl Formula {
    /// Field names this formula reads.
    #[must_use]
    pub const fn inputs(&self) -> [&'static str; 2] {
        match *self {
            Self::Identity { input } => [input, input],
            Self::MissRateFromHits { total, hits } => [total, hits],
            Self::MissRate { total, misses } => [total, misses],
        }
    }

    /// Apply the formula index by index, bounded by the shortest input.
    #[must_use]
    pub fn apply(&self, store: &MetricStore, key: &ExperimentKey) -> Option<SampleSequence> {
        match *self {
            Self::Identity { input } => {
                let values = store.get(key, input);
                (!values.is_empty()).then(|| values.clone())
            }
            Self::MissRateFromHits { total, hits } => {
                zip_inputs(store, key, total, hits, |t, h| percent(t - h, t))
            }
            Self::MissRate { total, misses } => {
                zip_inputs(store, key, total, misses, |t, m| percent(m, t))
            }
        }
    }
}

/// A named derived field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedField {
    /// Output field name
    pub name: &'static str,
    /// How it is computed
    pub formula: Formula,
}

/// Every derivation this crate computes, in evaluation order.
pub const DERIVED_FIELDS: &[DerivedField] = &[
    DerivedField {
        name: "l1_accesses",
        formula: Formula::Identity { input: "l1_fills" },
    },
    DerivedField {
        name: "l1_miss_rate",
        formula: Formula::MissRateFromHits {
            total: "l1_fills",
            hits: "l1_l2_hits",
        },
    },
    DerivedField {
        name: "l2_accesses",
        formula: Formula::Identity {
            input: "l2_requests",
        },
    },
    DerivedField {
        name: "l2_miss_rate",
        formula: Formula::MissRate {
            total: "l2_requests",
            misses: "l2_misses",
        },
    },
    DerivedField {
        name: "l3_miss_rate",
        formula: Formula::MissRate {
            total: "l3_accesses",
            misses: "l3_misses",
        },
    },
    DerivedField {
        name: "cache_miss_rate",
        formula: Formula::MissRate {
            total: "cache_references",
            misses: "cache_misses",
        },
    },
];

/// True if `field` is produced by a derivation rather than extraction.
#[must_use]
pub fn is_derived(field: &str) -> bool {
    DERIVED_FIELDS.iter().any(|d| d.name == field)
}

/// Recompute every derived field for `key` from its current raw sequences.
///
/// Returns the number of fields written.
///
/// # Example
///
/// ```rust
/// use coherency_stats::derive::derive;
/// use coherency_stats::key::{Condition, ExperimentKey};
/// use coherency_stats::store::MetricStore;
///
/// let key = ExperimentKey::new(2, 10, 0, Condition::Good);
/// let mut store = MetricStore::new();
/// store.append(key, "l2_requests", &[100.0, 100.0]);
/// store.append(key, "l2_hits", &[80.0, 80.0]);
/// store.append(key, "l2_misses", &[20.0, 20.0]);
///
/// assert_eq!(derive(&mut store, &key), 2);
/// assert_eq!(store.get(&key, "l2_accesses").as_slice(), &[100.0, 100.0]);
/// assert_eq!(store.get(&key, "l2_miss_rate").as_slice(), &[20.0, 20.0]);
/// ```
pub fn derive(store: &mut MetricStore, key: &ExperimentKey) -> usize {
    let mut written = 0;
    for derived in DERIVED_FIELDS {
        let Some(values) = derived.formula.apply(store, key) else {
            continue;
        };
        let [a, b] = derived.formula.inputs();
        let (la, lb) = (store.get(key, a).len(), store.get(key, b).len());
        if la != lb {
            tracing::debug!(
                %key,
                field = derived.name,
                lhs = la,
                rhs = lb,
                "derivation inputs differ in length; truncating to shortest"
            );
        }
        tracing::trace!(%key, field = derived.name, samples = values.len(), "derived");
        store.replace(*key, derived.name, values);
        written += 1;
    }
    written
}

/// Run [`derive`] for every key in the store. Returns the number of fields written.
pub fn derive_all(store: &mut MetricStore) -> usize {
    store
        .keys()
        .into_iter()
        .map(|key| derive(store, &key))
        .sum()
}

fn zip_inputs(
    store: &MetricStore,
    key: &ExperimentKey,
    a: &str,
    b: &str,
    f: impl Fn(f64, f64) -> f64,
) -> Option<SampleSequence> {
    let (xs, ys) = (store.get(key, a), store.get(key, b));
    if xs.is_empty() || ys.is_empty() {
        return None;
    }
    Some(xs.iter().zip(ys.iter()).map(|(&x, &y)| f(x, y)).collect())
}

fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        100.0 * numerator / denominator
    }
}
