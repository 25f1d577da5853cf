//! Sample Sequence - ordered samples for one (key, field) pair

use serde::{Deserialize, Serialize};

/// Ordered, append-only run samples.
///
/// Integer counters are stored as `f64`; they are exact up to 2^53.
/// Insertion order is run order, which index-aligned derivations rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSequence(Vec<f64>);

impl SampleSequence {
    /// Create an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one sample.
    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    /// Append samples in order.
    pub fn extend_from_slice(&mut self, values: &[f64]) {
        self.0.extend_from_slice(values);
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Samples in run order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterate samples in run order.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }
}

impl From<Vec<f64>> for SampleSequence {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl FromIterator<f64> for SampleSequence {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SampleSequence {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut seq = SampleSequence::new();
        seq.push(3.0);
        seq.extend_from_slice(&[1.0, 2.0]);
        assert_eq!(seq.as_slice(), &[3.0, 1.0, 2.0]);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let seq: SampleSequence = vec![1.0, 2.5].into();
        assert_eq!(serde_json::to_string(&seq).unwrap(), "[1.0,2.5]");
    }
}
