//! SignalSeries: binary model predictions aligned with a price series.

use serde::{Deserialize, Serialize};

/// One prediction per price point: 1 = buy, 0 = no buy.
///
/// Values are not checked against {0, 1}; any non-zero value counts as a
/// positive signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalSeries {
    values: Vec<i64>,
}

impl SignalSeries {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    pub fn from_bools(flags: &[bool]) -> Self {
        Self {
            values: flags.iter().map(|&b| i64::from(b)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    pub fn is_positive(&self, index: usize) -> bool {
        self.get(index).is_some_and(|v| v != 0)
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn positive_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0).count()
    }
}

impl From<Vec<i64>> for SignalSeries {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}
