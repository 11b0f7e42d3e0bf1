//! PriceSeries: the chronological closing-price input of a simulation.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("timestamp at index {index} is earlier than its predecessor")]
    Unsorted { index: usize },

    #[error("duplicate timestamp at index {index}")]
    DuplicateTimestamp { index: usize },

    #[error("close at index {index} must be finite and positive, got {price}")]
    InvalidPrice { index: usize, price: f64 },
}

/// A single (timestamp, close) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Ordered closing prices for one symbol and interval.
///
/// Construction validates the series once: timestamps strictly increasing,
/// closes finite and positive. After that the series is immutable and is only
/// handed out by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(SeriesError::InvalidPrice {
                    index,
                    price: point.close,
                });
            }
            if index > 0 {
                let prev = points[index - 1].timestamp;
                if point.timestamp == prev {
                    return Err(SeriesError::DuplicateTimestamp { index });
                }
                if point.timestamp < prev {
                    return Err(SeriesError::Unsorted { index });
                }
            }
        }
        Ok(Self { points })
    }

    /// Build a series from bare closes, stamping one day per element from the Unix epoch.
    ///
    /// Useful when only the index matters (tests, synthetic data).
    pub fn from_closes(closes: &[f64]) -> Result<Self, SeriesError> {
        let epoch = NaiveDateTime::default();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(epoch + Duration::days(i as i64), close))
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// The last `n` points as a new series (the whole series if `n >= len`).
    pub fn tail(&self, n: usize) -> Self {
        let start = self.points.len().saturating_sub(n);
        Self {
            points: self.points[start..].to_vec(),
        }
    }
}

impl std::ops::Index<usize> for PriceSeries {
    type Output = PricePoint;

    fn index(&self, index: usize) -> &PricePoint {
        &self.points[index]
    }
}
