//! Entry sampler: picks the indices that may open a trade.
//!
//! An index `i` is eligible when `i % stride == 0` and the signal at `i` is
//! positive. The sampler is a lazy iterator borrowing the signal series; clone
//! it or call [`EntrySampler::restart`] to walk the indices again.

use crate::config::ConfigError;
use crate::domain::SignalSeries;

/// Lazy iterator over eligible entry indices, in ascending order.
#[derive(Debug, Clone)]
pub struct EntrySampler<'a> {
    signals: &'a SignalSeries,
    stride: usize,
    next: usize,
}

impl<'a> EntrySampler<'a> {
    pub fn new(signals: &'a SignalSeries, stride: usize) -> Result<Self, ConfigError> {
        if stride == 0 {
            return Err(ConfigError::InvalidStride);
        }
        Ok(Self {
            signals,
            stride,
            next: 0,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for EntrySampler<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let len = self.signals.len();
        while self.next < len {
            let index = self.next;
            self.next = index.checked_add(self.stride).unwrap_or(len);
            if self.signals.is_positive(index) {
                return Some(index);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.signals.len().saturating_sub(self.next);
        (0, Some(remaining.div_ceil(self.stride)))
    }
}

/// Eligible entry indices for `signals` sampled every `stride` steps.
pub fn sample_entries(
    signals: &SignalSeries,
    stride: usize,
) -> Result<EntrySampler<'_>, ConfigError> {
    EntrySampler::new(signals, stride)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_one_yields_every_positive() {
        let signals = SignalSeries::new(vec![1, 0, 1, 1, 0]);
        let entries: Vec<usize> = sample_entries(&signals, 1).unwrap().collect();
        assert_eq!(entries, vec![0, 2, 3]);
    }

    #[test]
    fn stride_skips_off_grid_signals() {
        let signals = SignalSeries::new(vec![1, 1, 1, 0, 1, 1, 1]);
        let entries: Vec<usize> = sample_entries(&signals, 3).unwrap().collect();
        // index 3 is on the grid but not positive
        assert_eq!(entries, vec![0, 6]);
    }

    #[test]
    fn zero_stride_is_invalid() {
        let signals = SignalSeries::new(vec![1]);
        assert_eq!(
            sample_entries(&signals, 0).unwrap_err(),
            ConfigError::InvalidStride
        );
    }

    #[test]
    fn all_zero_signals_yield_nothing() {
        let signals = SignalSeries::new(vec![0; 100]);
        assert_eq!(sample_entries(&signals, 1).unwrap().count(), 0);
    }

    #[test]
    fn empty_signals_yield_nothing() {
        let signals = SignalSeries::default();
        assert_eq!(sample_entries(&signals, 30).unwrap().next(), None);
    }

    #[test]
    fn huge_stride_does_not_overflow() {
        let signals = SignalSeries::new(vec![1, 1, 1]);
        let entries: Vec<usize> = sample_entries(&signals, usize::MAX).unwrap().collect();
        assert_eq!(entries, vec![0]);
    }

    #[test]
    fn sampler_is_restartable() {
        let signals = SignalSeries::new(vec![1, 0, 1, 0, 1]);
        let mut sampler = sample_entries(&signals, 2).unwrap();
        let first: Vec<usize> = sampler.by_ref().collect();
        assert_eq!(sampler.next(), None);
        sampler.restart();
        let second: Vec<usize> = sampler.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![0, 2, 4]);
    }
}
