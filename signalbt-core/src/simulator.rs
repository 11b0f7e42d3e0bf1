//! Trade simulator: profit-target / stop-loss exits over a price series.
//!
//! For every eligible entry index the simulator opens a long trade at that
//! index's close and walks forward one point at a time:
//!
//! 1. `change >= profit_target` closes the trade as `profit`.
//! 2. Otherwise `change <= -stop_loss` closes it as `stop_loss`.
//! 3. If the series runs out first the trade closes as `no_action` at the
//!    last close. An entry on the last index closes immediately at its own price.
//!
//! Profit is checked before the stop at each step, so when both thresholds
//! are crossed on the same point the trade counts as a profit.
//!
//! Trades are independent: each scan starts from its own entry and reads the
//! price series only. Parallel mode uses rayon and yields the same ledger.

use rayon::prelude::*;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{BacktestConfig, ConfigError};
use crate::domain::{PriceSeries, SignalSeries, TradeOutcome, TradeRecord};
use crate::ledger::Ledger;
use crate::observer::{NoopObserver, ScanStep, TradeObserver};
use crate::sampler::sample_entries;

/// Errors that stop a simulation before it starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("length mismatch: {prices} prices vs {signals} signals")]
    LengthMismatch { prices: usize, signals: usize },

    #[error("entry index {index} is outside a price series of length {len}")]
    EntryOutOfRange { index: usize, len: usize },
}

/// Where a forward scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    /// True when a threshold closed the trade, false when the series ran out.
    pub triggered: bool,
    pub exit_index: usize,
    pub outcome: TradeOutcome,
}

/// Walk forward from `entry_index` until a threshold is crossed or the series ends.
///
/// Returns `None` only if `entry_index` is outside the series.
pub fn scan_forward(
    prices: &PriceSeries,
    entry_index: usize,
    config: &BacktestConfig,
    observer: &dyn TradeObserver,
) -> Option<ScanResult> {
    (entry_index < prices.len()).then(|| scan_from(prices, entry_index, config, observer))
}

// Caller guarantees `entry_index < prices.len()`.
fn scan_from(
    prices: &PriceSeries,
    entry_index: usize,
    config: &BacktestConfig,
    observer: &dyn TradeObserver,
) -> ScanResult {
    let points = prices.points();
    let entry_price = points[entry_index].close;

    for (offset, point) in points[entry_index + 1..].iter().enumerate() {
        let index = entry_index + 1 + offset;
        let change = (point.close - entry_price) / entry_price;
        observer.on_step(&ScanStep {
            entry_index,
            entry_price,
            index,
            price: point.close,
            change,
        });

        if change >= config.profit_target {
            return ScanResult {
                triggered: true,
                exit_index: index,
                outcome: TradeOutcome::Profit,
            };
        }
        if change <= -config.stop_loss {
            return ScanResult {
                triggered: true,
                exit_index: index,
                outcome: TradeOutcome::StopLoss,
            };
        }
    }

    // Untriggered: close at the last index, which is the entry itself when
    // there was nothing to scan.
    ScanResult {
        triggered: false,
        exit_index: points.len() - 1,
        outcome: TradeOutcome::NoAction,
    }
}

/// Runs simulations for one configuration.
#[derive(Clone)]
pub struct Simulator {
    config: BacktestConfig,
    parallel: bool,
    observer: Arc<dyn TradeObserver>,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("config", &self.config)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            config,
            parallel: false,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Scan entries on the rayon pool instead of the calling thread.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn TradeObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Sample entries from `signals` and simulate one trade per entry.
    ///
    /// An empty price series with an empty signal series gives an empty ledger.
    pub fn run(
        &self,
        prices: &PriceSeries,
        signals: &SignalSeries,
    ) -> Result<Ledger, BacktestError> {
        self.config.validate()?;
        if prices.len() != signals.len() {
            return Err(BacktestError::LengthMismatch {
                prices: prices.len(),
                signals: signals.len(),
            });
        }
        if prices.is_empty() {
            return Ok(Ledger::default());
        }

        let entries: Vec<usize> = sample_entries(signals, self.config.stride)?.collect();
        self.simulate_entries(prices, &entries)
    }

    /// Simulate one trade per index in `entries`, preserving their order.
    pub fn simulate_entries(
        &self,
        prices: &PriceSeries,
        entries: &[usize],
    ) -> Result<Ledger, BacktestError> {
        self.config.validate()?;
        if let Some(&index) = entries.iter().find(|&&i| i >= prices.len()) {
            return Err(BacktestError::EntryOutOfRange {
                index,
                len: prices.len(),
            });
        }

        let trades: Vec<TradeRecord> = if self.parallel {
            entries
                .par_iter()
                .map(|&entry| self.simulate_trade(prices, entry))
                .collect()
        } else {
            entries
                .iter()
                .map(|&entry| self.simulate_trade(prices, entry))
                .collect()
        };

        Ok(Ledger::from_trades(trades))
    }

    fn simulate_trade(&self, prices: &PriceSeries, entry_index: usize) -> TradeRecord {
        let entry = &prices[entry_index];
        let observer = self.observer.as_ref();
        observer.on_open(entry_index, entry);

        let scan = scan_from(prices, entry_index, &self.config, observer);
        let exit = &prices[scan.exit_index];
        let trade = TradeRecord {
            entry_index,
            entry_time: entry.timestamp,
            entry_price: entry.close,
            exit_index: scan.exit_index,
            exit_time: exit.timestamp,
            exit_price: exit.close,
            outcome: scan.outcome,
        };

        observer.on_close(&trade);
        trade
    }
}

/// Simulate `signals` against `prices` with `config`, sequentially and silently.
pub fn simulate(
    prices: &PriceSeries,
    signals: &SignalSeries,
    config: &BacktestConfig,
) -> Result<Ledger, BacktestError> {
    Simulator::new(config.clone()).run(prices, signals)
}
