//! SignalBT Core: signal-driven trade simulation with profit-target / stop-loss exits.
//!
//! This crate contains the backtesting engine:
//! - Domain types (price series, signal series, trade records)
//! - Entry sampler (every `stride`-th index with a positive signal)
//! - Trade simulator (forward scan per entry until an exit threshold or series end)
//! - Ledger and outcome aggregation
//! - Observer hooks for trade narration
//!
//! ```
//! use signalbt_core::{simulate, BacktestConfig, PriceSeries, SignalSeries, TradeOutcome};
//!
//! let prices = PriceSeries::from_closes(&[100.0, 101.0, 102.0, 103.0]).unwrap();
//! let signals = SignalSeries::new(vec![1, 0, 0, 0]);
//! let config = BacktestConfig::new(1, 0.02, 0.01);
//!
//! let ledger = simulate(&prices, &signals, &config).unwrap();
//! assert_eq!(ledger.as_slice()[0].outcome, TradeOutcome::Profit);
//! assert_eq!(ledger.as_slice()[0].exit_price, 102.0);
//! ```

pub mod config;
pub mod domain;
pub mod ledger;
pub mod observer;
pub mod sampler;
pub mod simulator;

pub use config::{BacktestConfig, ConfigError};
pub use domain::{PricePoint, PriceSeries, SeriesError, SignalSeries, TradeOutcome, TradeRecord};
pub use ledger::{count_outcomes, Ledger, OutcomeCounts};
pub use observer::{NoopObserver, ScanStep, TracingObserver, TradeObserver};
pub use sampler::{sample_entries, EntrySampler};
pub use simulator::{scan_forward, simulate, BacktestError, ScanResult, Simulator};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the runner moves across rayon workers is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<SignalSeries>();
        require_sync::<SignalSeries>();
        require_send::<TradeRecord>();
        require_sync::<TradeRecord>();
        require_send::<Ledger>();
        require_sync::<Ledger>();
        require_send::<OutcomeCounts>();
        require_sync::<OutcomeCounts>();
        require_send::<BacktestConfig>();
        require_sync::<BacktestConfig>();
        require_send::<Simulator>();
        require_sync::<Simulator>();
        require_send::<BacktestError>();
        require_sync::<BacktestError>();
    }

    /// Architecture contract: observers only get shared references.
    ///
    /// `TradeObserver` methods take `&self` plus borrowed trade data, so an
    /// observer has no path to mutate the ledger being built.
    #[test]
    fn observer_trait_is_object_safe_and_read_only() {
        fn _check(observer: &dyn TradeObserver, trade: &TradeRecord) {
            observer.on_close(trade);
        }
        _check(&NoopObserver, &TradeRecord {
            entry_index: 0,
            entry_time: chrono::NaiveDateTime::default(),
            entry_price: 1.0,
            exit_index: 0,
            exit_time: chrono::NaiveDateTime::default(),
            exit_price: 1.0,
            outcome: TradeOutcome::NoAction,
        });
    }
}
