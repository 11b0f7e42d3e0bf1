//! Trade narration hooks.
//!
//! Observers see every scan step but only through shared references, so they
//! cannot influence the ledger. They must be `Send + Sync` because parallel
//! simulation calls them from worker threads.

use crate::domain::{PricePoint, TradeRecord};

/// One forward step of a trade's scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanStep {
    pub entry_index: usize,
    pub entry_price: f64,
    pub index: usize,
    pub price: f64,
    /// `(price - entry_price) / entry_price`
    pub change: f64,
}

/// Callbacks invoked by the simulator while it walks each trade.
pub trait TradeObserver: Send + Sync {
    fn on_open(&self, _entry_index: usize, _entry: &PricePoint) {}

    fn on_step(&self, _step: &ScanStep) {}

    fn on_close(&self, _trade: &TradeRecord) {}
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TradeObserver for NoopObserver {}

/// Narrates trades through `tracing`: opens and closes at `debug`, every
/// scan step at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TradeObserver for TracingObserver {
    fn on_open(&self, entry_index: usize, entry: &PricePoint) {
        tracing::debug!(
            entry_index,
            time = %entry.timestamp,
            "trade opened: buy at {:.2}",
            entry.close
        );
    }

    fn on_step(&self, step: &ScanStep) {
        tracing::trace!(
            entry_index = step.entry_index,
            index = step.index,
            "buy at {:.2}, current price {:.2}, change {:.2}%",
            step.entry_price,
            step.price,
            step.change * 100.0
        );
    }

    fn on_close(&self, trade: &TradeRecord) {
        tracing::debug!(
            entry_index = trade.entry_index,
            exit_index = trade.exit_index,
            outcome = %trade.outcome,
            "trade closed: {:.2} -> {:.2} ({:+.2}%)",
            trade.entry_price,
            trade.exit_price,
            trade.return_pct() * 100.0
        );
    }
}
