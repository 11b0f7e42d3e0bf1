//! Backtest runner: aligns model signals with prices and runs the simulator.
//!
//! Each model's predictions cover the test period only, i.e. the LAST
//! `signals.len()` points of the price series. The runner slices that tail
//! off, simulates, and packages the ledger with its counts and provenance.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use signalbt_core::{
    BacktestConfig, BacktestError, ConfigError, Ledger, OutcomeCounts, PriceSeries, SignalSeries,
    Simulator, TracingObserver,
};

use crate::data_loader::dataset_hash;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("model '{model}' has {signals} signals but only {prices} prices are available")]
    SignalsExceedPrices {
        model: String,
        signals: usize,
        prices: usize,
    },

    #[error("backtest failed for model '{model}': {source}")]
    Backtest {
        model: String,
        #[source]
        source: BacktestError,
    },
}

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Predictions of one model over the test period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSignals {
    pub model: String,
    pub signals: SignalSeries,
}

impl NamedSignals {
    pub fn new(model: impl Into<String>, signals: SignalSeries) -> Self {
        Self {
            model: model.into(),
            signals,
        }
    }
}

/// Execution knobs that do not change results.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Run models on the rayon pool.
    pub parallel_models: bool,
    /// Run each model's entry scans on the rayon pool.
    pub parallel_scans: bool,
    /// Narrate trades through `tracing` (debug/trace level).
    pub narrate: bool,
}

/// Complete result of backtesting one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub model: String,
    pub config: BacktestConfig,
    pub config_hash: String,
    pub dataset_hash: String,
    /// Points in the aligned (test-period) price slice.
    pub bar_count: usize,
    pub signal_count: usize,
    pub counts: OutcomeCounts,
    pub ledger: Ledger,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// The tail of `prices` that lines up with `signals`.
pub fn align_to_signals(
    prices: &PriceSeries,
    model: &NamedSignals,
) -> Result<PriceSeries, RunError> {
    if model.signals.len() > prices.len() {
        return Err(RunError::SignalsExceedPrices {
            model: model.model.clone(),
            signals: model.signals.len(),
            prices: prices.len(),
        });
    }
    Ok(prices.tail(model.signals.len()))
}

/// Backtest a single model against the tail of `prices`.
pub fn run_model(
    prices: &PriceSeries,
    model: &NamedSignals,
    config: &BacktestConfig,
    opts: RunOptions,
) -> Result<ModelReport, RunError> {
    let aligned = align_to_signals(prices, model)?;

    let mut simulator = Simulator::new(config.clone()).with_parallelism(opts.parallel_scans);
    if opts.narrate {
        simulator = simulator.with_observer(Arc::new(TracingObserver));
    }

    let ledger = simulator
        .run(&aligned, &model.signals)
        .map_err(|source| RunError::Backtest {
            model: model.model.clone(),
            source,
        })?;
    let counts = ledger.outcome_counts();

    tracing::info!(
        model = %model.model,
        trades = ledger.len(),
        profit = counts.profit,
        stop_loss = counts.stop_loss,
        no_action = counts.no_action,
        "backtest complete"
    );

    Ok(ModelReport {
        schema_version: SCHEMA_VERSION,
        model: model.model.clone(),
        config: config.clone(),
        config_hash: config.config_hash(),
        dataset_hash: dataset_hash(&aligned, &model.signals),
        bar_count: aligned.len(),
        signal_count: model.signals.positive_count(),
        counts,
        ledger,
    })
}

/// Backtest every model against the same prices, reports in input order.
pub fn run_models(
    prices: &PriceSeries,
    models: &[NamedSignals],
    config: &BacktestConfig,
    opts: RunOptions,
) -> Result<Vec<ModelReport>, RunError> {
    config.validate()?;

    if opts.parallel_models {
        models
            .par_iter()
            .map(|model| run_model(prices, model, config, opts))
            .collect()
    } else {
        models
            .iter()
            .map(|model| run_model(prices, model, config, opts))
            .collect()
    }
}
