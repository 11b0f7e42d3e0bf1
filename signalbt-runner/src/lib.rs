//! SignalBT Runner: backtest orchestration, data loading, export.
//!
//! This crate builds on `signalbt-core` to provide:
//! - CSV loading for prices and per-model signal columns
//! - Seeded synthetic data for demo runs
//! - Test-period alignment (signals cover the tail of the price series)
//! - Multi-model runs, sequential or on rayon
//! - Ledger/report export and console summaries

pub mod data_loader;
pub mod export;
pub mod runner;

pub use data_loader::{
    dataset_hash, load_prices, load_signals, read_prices, read_signals, synthetic_prices,
    synthetic_signals, LoadError,
};
pub use export::{
    load_report_json, save_artifacts, summary_line, write_ledger_csv, write_ledger_json,
    write_report_json,
};
pub use runner::{
    align_to_signals, run_model, run_models, ModelReport, NamedSignals, RunError, RunOptions,
    SCHEMA_VERSION,
};
