//! Ledger and report export (CSV/JSON) plus console summaries.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use signalbt_core::{TradeOutcome, TradeRecord};

use crate::runner::ModelReport;

#[derive(Serialize)]
struct TradeRow<'a> {
    entry_index: usize,
    entry_time: String,
    entry_price: f64,
    exit_index: usize,
    exit_time: String,
    exit_price: f64,
    outcome: &'a str,
    return_pct: f64,
}

impl<'a> From<&'a TradeRecord> for TradeRow<'a> {
    fn from(trade: &'a TradeRecord) -> Self {
        Self {
            entry_index: trade.entry_index,
            entry_time: trade.entry_time.to_string(),
            entry_price: trade.entry_price,
            exit_index: trade.exit_index,
            exit_time: trade.exit_time.to_string(),
            exit_price: trade.exit_price,
            outcome: trade.outcome.as_str(),
            return_pct: trade.return_pct(),
        }
    }
}

pub fn write_ledger_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create ledger CSV {}", path.display()))?;
    for trade in trades {
        writer
            .serialize(TradeRow::from(trade))
            .with_context(|| format!("Failed to write ledger CSV {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_ledger_json(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(trades).context("Failed to serialize ledger")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write ledger JSON {}", path.display()))?;
    Ok(())
}

pub fn write_report_json(path: &Path, reports: &[ModelReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(reports).context("Failed to serialize reports")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report JSON {}", path.display()))?;
    Ok(())
}

pub fn load_report_json(path: &Path) -> Result<Vec<ModelReport>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report JSON {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse report JSON {}", path.display()))
}

/// Write `<model>.trades.csv` per model and a combined `report.json` into `dir`.
///
/// Returns the paths written.
pub fn save_artifacts(dir: &Path, reports: &[ModelReport]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output dir {}", dir.display()))?;

    let mut written = Vec::with_capacity(reports.len() + 1);
    for report in reports {
        let path = dir.join(format!("{}.trades.csv", file_stem(&report.model)));
        write_ledger_csv(&path, report.ledger.as_slice())?;
        written.push(path);
    }

    let report_path = dir.join("report.json");
    write_report_json(&report_path, reports)?;
    written.push(report_path);
    Ok(written)
}

/// One console line per model, in the form the research scripts print.
pub fn summary_line(report: &ModelReport) -> String {
    let counts = &report.counts;
    let hit_rate = counts
        .hit_rate()
        .map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0));
    format!(
        "{} - Successful Trades: {}, Loss Trades: {}, No Action: {} (hit rate {hit_rate})",
        report.model,
        counts.get(TradeOutcome::Profit),
        counts.get(TradeOutcome::StopLoss),
        counts.get(TradeOutcome::NoAction),
    )
}

fn file_stem(model: &str) -> String {
    let stem: String = model
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "model".to_string()
    } else {
        stem
    }
}
