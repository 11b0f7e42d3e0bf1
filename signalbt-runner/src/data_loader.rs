//! Price and signal loading for the runner.
//!
//! Two CSV inputs:
//! - prices: a header row with a timestamp column (`timestamp`, `date`,
//!   `datetime` or `time`) and a `close` column; other columns are ignored.
//! - signals: one column per model, header = model names, one row per
//!   test-period point.
//!
//! Synthetic data is a developer-only demo mode: a seeded random walk and
//! coin-flip signals, reproducible from the seed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use signalbt_core::{PricePoint, PriceSeries, SeriesError, SignalSeries};

use crate::runner::NamedSignals;

const TIMESTAMP_COLUMNS: [&str; 4] = ["timestamp", "date", "datetime", "time"];
const CLOSE_COLUMNS: [&str; 2] = ["close", "price"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in '{source_name}': {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    #[error("'{source_name}' has no {column} column")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("'{source_name}' line {line}: cannot parse {what} from '{value}'")]
    BadValue {
        source_name: String,
        line: u64,
        what: &'static str,
        value: String,
    },

    #[error("'{source_name}' has no model columns")]
    NoModels { source_name: String },

    #[error("invalid price series in '{source_name}': {error}")]
    Series {
        source_name: String,
        #[source]
        error: SeriesError,
    },
}

/// Load a price series from a CSV file.
pub fn load_prices(path: &Path) -> Result<PriceSeries, LoadError> {
    let file = open(path)?;
    read_prices(file, &path.display().to_string())
}

/// Load one signal series per model column from a CSV file.
pub fn load_signals(path: &Path) -> Result<Vec<NamedSignals>, LoadError> {
    let file = open(path)?;
    read_signals(file, &path.display().to_string())
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parse prices from any CSV reader. `source_name` only labels errors.
pub fn read_prices<R: Read>(reader: R, source_name: &str) -> Result<PriceSeries, LoadError> {
    let csv_err = |error: csv::Error| LoadError::Csv {
        source_name: source_name.to_string(),
        error,
    };
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let ts_col = find_column(&headers, &TIMESTAMP_COLUMNS).ok_or_else(|| {
        LoadError::MissingColumn {
            source_name: source_name.to_string(),
            column: "timestamp",
        }
    })?;
    let close_col =
        find_column(&headers, &CLOSE_COLUMNS).ok_or_else(|| LoadError::MissingColumn {
            source_name: source_name.to_string(),
            column: "close",
        })?;

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());
        let bad = |what: &'static str, value: &str| LoadError::BadValue {
            source_name: source_name.to_string(),
            line,
            what,
            value: value.to_string(),
        };

        let raw_ts = record.get(ts_col).unwrap_or_default();
        let raw_close = record.get(close_col).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| bad("timestamp", raw_ts))?;
        let close: f64 = raw_close.parse().map_err(|_| bad("close", raw_close))?;
        points.push(PricePoint::new(timestamp, close));
    }

    PriceSeries::new(points).map_err(|error| LoadError::Series {
        source_name: source_name.to_string(),
        error,
    })
}

/// Parse signals from any CSV reader. `source_name` only labels errors.
pub fn read_signals<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<NamedSignals>, LoadError> {
    let csv_err = |error: csv::Error| LoadError::Csv {
        source_name: source_name.to_string(),
        error,
    };
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(LoadError::NoModels {
            source_name: source_name.to_string(),
        });
    }

    let mut columns: Vec<Vec<i64>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());
        for (column, raw) in columns.iter_mut().zip(record.iter()) {
            let value = parse_signal(raw).ok_or_else(|| LoadError::BadValue {
                source_name: source_name.to_string(),
                line,
                what: "signal",
                value: raw.to_string(),
            })?;
            column.push(value);
        }
    }

    Ok(headers
        .iter()
        .zip(columns)
        .map(|(model, values)| NamedSignals::new(model, SignalSeries::new(values)))
        .collect())
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// Model exports often write predictions as floats ("1.0"). Only integral
// values inside the i64 range are accepted; "0.7" is an error, not a zero.
fn parse_signal(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Deterministic BLAKE3 hash over aligned prices and one signal series.
pub fn dataset_hash(prices: &PriceSeries, signals: &SignalSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for point in prices.points() {
        hasher.update(point.timestamp.to_string().as_bytes());
        hasher.update(&point.close.to_le_bytes());
    }
    hasher.update(b"|signals|");
    for value in signals.values() {
        hasher.update(&value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Seeded random walk from 100.0 with daily moves in ±2%.
pub fn synthetic_prices(n: usize, seed: u64) -> Result<PriceSeries, LoadError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 100.0_f64;
    let closes: Vec<f64> = (0..n)
        .map(|_| {
            let close = price;
            price *= 1.0 + rng.gen_range(-0.02..0.02);
            close
        })
        .collect();

    PriceSeries::from_closes(&closes).map_err(|error| LoadError::Series {
        source_name: "synthetic".into(),
        error,
    })
}

/// Coin-flip signals per model, seeded from the model name and `seed`.
pub fn synthetic_signals(models: &[&str], n: usize, seed: u64) -> Vec<NamedSignals> {
    models
        .iter()
        .map(|model| {
            let mut key = blake3::Hasher::new();
            key.update(model.as_bytes());
            key.update(&seed.to_le_bytes());
            let mut rng = StdRng::from_seed(*key.finalize().as_bytes());
            let flags: Vec<bool> = (0..n).map(|_| rng.gen_bool(0.5)).collect();
            NamedSignals::new(*model, SignalSeries::from_bools(&flags))
        })
        .collect()
}
