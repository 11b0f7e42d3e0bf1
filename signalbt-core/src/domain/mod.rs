//! Domain types: price and signal series, trade records.

pub mod price;
pub mod signal;
pub mod trade;

pub use price::{PricePoint, PriceSeries, SeriesError};
pub use signal::SignalSeries;
pub use trade::{TradeOutcome, TradeRecord};
