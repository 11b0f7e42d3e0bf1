//! TradeRecord: one simulated long trade, entry to exit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a trade was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeOutcome {
    /// Price rose by at least the profit target.
    Profit,
    /// Price fell by at least the stop loss.
    StopLoss,
    /// Neither threshold was crossed before the series ended.
    NoAction,
}

impl TradeOutcome {
    pub const ALL: [TradeOutcome; 3] = [Self::Profit, Self::StopLoss, Self::NoAction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profit => "profit",
            Self::StopLoss => "stop_loss",
            Self::NoAction => "no_action",
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed trade. Created once by the simulator and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Entry ──
    pub entry_index: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_index: usize,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,

    pub outcome: TradeOutcome,
}

impl TradeRecord {
    /// Price change from entry to exit as a fraction of the entry price.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (self.exit_price - self.entry_price) / self.entry_price
    }

    pub fn bars_held(&self) -> usize {
        self.exit_index.saturating_sub(self.entry_index)
    }
}
