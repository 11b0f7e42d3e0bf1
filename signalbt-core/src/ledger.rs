//! Ledger: the ordered trades of one run, and outcome counts over them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{TradeOutcome, TradeRecord};

/// Trades in the order their entry indices were processed.
///
/// Only the simulator appends; callers get read access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    trades: Vec<TradeRecord>,
}

impl Ledger {
    pub(crate) fn from_trades(trades: Vec<TradeRecord>) -> Self {
        Self { trades }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.trades.iter()
    }

    pub fn as_slice(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_vec(self) -> Vec<TradeRecord> {
        self.trades
    }

    pub fn outcome_counts(&self) -> OutcomeCounts {
        count_outcomes(&self.trades)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

/// Number of trades per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub profit: usize,
    pub stop_loss: usize,
    pub no_action: usize,
}

impl OutcomeCounts {
    pub fn get(&self, outcome: TradeOutcome) -> usize {
        match outcome {
            TradeOutcome::Profit => self.profit,
            TradeOutcome::StopLoss => self.stop_loss,
            TradeOutcome::NoAction => self.no_action,
        }
    }

    pub fn total(&self) -> usize {
        self.profit + self.stop_loss + self.no_action
    }

    /// Every outcome with its count, zeros included.
    pub fn as_map(&self) -> BTreeMap<TradeOutcome, usize> {
        TradeOutcome::ALL
            .iter()
            .map(|&outcome| (outcome, self.get(outcome)))
            .collect()
    }

    /// Share of threshold exits that hit the profit target.
    ///
    /// `None` when no trade closed on a threshold.
    pub fn hit_rate(&self) -> Option<f64> {
        let decided = self.profit + self.stop_loss;
        if decided == 0 {
            return None;
        }
        Some(self.profit as f64 / decided as f64)
    }
}

/// Count trades by outcome.
pub fn count_outcomes(trades: &[TradeRecord]) -> OutcomeCounts {
    trades
        .iter()
        .fold(OutcomeCounts::default(), |mut counts, trade| {
            match trade.outcome {
                TradeOutcome::Profit => counts.profit += 1,
                TradeOutcome::StopLoss => counts.stop_loss += 1,
                TradeOutcome::NoAction => counts.no_action += 1,
            }
            counts
        })
}
