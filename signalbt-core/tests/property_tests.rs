//! Property tests for simulator invariants.
//!
//! Uses proptest to verify:
//! 1. Ledger size: one trade per positive signal on the stride grid
//! 2. Profit exits: return >= target, nothing triggered earlier
//! 3. Stop exits: return <= -stop, no profit crossing earlier
//! 4. No-action exits: nothing triggered between entry and series end
//! 5. Determinism: same inputs, same ledger (sequential and parallel)

use proptest::prelude::*;
use signalbt_core::{
    simulate, BacktestConfig, Ledger, PriceSeries, SignalSeries, Simulator, TradeOutcome,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.03..0.03_f64, 0..120).prop_map(|returns| {
        let mut price = 100.0_f64;
        returns
            .into_iter()
            .map(|r| {
                price = (price * (1.0 + r) * 100.0).round() / 100.0;
                price.max(0.01)
            })
            .collect()
    })
}

fn arb_threshold() -> impl Strategy<Value = f64> {
    (1..=50u32).prop_map(|bp| f64::from(bp) / 1000.0)
}

fn arb_inputs() -> impl Strategy<Value = (Vec<f64>, Vec<i64>, BacktestConfig)> {
    arb_closes().prop_flat_map(|closes| {
        let n = closes.len();
        (
            Just(closes),
            prop::collection::vec(0..=1i64, n),
            (1..=35usize, arb_threshold(), arb_threshold())
                .prop_map(|(stride, pt, sl)| BacktestConfig::new(stride, pt, sl)),
        )
    })
}

fn change(closes: &[f64], entry: usize, j: usize) -> f64 {
    (closes[j] - closes[entry]) / closes[entry]
}

fn run(closes: &[f64], signals: &[i64], config: &BacktestConfig) -> Ledger {
    let prices = PriceSeries::from_closes(closes).unwrap();
    let signals = SignalSeries::new(signals.to_vec());
    simulate(&prices, &signals, config).unwrap()
}

// ── 1. Ledger size ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn one_trade_per_eligible_entry((closes, signals, config) in arb_inputs()) {
        let ledger = run(&closes, &signals, &config);
        let expected: Vec<usize> = (0..signals.len())
            .filter(|i| i % config.stride == 0 && signals[*i] == 1)
            .collect();
        let actual: Vec<usize> = ledger.iter().map(|t| t.entry_index).collect();
        prop_assert_eq!(actual, expected);
    }
}

// ── 2–4. Exit conditions ─────────────────────────────────────────────

proptest! {
    #[test]
    fn exits_respect_first_crossing((closes, signals, config) in arb_inputs()) {
        let ledger = run(&closes, &signals, &config);
        let pt = config.profit_target;
        let sl = config.stop_loss;

        for trade in &ledger {
            let entry = trade.entry_index;
            prop_assert_eq!(trade.entry_price, closes[entry]);
            prop_assert_eq!(trade.exit_price, closes[trade.exit_index]);
            prop_assert!(trade.exit_index >= entry);

            // No index strictly between entry and exit may trigger anything.
            for j in entry + 1..trade.exit_index {
                let c = change(&closes, entry, j);
                prop_assert!(c < pt && c > -sl, "earlier trigger at {}", j);
            }

            match trade.outcome {
                TradeOutcome::Profit => {
                    prop_assert!(trade.return_pct() >= pt);
                }
                TradeOutcome::StopLoss => {
                    prop_assert!(trade.return_pct() <= -sl);
                    prop_assert!(trade.return_pct() < pt);
                }
                TradeOutcome::NoAction => {
                    prop_assert_eq!(trade.exit_index, closes.len() - 1);
                    let c = change(&closes, entry, trade.exit_index);
                    if trade.exit_index > entry {
                        prop_assert!(c < pt && c > -sl);
                    } else {
                        prop_assert_eq!(trade.exit_price, trade.entry_price);
                    }
                }
            }
        }
    }
}

// ── 5. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn simulation_is_deterministic((closes, signals, config) in arb_inputs()) {
        let first = run(&closes, &signals, &config);
        let second = run(&closes, &signals, &config);
        prop_assert_eq!(&first, &second);

        let prices = PriceSeries::from_closes(&closes).unwrap();
        let parallel = Simulator::new(config)
            .with_parallelism(true)
            .run(&prices, &SignalSeries::new(signals))
            .unwrap();
        prop_assert_eq!(first, parallel);
    }

    #[test]
    fn outcome_counts_sum_to_ledger_len((closes, signals, config) in arb_inputs()) {
        let ledger = run(&closes, &signals, &config);
        prop_assert_eq!(ledger.outcome_counts().total(), ledger.len());
    }
}
