use thiserror::Error;

use crate::ledger::{ClosedTrade, Lot, LotBook};

/// Input contract violations, caught before any computation runs.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("series length mismatch: open={open}, close={close}, sig={sig}")]
    LengthMismatch {
        open: usize,
        close: usize,
        sig: usize,
    },
    #[error("big_point must be a positive finite number, got {0}")]
    InvalidBigPoint(f64),
    #[error("cost must be a non-negative finite number, got {0}")]
    InvalidCost(f64),
}

/// Per-bar output series plus the trade ledger that produced them.
/// All four series have the input length.
#[derive(Clone, Debug)]
pub struct PnlResults {
    /// Realized cash flow attributed to each bar.
    pub cash: Vec<f64>,
    /// Mark-to-market of open lots at each bar's close.
    pub open_eq: Vec<f64>,
    /// Running cash sum plus current open equity.
    pub net_liq: Vec<f64>,
    /// Bar-over-bar change in net liquidation; zero on the first bar.
    pub returns: Vec<f64>,
    /// FIFO matches, in close order.
    pub trades: Vec<ClosedTrade>,
    /// Lots still open after the last bar. Never force-liquidated; they are
    /// reflected in the final open equity only.
    pub open_lots: Vec<Lot>,
}

/// Compute per-bar P&L for a signed signal series against open/close prices.
///
/// `sig[i]` is the quantity in force during bar i but executed at the open
/// of bar i+1: the trade on bar i uses `sig[i-1]`, and a signal on the last
/// bar has nothing to execute against. Signal values are truncated toward
/// zero to whole contracts. `big_point` is the dollar value of a one-point
/// move per contract; `cost` is the per-contract commission, charged when a
/// contract closes.
pub fn compute_pnl(
    open: &[f64],
    close: &[f64],
    sig: &[f64],
    big_point: f64,
    cost: f64,
) -> Result<PnlResults, InputError> {
    validate(open, close, sig, big_point, cost)?;
    let n = open.len();

    let mut cash = vec![0.0; n];
    let mut open_eq = vec![0.0; n];

    let mut book = LotBook::new(big_point, cost);
    let mut prev_sig = 0.0;
    for i in 0..n {
        // Signals execute on the next bar's open.
        let qty = prev_sig as i64;
        prev_sig = sig[i];

        if qty != 0 {
            cash[i] = book.apply_trade(i, qty, open[i]);
        }
        open_eq[i] = book.mark(close[i]);
    }

    // Cumulative net liquidation, then bar-over-bar change.
    let mut net_liq = vec![0.0; n];
    let mut returns = vec![0.0; n];
    let mut run_sum = 0.0;
    for i in 0..n {
        run_sum += cash[i];
        net_liq[i] = run_sum + open_eq[i];
        if i > 0 {
            returns[i] = net_liq[i] - net_liq[i - 1];
        }
    }

    let (trades, open_lots) = book.into_parts();
    Ok(PnlResults {
        cash,
        open_eq,
        net_liq,
        returns,
        trades,
        open_lots,
    })
}

fn validate(
    open: &[f64],
    close: &[f64],
    sig: &[f64],
    big_point: f64,
    cost: f64,
) -> Result<(), InputError> {
    if open.len() != close.len() || open.len() != sig.len() {
        return Err(InputError::LengthMismatch {
            open: open.len(),
            close: close.len(),
            sig: sig.len(),
        });
    }
    if !(big_point.is_finite() && big_point > 0.0) {
        return Err(InputError::InvalidBigPoint(big_point));
    }
    if !(cost.is_finite() && cost >= 0.0) {
        return Err(InputError::InvalidCost(cost));
    }
    Ok(())
}
