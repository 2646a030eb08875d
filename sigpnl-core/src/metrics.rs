use crate::ledger::ClosedTrade;

#[derive(Clone, Debug)]
pub struct PnlMetrics {
    pub realized_pnl: f64,
    pub num_trades: usize,
    pub num_wins: usize,
    pub num_losses: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub avg_holding_bars: f64,
    pub num_long: usize,
    pub num_short: usize,
}

/// Summarize a P&L run: per-match statistics from the FIFO trade list,
/// drawdown from the net liquidation curve, Sharpe from bar returns.
pub fn compute_metrics(trades: &[ClosedTrade], net_liq: &[f64], returns: &[f64]) -> PnlMetrics {
    let num_trades = trades.len();

    let mut realized_pnl = 0.0_f64;
    let mut gross_profit = 0.0_f64;
    let mut gross_loss = 0.0_f64;
    let mut num_wins = 0usize;
    let mut num_losses = 0usize;
    let mut largest_win = 0.0_f64;
    let mut largest_loss = 0.0_f64;
    let mut total_holding_bars = 0usize;
    let mut num_long = 0usize;
    let mut num_short = 0usize;

    for t in trades {
        realized_pnl += t.pnl;
        if t.pnl > 0.0 {
            num_wins += 1;
            gross_profit += t.pnl;
            if t.pnl > largest_win {
                largest_win = t.pnl;
            }
        } else if t.pnl < 0.0 {
            num_losses += 1;
            gross_loss += t.pnl.abs();
            if t.pnl < largest_loss {
                largest_loss = t.pnl;
            }
        }
        total_holding_bars += t.exit_bar - t.entry_bar;
        if t.is_long() {
            num_long += 1;
        } else {
            num_short += 1;
        }
    }

    let win_rate = if num_trades > 0 {
        num_wins as f64 / num_trades as f64
    } else {
        0.0
    };
    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };
    let avg_win = if num_wins > 0 { gross_profit / num_wins as f64 } else { 0.0 };
    let avg_loss = if num_losses > 0 { -(gross_loss / num_losses as f64) } else { 0.0 };
    let avg_holding_bars = if num_trades > 0 {
        total_holding_bars as f64 / num_trades as f64
    } else {
        0.0
    };

    let (max_drawdown, max_drawdown_pct) = calc_max_drawdown(net_liq);

    // Skip returns[0]; it is zero by definition.
    let sharpe_ratio = if returns.len() > 1 {
        calc_sharpe(&returns[1..])
    } else {
        0.0
    };

    PnlMetrics {
        realized_pnl,
        num_trades,
        num_wins,
        num_losses,
        win_rate,
        profit_factor,
        avg_win,
        avg_loss,
        largest_win,
        largest_loss,
        max_drawdown,
        max_drawdown_pct,
        sharpe_ratio,
        avg_holding_bars,
        num_long,
        num_short,
    }
}

fn calc_max_drawdown(curve: &[f64]) -> (f64, f64) {
    if curve.is_empty() {
        return (0.0, 0.0);
    }
    let mut peak = curve[0];
    let mut max_dd = 0.0_f64;
    let mut max_dd_pct = 0.0_f64;

    for &v in curve {
        if v > peak {
            peak = v;
        }
        let dd = peak - v;
        if dd > max_dd {
            max_dd = dd;
        }
        if peak > 0.0 {
            let dd_pct = dd / peak;
            if dd_pct > max_dd_pct {
                max_dd_pct = dd_pct;
            }
        }
    }
    (max_dd, max_dd_pct * 100.0)
}

fn calc_sharpe(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let var = returns.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = var.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    // Annualize assuming daily bars.
    (mean / std) * (252.0_f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(entry_bar: usize, exit_bar: usize, qty: i64, pnl: f64) -> ClosedTrade {
        ClosedTrade {
            entry_bar,
            exit_bar,
            qty,
            entry_price: 0.0,
            exit_price: 0.0,
            pnl,
        }
    }

    #[test]
    fn empty_run_summarizes_to_zeros() {
        let m = compute_metrics(&[], &[], &[]);
        assert_eq!(m.num_trades, 0);
        assert_eq!(m.realized_pnl, 0.0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.profit_factor, 0.0);
        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
    }

    #[test]
    fn tallies_wins_losses_and_sides() {
        let trades = vec![
            trade(0, 2, 1, 100.0),
            trade(1, 3, -2, -40.0),
            trade(3, 5, 1, 60.0),
        ];
        let m = compute_metrics(&trades, &[], &[]);
        assert_eq!(m.realized_pnl, 120.0);
        assert_eq!((m.num_wins, m.num_losses), (2, 1));
        assert_eq!((m.num_long, m.num_short), (2, 1));
        assert_eq!(m.win_rate, 2.0 / 3.0);
        assert_eq!(m.profit_factor, 4.0);
        assert_eq!(m.avg_win, 80.0);
        assert_eq!(m.avg_loss, -40.0);
        assert_eq!(m.largest_win, 100.0);
        assert_eq!(m.largest_loss, -40.0);
        assert_eq!(m.avg_holding_bars, 2.0);
    }

    #[test]
    fn profit_factor_is_infinite_without_losses() {
        let m = compute_metrics(&[trade(0, 1, 1, 10.0)], &[], &[]);
        assert!(m.profit_factor.is_infinite());
    }

    #[test]
    fn drawdown_measures_the_deepest_peak_to_trough() {
        // Peak 100, trough 40, later peak 120 then 90.
        let curve = [0.0, 100.0, 40.0, 120.0, 90.0];
        let (dd, dd_pct) = calc_max_drawdown(&curve);
        assert_eq!(dd, 60.0);
        assert_eq!(dd_pct, 60.0);
    }

    #[test]
    fn drawdown_on_a_losing_open_position_needs_no_trades() {
        let m = compute_metrics(&[], &[0.0, -30.0, -50.0], &[0.0, -30.0, -20.0]);
        assert_eq!(m.max_drawdown, 50.0);
        assert_eq!(m.num_trades, 0);
    }

    #[test]
    fn flat_returns_have_zero_sharpe() {
        let m = compute_metrics(&[], &[0.0; 4], &[0.0; 4]);
        assert_eq!(m.sharpe_ratio, 0.0);
    }
}
