use numpy::{PyArray1, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use sigpnl_core::{compute_metrics, compute_pnl, PnlResults};

type SeriesTuple = (
    Py<PyArray1<f64>>,
    Py<PyArray1<f64>>,
    Py<PyArray1<f64>>,
    Py<PyArray1<f64>>,
);

/// Compute per-bar P&L for a signal series against open/close prices.
/// Returns (cash, open_eq, net_liq, returns) as numpy arrays.
/// big_point: dollar value per 1.0 point move (ES=50, NQ=20)
#[pyfunction]
#[pyo3(signature = (open, close, sig, big_point, cost=0.0))]
fn calc_profit_loss(
    py: Python<'_>,
    open: PyReadonlyArray1<'_, f64>,
    close: PyReadonlyArray1<'_, f64>,
    sig: PyReadonlyArray1<'_, f64>,
    big_point: f64,
    cost: f64,
) -> PyResult<SeriesTuple> {
    let results = run_engine(
        open.as_slice()?,
        close.as_slice()?,
        sig.as_slice()?,
        big_point,
        cost,
    )?;
    Ok(series_tuple(py, results))
}

/// Same as calc_profit_loss, but takes prices as a single two-column
/// array in the form of Open | Close.
#[pyfunction]
#[pyo3(signature = (data, sig, big_point, cost=0.0))]
fn calc_profit_loss_data(
    py: Python<'_>,
    data: PyReadonlyArray2<'_, f64>,
    sig: PyReadonlyArray1<'_, f64>,
    big_point: f64,
    cost: f64,
) -> PyResult<SeriesTuple> {
    let view = data.as_array();
    if view.ncols() != 2 {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "Price data must have exactly two columns (open | close), got {}",
            view.ncols()
        )));
    }
    let open: Vec<f64> = view.column(0).iter().copied().collect();
    let close: Vec<f64> = view.column(1).iter().copied().collect();

    let results = run_engine(&open, &close, sig.as_slice()?, big_point, cost)?;
    Ok(series_tuple(py, results))
}

/// Full P&L report: the four output series plus summary metrics, the FIFO
/// trade list, and any positions still open on the last bar.
#[pyfunction]
#[pyo3(signature = (open, close, sig, big_point, cost=0.0))]
fn profit_loss_report(
    py: Python<'_>,
    open: PyReadonlyArray1<'_, f64>,
    close: PyReadonlyArray1<'_, f64>,
    sig: PyReadonlyArray1<'_, f64>,
    big_point: f64,
    cost: f64,
) -> PyResult<Py<PyDict>> {
    let results = run_engine(
        open.as_slice()?,
        close.as_slice()?,
        sig.as_slice()?,
        big_point,
        cost,
    )?;
    report_to_dict(py, results)
}

fn run_engine(
    open: &[f64],
    close: &[f64],
    sig: &[f64],
    big_point: f64,
    cost: f64,
) -> PyResult<PnlResults> {
    compute_pnl(open, close, sig, big_point, cost)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

fn series_tuple(py: Python<'_>, results: PnlResults) -> SeriesTuple {
    (
        PyArray1::from_vec(py, results.cash).into(),
        PyArray1::from_vec(py, results.open_eq).into(),
        PyArray1::from_vec(py, results.net_liq).into(),
        PyArray1::from_vec(py, results.returns).into(),
    )
}

fn report_to_dict(py: Python<'_>, results: PnlResults) -> PyResult<Py<PyDict>> {
    let m = compute_metrics(&results.trades, &results.net_liq, &results.returns);

    let d = PyDict::new(py);
    d.set_item("cash", PyArray1::from_vec(py, results.cash))?;
    d.set_item("open_eq", PyArray1::from_vec(py, results.open_eq))?;
    d.set_item("net_liq", PyArray1::from_vec(py, results.net_liq))?;
    d.set_item("returns", PyArray1::from_vec(py, results.returns))?;

    d.set_item("realized_pnl", m.realized_pnl)?;
    d.set_item("num_trades", m.num_trades)?;
    d.set_item("num_wins", m.num_wins)?;
    d.set_item("num_losses", m.num_losses)?;
    d.set_item("win_rate", m.win_rate)?;
    d.set_item("profit_factor", m.profit_factor)?;
    d.set_item("avg_win", m.avg_win)?;
    d.set_item("avg_loss", m.avg_loss)?;
    d.set_item("largest_win", m.largest_win)?;
    d.set_item("largest_loss", m.largest_loss)?;
    d.set_item("max_drawdown", m.max_drawdown)?;
    d.set_item("max_drawdown_pct", m.max_drawdown_pct)?;
    d.set_item("sharpe_ratio", m.sharpe_ratio)?;
    d.set_item("avg_holding_bars", m.avg_holding_bars)?;
    d.set_item("num_long", m.num_long)?;
    d.set_item("num_short", m.num_short)?;

    // Trade list
    let trades: Vec<Py<PyDict>> = results
        .trades
        .iter()
        .map(|t| {
            let td = PyDict::new(py);
            td.set_item("entry_bar", t.entry_bar).unwrap();
            td.set_item("exit_bar", t.exit_bar).unwrap();
            td.set_item("side", if t.is_long() { "long" } else { "short" })
                .unwrap();
            td.set_item("qty", t.qty).unwrap();
            td.set_item("entry_price", t.entry_price).unwrap();
            td.set_item("exit_price", t.exit_price).unwrap();
            td.set_item("pnl", t.pnl).unwrap();
            td.into()
        })
        .collect();
    d.set_item("trades", trades)?;

    // Positions still open after the last bar
    let open_positions: Vec<Py<PyDict>> = results
        .open_lots
        .iter()
        .map(|l| {
            let ld = PyDict::new(py);
            ld.set_item("bar", l.bar).unwrap();
            ld.set_item("qty", l.qty).unwrap();
            ld.set_item("price", l.price).unwrap();
            ld.into()
        })
        .collect();
    d.set_item("open_positions", open_positions)?;

    Ok(d.into())
}

/// PyO3 module
#[pymodule]
fn _sigpnl(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calc_profit_loss, m)?)?;
    m.add_function(wrap_pyfunction!(calc_profit_loss_data, m)?)?;
    m.add_function(wrap_pyfunction!(profit_loss_report, m)?)?;
    Ok(())
}
