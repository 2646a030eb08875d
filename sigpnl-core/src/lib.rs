//! sigpnl-core: FIFO lot-matching P&L engine for signed trade signals.
//!
//! Given per-bar open/close prices and an integer-signed quantity traded at
//! each bar's open (positive = buy, negative = sell), the engine keeps a
//! FIFO ledger of open lots and emits four aligned series: realized cash,
//! marked-to-market open equity, net liquidation value, and bar-over-bar
//! change in net liquidation. Signals execute with a one-bar lag: the
//! quantity in force on bar i fills at the open of bar i+1.
//!
//! Pure Rust, no Python dependencies; usable standalone or as the backend
//! for the Python extension crate.

pub mod engine;
pub mod ledger;
pub mod metrics;

pub use engine::{compute_pnl, InputError, PnlResults};
pub use ledger::{ClosedTrade, Lot, LotBook};
pub use metrics::{compute_metrics, PnlMetrics};
