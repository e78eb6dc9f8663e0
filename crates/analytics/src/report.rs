use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A standardized report of the account's performance.
///
/// This struct is the final output of the `ReportGenerator` and serves as
/// the data transfer object for performance results: the CLI renders it,
/// programmatic callers consume it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // I. Account Valuation
    /// Cash plus the market value of all open positions.
    pub total_equity: Decimal,
    pub cash_balance: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub total_return_pct: Decimal,

    // II. Trade-Level Statistics
    pub total_trades: usize,
    /// Sells that reduced a position and therefore realized P&L.
    pub closing_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: Option<Decimal>, // Option<> for cases with 0 closing trades
    /// Largest single realized gain; zero when nothing has won.
    pub largest_win: Decimal,
    /// Most negative single realized P&L; zero when nothing has lost.
    pub largest_loss: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub profit_factor: Option<Decimal>, // Option<> because it can be infinite if GrossLoss is 0

    // III. History
    /// Cash balance after each trade, reconstructed from trade cash
    /// deltas. Starts at account creation with the initial balance.
    pub cash_curve: Vec<(DateTime<Utc>, Decimal)>,
}

impl PerformanceReport {
    /// Creates a new, zeroed-out PerformanceReport.
    /// This is useful as a default or starting point before calculations.
    pub fn new() -> Self {
        Self {
            total_equity: Decimal::ZERO,
            cash_balance: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            total_return_pct: Decimal::ZERO,
            total_trades: 0,
            closing_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate_pct: None,
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            profit_factor: None,
            cash_curve: Vec::new(),
        }
    }
}

impl Default for PerformanceReport {
    fn default() -> Self {
        Self::new()
    }
}
