use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use chrono::{DateTime, Utc};
use core_types::Ledger;
use ledger::PortfolioLedger;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A stateless calculator that derives read-only analytics from the
/// ledger. Pure function of its inputs: the same ledger and prices always
/// produce the identical report.
#[derive(Debug, Default)]
pub struct ReportGenerator {}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full performance report.
    ///
    /// Valuation goes through the accounting layer, so a held symbol with
    /// no supplied price surfaces as an error rather than a silent zero.
    pub fn generate(
        &self,
        portfolio: &PortfolioLedger,
        prices: &HashMap<String, Decimal>,
    ) -> Result<PerformanceReport, AnalyticsError> {
        let ledger = portfolio.snapshot();
        let mut report = PerformanceReport::new();

        report.cash_balance = ledger.account.cash_balance;
        report.unrealized_pnl = portfolio.unrealized_pnl(prices)?;
        report.total_equity = portfolio.equity(prices)?;
        report.total_trades = ledger.trades.len();

        self.tally_realized(ledger, &mut report);

        if ledger.account.initial_balance > Decimal::ZERO {
            report.total_return_pct = (report.total_equity - ledger.account.initial_balance)
                / ledger.account.initial_balance
                * Decimal::from(100);
        }

        report.cash_curve = cash_curve(ledger);

        Ok(report)
    }

    /// Walks the trade history once, accumulating every realized-P&L metric.
    fn tally_realized(&self, ledger: &Ledger, report: &mut PerformanceReport) {
        for trade in &ledger.trades {
            let Some(pnl) = trade.realized_pnl else {
                continue;
            };
            report.closing_trades += 1;
            report.realized_pnl += pnl;

            if pnl > Decimal::ZERO {
                report.winning_trades += 1;
                report.gross_profit += pnl;
                report.largest_win = report.largest_win.max(pnl);
            } else if pnl < Decimal::ZERO {
                report.losing_trades += 1;
                report.gross_loss += pnl.abs();
                report.largest_loss = report.largest_loss.min(pnl);
            }
            // A break-even close counts toward the denominator only.
        }

        if report.closing_trades > 0 {
            report.win_rate_pct = Some(
                Decimal::from(report.winning_trades) / Decimal::from(report.closing_trades)
                    * Decimal::from(100),
            );
        }
        if report.gross_loss > Decimal::ZERO {
            report.profit_factor = Some(report.gross_profit / report.gross_loss);
        }
    }
}

/// Reconstructs the cash balance over time from the trade history. This
/// is the auditable counterpart of the reconciliation invariant: the last
/// point always equals the account's current cash balance.
fn cash_curve(ledger: &Ledger) -> Vec<(DateTime<Utc>, Decimal)> {
    let mut curve = Vec::with_capacity(ledger.trades.len() + 1);
    let mut cash = ledger.account.initial_balance;
    curve.push((ledger.account.created_at, cash));
    for trade in &ledger.trades {
        cash += trade.cash_delta();
        curve.push((trade.timestamp, cash));
    }
    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::LedgerPolicy;
    use core_types::Account;
    use ledger::LedgerError;
    use rust_decimal_macros::dec;

    fn portfolio(balance: Decimal) -> PortfolioLedger {
        PortfolioLedger::new(Account::new(balance, "USDT"), LedgerPolicy::default())
    }

    fn no_prices() -> HashMap<String, Decimal> {
        HashMap::new()
    }

    #[test]
    fn empty_ledger_reports_zeros() {
        let book = portfolio(dec!(10000));
        let report = ReportGenerator::new().generate(&book, &no_prices()).unwrap();

        assert_eq!(report.total_equity, dec!(10000));
        assert_eq!(report.realized_pnl, Decimal::ZERO);
        assert_eq!(report.win_rate_pct, None);
        assert_eq!(report.profit_factor, None);
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.cash_curve.len(), 1);
    }

    #[test]
    fn mixed_history_produces_the_expected_figures() {
        let mut book = portfolio(dec!(10000));
        book.apply_buy("ETHUSDT", dec!(1), dec!(100), dec!(0)).unwrap();
        book.apply_buy("ETHUSDT", dec!(1), dec!(200), dec!(0)).unwrap();
        book.apply_sell("ETHUSDT", dec!(1), dec!(250), dec!(0)).unwrap(); // +100
        book.apply_sell("ETHUSDT", dec!(1), dec!(100), dec!(0)).unwrap(); // -50

        let report = ReportGenerator::new().generate(&book, &no_prices()).unwrap();

        assert_eq!(report.cash_balance, dec!(10050));
        assert_eq!(report.total_equity, dec!(10050));
        assert_eq!(report.realized_pnl, dec!(50));
        assert_eq!(report.unrealized_pnl, Decimal::ZERO);
        assert_eq!(report.total_trades, 4);
        assert_eq!(report.closing_trades, 2);
        assert_eq!(report.winning_trades, 1);
        assert_eq!(report.losing_trades, 1);
        assert_eq!(report.win_rate_pct, Some(dec!(50)));
        assert_eq!(report.largest_win, dec!(100));
        assert_eq!(report.largest_loss, dec!(-50));
        assert_eq!(report.gross_profit, dec!(100));
        assert_eq!(report.gross_loss, dec!(50));
        assert_eq!(report.profit_factor, Some(dec!(2)));
        assert_eq!(report.total_return_pct, dec!(0.5));
    }

    #[test]
    fn open_positions_contribute_unrealized_pnl_and_equity() {
        let mut book = portfolio(dec!(10000));
        book.apply_buy("BTCUSDT", dec!(0.1), dec!(50000), dec!(0)).unwrap();

        let prices = HashMap::from([("BTCUSDT".to_string(), dec!(60000))]);
        let report = ReportGenerator::new().generate(&book, &prices).unwrap();

        assert_eq!(report.unrealized_pnl, dec!(1000));
        assert_eq!(report.total_equity, dec!(11000));
        assert_eq!(report.total_return_pct, dec!(10));
    }

    #[test]
    fn held_symbol_without_a_price_is_an_error() {
        let mut book = portfolio(dec!(10000));
        book.apply_buy("BTCUSDT", dec!(0.1), dec!(50000), dec!(0)).unwrap();

        let result = ReportGenerator::new().generate(&book, &no_prices());
        assert!(matches!(
            result,
            Err(AnalyticsError::Valuation(LedgerError::MissingPrice(_)))
        ));
    }

    #[test]
    fn report_is_idempotent_on_unchanged_state() {
        let mut book = portfolio(dec!(10000));
        book.apply_buy("ETHUSDT", dec!(2), dec!(150), dec!(0)).unwrap();
        book.apply_sell("ETHUSDT", dec!(1), dec!(200), dec!(0)).unwrap();

        let prices = HashMap::from([("ETHUSDT".to_string(), dec!(180))]);
        let generator = ReportGenerator::new();
        let first = generator.generate(&book, &prices).unwrap();
        let second = generator.generate(&book, &prices).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cash_curve_ends_at_the_current_balance() {
        let mut book = portfolio(dec!(10000));
        book.apply_buy("BTCUSDT", dec!(0.1), dec!(50000), dec!(1)).unwrap();
        book.apply_sell("BTCUSDT", dec!(0.1), dec!(52000), dec!(1)).unwrap();

        let report = ReportGenerator::new().generate(&book, &no_prices()).unwrap();
        let (_, last_cash) = report.cash_curve.last().unwrap();
        assert_eq!(*last_cash, book.snapshot().account.cash_balance);
        assert_eq!(report.cash_curve.len(), 3);
    }
}
