use crate::error::LedgerError;
use chrono::Utc;
use configuration::LedgerPolicy;
use core_types::{Account, Ledger, OrderSide, Position, Trade};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Manages the state of a paper-trading account: cash, open positions,
/// and the append-only trade history.
///
/// Every mutation is validate-then-commit: all business rules are checked
/// before the first field is touched, so a failed operation leaves the
/// ledger exactly as it was. The wrapped `Ledger` is only ever exposed as
/// an immutable snapshot.
#[derive(Debug, Clone)]
pub struct PortfolioLedger {
    state: Ledger,
    policy: LedgerPolicy,
}

impl PortfolioLedger {
    /// Creates a fresh ledger around a newly opened account.
    pub fn new(account: Account, policy: LedgerPolicy) -> Self {
        Self {
            state: Ledger::new(account),
            policy,
        }
    }

    /// Rehydrates a ledger previously loaded from the store.
    pub fn from_state(state: Ledger, policy: LedgerPolicy) -> Self {
        Self { state, policy }
    }

    /// An immutable read view of the full ledger state.
    pub fn snapshot(&self) -> &Ledger {
        &self.state
    }

    /// Consumes the wrapper and hands the state back, e.g. for persisting.
    pub fn into_state(self) -> Ledger {
        self.state
    }

    /// Records a buy fill: debits cash by `quantity * fill_price + fee`,
    /// creates the position or folds the fill into its volume-weighted
    /// average cost, and appends the trade.
    ///
    /// Fails with `InsufficientFunds` when the account cannot cover the
    /// cost and overdraft is disabled. The ledger is unchanged on failure.
    pub fn apply_buy(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        fill_price: Decimal,
        fee: Decimal,
    ) -> Result<Trade, LedgerError> {
        validate_fill(symbol, quantity, fill_price, fee)?;

        let cost = quantity * fill_price + fee;
        let available = self.state.account.cash_balance;
        if cost > available && !self.policy.allow_overdraft {
            return Err(LedgerError::InsufficientFunds {
                required: cost.to_string(),
                available: available.to_string(),
            });
        }

        // All checks passed; commit.
        self.state.account.cash_balance -= cost;

        let position = self
            .state
            .positions
            .entry(symbol.to_string())
            .or_insert_with(|| Position::new(symbol));

        let total_quantity = position.quantity + quantity;
        if !total_quantity.is_zero() {
            position.average_cost = (position.average_cost * position.quantity
                + fill_price * quantity)
                / total_quantity;
        }
        position.quantity = total_quantity;
        position.last_updated = Utc::now();

        // A buy that exactly covers a short leaves zero quantity behind.
        if position.quantity.is_zero() {
            self.state.positions.remove(symbol);
        }

        let trade = self.append_trade(symbol, OrderSide::Buy, quantity, fill_price, fee, None);
        tracing::debug!(
            symbol,
            %quantity,
            %fill_price,
            cash = %self.state.account.cash_balance,
            "applied buy"
        );
        Ok(trade)
    }

    /// Records a sell fill: credits cash by `quantity * fill_price - fee`,
    /// reduces the position (average cost unchanged), computes the
    /// realized P&L of the quantity closed, and appends the trade. A
    /// position that reaches zero quantity is removed from the active set.
    ///
    /// Fails with `InsufficientPosition` when the requested quantity
    /// exceeds the holding and short selling is disabled. The ledger is
    /// unchanged on failure.
    pub fn apply_sell(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        fill_price: Decimal,
        fee: Decimal,
    ) -> Result<Trade, LedgerError> {
        validate_fill(symbol, quantity, fill_price, fee)?;

        let held = self
            .state
            .positions
            .get(symbol)
            .map(|p| p.quantity)
            .unwrap_or(Decimal::ZERO);

        if quantity > held && !self.policy.allow_short_selling {
            return Err(LedgerError::InsufficientPosition {
                requested: quantity.to_string(),
                available: held.to_string(),
            });
        }

        // With short selling enabled, only the long quantity actually
        // closed realizes P&L; the remainder opens or extends a short.
        let closed_quantity = quantity.min(held.max(Decimal::ZERO));
        let realized_pnl = if closed_quantity > Decimal::ZERO {
            let average_cost = self
                .state
                .positions
                .get(symbol)
                .map(|p| p.average_cost)
                .unwrap_or(Decimal::ZERO);
            Some((fill_price - average_cost) * closed_quantity - fee)
        } else {
            None
        };

        // All checks passed; commit.
        self.state.account.cash_balance += quantity * fill_price - fee;

        let position = self
            .state
            .positions
            .entry(symbol.to_string())
            .or_insert_with(|| {
                // Short from flat; reachable only with the policy enabled.
                let mut position = Position::new(symbol);
                position.average_cost = fill_price;
                position
            });
        position.quantity -= quantity;
        position.last_updated = Utc::now();

        if position.quantity.is_zero() {
            self.state.positions.remove(symbol);
        }

        let trade = self.append_trade(
            symbol,
            OrderSide::Sell,
            quantity,
            fill_price,
            fee,
            realized_pnl,
        );
        tracing::debug!(
            symbol,
            %quantity,
            %fill_price,
            cash = %self.state.account.cash_balance,
            "applied sell"
        );
        Ok(trade)
    }

    /// Sum over open positions of `(current_price - average_cost) * quantity`.
    ///
    /// Fails with `MissingPrice` when a held symbol has no supplied price;
    /// the caller decides whether that aborts the command. It is never
    /// silently treated as zero.
    pub fn unrealized_pnl(
        &self,
        prices: &HashMap<String, Decimal>,
    ) -> Result<Decimal, LedgerError> {
        let mut total = Decimal::ZERO;
        for (symbol, position) in &self.state.positions {
            let price = prices
                .get(symbol)
                .ok_or_else(|| LedgerError::MissingPrice(symbol.clone()))?;
            total += position.unrealized_pnl(*price);
        }
        Ok(total)
    }

    /// Market value of all open positions at the supplied prices.
    pub fn position_value(
        &self,
        prices: &HashMap<String, Decimal>,
    ) -> Result<Decimal, LedgerError> {
        let mut total = Decimal::ZERO;
        for (symbol, position) in &self.state.positions {
            let price = prices
                .get(symbol)
                .ok_or_else(|| LedgerError::MissingPrice(symbol.clone()))?;
            total += position.market_value(*price);
        }
        Ok(total)
    }

    /// Total equity: cash plus the market value of all open positions.
    pub fn equity(&self, prices: &HashMap<String, Decimal>) -> Result<Decimal, LedgerError> {
        Ok(self.state.account.cash_balance + self.position_value(prices)?)
    }

    /// Asserts the reconciliation invariant: the initial balance plus the
    /// sum of every trade's cash delta equals the current cash balance.
    pub fn reconcile(&self) -> Result<(), LedgerError> {
        let expected = self.state.account.initial_balance
            + self
                .state
                .trades
                .iter()
                .map(Trade::cash_delta)
                .sum::<Decimal>();
        if expected != self.state.account.cash_balance {
            return Err(LedgerError::OutOfBalance {
                expected: expected.to_string(),
                actual: self.state.account.cash_balance.to_string(),
            });
        }
        Ok(())
    }

    fn append_trade(
        &mut self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        fill_price: Decimal,
        fee: Decimal,
        realized_pnl: Option<Decimal>,
    ) -> Trade {
        let trade = Trade {
            id: self.state.next_trade_id,
            symbol: symbol.to_string(),
            side,
            quantity,
            fill_price,
            fee,
            realized_pnl,
            timestamp: Utc::now(),
        };
        self.state.next_trade_id += 1;
        self.state.trades.push(trade.clone());
        trade
    }
}

/// Shared fill validation. The executor rejects malformed orders before
/// they reach the ledger; this is the accounting layer's own guard.
fn validate_fill(
    symbol: &str,
    quantity: Decimal,
    fill_price: Decimal,
    fee: Decimal,
) -> Result<(), LedgerError> {
    if symbol.trim().is_empty() {
        return Err(LedgerError::InvalidTrade("symbol must not be empty".to_string()));
    }
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::InvalidTrade(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if fill_price <= Decimal::ZERO {
        return Err(LedgerError::InvalidTrade(format!(
            "fill price must be positive, got {fill_price}"
        )));
    }
    if fee.is_sign_negative() {
        return Err(LedgerError::InvalidTrade(format!("fee must not be negative, got {fee}")));
    }
    Ok(())
}
