use crate::enums::OrderSide;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The virtual trading account. One per ledger.
///
/// `initial_balance` is retained for the lifetime of the account so that
/// the reconciliation invariant (initial balance plus the sum of all trade
/// cash deltas equals the current balance) can be checked at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    pub cash_balance: Decimal,
    pub initial_balance: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account funded with the given starting cash.
    pub fn new(initial_balance: Decimal, currency: impl Into<String>) -> Self {
        Self {
            account_id: Uuid::new_v4(),
            cash_balance: initial_balance,
            initial_balance,
            currency: currency.into(),
            created_at: Utc::now(),
        }
    }
}

/// An open holding in a single symbol.
///
/// A position with zero quantity is never stored; the ledger removes it
/// from the active set the moment its quantity returns to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub position_id: Uuid,
    pub symbol: String,
    /// Signed quantity. Positive = long.
    pub quantity: Decimal,
    /// Volume-weighted average purchase price per unit.
    pub average_cost: Decimal,
    pub opened_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Position {
    /// Creates an empty position shell for a symbol. The ledger fills in
    /// quantity and average cost when it applies the opening trade.
    pub fn new(symbol: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            position_id: Uuid::new_v4(),
            symbol: symbol.into(),
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            opened_at: now,
            last_updated: now,
        }
    }

    /// Market value of the holding at the given price.
    pub fn market_value(&self, price: Decimal) -> Decimal {
        price * self.quantity
    }

    /// Paper profit at the given price.
    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        (price - self.average_cost) * self.quantity
    }
}

/// An immutable record of a simulated fill. Appended to the ledger's
/// trade history by the accounting layer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Monotonic identifier assigned by the ledger.
    pub id: u64,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub fill_price: Decimal,
    pub fee: Decimal,
    /// Profit locked in by this fill. `Some` only for sells that reduce
    /// an existing position.
    pub realized_pnl: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    /// The signed effect of this trade on the account's cash balance.
    ///
    /// Buys debit `quantity * fill_price + fee`; sells credit
    /// `quantity * fill_price - fee`.
    pub fn cash_delta(&self) -> Decimal {
        match self.side {
            OrderSide::Buy => -(self.quantity * self.fill_price + self.fee),
            OrderSide::Sell => self.quantity * self.fill_price - self.fee,
        }
    }
}

/// The full persistent state of a paper-trading account: the account
/// itself, all open positions keyed by symbol, and the append-only trade
/// history. Serialized as a single JSON document by the store crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub account: Account,
    pub positions: BTreeMap<String, Position>,
    pub trades: Vec<Trade>,
    /// The id the next trade will receive.
    pub next_trade_id: u64,
}

impl Ledger {
    /// Creates a fresh ledger around a newly opened account.
    pub fn new(account: Account) -> Self {
        Self {
            account,
            positions: BTreeMap::new(),
            trades: Vec::new(),
            next_trade_id: 1,
        }
    }
}
