use crate::error::ExecutorError;
use configuration::Execution;
use core_types::{OrderSide, Trade};
use ledger::PortfolioLedger;
use market_data::PriceSource;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Validates and fills orders against the accounting layer.
///
/// The executor is a price resolver and gatekeeper: it rejects malformed
/// orders before anything else runs, resolves the fill price (limit price
/// exactly, or market price with configured slippage), computes the fee,
/// and commits exactly one trade to the ledger per successful call.
pub struct OrderExecutor {
    price_source: Arc<dyn PriceSource>,
    params: Execution,
}

impl OrderExecutor {
    pub fn new(price_source: Arc<dyn PriceSource>, params: Execution) -> Self {
        Self {
            price_source,
            params,
        }
    }

    /// Executes a simulated order against the ledger.
    ///
    /// A given `limit_price` is used directly as an exact fill; otherwise
    /// the price source is queried and slippage is applied against the
    /// order. Fails with `InvalidOrder` before any ledger or network
    /// touch, and with `PriceUnavailable` when no limit price was given
    /// and the feed cannot supply one.
    pub async fn execute(
        &self,
        ledger: &mut PortfolioLedger,
        side: OrderSide,
        symbol: &str,
        quantity: Decimal,
        limit_price: Option<Decimal>,
    ) -> Result<Trade, ExecutorError> {
        let symbol = validate_order(symbol, quantity, limit_price)?;

        let fill_price = match limit_price {
            // An exact-fill paper trade; no slippage on limit prices.
            Some(price) => price,
            None => {
                let quote = self.price_source.get_price(&symbol).await?;
                self.slipped_price(side, quote.price)
            }
        };

        let fee = fill_price * quantity * self.params.fee_bps / dec!(10000);

        let trade = match side {
            OrderSide::Buy => ledger.apply_buy(&symbol, quantity, fill_price, fee)?,
            OrderSide::Sell => ledger.apply_sell(&symbol, quantity, fill_price, fee)?,
        };

        tracing::info!(
            trade_id = trade.id,
            %side,
            symbol = %trade.symbol,
            quantity = %trade.quantity,
            fill_price = %trade.fill_price,
            fee = %trade.fee,
            "order executed"
        );
        Ok(trade)
    }

    /// Moves a fetched market price against the order by the configured
    /// slippage, simulating real execution cost.
    fn slipped_price(&self, side: OrderSide, market_price: Decimal) -> Decimal {
        let adjustment = market_price * self.params.slippage_bps / dec!(10000);
        match side {
            // For a buy, slippage makes the price HIGHER (worse).
            OrderSide::Buy => market_price + adjustment,
            // For a sell, slippage makes the price LOWER (worse).
            OrderSide::Sell => market_price - adjustment,
        }
    }
}

/// Rejects malformed input before any state is touched. Returns the
/// normalized (trimmed, uppercased) symbol.
fn validate_order(
    symbol: &str,
    quantity: Decimal,
    limit_price: Option<Decimal>,
) -> Result<String, ExecutorError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ExecutorError::InvalidOrder("symbol must not be empty".to_string()));
    }
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ExecutorError::InvalidOrder(format!("malformed symbol: {symbol}")));
    }
    if quantity <= Decimal::ZERO {
        return Err(ExecutorError::InvalidOrder(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if let Some(price) = limit_price {
        if price <= Decimal::ZERO {
            return Err(ExecutorError::InvalidOrder(format!(
                "limit price must be positive, got {price}"
            )));
        }
    }
    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::LedgerPolicy;
    use core_types::Account;
    use market_data::FixedSource;

    fn ledger(balance: Decimal) -> PortfolioLedger {
        PortfolioLedger::new(Account::new(balance, "USDT"), LedgerPolicy::default())
    }

    fn executor(source: FixedSource, params: Execution) -> OrderExecutor {
        OrderExecutor::new(Arc::new(source), params)
    }

    #[tokio::test]
    async fn limit_orders_fill_exactly_without_a_feed() {
        let exec = executor(FixedSource::new(), Execution::default());
        let mut book = ledger(dec!(10000));

        let trade = exec
            .execute(&mut book, OrderSide::Buy, "BTCUSDT", dec!(0.1), Some(dec!(50000)))
            .await
            .unwrap();

        assert_eq!(trade.fill_price, dec!(50000));
        assert_eq!(book.snapshot().account.cash_balance, dec!(5000));
    }

    #[tokio::test]
    async fn market_orders_use_the_feed_with_slippage() {
        let params = Execution {
            slippage_bps: dec!(10),
            ..Execution::default()
        };
        let exec = executor(FixedSource::new().with_price("BTCUSDT", dec!(50000)), params);
        let mut book = ledger(dec!(100000));

        let buy = exec
            .execute(&mut book, OrderSide::Buy, "BTCUSDT", dec!(1), None)
            .await
            .unwrap();
        assert_eq!(buy.fill_price, dec!(50050));

        let sell = exec
            .execute(&mut book, OrderSide::Sell, "BTCUSDT", dec!(1), None)
            .await
            .unwrap();
        assert_eq!(sell.fill_price, dec!(49950));
    }

    #[tokio::test]
    async fn fees_are_charged_in_basis_points_of_notional() {
        let params = Execution {
            fee_bps: dec!(10),
            ..Execution::default()
        };
        let exec = executor(FixedSource::new(), params);
        let mut book = ledger(dec!(10000));

        let trade = exec
            .execute(&mut book, OrderSide::Buy, "ETHUSDT", dec!(2), Some(dec!(1000)))
            .await
            .unwrap();

        assert_eq!(trade.fee, dec!(2));
        assert_eq!(book.snapshot().account.cash_balance, dec!(7998));
    }

    #[tokio::test]
    async fn missing_price_without_limit_is_surfaced() {
        let exec = executor(FixedSource::new(), Execution::default());
        let mut book = ledger(dec!(10000));

        let result = exec
            .execute(&mut book, OrderSide::Buy, "BTCUSDT", dec!(0.1), None)
            .await;
        assert!(matches!(result, Err(ExecutorError::PriceUnavailable(_))));
        assert!(book.snapshot().trades.is_empty());
    }

    #[tokio::test]
    async fn invalid_orders_are_rejected_before_any_mutation() {
        let exec = executor(FixedSource::new(), Execution::default());
        let mut book = ledger(dec!(10000));
        let before = book.snapshot().clone();

        for (symbol, quantity, limit) in [
            ("BTCUSDT", dec!(0), Some(dec!(50000))),
            ("BTCUSDT", dec!(-1), Some(dec!(50000))),
            ("", dec!(1), Some(dec!(50000))),
            ("BTC/USDT", dec!(1), Some(dec!(50000))),
            ("BTCUSDT", dec!(1), Some(dec!(0))),
        ] {
            let result = exec
                .execute(&mut book, OrderSide::Buy, symbol, quantity, limit)
                .await;
            assert!(matches!(result, Err(ExecutorError::InvalidOrder(_))));
        }
        assert_eq!(book.snapshot(), &before);
    }

    #[tokio::test]
    async fn symbols_are_normalized_to_uppercase() {
        let exec = executor(FixedSource::new(), Execution::default());
        let mut book = ledger(dec!(10000));

        let trade = exec
            .execute(&mut book, OrderSide::Buy, " btcusdt ", dec!(0.1), Some(dec!(50000)))
            .await
            .unwrap();
        assert_eq!(trade.symbol, "BTCUSDT");
        assert!(book.snapshot().positions.contains_key("BTCUSDT"));
    }

    #[tokio::test]
    async fn exactly_one_trade_is_appended_per_successful_call() {
        let exec = executor(FixedSource::new(), Execution::default());
        let mut book = ledger(dec!(10000));

        exec.execute(&mut book, OrderSide::Buy, "BTCUSDT", dec!(0.1), Some(dec!(50000)))
            .await
            .unwrap();
        assert_eq!(book.snapshot().trades.len(), 1);

        exec.execute(&mut book, OrderSide::Sell, "BTCUSDT", dec!(0.1), Some(dec!(51000)))
            .await
            .unwrap();
        assert_eq!(book.snapshot().trades.len(), 2);
    }

    /// The full account lifecycle at the figures a user would check by hand.
    #[tokio::test]
    async fn end_to_end_scenario() {
        let exec = executor(FixedSource::new(), Execution::default());
        let mut book = ledger(dec!(10000));

        exec.execute(&mut book, OrderSide::Buy, "BTCUSDT", dec!(0.1), Some(dec!(50000)))
            .await
            .unwrap();
        assert_eq!(book.snapshot().account.cash_balance, dec!(5000));
        let position = &book.snapshot().positions["BTCUSDT"];
        assert_eq!(position.quantity, dec!(0.1));
        assert_eq!(position.average_cost, dec!(50000));

        let sell = exec
            .execute(&mut book, OrderSide::Sell, "BTCUSDT", dec!(0.05), Some(dec!(60000)))
            .await
            .unwrap();
        assert_eq!(book.snapshot().account.cash_balance, dec!(8000));
        assert_eq!(sell.realized_pnl, Some(dec!(500)));
        let position = &book.snapshot().positions["BTCUSDT"];
        assert_eq!(position.quantity, dec!(0.05));
        assert_eq!(position.average_cost, dec!(50000));

        book.reconcile().unwrap();
    }
}
