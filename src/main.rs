use analytics::{PerformanceReport, ReportGenerator};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Config, load_config};
use core_types::{Account, Ledger, OrderSide, Trade};
use executor::{ExecutorError, OrderExecutor};
use ledger::{LedgerError, PortfolioLedger};
use market_data::{BinanceSource, PriceSource};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use store::LedgerStore;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Meridian paper-trading application.
#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-parsable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meridian=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.render();
            ExitCode::from(err.exit_code())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A paper-trading engine: virtual account, simulated fills at live
/// market prices, position and P&L tracking.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (default: ./meridian.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the ledger document (overrides configuration and the platform default).
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Emit machine-readable JSON on stdout instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh virtual account with the given starting cash.
    Init(InitArgs),
    /// Buy a symbol at the current market price or a given limit price.
    Buy(OrderArgs),
    /// Sell a symbol at the current market price or a given limit price.
    Sell(OrderArgs),
    /// Show the account balance and all open positions with current valuation.
    Portfolio,
    /// Show the performance report derived from the trade history.
    Report,
}

#[derive(Parser)]
struct InitArgs {
    /// The starting cash balance for the new account.
    #[arg(long)]
    balance: Decimal,

    /// The account currency (default: the configured currency).
    #[arg(long)]
    currency: Option<String>,

    /// Replace an existing ledger instead of failing.
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct OrderArgs {
    /// The symbol to trade (e.g., "BTCUSDT").
    symbol: String,

    /// The quantity to trade.
    quantity: Decimal,

    /// Optional limit price; fills exactly at this price with no slippage.
    #[arg(long)]
    price: Option<Decimal>,
}

// ==============================================================================
// Command Boundary Errors
// ==============================================================================

/// Every domain error is caught here, rendered as one structured JSON
/// object on stderr, and mapped to a distinct process exit code so
/// scripted callers can branch on the failure kind.
#[derive(Error, Debug)]
enum CommandError {
    #[error(transparent)]
    Config(#[from] configuration::ConfigError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    MarketData(#[from] market_data::MarketDataError),

    #[error(transparent)]
    Analytics(#[from] analytics::AnalyticsError),

    #[error(transparent)]
    Store(#[from] store::StoreError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("A ledger already exists at {}; pass --force to replace it", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("No ledger found at {}; run `meridian init --balance <amount>` first", .0.display())]
    NotInitialized(PathBuf),
}

impl CommandError {
    /// The stable machine-facing kind and its process exit code.
    fn classify(&self) -> (&'static str, u8) {
        match self {
            CommandError::Config(_) => ("InvalidConfig", 2),
            CommandError::InvalidArgument(_) => ("InvalidArgument", 2),
            CommandError::Executor(ExecutorError::InvalidOrder(_)) => ("InvalidOrder", 2),
            CommandError::Executor(ExecutorError::PriceUnavailable(_)) => ("PriceUnavailable", 4),
            CommandError::Executor(ExecutorError::Ledger(e)) => classify_ledger(e),
            CommandError::Ledger(e) => classify_ledger(e),
            CommandError::Analytics(analytics::AnalyticsError::Valuation(e)) => classify_ledger(e),
            CommandError::MarketData(_) => ("PriceUnavailable", 4),
            CommandError::AlreadyInitialized(_) => ("AlreadyInitialized", 5),
            CommandError::NotInitialized(_) => ("NotInitialized", 5),
            CommandError::Store(_) => ("PersistenceError", 6),
        }
    }

    fn exit_code(&self) -> u8 {
        self.classify().1
    }

    /// Writes the structured error object to stderr.
    fn render(&self) {
        let (kind, _) = self.classify();
        let body = serde_json::json!({
            "error": kind,
            "message": self.to_string(),
        });
        eprintln!("{body}");
    }
}

fn classify_ledger(error: &LedgerError) -> (&'static str, u8) {
    match error {
        LedgerError::InvalidTrade(_) => ("InvalidOrder", 2),
        LedgerError::InsufficientFunds { .. } => ("InsufficientFunds", 3),
        LedgerError::InsufficientPosition { .. } => ("InsufficientPosition", 3),
        LedgerError::MissingPrice(_) => ("PriceUnavailable", 4),
        // A ledger that fails reconciliation was corrupted at rest.
        LedgerError::OutOfBalance { .. } => ("PersistenceError", 6),
    }
}

// ==============================================================================
// Command Orchestration
// ==============================================================================

/// The explicitly constructed per-invocation context: configuration plus
/// the persistence and market-data handles every command works through.
struct AppContext {
    config: Config,
    store: LedgerStore,
    price_source: Arc<dyn PriceSource>,
    json: bool,
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = load_config(cli.config.as_deref())?;

    let store = match cli.ledger.as_ref().or(config.storage.path.as_ref()) {
        Some(path) => LedgerStore::new(path),
        None => LedgerStore::at_default_path()?,
    };

    let ctx = AppContext {
        price_source: Arc::new(BinanceSource::new(config.market_data.clone())),
        store,
        json: cli.json,
        config,
    };

    match cli.command {
        Commands::Init(args) => handle_init(args, &ctx),
        Commands::Buy(args) => handle_order(OrderSide::Buy, args, &ctx).await,
        Commands::Sell(args) => handle_order(OrderSide::Sell, args, &ctx).await,
        Commands::Portfolio => handle_portfolio(&ctx).await,
        Commands::Report => handle_report(&ctx).await,
    }
}

/// Creates a fresh account and persists the empty ledger around it.
fn handle_init(args: InitArgs, ctx: &AppContext) -> Result<(), CommandError> {
    if args.balance.is_sign_negative() {
        return Err(CommandError::InvalidArgument(format!(
            "starting balance must not be negative, got {}",
            args.balance
        )));
    }
    if ctx.store.exists() && !args.force {
        return Err(CommandError::AlreadyInitialized(ctx.store.path().to_path_buf()));
    }

    let currency = args
        .currency
        .unwrap_or_else(|| ctx.config.account.currency.clone());
    let ledger = Ledger::new(Account::new(args.balance, currency));
    ctx.store.save(&ledger)?;

    tracing::info!(
        account_id = %ledger.account.account_id,
        balance = %ledger.account.cash_balance,
        path = %ctx.store.path().display(),
        "account initialized"
    );

    if ctx.json {
        println!("{}", serde_json::json!({ "account": ledger.account }));
    } else {
        println!(
            "Initialized account {} with {} {} (ledger: {})",
            ledger.account.account_id,
            ledger.account.cash_balance,
            ledger.account.currency,
            ctx.store.path().display()
        );
    }
    Ok(())
}

/// Loads the ledger, executes exactly one order, and persists the result.
async fn handle_order(
    side: OrderSide,
    args: OrderArgs,
    ctx: &AppContext,
) -> Result<(), CommandError> {
    let mut book = load_portfolio(ctx)?;

    let order_executor = OrderExecutor::new(ctx.price_source.clone(), ctx.config.execution.clone());
    let trade = order_executor
        .execute(&mut book, side, &args.symbol, args.quantity, args.price)
        .await?;

    ctx.store.save(book.snapshot())?;

    if ctx.json {
        println!(
            "{}",
            serde_json::json!({ "trade": trade, "account": book.snapshot().account })
        );
    } else {
        print_trade(&trade);
        print_account(&book.snapshot().account);
    }
    Ok(())
}

/// Prints the account balance and every open position at live valuation.
async fn handle_portfolio(ctx: &AppContext) -> Result<(), CommandError> {
    let book = load_portfolio(ctx)?;
    let prices = fetch_held_prices(&book, ctx).await?;

    let snapshot = book.snapshot();
    let position_value = book.position_value(&prices)?;
    let equity = book.equity(&prices)?;

    if ctx.json {
        let positions: Vec<_> = snapshot
            .positions
            .values()
            .map(|p| {
                let price = prices[&p.symbol];
                serde_json::json!({
                    "symbol": p.symbol,
                    "quantity": p.quantity,
                    "average_cost": p.average_cost,
                    "price": price,
                    "market_value": p.market_value(price),
                    "unrealized_pnl": p.unrealized_pnl(price),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "account": snapshot.account,
                "positions": positions,
                "position_value": position_value,
                "equity": equity,
            })
        );
        return Ok(());
    }

    if snapshot.positions.is_empty() {
        println!("No open positions.");
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "Symbol",
            "Quantity",
            "Avg Cost",
            "Price",
            "Value",
            "Unrealized P&L",
        ]);
        for position in snapshot.positions.values() {
            let price = prices[&position.symbol];
            table.add_row(vec![
                position.symbol.clone(),
                position.quantity.to_string(),
                position.average_cost.to_string(),
                price.to_string(),
                position.market_value(price).to_string(),
                position.unrealized_pnl(price).to_string(),
            ]);
        }
        println!("{table}");
    }
    print_account(&snapshot.account);
    println!("Total equity: {} {}", equity, snapshot.account.currency);
    Ok(())
}

/// Renders the performance report for the current ledger.
async fn handle_report(ctx: &AppContext) -> Result<(), CommandError> {
    let book = load_portfolio(ctx)?;
    let prices = fetch_held_prices(&book, ctx).await?;
    let report = ReportGenerator::new().generate(&book, &prices)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "report": report }));
    } else {
        print_report(&report);
    }
    Ok(())
}

// ==============================================================================
// Shared Helpers
// ==============================================================================

/// Loads and rehydrates the persisted ledger, refusing to operate on a
/// document that fails reconciliation.
fn load_portfolio(ctx: &AppContext) -> Result<PortfolioLedger, CommandError> {
    let state = ctx
        .store
        .load()?
        .ok_or_else(|| CommandError::NotInitialized(ctx.store.path().to_path_buf()))?;
    let book = PortfolioLedger::from_state(state, ctx.config.ledger.clone());
    book.reconcile()?;
    Ok(book)
}

/// Fetches a current price for every held symbol.
async fn fetch_held_prices(
    book: &PortfolioLedger,
    ctx: &AppContext,
) -> Result<HashMap<String, Decimal>, CommandError> {
    let mut prices = HashMap::new();
    for symbol in book.snapshot().positions.keys() {
        let quote = ctx.price_source.get_price(symbol).await?;
        prices.insert(symbol.clone(), quote.price);
    }
    Ok(prices)
}

fn print_trade(trade: &Trade) {
    println!(
        "Trade #{}: {} {} {} @ {} (fee {})",
        trade.id, trade.side, trade.quantity, trade.symbol, trade.fill_price, trade.fee
    );
    if let Some(pnl) = trade.realized_pnl {
        println!("Realized P&L: {pnl}");
    }
}

fn print_account(account: &Account) {
    println!("Cash balance: {} {}", account.cash_balance, account.currency);
}

fn print_report(report: &PerformanceReport) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Total equity".to_string(), report.total_equity.to_string()]);
    table.add_row(vec!["Cash balance".to_string(), report.cash_balance.to_string()]);
    table.add_row(vec!["Realized P&L".to_string(), report.realized_pnl.to_string()]);
    table.add_row(vec!["Unrealized P&L".to_string(), report.unrealized_pnl.to_string()]);
    table.add_row(vec![
        "Total return %".to_string(),
        report.total_return_pct.to_string(),
    ]);
    table.add_row(vec!["Trades".to_string(), report.total_trades.to_string()]);
    table.add_row(vec!["Closing trades".to_string(), report.closing_trades.to_string()]);
    table.add_row(vec![
        "Win rate %".to_string(),
        report
            .win_rate_pct
            .map(|r| r.to_string())
            .unwrap_or_else(|| "n/a".to_string()),
    ]);
    table.add_row(vec!["Largest win".to_string(), report.largest_win.to_string()]);
    table.add_row(vec!["Largest loss".to_string(), report.largest_loss.to_string()]);
    table.add_row(vec![
        "Profit factor".to_string(),
        report
            .profit_factor
            .map(|f| f.to_string())
            .unwrap_or_else(|| "n/a".to_string()),
    ]);
    println!("{table}");
}
