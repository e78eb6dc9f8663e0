//! # Meridian Ledger Crate
//!
//! This crate is the accounting core of the paper-trading engine. It owns
//! the account balance, open positions, and the immutable trade history,
//! and it is the only place the ledger invariants are enforced.
//!
//! ## Architectural Principles
//!
//! - **Validate Then Commit:** Every mutation checks all business rules
//!   before touching any field, so a failed operation never leaves a
//!   partially applied state behind.
//! - **Single Writer:** The `PortfolioLedger` assumes one mutation at a
//!   time per invocation; it never exposes interior mutability.
//! - **Policy Injection:** Overdraft and short-selling rules arrive as a
//!   `LedgerPolicy` from configuration; the accounting code itself has no
//!   defaults of its own.
//!
//! ## Public API
//!
//! - `PortfolioLedger`: The state machine for a trading account.
//! - `LedgerError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod portfolio;

// Re-export the key components to provide a clean, public-facing API.
pub use error::LedgerError;
pub use portfolio::PortfolioLedger;
