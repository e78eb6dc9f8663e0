//! # Meridian Executor Crate
//!
//! This crate turns validated order intents into ledger mutations. It sits
//! between the command surface and the accounting core.
//!
//! ## Architectural Principles
//!
//! - **Validate Before Touching Anything:** Malformed orders are rejected
//!   before the price feed or the ledger is consulted, so an invalid
//!   input can never leave a partial mutation behind.
//! - **Price Resolution Is Explicit:** A limit price fills exactly; a
//!   market order resolves through the injected `PriceSource` and a
//!   configured slippage model. When no price can be resolved the order
//!   fails loudly rather than guessing.
//! - **One Trade Per Call:** A successful execution appends exactly one
//!   trade to the ledger; never two, never zero.
//!
//! ## Public API
//!
//! - `OrderExecutor`: The order validation and fill pipeline.
//! - `ExecutorError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod order;

// Re-export the key components to provide a clean, public-facing API.
pub use error::ExecutorError;
pub use order::OrderExecutor;
