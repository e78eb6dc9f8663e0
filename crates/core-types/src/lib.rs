//! # Meridian Core Types
//!
//! This crate defines the shared data model for the paper-trading engine.
//! It is the foundation layer: every other crate in the workspace depends
//! on it, and it depends on nothing else in the workspace.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** Pure data definitions plus the arithmetic that belongs
//!   to them (e.g. a trade's cash delta). No I/O, no policy decisions.
//! - **Decimal Everywhere:** All money and quantity values are
//!   `rust_decimal::Decimal`. Floating point never touches the books.
//!
//! ## Public API
//!
//! - `OrderSide`: Buy/Sell enum shared across the workspace.
//! - `Account`, `Position`, `Trade`, `Ledger`: The persistent data model.

pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::OrderSide;
pub use structs::{Account, Ledger, Position, Trade};
