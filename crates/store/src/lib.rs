//! # Meridian Store Crate
//!
//! This crate is the persistence layer for the ledger document. It is the
//! system's "permanent archive."
//!
//! ## Architectural Principles
//!
//! - **Atomic Replace:** Saves are write-to-temp-then-rename, so a crash
//!   mid-write can never corrupt the previously committed state. This is
//!   the only cross-process guarantee the store makes.
//! - **Human-Inspectable:** The ledger is one pretty-printed JSON file,
//!   auditable with nothing more than a pager.
//! - **No Silent Defaults:** A missing document is the one case that
//!   yields a fresh start; a corrupt document is always an error.
//!
//! ## Public API
//!
//! - `LedgerStore`: Load/save over a well-known or explicit path.
//! - `StoreError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use repository::LedgerStore;
