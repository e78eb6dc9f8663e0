//! # Meridian Analytics Crate
//!
//! This crate derives read-only performance analytics from the ledger. It
//! acts as the "unbiased judge" of the account.
//!
//! ## Architectural Principles
//!
//! - **Stateless Calculation:** The `ReportGenerator` is a pure function
//!   of its inputs. No side effects, no hidden state; two calls on the
//!   same ledger produce identical reports.
//! - **Valuation Through the Ledger:** Unrealized P&L and equity are
//!   computed by the accounting layer, so the missing-price contract is
//!   enforced in exactly one place.
//!
//! ## Public API
//!
//! - `ReportGenerator`: The main struct that contains the calculation logic.
//! - `PerformanceReport`: The standardized struct that holds the derived metrics.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::ReportGenerator;
pub use error::AnalyticsError;
pub use report::PerformanceReport;
