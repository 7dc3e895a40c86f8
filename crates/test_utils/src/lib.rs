//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! pooled ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built configs, amounts and timestamps
//! - `builders`: Ledger and service scenario builders
//! - `assertions`: Custom assertion helpers for ledger outcomes
//! - `generators`: Property-based operation sequences

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
