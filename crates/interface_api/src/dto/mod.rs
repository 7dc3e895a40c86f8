//! Request and response bodies
//!
//! Amounts travel as decimal strings of smallest units: they routinely
//! exceed the integer range JSON clients handle safely.

pub mod amount;
pub mod policy;
pub mod claims;
pub mod fund;
pub mod transactions;
