//! Risk Pool Domain
//!
//! The shared fund every customer pays into and every approved claim is
//! paid out of.
//!
//! # Key Concepts
//!
//! - **Total balance**: funds currently held; never negative
//! - **Contribution**: money entering the pool, tagged with its source
//!   (underwriting, premium, or third-party deposit)
//! - **Disbursement**: money leaving the pool for an approved claim

pub mod pool;
pub mod error;

pub use pool::{RiskPool, ContributionSource, PoolSummary};
pub use error::FundError;
