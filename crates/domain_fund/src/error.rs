//! Fund domain errors

use thiserror::Error;

use core_kernel::{Amount, MoneyError};

/// Errors that can occur in the fund domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FundError {
    #[error("Insufficient pool funds: {available} available, {requested} requested")]
    InsufficientFunds {
        available: Amount,
        requested: Amount,
    },

    #[error("Calculation error: {0}")]
    Calculation(#[from] MoneyError),
}
