//! Claims domain errors

use chrono::Duration;
use thiserror::Error;

use core_kernel::{Amount, CustomerId};

/// Reasons a claim is refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Customer {customer} is not insured")]
    NotInsured {
        customer: CustomerId,
    },

    #[error("Claim amount must be positive")]
    ZeroAmount,

    #[error("Claim of {requested} exceeds maximum coverage of {max_coverage}")]
    CoverageExceeded {
        requested: Amount,
        max_coverage: Amount,
    },

    #[error("Insufficient pool funds: {available} available, {requested} requested")]
    InsufficientPoolFunds {
        requested: Amount,
        available: Amount,
    },

    #[error("Claim cooldown active: {}s remaining", remaining.num_seconds())]
    ClaimCooldownActive {
        remaining: Duration,
    },
}
