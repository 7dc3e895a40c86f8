//! Ledger rejections
//!
//! Each domain crate reports failures in its own terms. `LedgerError` wraps
//! them, and `RejectionKind` flattens the result into the taxonomy callers
//! act on: pay more, underwrite again, wait, or give up.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::MoneyError;
use domain_claims::ClaimError;
use domain_fund::FundError;
use domain_policy::PolicyError;

/// Errors returned by ledger operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Fund(#[from] FundError),

    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Caller-visible category of a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InsufficientPayment,
    AlreadyBanned,
    PolicyLapsed,
    Unauthorized,
    CoverageExceeded,
    InsufficientPoolFunds,
    ClaimCooldownActive,
    NotInsured,
    InvalidAmount,
    Arithmetic,
}

impl RejectionKind {
    /// Stable snake_case code
    pub fn code(&self) -> &'static str {
        match self {
            RejectionKind::InsufficientPayment => "insufficient_payment",
            RejectionKind::AlreadyBanned => "already_banned",
            RejectionKind::PolicyLapsed => "policy_lapsed",
            RejectionKind::Unauthorized => "unauthorized",
            RejectionKind::CoverageExceeded => "coverage_exceeded",
            RejectionKind::InsufficientPoolFunds => "insufficient_pool_funds",
            RejectionKind::ClaimCooldownActive => "claim_cooldown_active",
            RejectionKind::NotInsured => "not_insured",
            RejectionKind::InvalidAmount => "invalid_amount",
            RejectionKind::Arithmetic => "arithmetic",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl LedgerError {
    /// Flattens the error into its rejection kind
    pub fn kind(&self) -> RejectionKind {
        match self {
            LedgerError::Policy(err) => match err {
                PolicyError::InsufficientPayment { .. } => RejectionKind::InsufficientPayment,
                PolicyError::AlreadyBanned { .. } => RejectionKind::AlreadyBanned,
                PolicyError::PolicyLapsed { .. } => RejectionKind::PolicyLapsed,
                PolicyError::Unauthorized { .. } => RejectionKind::Unauthorized,
                PolicyError::NoPolicy { .. } => RejectionKind::NotInsured,
                PolicyError::Arithmetic(_) => RejectionKind::Arithmetic,
            },
            LedgerError::Claim(err) => match err {
                ClaimError::NotInsured { .. } => RejectionKind::NotInsured,
                ClaimError::ZeroAmount => RejectionKind::InvalidAmount,
                ClaimError::CoverageExceeded { .. } => RejectionKind::CoverageExceeded,
                ClaimError::InsufficientPoolFunds { .. } => RejectionKind::InsufficientPoolFunds,
                ClaimError::ClaimCooldownActive { .. } => RejectionKind::ClaimCooldownActive,
            },
            LedgerError::Fund(err) => match err {
                FundError::InsufficientFunds { .. } => RejectionKind::InsufficientPoolFunds,
                FundError::Calculation(_) => RejectionKind::Arithmetic,
            },
            LedgerError::Money(_) => RejectionKind::Arithmetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core_kernel::{Amount, CustomerId};

    #[test]
    fn test_no_policy_reads_as_not_insured() {
        let err: LedgerError = PolicyError::NoPolicy {
            customer: CustomerId::new(),
        }
        .into();
        assert_eq!(err.kind(), RejectionKind::NotInsured);
    }

    #[test]
    fn test_pool_shortfall_from_either_domain() {
        let from_claims: LedgerError = ClaimError::InsufficientPoolFunds {
            requested: Amount::new(2),
            available: Amount::new(1),
        }
        .into();
        let from_fund: LedgerError = FundError::InsufficientFunds {
            available: Amount::new(1),
            requested: Amount::new(2),
        }
        .into();
        assert_eq!(from_claims.kind(), from_fund.kind());
    }

    #[test]
    fn test_message_passes_through() {
        let err: LedgerError = ClaimError::ClaimCooldownActive {
            remaining: Duration::hours(3),
        }
        .into();
        assert_eq!(err.kind().code(), "claim_cooldown_active");
        assert!(err.to_string().contains("10800s"));
    }
}
