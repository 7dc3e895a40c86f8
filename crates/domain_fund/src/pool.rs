//! The pooled balance
//!
//! Every mutation is computed as a new `RiskPool` value first and only then
//! assigned, so a failed credit or debit leaves the pool exactly as it was.
//!
//! # Invariants
//!
//! - `total_balance` is never negative (enforced by `Amount`)
//! - `total_balance == contributions - total_claims_paid`

use serde::{Deserialize, Serialize};
use tracing::trace;

use core_kernel::Amount;

use crate::error::FundError;

/// Where a contribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionSource {
    /// Up-front payment when establishing or renewing coverage
    Underwriting,
    /// Recurring premium payment
    Premium,
    /// Third-party funding or direct transfer
    Deposit,
}

/// Aggregate state of the shared fund
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPool {
    total_balance: Amount,
    total_underwriting: Amount,
    total_premiums: Amount,
    total_deposits: Amount,
    total_claims_paid: Amount,
    claims_paid_count: u64,
}

/// Read-only view of the pool for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub total_balance: Amount,
    pub total_underwriting: Amount,
    pub total_premiums: Amount,
    pub total_deposits: Amount,
    pub total_claims_paid: Amount,
    pub claims_paid_count: u64,
}

impl RiskPool {
    /// Creates an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Funds currently available to pay claims
    pub fn total_balance(&self) -> Amount {
        self.total_balance
    }

    /// Returns the pool after receiving `amount` from `source`
    ///
    /// # Errors
    ///
    /// Returns `Calculation` on overflow
    pub fn credited(&self, source: ContributionSource, amount: Amount) -> Result<RiskPool, FundError> {
        let mut next = self.clone();
        next.total_balance = self.total_balance.checked_add(amount)?;
        match source {
            ContributionSource::Underwriting => {
                next.total_underwriting = self.total_underwriting.checked_add(amount)?;
            }
            ContributionSource::Premium => {
                next.total_premiums = self.total_premiums.checked_add(amount)?;
            }
            ContributionSource::Deposit => {
                next.total_deposits = self.total_deposits.checked_add(amount)?;
            }
        }
        trace!(?source, %amount, balance = %next.total_balance, "pool credited");
        Ok(next)
    }

    /// Returns the pool after paying out `amount`
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if the balance would go negative
    pub fn debited(&self, amount: Amount) -> Result<RiskPool, FundError> {
        let total_balance = self.total_balance.checked_sub(amount).map_err(|_| {
            FundError::InsufficientFunds {
                available: self.total_balance,
                requested: amount,
            }
        })?;
        let mut next = self.clone();
        next.total_balance = total_balance;
        next.total_claims_paid = self.total_claims_paid.checked_add(amount)?;
        next.claims_paid_count = self.claims_paid_count.saturating_add(1);
        trace!(%amount, balance = %next.total_balance, "pool debited");
        Ok(next)
    }

    /// Returns a reporting snapshot
    pub fn summary(&self) -> PoolSummary {
        PoolSummary {
            total_balance: self.total_balance,
            total_underwriting: self.total_underwriting,
            total_premiums: self.total_premiums,
            total_deposits: self.total_deposits,
            total_claims_paid: self.total_claims_paid,
            claims_paid_count: self.claims_paid_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_tracks_source() {
        let pool = RiskPool::new()
            .credited(ContributionSource::Underwriting, Amount::new(100))
            .and_then(|p| p.credited(ContributionSource::Premium, Amount::new(40)))
            .and_then(|p| p.credited(ContributionSource::Deposit, Amount::new(5)))
            .unwrap();

        let summary = pool.summary();
        assert_eq!(summary.total_balance, Amount::new(145));
        assert_eq!(summary.total_underwriting, Amount::new(100));
        assert_eq!(summary.total_premiums, Amount::new(40));
        assert_eq!(summary.total_deposits, Amount::new(5));
    }

    #[test]
    fn test_debit_refuses_overdraft() {
        let pool = RiskPool::new()
            .credited(ContributionSource::Deposit, Amount::new(10))
            .unwrap();

        assert_eq!(
            pool.debited(Amount::new(11)),
            Err(FundError::InsufficientFunds {
                available: Amount::new(10),
                requested: Amount::new(11),
            })
        );
        assert_eq!(pool.total_balance(), Amount::new(10));
    }

    #[test]
    fn test_debit_exact_balance() {
        let pool = RiskPool::new()
            .credited(ContributionSource::Deposit, Amount::new(10))
            .and_then(|p| p.debited(Amount::new(10)))
            .unwrap();
        assert!(pool.total_balance().is_zero());
        assert_eq!(pool.summary().claims_paid_count, 1);
        assert_eq!(pool.summary().total_claims_paid, Amount::new(10));
    }
}
