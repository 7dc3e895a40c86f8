//! Claim eligibility
//!
//! All four conditions must hold, and they are checked in a fixed order so
//! the rejection a caller sees is deterministic:
//!
//! 1. the claimant is insured right now (active, unbanned, within grace)
//! 2. the amount does not exceed the coverage ceiling
//! 3. the pool can pay it
//! 4. the cooldown since the claimant's last paid claim has passed

use chrono::Duration;
use tracing::debug;

use core_kernel::{elapsed_between, Amount};
use domain_policy::PolicyRecord;

use crate::claim::{ClaimRequest, ClaimTerms};
use crate::error::ClaimError;

/// A claim that passed every eligibility check
///
/// Only `adjudicate` constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedClaim {
    request: ClaimRequest,
}

impl ApprovedClaim {
    pub fn request(&self) -> &ClaimRequest {
        &self.request
    }

    pub fn amount(&self) -> Amount {
        self.request.amount
    }
}

/// Evaluates a claim against the claimant's record and the pool balance
///
/// `record` is `None` when the claimant was never underwritten.
///
/// # Errors
///
/// Returns the first failing condition as a `ClaimError`
pub fn adjudicate(
    request: ClaimRequest,
    record: Option<&PolicyRecord>,
    pool_balance: Amount,
    grace_period: Duration,
    terms: &ClaimTerms,
) -> Result<ApprovedClaim, ClaimError> {
    let now = request.requested_at;

    let record = match record {
        Some(record) if record.is_insured(now, grace_period) => record,
        _ => {
            return Err(ClaimError::NotInsured {
                customer: request.claimant,
            })
        }
    };

    if request.amount.is_zero() {
        return Err(ClaimError::ZeroAmount);
    }

    if request.amount > terms.max_coverage {
        return Err(ClaimError::CoverageExceeded {
            requested: request.amount,
            max_coverage: terms.max_coverage,
        });
    }

    if request.amount > pool_balance {
        return Err(ClaimError::InsufficientPoolFunds {
            requested: request.amount,
            available: pool_balance,
        });
    }

    if let Some(last_claim) = record.last_claim_time() {
        let since = elapsed_between(last_claim, now);
        if since < terms.cooldown {
            return Err(ClaimError::ClaimCooldownActive {
                remaining: terms.cooldown - since,
            });
        }
    }

    debug!(
        claim_id = %request.claim_id,
        claimant = %request.claimant,
        amount = %request.amount,
        "claim approved"
    );
    Ok(ApprovedClaim { request })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_kernel::{CustomerId, Timestamp};
    use domain_policy::PolicyTerms;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn insured() -> (PolicyTerms, PolicyRecord) {
        let terms = PolicyTerms::default();
        let mut record = PolicyRecord::new(CustomerId::new(), &terms);
        record.underwrite(terms.base_premium, t0()).unwrap();
        (terms, record)
    }

    #[test]
    fn test_approves_eligible_claim() {
        let (terms, record) = insured();
        let request = ClaimRequest::new(record.customer(), Amount::from_coins(1), t0());
        let approved = adjudicate(
            request.clone(),
            Some(&record),
            Amount::from_coins(2),
            terms.grace_period,
            &ClaimTerms::default(),
        )
        .unwrap();
        assert_eq!(approved.request(), &request);
    }

    #[test]
    fn test_unknown_claimant_not_insured() {
        let customer = CustomerId::new();
        let result = adjudicate(
            ClaimRequest::new(customer, Amount::new(1), t0()),
            None,
            Amount::from_coins(100),
            Duration::days(30),
            &ClaimTerms::default(),
        );
        assert_eq!(result, Err(ClaimError::NotInsured { customer }));
    }

    #[test]
    fn test_not_insured_checked_before_coverage() {
        let (terms, record) = insured();
        let late = t0() + Duration::days(31);
        let result = adjudicate(
            ClaimRequest::new(record.customer(), Amount::from_coins(6), late),
            Some(&record),
            Amount::from_coins(100),
            terms.grace_period,
            &ClaimTerms::default(),
        );
        assert!(matches!(result, Err(ClaimError::NotInsured { .. })));
    }

    #[test]
    fn test_coverage_checked_before_pool_funds() {
        let (terms, record) = insured();
        let result = adjudicate(
            ClaimRequest::new(record.customer(), Amount::from_coins(6), t0()),
            Some(&record),
            Amount::ZERO,
            terms.grace_period,
            &ClaimTerms::default(),
        );
        assert_eq!(
            result,
            Err(ClaimError::CoverageExceeded {
                requested: Amount::from_coins(6),
                max_coverage: Amount::from_coins(5),
            })
        );
    }

    #[test]
    fn test_cooldown_reports_remaining_time() {
        let (terms, mut record) = insured();
        record.record_claim(t0(), &terms).unwrap();
        let result = adjudicate(
            ClaimRequest::new(record.customer(), Amount::new(1), t0() + Duration::hours(1)),
            Some(&record),
            Amount::from_coins(100),
            terms.grace_period,
            &ClaimTerms::default(),
        );
        assert_eq!(
            result,
            Err(ClaimError::ClaimCooldownActive {
                remaining: Duration::hours(23)
            })
        );
    }

    #[test]
    fn test_cooldown_boundary_allows_claim() {
        let (terms, mut record) = insured();
        record.record_claim(t0(), &terms).unwrap();
        let result = adjudicate(
            ClaimRequest::new(record.customer(), Amount::new(1), t0() + Duration::days(1)),
            Some(&record),
            Amount::from_coins(100),
            terms.grace_period,
            &ClaimTerms::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_amount_refused() {
        let (terms, record) = insured();
        let result = adjudicate(
            ClaimRequest::new(record.customer(), Amount::ZERO, t0()),
            Some(&record),
            Amount::from_coins(1),
            terms.grace_period,
            &ClaimTerms::default(),
        );
        assert_eq!(result, Err(ClaimError::ZeroAmount));
    }
}
