//! Claim requests and the terms they are judged against

use chrono::Duration;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::duration_secs;
use core_kernel::{Amount, ClaimId, CoreError, CustomerId, TemporalError, Timestamp};

/// Maximum coverage of 5 coins per claim
pub const DEFAULT_MAX_COVERAGE: Amount = Amount::new(5_000_000_000_000_000_000);

/// One day between approved claims
pub const DEFAULT_CLAIM_COOLDOWN_SECS: i64 = 86_400;

/// System-wide claim limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTerms {
    /// Largest amount a single claim may request
    pub max_coverage: Amount,
    /// Minimum time between two approved claims of one customer
    #[serde(with = "duration_secs")]
    pub cooldown: Duration,
}

impl ClaimTerms {
    /// Validates the terms
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_coverage.is_zero() {
            return Err(CoreError::configuration("max coverage must be positive"));
        }
        TemporalError::ensure_positive("claim_cooldown", self.cooldown)?;
        Ok(())
    }
}

impl Default for ClaimTerms {
    fn default() -> Self {
        Self {
            max_coverage: DEFAULT_MAX_COVERAGE,
            cooldown: Duration::seconds(DEFAULT_CLAIM_COOLDOWN_SECS),
        }
    }
}

/// A customer's request to be paid from the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub claim_id: ClaimId,
    pub claimant: CustomerId,
    pub amount: Amount,
    pub requested_at: Timestamp,
}

impl ClaimRequest {
    /// Creates a request with a fresh time-ordered id
    pub fn new(claimant: CustomerId, amount: Amount, requested_at: Timestamp) -> Self {
        Self {
            claim_id: ClaimId::new_v7(),
            claimant,
            amount,
            requested_at,
        }
    }
}
