//! Terms every policy in a ledger is written under

use chrono::Duration;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::duration_secs;
use core_kernel::{Amount, CoreError, MoneyError, TemporalError};

use crate::premium::RepricingCurve;

/// Base premium of 0.1 coin
pub const DEFAULT_BASE_PREMIUM: Amount = Amount::new(100_000_000_000_000_000);

/// Grace period of 30 days between premium payments
pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 30;

/// Premium and lapse parameters shared by all policies of a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTerms {
    /// Premium owed by a customer with no paid claims
    pub base_premium: Amount,
    /// Longest allowed gap between accepted payments
    #[serde(with = "duration_secs")]
    pub grace_period: Duration,
    /// How the premium grows with paid claims
    #[serde(default)]
    pub repricing: RepricingCurve,
}

impl PolicyTerms {
    /// Premium owed after `num_claims` paid claims
    pub fn premium_for(&self, num_claims: u32) -> Result<Amount, MoneyError> {
        self.repricing.premium_for(self.base_premium, num_claims)
    }

    /// Validates the terms
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero base premium, a non-positive
    /// grace period, or a decreasing repricing curve
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_premium.is_zero() {
            return Err(CoreError::configuration("base premium must be positive"));
        }
        TemporalError::ensure_positive("grace_period", self.grace_period)?;
        self.repricing.validate()
    }
}

impl Default for PolicyTerms {
    fn default() -> Self {
        Self {
            base_premium: DEFAULT_BASE_PREMIUM,
            grace_period: Duration::days(DEFAULT_GRACE_PERIOD_DAYS),
            repricing: RepricingCurve::default(),
        }
    }
}
