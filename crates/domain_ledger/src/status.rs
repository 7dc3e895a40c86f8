//! Coverage status snapshot

use chrono::Duration;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::duration_secs;
use core_kernel::{Amount, CustomerId};
use domain_policy::PolicyStatus;

/// A customer's coverage as seen at one instant
///
/// Countdowns are zero when they do not apply: an uninsured, lapsed or
/// banned customer has no payment window left, and a customer with no
/// recent claim has no cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStatus {
    pub customer: CustomerId,
    pub state: PolicyStatus,
    #[serde(with = "duration_secs")]
    pub remaining_payment_window: Duration,
    #[serde(with = "duration_secs")]
    pub remaining_claim_cooldown: Duration,
    pub current_premium: Amount,
    pub num_claims: u32,
}

impl CoverageStatus {
    pub fn is_insured(&self) -> bool {
        self.state == PolicyStatus::Active
    }
}
