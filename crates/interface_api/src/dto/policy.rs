//! Policy DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, CustomerId};
use domain_ledger::CoverageStatus;
use domain_policy::{PolicyRecord, PolicyStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct UnderwriteRequest {
    #[serde(with = "super::amount")]
    pub payment: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PremiumRequest {
    #[serde(with = "super::amount")]
    pub payment: Amount,
}

/// A policy record together with its time-dependent status
#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub customer: CustomerId,
    pub status: PolicyStatus,
    pub insured: bool,
    pub banned: bool,
    #[serde(with = "super::amount")]
    pub base_premium_paid: Amount,
    #[serde(with = "super::amount")]
    pub current_premium: Amount,
    pub num_claims: u32,
    pub last_payment_time: Option<DateTime<Utc>>,
    pub last_claim_time: Option<DateTime<Utc>>,
    pub remaining_payment_window_secs: i64,
    pub remaining_claim_cooldown_secs: i64,
}

impl PolicyResponse {
    pub fn new(record: &PolicyRecord, status: &CoverageStatus) -> Self {
        Self {
            customer: record.customer(),
            status: status.state,
            insured: status.is_insured(),
            banned: record.banned(),
            base_premium_paid: record.base_premium_paid(),
            current_premium: record.current_premium(),
            num_claims: record.num_claims(),
            last_payment_time: record.last_payment_time(),
            last_claim_time: record.last_claim_time(),
            remaining_payment_window_secs: status.remaining_payment_window.num_seconds(),
            remaining_claim_cooldown_secs: status.remaining_claim_cooldown.num_seconds(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PremiumResponse {
    pub customer: CustomerId,
    #[serde(with = "super::amount")]
    pub premium: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsuredResponse {
    pub customer: CustomerId,
    pub insured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub customer: CustomerId,
    /// True when this refresh banned the customer
    pub banned: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResponse {
    pub banned: Vec<CustomerId>,
}
