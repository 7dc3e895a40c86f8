//! Pool DTOs

use serde::{Deserialize, Serialize};

use core_kernel::Amount;
use domain_fund::PoolSummary;

#[derive(Debug, Serialize, Deserialize)]
pub struct DepositRequest {
    #[serde(with = "super::amount")]
    pub amount: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepositResponse {
    #[serde(with = "super::amount")]
    pub deposited: Amount,
    #[serde(with = "super::amount")]
    pub balance: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PoolResponse {
    #[serde(with = "super::amount")]
    pub total_balance: Amount,
    #[serde(with = "super::amount")]
    pub total_underwriting: Amount,
    #[serde(with = "super::amount")]
    pub total_premiums: Amount,
    #[serde(with = "super::amount")]
    pub total_deposits: Amount,
    #[serde(with = "super::amount")]
    pub total_claims_paid: Amount,
    pub claims_paid_count: u64,
}

impl From<PoolSummary> for PoolResponse {
    fn from(summary: PoolSummary) -> Self {
        Self {
            total_balance: summary.total_balance,
            total_underwriting: summary.total_underwriting,
            total_premiums: summary.total_premiums,
            total_deposits: summary.total_deposits,
            total_claims_paid: summary.total_claims_paid,
            claims_paid_count: summary.claims_paid_count,
        }
    }
}
