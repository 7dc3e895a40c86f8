//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, ClaimId, CustomerId, TransactionId};
use domain_ledger::ClaimSettlement;

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimRequest {
    #[serde(with = "super::amount")]
    pub amount: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub claim_id: ClaimId,
    pub transaction_id: TransactionId,
    pub payee: CustomerId,
    #[serde(with = "super::amount")]
    pub amount: Amount,
    pub paid_at: DateTime<Utc>,
    pub claim_number: u32,
    #[serde(with = "super::amount")]
    pub premium_before: Amount,
    #[serde(with = "super::amount")]
    pub premium_after: Amount,
    /// False when the transfer failed after the claim was committed
    pub disbursed: bool,
}

impl From<ClaimSettlement> for ClaimResponse {
    fn from(settlement: ClaimSettlement) -> Self {
        let payout = settlement.payout;
        Self {
            claim_id: payout.claim_id,
            transaction_id: settlement.transaction_id,
            payee: payout.payee,
            amount: payout.amount,
            paid_at: payout.paid_at,
            claim_number: payout.claim_number,
            premium_before: payout.premium_before,
            premium_after: payout.premium_after,
            disbursed: settlement.disbursed,
        }
    }
}
