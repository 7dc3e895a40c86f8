//! Claim payouts

use serde::{Deserialize, Serialize};

use core_kernel::{Amount, ClaimId, CustomerId, PayoutInstruction, Timestamp};

use crate::adjudication::ApprovedClaim;

/// A committed claim payout
///
/// Produced once the ledger has applied an approved claim. Carries the
/// repricing it caused so callers can show the new premium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPayout {
    pub claim_id: ClaimId,
    pub payee: CustomerId,
    pub amount: Amount,
    pub paid_at: Timestamp,
    pub claim_number: u32,
    pub premium_before: Amount,
    pub premium_after: Amount,
}

impl ClaimPayout {
    /// Builds the payout for an approved claim
    pub fn from_approved(
        approved: &ApprovedClaim,
        claim_number: u32,
        premium_before: Amount,
        premium_after: Amount,
    ) -> Self {
        let request = approved.request();
        Self {
            claim_id: request.claim_id,
            payee: request.claimant,
            amount: request.amount,
            paid_at: request.requested_at,
            claim_number,
            premium_before,
            premium_after,
        }
    }

    /// Instruction for the outbound transfer
    pub fn instruction(&self) -> PayoutInstruction {
        PayoutInstruction {
            claim_id: self.claim_id,
            payee: self.payee,
            amount: self.amount,
            approved_at: self.paid_at,
        }
    }
}
