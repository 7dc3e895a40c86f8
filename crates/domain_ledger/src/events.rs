//! Domain events emitted by the ledger
//!
//! Events are buffered inside the ledger as operations commit and drained by
//! the owner with `PolicyLedger::take_events`. A rejected operation emits
//! nothing.

use serde::{Deserialize, Serialize};

use core_kernel::{Amount, ClaimId, CustomerId, Timestamp};

/// Significant state changes of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// Coverage established, renewed, or restored after a lapse
    Underwritten {
        customer: CustomerId,
        payment: Amount,
        reactivated: bool,
        timestamp: Timestamp,
    },

    /// Recurring premium accepted
    PremiumPaid {
        customer: CustomerId,
        payment: Amount,
        timestamp: Timestamp,
    },

    /// Claim approved and debited from the pool
    ClaimPaid {
        customer: CustomerId,
        claim_id: ClaimId,
        amount: Amount,
        timestamp: Timestamp,
    },

    /// Premium raised after a paid claim
    PremiumRepriced {
        customer: CustomerId,
        previous: Amount,
        current: Amount,
        num_claims: u32,
        timestamp: Timestamp,
    },

    /// Lapse committed as a permanent ban
    PolicyBanned {
        customer: CustomerId,
        last_payment: Option<Timestamp>,
        timestamp: Timestamp,
    },

    /// Third-party funding received
    FundsDeposited {
        amount: Amount,
        balance: Amount,
    },
}

impl LedgerEvent {
    /// Returns the customer the event concerns, if any
    pub fn customer(&self) -> Option<CustomerId> {
        match self {
            LedgerEvent::Underwritten { customer, .. } => Some(*customer),
            LedgerEvent::PremiumPaid { customer, .. } => Some(*customer),
            LedgerEvent::ClaimPaid { customer, .. } => Some(*customer),
            LedgerEvent::PremiumRepriced { customer, .. } => Some(*customer),
            LedgerEvent::PolicyBanned { customer, .. } => Some(*customer),
            LedgerEvent::FundsDeposited { .. } => None,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::Underwritten { .. } => "Underwritten",
            LedgerEvent::PremiumPaid { .. } => "PremiumPaid",
            LedgerEvent::ClaimPaid { .. } => "ClaimPaid",
            LedgerEvent::PremiumRepriced { .. } => "PremiumRepriced",
            LedgerEvent::PolicyBanned { .. } => "PolicyBanned",
            LedgerEvent::FundsDeposited { .. } => "FundsDeposited",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = LedgerEvent::FundsDeposited {
            amount: Amount::new(5),
            balance: Amount::new(15),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "FundsDeposited");
        assert_eq!(event.event_type(), "FundsDeposited");
        assert_eq!(event.customer(), None);
    }
}
