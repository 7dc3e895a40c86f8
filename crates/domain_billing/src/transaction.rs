//! Journal entry types

use serde::{Deserialize, Serialize};

use core_kernel::{Amount, CustomerId, Timestamp, TransactionId};

/// The ledger operation a journal entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Underwrite,
    PremiumPayment,
    Claim,
    Deposit,
    Refresh,
    Sweep,
}

impl TransactionKind {
    /// Human-readable label
    pub fn description(&self) -> &'static str {
        match self {
            TransactionKind::Underwrite => "Underwrite Policy",
            TransactionKind::PremiumPayment => "Pay Premium",
            TransactionKind::Claim => "Make a Claim",
            TransactionKind::Deposit => "Deposit to Pool",
            TransactionKind::Refresh => "Refresh Policy Status",
            TransactionKind::Sweep => "Expiry Sweep",
        }
    }
}

/// How an attempted operation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransactionOutcome {
    /// Committed to the ledger
    Success,
    /// Refused by the ledger; state unchanged
    Rejected {
        reason: String,
        message: String,
    },
    /// Claim committed to the ledger but the outbound transfer failed
    PayoutFailed {
        message: String,
    },
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionOutcome::Success)
    }
}

/// One line of the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Who invoked the operation, if known
    pub actor: Option<CustomerId>,
    /// Whose policy the operation targeted, if any
    pub customer: Option<CustomerId>,
    pub amount: Option<Amount>,
    pub outcome: TransactionOutcome,
    pub recorded_at: Timestamp,
}

impl JournalEntry {
    /// Creates an entry with the given outcome
    pub fn new(kind: TransactionKind, outcome: TransactionOutcome, recorded_at: Timestamp) -> Self {
        Self {
            id: TransactionId::new_v7(),
            kind,
            actor: None,
            customer: None,
            amount: None,
            outcome,
            recorded_at,
        }
    }

    /// Creates a successful entry
    pub fn success(kind: TransactionKind, recorded_at: Timestamp) -> Self {
        Self::new(kind, TransactionOutcome::Success, recorded_at)
    }

    /// Creates a rejected entry
    pub fn rejected(
        kind: TransactionKind,
        reason: impl Into<String>,
        message: impl Into<String>,
        recorded_at: Timestamp,
    ) -> Self {
        Self::new(
            kind,
            TransactionOutcome::Rejected {
                reason: reason.into(),
                message: message.into(),
            },
            recorded_at,
        )
    }

    /// Sets the invoking customer
    pub fn by(mut self, actor: CustomerId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Sets the targeted customer
    pub fn for_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Sets the amount moved or offered
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Returns true if `customer` invoked or was targeted by this entry
    pub fn involves(&self, customer: CustomerId) -> bool {
        self.actor == Some(customer) || self.customer == Some(customer)
    }
}
