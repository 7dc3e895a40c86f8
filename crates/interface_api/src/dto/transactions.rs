//! Transaction journal DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, CustomerId, TransactionId};
use domain_billing::{JournalEntry, TransactionKind, TransactionOutcome};

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub customer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub description: String,
    pub actor: Option<CustomerId>,
    pub customer: Option<CustomerId>,
    #[serde(with = "super::amount::option", default)]
    pub amount: Option<Amount>,
    pub outcome: TransactionOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl From<JournalEntry> for TransactionResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            description: entry.kind.description().to_string(),
            actor: entry.actor,
            customer: entry.customer,
            amount: entry.amount,
            outcome: entry.outcome,
            recorded_at: entry.recorded_at,
        }
    }
}
