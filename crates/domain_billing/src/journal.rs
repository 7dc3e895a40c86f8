//! Append-only transaction journal
//!
//! # Invariants
//!
//! - Entries are never modified or removed
//! - Entries appear in the order they were appended

use core_kernel::{CustomerId, TransactionId};

use crate::transaction::{JournalEntry, TransactionKind, TransactionOutcome};

/// The journal of attempted ledger operations
#[derive(Debug, Default, Clone)]
pub struct TransactionJournal {
    entries: Vec<JournalEntry>,
}

impl TransactionJournal {
    /// Creates an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its id
    pub fn append(&mut self, entry: JournalEntry) -> TransactionId {
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries invoked by or targeting `customer`, oldest first
    pub fn for_customer(&self, customer: CustomerId) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.involves(customer))
            .collect()
    }

    /// Entries of one kind, oldest first
    pub fn of_kind(&self, kind: TransactionKind) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// Looks up an entry by id
    pub fn get(&self, id: &TransactionId) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Number of entries that were refused
    pub fn rejected_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, TransactionOutcome::Rejected { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
