//! Billing Domain - Transaction Journal
//!
//! An append-only record of every operation attempted against the ledger,
//! successful or not. The journal is an audit trail: it never feeds back
//! into policy or pool state.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{TransactionJournal, JournalEntry, TransactionKind};
//!
//! let mut journal = TransactionJournal::new();
//! journal.append(
//!     JournalEntry::success(TransactionKind::Underwrite, now)
//!         .by(customer)
//!         .for_customer(customer)
//!         .with_amount(premium),
//! );
//! ```

pub mod journal;
pub mod transaction;

pub use journal::TransactionJournal;
pub use transaction::{JournalEntry, TransactionKind, TransactionOutcome};
