//! Policy Ledger
//!
//! The single state machine of the pooled insurance system: a mapping from
//! customer to policy record plus the shared risk pool. Every operation is
//! driven by a caller-supplied `now` and either commits in full or leaves
//! the ledger unchanged.
//!
//! # Layers
//!
//! - [`PolicyLedger`]: synchronous, owned state; `&mut self` for writes
//! - [`LedgerService`]: serialized async access, transaction journal,
//!   injected clock, and claim disbursement after commit
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{LedgerConfig, PolicyLedger};
//!
//! let mut ledger = PolicyLedger::new(LedgerConfig::default())?;
//! ledger.deposit(Amount::from_coins(10))?;
//! let premium = ledger.get_premium(customer);
//! ledger.underwrite(customer, premium, now)?;
//! let payout = ledger.claim(customer, Amount::from_coins(1), now)?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod status;
pub mod ledger;
pub mod payout;
pub mod service;

pub use config::LedgerConfig;
pub use error::{LedgerError, RejectionKind};
pub use events::LedgerEvent;
pub use status::CoverageStatus;
pub use ledger::PolicyLedger;
pub use payout::{LoggingPayout, RecordingPayout};
pub use service::{ClaimSettlement, LedgerService, LedgerState, PolicySnapshot};
