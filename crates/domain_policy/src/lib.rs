//! Policy Lifecycle Domain
//!
//! This crate holds the per-customer half of the pooled ledger: the policy
//! record, the terms every policy is written under, and the checks that
//! guard underwriting and premium payment.
//!
//! # Policy Lifecycle
//!
//! ```text
//!              underwrite                 grace elapsed
//! Uninsured ─────────────▶ Active ───────────────────────▶ Lapsed
//!                           ▲  │ pay premium / underwrite     │
//!                           │  └──────────┘                   │
//!                           └──────────── underwrite ─────────┤
//!                                                             │ update
//!                                                             ▼
//!                                                          Banned (terminal)
//! ```
//!
//! `Lapsed` is derived from timestamps on every read; only an explicit
//! refresh turns it into the stored, irreversible `banned` flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PolicyRecord, PolicyTerms};
//!
//! let terms = PolicyTerms::default();
//! let mut record = PolicyRecord::new(customer, &terms);
//! record.underwrite(terms.base_premium, now)?;
//! assert!(record.is_insured(now, terms.grace_period));
//! ```

pub mod policy;
pub mod premium;
pub mod terms;
pub mod underwriting;
pub mod error;

pub use policy::{PolicyRecord, PolicyStatus};
pub use premium::RepricingCurve;
pub use terms::PolicyTerms;
pub use error::PolicyError;
