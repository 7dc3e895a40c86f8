//! Claims Domain
//!
//! Decides whether a customer's claim against the pool may be paid, and
//! describes the payout once it is.
//!
//! # Claim Evaluation
//!
//! ```text
//! request ─▶ insured? ─▶ ≤ max coverage? ─▶ ≤ pool balance? ─▶ cooldown over? ─▶ approved
//!              │              │                  │                  │
//!              ▼              ▼                  ▼                  ▼
//!          NotInsured  CoverageExceeded  InsufficientPoolFunds  ClaimCooldownActive
//! ```
//!
//! Adjudication is pure: it reads the policy record and pool balance and
//! returns a verdict. Applying an approved claim is the ledger's job.

pub mod claim;
pub mod adjudication;
pub mod payment;
pub mod error;

pub use claim::{ClaimRequest, ClaimTerms};
pub use adjudication::{adjudicate, ApprovedClaim};
pub use payment::ClaimPayout;
pub use error::ClaimError;
