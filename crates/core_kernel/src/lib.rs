//! Core Kernel - Foundational types for the pooled insurance ledger
//!
//! This crate provides the building blocks shared by every domain crate:
//! - `Amount`: integral smallest-unit money with checked arithmetic
//! - `Rate`: decimal rates used by premium repricing
//! - Strongly-typed identifiers
//! - Timestamp helpers over caller-supplied clocks
//! - Ports for the clock and outbound claim payouts

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Amount, Rate, MoneyError};
pub use temporal::{Timestamp, TemporalError, elapsed_between, remaining_until};
pub use identifiers::{CustomerId, ClaimId, TransactionId};
pub use ports::{Clock, SystemClock, ManualClock, PayoutPort, PayoutInstruction, PortError, DomainPort};
pub use error::CoreError;
