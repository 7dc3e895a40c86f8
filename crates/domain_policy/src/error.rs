//! Policy domain errors
//!
//! Each rejection tells the caller what to do next: pay more, underwrite
//! again, or stop trying because the customer is banned.

use thiserror::Error;

use core_kernel::{Amount, CustomerId, MoneyError, Timestamp};

/// Errors that can occur in the policy domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Payment is below the premium in effect for the customer
    #[error("Insufficient payment: {offered} offered, {required} required")]
    InsufficientPayment {
        required: Amount,
        offered: Amount,
    },

    /// The customer has been permanently disqualified
    #[error("Customer {customer} is banned from underwriting")]
    AlreadyBanned {
        customer: CustomerId,
    },

    /// The grace period has elapsed; the customer must underwrite again
    #[error("Policy for {customer} lapsed (last payment {last_payment}); underwrite again")]
    PolicyLapsed {
        customer: CustomerId,
        last_payment: Timestamp,
    },

    /// Premium payment attempted on someone else's policy
    #[error("Caller {caller} may not pay premium for {customer}")]
    Unauthorized {
        caller: CustomerId,
        customer: CustomerId,
    },

    /// No policy has ever been underwritten for the customer
    #[error("No policy exists for {customer}")]
    NoPolicy {
        customer: CustomerId,
    },

    /// Amount arithmetic failed
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] MoneyError),
}
