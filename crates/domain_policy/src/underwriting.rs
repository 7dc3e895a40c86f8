//! Underwriting and premium payment preconditions
//!
//! Pay and underwrite are deliberately separate paths. A lapsed policy can
//! only come back through underwriting, which re-checks the ban flag; a late
//! premium payment is refused rather than silently resurrecting coverage.

use chrono::Duration;
use tracing::debug;

use core_kernel::{Amount, CustomerId, Timestamp};

use crate::error::PolicyError;
use crate::policy::PolicyRecord;

/// Checks whether `record` may be underwritten with `payment`
///
/// The ban flag is read as stored. A policy that has lapsed but has not yet
/// been refreshed is still eligible to underwrite again.
///
/// # Errors
///
/// - `AlreadyBanned` if the customer is banned
/// - `InsufficientPayment` if `payment` is below the current premium
pub fn check_underwriting(record: &PolicyRecord, payment: Amount) -> Result<(), PolicyError> {
    if record.banned() {
        return Err(PolicyError::AlreadyBanned {
            customer: record.customer(),
        });
    }
    ensure_sufficient(record, payment)
}

/// Checks whether `caller` may pay `payment` towards `record` at `now`
///
/// Authorization is checked first, so a payment for someone else is refused
/// regardless of amount or policy state.
///
/// # Errors
///
/// - `Unauthorized` if `caller` is not the record's customer
/// - `AlreadyBanned` if the customer is banned
/// - `NoPolicy` if the customer was never underwritten
/// - `PolicyLapsed` if the grace period has elapsed or the policy was deactivated
/// - `InsufficientPayment` if `payment` is below the current premium
pub fn check_premium_payment(
    record: &PolicyRecord,
    caller: CustomerId,
    payment: Amount,
    now: Timestamp,
    grace_period: Duration,
) -> Result<(), PolicyError> {
    let customer = record.customer();
    if caller != customer {
        return Err(PolicyError::Unauthorized { caller, customer });
    }
    if record.banned() {
        return Err(PolicyError::AlreadyBanned { customer });
    }
    let last_payment = record
        .last_payment_time()
        .ok_or(PolicyError::NoPolicy { customer })?;
    if !record.is_insured(now, grace_period) {
        debug!(%customer, %last_payment, %now, "premium refused on lapsed policy");
        return Err(PolicyError::PolicyLapsed {
            customer,
            last_payment,
        });
    }
    ensure_sufficient(record, payment)
}

fn ensure_sufficient(record: &PolicyRecord, payment: Amount) -> Result<(), PolicyError> {
    let required = record.current_premium();
    if payment < required {
        return Err(PolicyError::InsufficientPayment {
            required,
            offered: payment,
        });
    }
    Ok(())
}
