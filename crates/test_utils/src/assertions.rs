//! Custom Test Assertions
//!
//! Assertion helpers for ledger outcomes that print the rejection kind and
//! the surrounding state on failure.

use std::fmt::Debug;

use core_kernel::{Amount, CustomerId, Timestamp};
use domain_ledger::{LedgerError, PolicyLedger, RejectionKind};

/// Asserts that `result` is a rejection of the given kind
///
/// # Panics
///
/// Panics if `result` is `Ok` or a rejection of another kind
pub fn assert_rejected_with<T: Debug>(result: &Result<T, LedgerError>, expected: RejectionKind) {
    match result {
        Ok(value) => panic!("Expected rejection {}, got success: {:?}", expected, value),
        Err(err) => assert_eq!(
            err.kind(),
            expected,
            "Expected rejection {}, got {} ({})",
            expected,
            err.kind(),
            err
        ),
    }
}

/// Asserts that `customer` is covered at `now`
pub fn assert_insured(ledger: &PolicyLedger, customer: CustomerId, now: Timestamp) {
    assert!(
        ledger.is_insured(customer, now),
        "Expected {} to be insured at {}, status {:?}",
        customer,
        now,
        ledger.coverage_status(customer, now)
    );
}

/// Asserts that `customer` is not covered at `now`
pub fn assert_not_insured(ledger: &PolicyLedger, customer: CustomerId, now: Timestamp) {
    assert!(
        !ledger.is_insured(customer, now),
        "Expected {} to be uninsured at {}, status {:?}",
        customer,
        now,
        ledger.coverage_status(customer, now)
    );
}

/// Asserts the pool holds exactly `expected`
pub fn assert_pool_balance(ledger: &PolicyLedger, expected: Amount) {
    assert_eq!(
        ledger.pool_balance(),
        expected,
        "Pool balance mismatch: actual={}, expected={}",
        ledger.pool_balance(),
        expected
    );
}

/// Asserts the pool summary is internally consistent
///
/// Balance must equal everything paid in minus everything paid out.
pub fn assert_pool_consistent(ledger: &PolicyLedger) {
    let summary = ledger.pool_summary();
    let paid_in = summary.total_underwriting.units()
        + summary.total_premiums.units()
        + summary.total_deposits.units();
    assert_eq!(
        summary.total_balance.units() + summary.total_claims_paid.units(),
        paid_in,
        "Pool summary inconsistent: {:?}",
        summary
    );
}
