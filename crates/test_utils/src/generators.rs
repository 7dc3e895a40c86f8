//! Property-Based Test Generators
//!
//! Proptest strategies producing random operation sequences against a small
//! fixed set of customers, plus a driver that applies them to a ledger.

use chrono::Duration;
use proptest::prelude::*;

use core_kernel::money::UNITS_PER_COIN;
use core_kernel::{Amount, CustomerId, Timestamp};
use domain_ledger::{LedgerError, PolicyLedger};

/// Number of distinct customers an operation sequence refers to
pub const CUSTOMER_POOL: usize = 4;

/// One ledger operation, with customers referred to by index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOperation {
    Underwrite { customer: usize, payment: Amount },
    PayPremium { customer: usize, caller: usize, payment: Amount },
    Claim { customer: usize, amount: Amount },
    Update { customer: usize },
    Deposit { amount: Amount },
    Advance { seconds: i64 },
}

/// Strategy for payments around the base premium (0.05 to 0.3 coin)
pub fn payment_strategy() -> impl Strategy<Value = Amount> {
    (UNITS_PER_COIN / 20..UNITS_PER_COIN * 3 / 10).prop_map(Amount::new)
}

/// Strategy for claim amounts on both sides of the coverage ceiling
pub fn claim_amount_strategy() -> impl Strategy<Value = Amount> {
    prop_oneof![
        Just(Amount::ZERO),
        (1u128..UNITS_PER_COIN * 6).prop_map(Amount::new),
    ]
}

/// Strategy for clock advances from a minute to forty days
pub fn advance_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        60i64..3_600,
        3_600i64..172_800,
        172_800i64..3_456_000,
    ]
}

fn customer_index() -> impl Strategy<Value = usize> {
    0..CUSTOMER_POOL
}

/// Strategy for a single operation
pub fn operation_strategy() -> impl Strategy<Value = LedgerOperation> {
    prop_oneof![
        3 => (customer_index(), payment_strategy())
            .prop_map(|(customer, payment)| LedgerOperation::Underwrite { customer, payment }),
        3 => (customer_index(), customer_index(), payment_strategy())
            .prop_map(|(customer, caller, payment)| LedgerOperation::PayPremium {
                customer,
                caller,
                payment,
            }),
        3 => (customer_index(), claim_amount_strategy())
            .prop_map(|(customer, amount)| LedgerOperation::Claim { customer, amount }),
        1 => customer_index().prop_map(|customer| LedgerOperation::Update { customer }),
        2 => (0u128..UNITS_PER_COIN * 4)
            .prop_map(|units| LedgerOperation::Deposit { amount: Amount::new(units) }),
        2 => advance_strategy().prop_map(|seconds| LedgerOperation::Advance { seconds }),
    ]
}

/// Strategy for a sequence of up to `max_len` operations
pub fn operation_sequence(max_len: usize) -> impl Strategy<Value = Vec<LedgerOperation>> {
    prop::collection::vec(operation_strategy(), 0..max_len)
}

/// Fixed customers that operation indices resolve to
pub fn customer_pool() -> Vec<CustomerId> {
    (0..CUSTOMER_POOL).map(|_| CustomerId::new()).collect()
}

/// Applies `op` to `ledger`, moving `now` forward for `Advance`
///
/// Returns `None` for `Advance`, otherwise whether the operation committed.
pub fn apply_operation(
    ledger: &mut PolicyLedger,
    customers: &[CustomerId],
    now: &mut Timestamp,
    op: &LedgerOperation,
) -> Option<Result<(), LedgerError>> {
    let result = match op {
        LedgerOperation::Underwrite { customer, payment } => ledger
            .underwrite(customers[*customer], *payment, *now)
            .map(|_| ()),
        LedgerOperation::PayPremium {
            customer,
            caller,
            payment,
        } => ledger
            .pay_premium_for(customers[*customer], customers[*caller], *payment, *now)
            .map(|_| ()),
        LedgerOperation::Claim { customer, amount } => ledger
            .claim(customers[*customer], *amount, *now)
            .map(|_| ()),
        LedgerOperation::Update { customer } => {
            ledger.update(customers[*customer], *now);
            Ok(())
        }
        LedgerOperation::Deposit { amount } => ledger.deposit(*amount).map(|_| ()),
        LedgerOperation::Advance { seconds } => {
            *now += Duration::seconds(*seconds);
            return None;
        }
    };
    Some(result)
}
