//! The policy ledger state machine
//!
//! # Invariants
//!
//! - Every write is computed on copies of the affected record and pool and
//!   assigned only after all checks pass; a rejected operation leaves the
//!   ledger unchanged
//! - A record is inserted on the first successful underwriting and never
//!   removed
//! - The pool balance is never negative
//!
//! Lapse is detected lazily: reads re-derive coverage from timestamps, and
//! only `update` (or `sweep`) turns a lapse into a stored ban.

use std::collections::BTreeMap;

use tracing::debug;

use core_kernel::{Amount, CoreError, CustomerId, Timestamp};
use domain_claims::{adjudicate, ClaimError, ClaimPayout, ClaimRequest};
use domain_fund::{ContributionSource, PoolSummary, RiskPool};
use domain_policy::{PolicyRecord, PolicyStatus};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::status::CoverageStatus;

/// Policy records keyed by customer, plus the shared pool
#[derive(Debug, Clone)]
pub struct PolicyLedger {
    config: LedgerConfig,
    policies: BTreeMap<CustomerId, PolicyRecord>,
    pool: RiskPool,
    events: Vec<LedgerEvent>,
}

impl Default for PolicyLedger {
    fn default() -> Self {
        Self {
            config: LedgerConfig::default(),
            policies: BTreeMap::new(),
            pool: RiskPool::new(),
            events: Vec::new(),
        }
    }
}

impl PolicyLedger {
    /// Creates an empty ledger
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate
    pub fn new(config: LedgerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Establishes or renews `customer`'s coverage
    ///
    /// Returns the committed record.
    ///
    /// # Errors
    ///
    /// - `AlreadyBanned` if the customer is banned
    /// - `InsufficientPayment` if `payment` is below the customer's premium
    pub fn underwrite(
        &mut self,
        customer: CustomerId,
        payment: Amount,
        now: Timestamp,
    ) -> Result<PolicyRecord, LedgerError> {
        let grace = self.config.policy.grace_period;
        let mut record = self.record_or_default(customer);
        let reactivated = record.status(now, grace) == PolicyStatus::Lapsed;

        record.underwrite(payment, now)?;
        let pool = self.pool.credited(ContributionSource::Underwriting, payment)?;

        self.policies.insert(customer, record.clone());
        self.pool = pool;
        self.events.push(LedgerEvent::Underwritten {
            customer,
            payment,
            reactivated,
            timestamp: now,
        });
        Ok(record)
    }

    /// Accepts a recurring premium for `customer`, paid by `caller`
    ///
    /// Returns the committed record.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not `customer`
    /// - `AlreadyBanned` if the customer is banned
    /// - `NoPolicy` if the customer was never underwritten
    /// - `PolicyLapsed` if the grace period has elapsed
    /// - `InsufficientPayment` if `payment` is below the customer's premium
    pub fn pay_premium_for(
        &mut self,
        customer: CustomerId,
        caller: CustomerId,
        payment: Amount,
        now: Timestamp,
    ) -> Result<PolicyRecord, LedgerError> {
        let mut record = self.record_or_default(customer);

        record.pay_premium(caller, payment, now, self.config.policy.grace_period)?;
        let pool = self.pool.credited(ContributionSource::Premium, payment)?;

        self.policies.insert(customer, record.clone());
        self.pool = pool;
        self.events.push(LedgerEvent::PremiumPaid {
            customer,
            payment,
            timestamp: now,
        });
        Ok(record)
    }

    /// Pays `amount` from the pool to `caller` and reprices their policy
    ///
    /// The returned payout describes the transfer still to be made; the
    /// ledger itself has already been debited.
    ///
    /// # Errors
    ///
    /// - `NotInsured` if the caller is not covered at `now`
    /// - `ZeroAmount` if `amount` is zero
    /// - `CoverageExceeded` if `amount` is above the coverage ceiling
    /// - `InsufficientPoolFunds` if the pool cannot pay `amount`
    /// - `ClaimCooldownActive` if the caller's last claim is too recent
    pub fn claim(
        &mut self,
        caller: CustomerId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<ClaimPayout, LedgerError> {
        let approved = adjudicate(
            ClaimRequest::new(caller, amount, now),
            self.policies.get(&caller),
            self.pool.total_balance(),
            self.config.policy.grace_period,
            &self.config.claims,
        )?;

        let mut record = self
            .policies
            .get(&caller)
            .cloned()
            .ok_or(ClaimError::NotInsured { customer: caller })?;
        let premium_before = record.record_claim(now, &self.config.policy)?;
        let pool = self.pool.debited(approved.amount())?;

        let payout = ClaimPayout::from_approved(
            &approved,
            record.num_claims(),
            premium_before,
            record.current_premium(),
        );

        self.policies.insert(caller, record);
        self.pool = pool;
        self.events.push(LedgerEvent::ClaimPaid {
            customer: caller,
            claim_id: payout.claim_id,
            amount: payout.amount,
            timestamp: now,
        });
        if payout.premium_after > payout.premium_before {
            self.events.push(LedgerEvent::PremiumRepriced {
                customer: caller,
                previous: payout.premium_before,
                current: payout.premium_after,
                num_claims: payout.claim_number,
                timestamp: now,
            });
        }
        Ok(payout)
    }

    /// Commits a lapsed policy as banned
    ///
    /// Returns true if this call banned the customer. Unknown customers and
    /// policies still within their grace period are left alone.
    pub fn update(&mut self, customer: CustomerId, now: Timestamp) -> bool {
        let grace = self.config.policy.grace_period;
        let Some(record) = self.policies.get_mut(&customer) else {
            debug!(%customer, "refresh of unknown customer ignored");
            return false;
        };
        if !record.refresh(now, grace) {
            return false;
        }
        let last_payment = record.last_payment_time();
        self.events.push(LedgerEvent::PolicyBanned {
            customer,
            last_payment,
            timestamp: now,
        });
        true
    }

    /// Applies `update` to every known customer
    ///
    /// Returns the customers banned by this sweep in ascending id order.
    pub fn sweep(&mut self, now: Timestamp) -> Vec<CustomerId> {
        let customers: Vec<CustomerId> = self.policies.keys().copied().collect();
        customers
            .into_iter()
            .filter(|customer| self.update(*customer, now))
            .collect()
    }

    /// Adds third-party funds to the pool
    ///
    /// Returns the new pool balance.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, LedgerError> {
        let pool = self.pool.credited(ContributionSource::Deposit, amount)?;
        let balance = pool.total_balance();
        self.pool = pool;
        self.events.push(LedgerEvent::FundsDeposited { amount, balance });
        Ok(balance)
    }

    /// Returns true if `customer` is covered at `now`
    pub fn is_insured(&self, customer: CustomerId, now: Timestamp) -> bool {
        self.policies
            .get(&customer)
            .map(|record| record.is_insured(now, self.config.policy.grace_period))
            .unwrap_or(false)
    }

    /// Premium `customer` must pay next; the base premium if never underwritten
    pub fn get_premium(&self, customer: CustomerId) -> Amount {
        self.policies
            .get(&customer)
            .map(PolicyRecord::current_premium)
            .unwrap_or(self.config.policy.base_premium)
    }

    /// The stored record of `customer`, if one exists
    pub fn get_policy(&self, customer: CustomerId) -> Option<&PolicyRecord> {
        self.policies.get(&customer)
    }

    pub fn is_banned(&self, customer: CustomerId) -> bool {
        self.policies
            .get(&customer)
            .map(PolicyRecord::banned)
            .unwrap_or(false)
    }

    pub fn last_payment_time(&self, customer: CustomerId) -> Option<Timestamp> {
        self.policies
            .get(&customer)
            .and_then(PolicyRecord::last_payment_time)
    }

    pub fn last_claim_time(&self, customer: CustomerId) -> Option<Timestamp> {
        self.policies
            .get(&customer)
            .and_then(PolicyRecord::last_claim_time)
    }

    /// Derives `customer`'s coverage state and countdowns at `now`
    pub fn coverage_status(&self, customer: CustomerId, now: Timestamp) -> CoverageStatus {
        let record = self.record_or_default(customer);
        let grace = self.config.policy.grace_period;
        CoverageStatus {
            customer,
            state: record.status(now, grace),
            remaining_payment_window: record.remaining_payment_window(now, grace),
            remaining_claim_cooldown: record
                .remaining_claim_cooldown(now, self.config.claims.cooldown),
            current_premium: record.current_premium(),
            num_claims: record.num_claims(),
        }
    }

    pub fn pool_balance(&self) -> Amount {
        self.pool.total_balance()
    }

    pub fn pool_summary(&self) -> PoolSummary {
        self.pool.summary()
    }

    /// Number of customers with a record
    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    /// Drains the events buffered since the last call
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    fn record_or_default(&self, customer: CustomerId) -> PolicyRecord {
        self.policies
            .get(&customer)
            .cloned()
            .unwrap_or_else(|| PolicyRecord::new(customer, &self.config.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use domain_policy::PolicyError;

    use crate::error::RejectionKind;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn funded_ledger() -> PolicyLedger {
        let mut ledger = PolicyLedger::default();
        ledger.deposit(Amount::from_coins(20)).unwrap();
        ledger.take_events();
        ledger
    }

    fn insured(ledger: &mut PolicyLedger) -> CustomerId {
        let customer = CustomerId::new();
        let premium = ledger.get_premium(customer);
        ledger.underwrite(customer, premium, t0()).unwrap();
        customer
    }

    #[test]
    fn test_underwrite_credits_pool_and_records() {
        let mut ledger = funded_ledger();
        let customer = insured(&mut ledger);

        let base = ledger.config().policy.base_premium;
        assert!(ledger.is_insured(customer, t0()));
        assert_eq!(
            ledger.pool_balance(),
            Amount::from_coins(20).checked_add(base).unwrap()
        );
        assert_eq!(ledger.get_policy(customer).unwrap().base_premium_paid(), base);
        assert_eq!(ledger.last_payment_time(customer), Some(t0()));
        assert_eq!(ledger.policy_count(), 1);
    }

    #[test]
    fn test_rejected_underwrite_creates_no_record() {
        let mut ledger = funded_ledger();
        let customer = CustomerId::new();
        let before = ledger.pool_balance();

        let err = ledger.underwrite(customer, Amount::new(1), t0()).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InsufficientPayment);
        assert!(ledger.get_policy(customer).is_none());
        assert_eq!(ledger.pool_balance(), before);
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn test_premium_for_other_customer_unauthorized() {
        let mut ledger = funded_ledger();
        let customer = insured(&mut ledger);
        let stranger = CustomerId::new();

        let err = ledger
            .pay_premium_for(customer, stranger, Amount::from_coins(100), t0())
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::Unauthorized);

        let err = ledger
            .pay_premium_for(stranger, customer, Amount::from_coins(100), t0())
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::Unauthorized);
    }

    #[test]
    fn test_premium_without_policy_not_insured() {
        let mut ledger = funded_ledger();
        let customer = CustomerId::new();
        let err = ledger
            .pay_premium_for(customer, customer, Amount::from_coins(1), t0())
            .unwrap_err();
        assert_eq!(err, LedgerError::Policy(PolicyError::NoPolicy { customer }));
        assert_eq!(err.kind(), RejectionKind::NotInsured);
        assert!(ledger.get_policy(customer).is_none());
    }

    #[test]
    fn test_claim_debits_pool_and_reprices() {
        let mut ledger = funded_ledger();
        let customer = insured(&mut ledger);
        let balance = ledger.pool_balance();
        let premium = ledger.get_premium(customer);
        ledger.take_events();

        let payout = ledger.claim(customer, Amount::from_coins(2), t0()).unwrap();
        assert_eq!(payout.amount, Amount::from_coins(2));
        assert_eq!(payout.claim_number, 1);
        assert_eq!(
            ledger.pool_balance(),
            balance.checked_sub(Amount::from_coins(2)).unwrap()
        );
        assert!(ledger.get_premium(customer) > premium);
        assert_eq!(ledger.last_claim_time(customer), Some(t0()));

        let events = ledger.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "ClaimPaid");
        assert_eq!(events[1].event_type(), "PremiumRepriced");
    }

    #[test]
    fn test_failed_claim_leaves_ledger_unchanged() {
        let mut ledger = funded_ledger();
        let customer = insured(&mut ledger);
        ledger.claim(customer, Amount::new(10), t0()).unwrap();
        let record = ledger.get_policy(customer).cloned();
        let summary = ledger.pool_summary();

        let err = ledger
            .claim(customer, Amount::new(10), t0() + Duration::hours(2))
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::ClaimCooldownActive);
        assert_eq!(ledger.get_policy(customer).cloned(), record);
        assert_eq!(ledger.pool_summary(), summary);
    }

    #[test]
    fn test_claim_exceeding_pool_refused() {
        let mut ledger = PolicyLedger::default();
        let customer = insured(&mut ledger);
        let err = ledger.claim(customer, Amount::from_coins(1), t0()).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InsufficientPoolFunds);
    }

    #[test]
    fn test_update_bans_only_after_lapse() {
        let mut ledger = funded_ledger();
        let customer = insured(&mut ledger);

        assert!(!ledger.update(customer, t0() + Duration::days(30)));
        assert!(!ledger.is_banned(customer));

        assert!(ledger.update(customer, t0() + Duration::days(31)));
        assert!(ledger.is_banned(customer));
        assert!(!ledger.update(customer, t0() + Duration::days(32)));
        assert!(!ledger.update(CustomerId::new(), t0()));
    }

    #[test]
    fn test_lapsed_but_unrefreshed_may_underwrite_again() {
        let mut ledger = funded_ledger();
        let customer = insured(&mut ledger);
        let later = t0() + Duration::days(45);
        ledger.take_events();

        assert_eq!(
            ledger.coverage_status(customer, later).state,
            PolicyStatus::Lapsed
        );
        let premium = ledger.get_premium(customer);
        ledger.underwrite(customer, premium, later).unwrap();
        assert!(ledger.is_insured(customer, later));
        assert!(matches!(
            ledger.take_events().as_slice(),
            [LedgerEvent::Underwritten { reactivated: true, .. }]
        ));
    }

    #[test]
    fn test_sweep_bans_lapsed_customers_in_order() {
        let mut ledger = funded_ledger();
        let first = insured(&mut ledger);
        let second = insured(&mut ledger);
        let late = t0() + Duration::days(20);
        let fresh = CustomerId::new();
        let premium = ledger.get_premium(fresh);
        ledger.underwrite(fresh, premium, late).unwrap();

        let banned = ledger.sweep(t0() + Duration::days(35));
        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(banned, expected);
        assert!(!ledger.is_banned(fresh));
        assert!(ledger.sweep(t0() + Duration::days(35)).is_empty());
    }

    #[test]
    fn test_coverage_status_of_unknown_customer() {
        let ledger = PolicyLedger::default();
        let status = ledger.coverage_status(CustomerId::new(), t0());
        assert_eq!(status.state, PolicyStatus::Uninsured);
        assert_eq!(status.remaining_payment_window, Duration::zero());
        assert_eq!(status.current_premium, ledger.config().policy.base_premium);
        assert!(!status.is_insured());
    }

    #[test]
    fn test_invalid_config_refused() {
        let mut config = LedgerConfig::default();
        config.policy.base_premium = Amount::ZERO;
        assert!(PolicyLedger::new(config).is_err());
    }

    #[test]
    fn test_deposit_returns_balance() {
        let mut ledger = PolicyLedger::default();
        assert_eq!(ledger.deposit(Amount::new(7)).unwrap(), Amount::new(7));
        assert_eq!(ledger.deposit(Amount::new(3)).unwrap(), Amount::new(10));
        assert_eq!(ledger.pool_summary().total_deposits, Amount::new(10));
    }
}
