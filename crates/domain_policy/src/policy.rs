//! Policy record
//!
//! One record per customer, created on first successful underwriting and
//! never deleted. Fields are private: every change goes through a named
//! transition that checks its own preconditions and leaves the record
//! untouched when it fails.
//!
//! # Invariants
//!
//! - `banned` is one-way; no transition clears it
//! - `num_claims` only increases, and only through `record_claim`
//! - `current_premium` is always `terms.premium_for(num_claims)`
//! - a record reports itself insured only while unbanned, flagged active, and
//!   within the grace period of its last accepted payment

use chrono::Duration;
use serde::{Deserialize, Serialize};

use core_kernel::{elapsed_between, remaining_until, Amount, CustomerId, Timestamp};

use crate::error::PolicyError;
use crate::terms::PolicyTerms;
use crate::underwriting;

/// Coverage state derived from a record and the current time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    /// Never underwritten
    Uninsured,
    /// Covered right now
    Active,
    /// Grace period elapsed; may underwrite again until refreshed
    Lapsed,
    /// Permanently disqualified
    Banned,
}

/// A customer's policy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    customer: CustomerId,
    active: bool,
    banned: bool,
    base_premium_paid: Amount,
    last_payment_time: Option<Timestamp>,
    last_claim_time: Option<Timestamp>,
    num_claims: u32,
    current_premium: Amount,
    first_underwritten_at: Option<Timestamp>,
}

impl PolicyRecord {
    /// Creates the defaulted record of a customer with no history
    pub fn new(customer: CustomerId, terms: &PolicyTerms) -> Self {
        Self {
            customer,
            active: false,
            banned: false,
            base_premium_paid: Amount::ZERO,
            last_payment_time: None,
            last_claim_time: None,
            num_claims: 0,
            current_premium: terms.base_premium,
            first_underwritten_at: None,
        }
    }

    /// Returns the customer this record belongs to
    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    /// Returns the stored active flag (may be stale; see `is_insured`)
    pub fn active(&self) -> bool {
        self.active
    }

    /// Returns true once the customer has been banned
    pub fn banned(&self) -> bool {
        self.banned
    }

    /// Cumulative amount the customer has paid in
    pub fn base_premium_paid(&self) -> Amount {
        self.base_premium_paid
    }

    pub fn last_payment_time(&self) -> Option<Timestamp> {
        self.last_payment_time
    }

    pub fn last_claim_time(&self) -> Option<Timestamp> {
        self.last_claim_time
    }

    pub fn num_claims(&self) -> u32 {
        self.num_claims
    }

    /// Premium required for the next payment
    pub fn current_premium(&self) -> Amount {
        self.current_premium
    }

    pub fn first_underwritten_at(&self) -> Option<Timestamp> {
        self.first_underwritten_at
    }

    /// Returns true if more than `grace_period` has passed since the last payment
    ///
    /// A record that never paid has nothing to lapse.
    pub fn has_lapsed(&self, now: Timestamp, grace_period: Duration) -> bool {
        self.last_payment_time
            .map(|paid| elapsed_between(paid, now) > grace_period)
            .unwrap_or(false)
    }

    /// Returns true if the customer is covered at `now`
    ///
    /// Re-derived from timestamps on every call, so a policy reads as lapsed
    /// as soon as the grace period passes even though nothing was written.
    pub fn is_insured(&self, now: Timestamp, grace_period: Duration) -> bool {
        self.active
            && !self.banned
            && self.last_payment_time.is_some()
            && !self.has_lapsed(now, grace_period)
    }

    /// Derives the coverage state at `now`
    pub fn status(&self, now: Timestamp, grace_period: Duration) -> PolicyStatus {
        if self.banned {
            PolicyStatus::Banned
        } else if self.last_payment_time.is_none() {
            PolicyStatus::Uninsured
        } else if self.is_insured(now, grace_period) {
            PolicyStatus::Active
        } else {
            PolicyStatus::Lapsed
        }
    }

    /// Time left before the policy lapses (zero once lapsed or never paid)
    pub fn remaining_payment_window(&self, now: Timestamp, grace_period: Duration) -> Duration {
        match self.last_payment_time {
            Some(paid) if self.is_insured(now, grace_period) => {
                remaining_until(paid, grace_period, now)
            }
            _ => Duration::zero(),
        }
    }

    /// Time left before another claim may be made (zero if none pending)
    pub fn remaining_claim_cooldown(&self, now: Timestamp, cooldown: Duration) -> Duration {
        self.last_claim_time
            .map(|claimed| remaining_until(claimed, cooldown, now))
            .unwrap_or_else(Duration::zero)
    }

    /// Establishes or renews coverage with an up-front payment
    ///
    /// Underwriting an active policy just extends it. A lapsed but not yet
    /// banned policy is reactivated; its claim history and premium carry over.
    ///
    /// # Errors
    ///
    /// - `AlreadyBanned` if the customer is banned
    /// - `InsufficientPayment` if `payment` is below the current premium
    pub fn underwrite(&mut self, payment: Amount, now: Timestamp) -> Result<(), PolicyError> {
        underwriting::check_underwriting(self, payment)?;
        let base_premium_paid = self.base_premium_paid.checked_add(payment)?;

        self.active = true;
        self.base_premium_paid = base_premium_paid;
        self.last_payment_time = Some(now);
        self.first_underwritten_at.get_or_insert(now);
        Ok(())
    }

    /// Accepts a recurring premium payment from the customer themself
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the record's customer
    /// - `AlreadyBanned`, `NoPolicy` or `PolicyLapsed` if the policy is not current
    /// - `InsufficientPayment` if `payment` is below the current premium
    pub fn pay_premium(
        &mut self,
        caller: CustomerId,
        payment: Amount,
        now: Timestamp,
        grace_period: Duration,
    ) -> Result<(), PolicyError> {
        underwriting::check_premium_payment(self, caller, payment, now, grace_period)?;
        let base_premium_paid = self.base_premium_paid.checked_add(payment)?;

        self.base_premium_paid = base_premium_paid;
        self.last_payment_time = Some(now);
        Ok(())
    }

    /// Records a paid claim and reprices the policy
    ///
    /// Claim eligibility is decided by the claims domain before this is
    /// called. Returns the premium in effect before the claim.
    pub fn record_claim(&mut self, now: Timestamp, terms: &PolicyTerms) -> Result<Amount, PolicyError> {
        let num_claims = self
            .num_claims
            .checked_add(1)
            .ok_or(core_kernel::MoneyError::Overflow)?;
        let repriced = terms.premium_for(num_claims)?.max(self.current_premium);
        let previous = self.current_premium;

        self.num_claims = num_claims;
        self.current_premium = repriced;
        self.last_claim_time = Some(now);
        Ok(previous)
    }

    /// Commits a lapse as a permanent ban
    ///
    /// Returns true if this call banned the customer; false if the policy
    /// has not lapsed or was already banned.
    pub fn refresh(&mut self, now: Timestamp, grace_period: Duration) -> bool {
        if self.banned || !self.has_lapsed(now, grace_period) {
            return false;
        }
        self.active = false;
        self.banned = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn underwritten(terms: &PolicyTerms) -> PolicyRecord {
        let mut record = PolicyRecord::new(CustomerId::new(), terms);
        record.underwrite(terms.base_premium, start()).unwrap();
        record
    }

    #[test]
    fn test_new_record_is_uninsured() {
        let terms = PolicyTerms::default();
        let record = PolicyRecord::new(CustomerId::new(), &terms);
        assert_eq!(record.status(start(), terms.grace_period), PolicyStatus::Uninsured);
        assert!(!record.is_insured(start(), terms.grace_period));
        assert!(!record.has_lapsed(start() + Duration::days(365), terms.grace_period));
        assert_eq!(record.current_premium(), terms.base_premium);
    }

    #[test]
    fn test_underwrite_activates() {
        let terms = PolicyTerms::default();
        let record = underwritten(&terms);
        assert!(record.active());
        assert!(record.is_insured(start(), terms.grace_period));
        assert_eq!(record.base_premium_paid(), terms.base_premium);
        assert_eq!(record.first_underwritten_at(), Some(start()));
    }

    #[test]
    fn test_grace_boundary_is_inclusive() {
        let terms = PolicyTerms::default();
        let record = underwritten(&terms);
        let edge = start() + terms.grace_period;
        assert!(record.is_insured(edge, terms.grace_period));
        assert!(!record.is_insured(edge + Duration::seconds(1), terms.grace_period));
        assert_eq!(
            record.status(edge + Duration::seconds(1), terms.grace_period),
            PolicyStatus::Lapsed
        );
    }

    #[test]
    fn test_refresh_bans_only_lapsed() {
        let terms = PolicyTerms::default();
        let mut record = underwritten(&terms);
        assert!(!record.refresh(start() + Duration::days(1), terms.grace_period));
        assert!(!record.banned());

        let later = start() + Duration::days(31);
        assert!(record.refresh(later, terms.grace_period));
        assert!(record.banned());
        assert!(!record.active());
        assert!(!record.refresh(later, terms.grace_period));
    }

    #[test]
    fn test_record_claim_reprices() {
        let terms = PolicyTerms::default();
        let mut record = underwritten(&terms);
        let previous = record.record_claim(start(), &terms).unwrap();
        assert_eq!(previous, terms.base_premium);
        assert_eq!(record.num_claims(), 1);
        assert_eq!(record.current_premium(), terms.premium_for(1).unwrap());
        assert!(record.current_premium() > previous);
        assert_eq!(record.last_claim_time(), Some(start()));
    }

    #[test]
    fn test_remaining_windows() {
        let terms = PolicyTerms::default();
        let mut record = underwritten(&terms);
        let now = start() + Duration::days(10);
        assert_eq!(
            record.remaining_payment_window(now, terms.grace_period),
            Duration::days(20)
        );
        assert_eq!(record.remaining_claim_cooldown(now, Duration::days(1)), Duration::zero());

        record.record_claim(now, &terms).unwrap();
        assert_eq!(
            record.remaining_claim_cooldown(now + Duration::hours(1), Duration::days(1)),
            Duration::hours(23)
        );
    }
}
