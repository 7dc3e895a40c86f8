//! Serialized access to a ledger
//!
//! `LedgerService` is the single writer in front of a `PolicyLedger`. Every
//! operation reads the injected clock, then runs to completion under one
//! async mutex together with its journal entry, so two claims can never
//! observe the same pool balance.
//!
//! Claim payouts are disbursed after the lock is released. A failed
//! disbursement does not roll back the ledger; it is logged and journaled
//! as `PayoutFailed` for reconciliation.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use core_kernel::{Amount, Clock, CoreError, CustomerId, PayoutPort, Timestamp, TransactionId};
use domain_billing::{JournalEntry, TransactionJournal, TransactionKind, TransactionOutcome};
use domain_claims::ClaimPayout;
use domain_fund::PoolSummary;
use domain_policy::PolicyRecord;

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::ledger::PolicyLedger;
use crate::status::CoverageStatus;

/// Everything guarded by the service lock
#[derive(Debug, Default)]
pub struct LedgerState {
    pub ledger: PolicyLedger,
    pub journal: TransactionJournal,
}

/// Result of a committed claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSettlement {
    pub payout: ClaimPayout,
    pub transaction_id: TransactionId,
    /// False if the outbound transfer failed after the ledger commit
    pub disbursed: bool,
}

/// A policy record and its coverage status, read in the same critical section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySnapshot {
    pub record: PolicyRecord,
    pub status: CoverageStatus,
}

/// Shared handle to a serialized ledger
#[derive(Clone)]
pub struct LedgerService {
    state: Arc<Mutex<LedgerState>>,
    clock: Arc<dyn Clock>,
    payouts: Arc<dyn PayoutPort>,
}

impl LedgerService {
    /// Wraps an existing ledger
    pub fn new(ledger: PolicyLedger, clock: Arc<dyn Clock>, payouts: Arc<dyn PayoutPort>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                ledger,
                journal: TransactionJournal::new(),
            })),
            clock,
            payouts,
        }
    }

    /// Creates a service over an empty ledger
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate
    pub fn from_config(
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
        payouts: Arc<dyn PayoutPort>,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(PolicyLedger::new(config)?, clock, payouts))
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Runs `f` against the locked state
    pub async fn read<R>(&self, f: impl FnOnce(&LedgerState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Underwrites `customer` and returns the updated policy
    #[instrument(skip(self))]
    pub async fn underwrite(
        &self,
        customer: CustomerId,
        payment: Amount,
    ) -> Result<PolicySnapshot, LedgerError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let entry = JournalEntry::success(TransactionKind::Underwrite, now)
            .by(customer)
            .for_customer(customer)
            .with_amount(payment);
        let result = state.ledger.underwrite(customer, payment, now);
        let result = result.map(|record| snapshot(&state.ledger, record, now));
        conclude(&mut state, entry, result).map(|(policy, _)| policy)
    }

    /// Accepts `caller`'s premium for `customer` and returns the updated policy
    #[instrument(skip(self))]
    pub async fn pay_premium_for(
        &self,
        customer: CustomerId,
        caller: CustomerId,
        payment: Amount,
    ) -> Result<PolicySnapshot, LedgerError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let entry = JournalEntry::success(TransactionKind::PremiumPayment, now)
            .by(caller)
            .for_customer(customer)
            .with_amount(payment);
        let result = state.ledger.pay_premium_for(customer, caller, payment, now);
        let result = result.map(|record| snapshot(&state.ledger, record, now));
        conclude(&mut state, entry, result).map(|(policy, _)| policy)
    }

    /// Pays `caller`'s claim, then disburses it through the payout port
    #[instrument(skip(self))]
    pub async fn claim(
        &self,
        caller: CustomerId,
        amount: Amount,
    ) -> Result<ClaimSettlement, LedgerError> {
        let now = self.clock.now();
        let (payout, transaction_id) = {
            let mut state = self.state.lock().await;
            let entry = JournalEntry::success(TransactionKind::Claim, now)
                .by(caller)
                .for_customer(caller)
                .with_amount(amount);
            let result = state.ledger.claim(caller, amount, now);
            conclude(&mut state, entry, result)?
        };

        let disbursed = match self.payouts.disburse(&payout.instruction()).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    claim_id = %payout.claim_id,
                    payee = %payout.payee,
                    amount = %payout.amount,
                    transient = err.is_transient(),
                    error = %err,
                    "claim payout failed after commit"
                );
                let entry = JournalEntry::new(
                    TransactionKind::Claim,
                    TransactionOutcome::PayoutFailed {
                        message: err.to_string(),
                    },
                    self.clock.now(),
                )
                .by(caller)
                .for_customer(caller)
                .with_amount(payout.amount);
                self.state.lock().await.journal.append(entry);
                false
            }
        };

        Ok(ClaimSettlement {
            payout,
            transaction_id,
            disbursed,
        })
    }

    /// Commits `customer`'s lapse as a ban; returns true if newly banned
    #[instrument(skip(self))]
    pub async fn refresh(&self, customer: CustomerId) -> bool {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let entry = JournalEntry::success(TransactionKind::Refresh, now).for_customer(customer);
        let banned = state.ledger.update(customer, now);
        journal_success(&mut state, entry);
        banned
    }

    /// Bans every lapsed customer; returns them in ascending id order
    #[instrument(skip(self))]
    pub async fn sweep(&self) -> Vec<CustomerId> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let banned = state.ledger.sweep(now);
        info!(banned = banned.len(), "expiry sweep finished");
        let entry = JournalEntry::success(TransactionKind::Sweep, now);
        journal_success(&mut state, entry);
        banned
    }

    /// Adds funds to the pool and returns the new balance
    #[instrument(skip(self))]
    pub async fn deposit(
        &self,
        depositor: Option<CustomerId>,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let mut entry = JournalEntry::success(TransactionKind::Deposit, now).with_amount(amount);
        if let Some(depositor) = depositor {
            entry = entry.by(depositor);
        }
        let result = state.ledger.deposit(amount);
        conclude(&mut state, entry, result).map(|(balance, _)| balance)
    }

    pub async fn is_insured(&self, customer: CustomerId) -> bool {
        let now = self.clock.now();
        self.read(|state| state.ledger.is_insured(customer, now)).await
    }

    pub async fn premium(&self, customer: CustomerId) -> Amount {
        self.read(|state| state.ledger.get_premium(customer)).await
    }

    pub async fn policy(&self, customer: CustomerId) -> Option<PolicyRecord> {
        self.read(|state| state.ledger.get_policy(customer).cloned()).await
    }

    /// The customer's record with its current status, if a record exists
    pub async fn policy_snapshot(&self, customer: CustomerId) -> Option<PolicySnapshot> {
        let now = self.clock.now();
        self.read(|state| {
            state
                .ledger
                .get_policy(customer)
                .cloned()
                .map(|record| snapshot(&state.ledger, record, now))
        })
        .await
    }

    pub async fn coverage_status(&self, customer: CustomerId) -> CoverageStatus {
        let now = self.clock.now();
        self.read(|state| state.ledger.coverage_status(customer, now)).await
    }

    pub async fn pool_summary(&self) -> PoolSummary {
        self.read(|state| state.ledger.pool_summary()).await
    }

    /// Journal entries, optionally restricted to one customer
    pub async fn transactions(&self, customer: Option<CustomerId>) -> Vec<JournalEntry> {
        self.read(|state| match customer {
            Some(customer) => state
                .journal
                .for_customer(customer)
                .into_iter()
                .cloned()
                .collect(),
            None => state.journal.entries().to_vec(),
        })
        .await
    }
}

/// Journals and logs the outcome of an operation, then drains its events
fn conclude<T>(
    state: &mut LedgerState,
    mut entry: JournalEntry,
    result: Result<T, LedgerError>,
) -> Result<(T, TransactionId), LedgerError> {
    let operation = entry.kind.description();
    match &result {
        Ok(_) => {
            info!(operation, customer = ?entry.customer, amount = ?entry.amount, "ledger operation committed");
        }
        Err(err) => {
            let kind = err.kind();
            warn!(operation, customer = ?entry.customer, rejection = %kind, error = %err, "ledger operation rejected");
            entry.outcome = TransactionOutcome::Rejected {
                reason: kind.code().to_string(),
                message: err.to_string(),
            };
        }
    }
    let id = append_and_drain(state, entry);
    result.map(|value| (value, id))
}

/// Journals an operation that cannot be rejected
fn journal_success(state: &mut LedgerState, entry: JournalEntry) {
    info!(operation = entry.kind.description(), customer = ?entry.customer, "ledger operation committed");
    append_and_drain(state, entry);
}

fn append_and_drain(state: &mut LedgerState, entry: JournalEntry) -> TransactionId {
    let id = state.journal.append(entry);
    for event in state.ledger.take_events() {
        info!(event = event.event_type(), customer = ?event.customer(), ?event, "ledger event");
    }
    id
}

fn snapshot(ledger: &PolicyLedger, record: PolicyRecord, now: Timestamp) -> PolicySnapshot {
    let status = ledger.coverage_status(record.customer(), now);
    PolicySnapshot { record, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use core_kernel::{ManualClock, SystemClock};

    use crate::error::RejectionKind;
    use crate::payout::RecordingPayout;

    fn service_at_t0() -> (LedgerService, ManualClock, Arc<RecordingPayout>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        let payouts = Arc::new(RecordingPayout::new());
        let service = LedgerService::new(
            PolicyLedger::default(),
            Arc::new(clock.clone()),
            payouts.clone(),
        );
        (service, clock, payouts)
    }

    #[tokio::test]
    async fn test_operations_are_journaled() {
        let (service, _, _) = service_at_t0();
        let customer = CustomerId::new();

        service.deposit(None, Amount::from_coins(1)).await.unwrap();
        let err = service.underwrite(customer, Amount::new(1)).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InsufficientPayment);

        let entries = service.transactions(None).await;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].outcome.is_success());
        assert_eq!(
            entries[1].outcome,
            TransactionOutcome::Rejected {
                reason: "insufficient_payment".to_string(),
                message: err.to_string(),
            }
        );
        assert_eq!(service.transactions(Some(customer)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_claim_disbursed_after_commit() {
        let (service, _, payouts) = service_at_t0();
        let customer = CustomerId::new();
        service.deposit(None, Amount::from_coins(3)).await.unwrap();
        let premium = service.premium(customer).await;
        service.underwrite(customer, premium).await.unwrap();

        let settlement = service.claim(customer, Amount::from_coins(1)).await.unwrap();
        assert!(settlement.disbursed);
        assert_eq!(payouts.sent().await, vec![settlement.payout.instruction()]);
    }

    #[tokio::test]
    async fn test_failed_payout_keeps_commit() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        let service = LedgerService::new(
            PolicyLedger::default(),
            Arc::new(clock),
            Arc::new(RecordingPayout::failing()),
        );
        let customer = CustomerId::new();
        service.deposit(None, Amount::from_coins(3)).await.unwrap();
        let premium = service.premium(customer).await;
        service.underwrite(customer, premium).await.unwrap();
        let before = service.pool_summary().await.total_balance;

        let settlement = service.claim(customer, Amount::from_coins(1)).await.unwrap();
        assert!(!settlement.disbursed);
        assert_eq!(
            service.pool_summary().await.total_balance,
            before.checked_sub(Amount::from_coins(1)).unwrap()
        );
        let last = service.transactions(Some(customer)).await.pop().unwrap();
        assert!(matches!(last.outcome, TransactionOutcome::PayoutFailed { .. }));
    }

    #[tokio::test]
    async fn test_clock_drives_lapse() {
        let (service, clock, _) = service_at_t0();
        let customer = CustomerId::new();
        let premium = service.premium(customer).await;
        service.underwrite(customer, premium).await.unwrap();

        clock.advance(Duration::days(31));
        assert!(!service.is_insured(customer).await);
        assert!(service.refresh(customer).await);
        assert!(service.coverage_status(customer).await.state == domain_policy::PolicyStatus::Banned);
    }

    #[tokio::test]
    async fn test_premium_payment_returns_status_of_same_commit() {
        let (service, clock, _) = service_at_t0();
        let customer = CustomerId::new();
        let premium = service.premium(customer).await;
        let underwritten = service.underwrite(customer, premium).await.unwrap();
        assert_eq!(underwritten.status.state, domain_policy::PolicyStatus::Active);
        assert_eq!(underwritten.status.current_premium, underwritten.record.current_premium());

        clock.advance(Duration::days(10));
        let paid = service.pay_premium_for(customer, customer, premium).await.unwrap();
        assert_eq!(paid.record.last_payment_time(), Some(clock.now()));
        assert_eq!(paid.status.remaining_payment_window, Duration::days(30));
        assert_eq!(paid.status.customer, customer);

        let current = service.policy_snapshot(customer).await.unwrap();
        assert_eq!(current, paid);
        assert!(service.policy_snapshot(CustomerId::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_and_sweep_journal_success() {
        let (service, clock, _) = service_at_t0();
        let customer = CustomerId::new();
        let premium = service.premium(customer).await;
        service.underwrite(customer, premium).await.unwrap();
        clock.advance(Duration::days(31));

        assert!(service.refresh(customer).await);
        assert!(service.sweep().await.is_empty());

        let entries = service.transactions(None).await;
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![TransactionKind::Underwrite, TransactionKind::Refresh, TransactionKind::Sweep]
        );
        assert!(entries.iter().all(|e| e.outcome.is_success()));
    }

    #[tokio::test]
    async fn test_invalid_config_refused() {
        let mut config = LedgerConfig::default();
        config.claims.max_coverage = Amount::ZERO;
        let result = LedgerService::from_config(
            config,
            Arc::new(SystemClock),
            Arc::new(RecordingPayout::new()),
        );
        assert!(result.is_err());
    }
}
