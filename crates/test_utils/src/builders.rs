//! Test Data Builders
//!
//! Builders for ledgers and service scenarios with sensible defaults, so a
//! test only spells out what it is about.

use std::sync::Arc;

use chrono::Duration;

use core_kernel::{Amount, CustomerId, ManualClock, Timestamp};
use domain_ledger::{LedgerConfig, LedgerService, PolicyLedger, RecordingPayout};

use crate::fixtures::{LedgerFixtures, TimeFixtures};

/// Builder for a synchronous `PolicyLedger`
pub struct TestLedgerBuilder {
    config: LedgerConfig,
    funding: Amount,
    insured: Vec<(CustomerId, Timestamp)>,
}

impl Default for TestLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLedgerBuilder {
    /// Creates a builder for an empty, unfunded ledger
    pub fn new() -> Self {
        Self {
            config: LedgerFixtures::default_config(),
            funding: Amount::ZERO,
            insured: Vec::new(),
        }
    }

    /// Sets the ledger configuration
    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Deposits `amount` into the pool before anything else
    pub fn with_funding(mut self, amount: Amount) -> Self {
        self.funding = amount;
        self
    }

    /// Underwrites `customer` at the base premium at `at`
    pub fn with_insured(mut self, customer: CustomerId, at: Timestamp) -> Self {
        self.insured.push((customer, at));
        self
    }

    /// Builds the ledger, draining setup events
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or setup is rejected
    pub fn build(self) -> PolicyLedger {
        let mut ledger = PolicyLedger::new(self.config).expect("valid ledger config");
        if !self.funding.is_zero() {
            ledger.deposit(self.funding).expect("setup deposit");
        }
        for (customer, at) in self.insured {
            let premium = ledger.get_premium(customer);
            ledger
                .underwrite(customer, premium, at)
                .expect("setup underwriting");
        }
        ledger.take_events();
        ledger
    }
}

/// A running `LedgerService` with a controllable clock
pub struct LedgerScenario {
    service: LedgerService,
    clock: ManualClock,
    payouts: Arc<RecordingPayout>,
    customers: Vec<CustomerId>,
}

impl LedgerScenario {
    /// Starts building a scenario
    pub fn builder() -> LedgerScenarioBuilder {
        LedgerScenarioBuilder::new()
    }

    pub fn service(&self) -> &LedgerService {
        &self.service
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// The payout adapter the service disburses through
    pub fn payouts(&self) -> &RecordingPayout {
        &self.payouts
    }

    /// Customers underwritten during setup, in creation order
    pub fn customers(&self) -> &[CustomerId] {
        &self.customers
    }

    /// The `index`-th customer underwritten during setup
    pub fn customer(&self, index: usize) -> CustomerId {
        self.customers[index]
    }

    /// Moves the scenario clock forward
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Underwrites `customer` at their current premium
    pub async fn insure(&self, customer: CustomerId) {
        let premium = self.service.premium(customer).await;
        self.service
            .underwrite(customer, premium)
            .await
            .expect("scenario underwriting");
    }
}

/// Builder for `LedgerScenario`
pub struct LedgerScenarioBuilder {
    config: LedgerConfig,
    start: Timestamp,
    funding: Amount,
    insured_customers: usize,
    failing_payouts: bool,
}

impl Default for LedgerScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerScenarioBuilder {
    /// Creates a builder with the default config, starting at `TimeFixtures::start()`
    pub fn new() -> Self {
        Self {
            config: LedgerFixtures::default_config(),
            start: TimeFixtures::start(),
            funding: Amount::ZERO,
            insured_customers: 0,
            failing_payouts: false,
        }
    }

    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn starting_at(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    pub fn with_pool_funding(mut self, amount: Amount) -> Self {
        self.funding = amount;
        self
    }

    /// Underwrites `count` fresh customers at the start time
    pub fn with_insured_customers(mut self, count: usize) -> Self {
        self.insured_customers = count;
        self
    }

    /// Makes every disbursement fail
    pub fn with_failing_payouts(mut self) -> Self {
        self.failing_payouts = true;
        self
    }

    /// Builds the scenario
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or setup is rejected
    pub async fn build(self) -> LedgerScenario {
        let clock = ManualClock::new(self.start);
        let payouts = Arc::new(if self.failing_payouts {
            RecordingPayout::failing()
        } else {
            RecordingPayout::new()
        });
        let service = LedgerService::from_config(self.config, Arc::new(clock.clone()), payouts.clone())
            .expect("valid ledger config");

        if !self.funding.is_zero() {
            service
                .deposit(None, self.funding)
                .await
                .expect("setup deposit");
        }

        let mut scenario = LedgerScenario {
            service,
            clock,
            payouts,
            customers: Vec::with_capacity(self.insured_customers),
        };
        for _ in 0..self.insured_customers {
            let customer = LedgerFixtures::customer();
            scenario.insure(customer).await;
            scenario.customers.push(customer);
        }
        scenario
    }
}
