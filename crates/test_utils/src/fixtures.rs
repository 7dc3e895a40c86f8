//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the ledger. These fixtures are
//! consistent and predictable so scenario tests read as the timelines they
//! describe.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Amount, CustomerId, Rate, Timestamp};
use domain_claims::ClaimTerms;
use domain_ledger::LedgerConfig;
use domain_policy::{PolicyTerms, RepricingCurve};

/// Fixture for temporal test data
pub struct TimeFixtures;

impl TimeFixtures {
    /// Standard scenario start (Jan 1, 2024)
    pub fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// Default grace period
    pub fn grace() -> Duration {
        PolicyTerms::default().grace_period
    }

    /// Default claim cooldown
    pub fn cooldown() -> Duration {
        ClaimTerms::default().cooldown
    }

    /// The last instant a policy paid at `start()` is still covered
    pub fn grace_edge() -> Timestamp {
        Self::start() + Self::grace()
    }

    /// One second past the grace period
    pub fn just_lapsed() -> Timestamp {
        Self::grace_edge() + Duration::seconds(1)
    }

    /// An hour after `start()`, well inside any cooldown
    pub fn within_cooldown() -> Timestamp {
        Self::start() + Duration::hours(1)
    }
}

/// Fixture for ledger amounts and configurations
pub struct LedgerFixtures;

impl LedgerFixtures {
    /// A fresh customer identity
    pub fn customer() -> CustomerId {
        CustomerId::new()
    }

    /// Default base premium (0.1 coin)
    pub fn base_premium() -> Amount {
        PolicyTerms::default().base_premium
    }

    /// Default coverage ceiling (5 coins)
    pub fn max_coverage() -> Amount {
        ClaimTerms::default().max_coverage
    }

    /// A claim comfortably inside the coverage ceiling
    pub fn small_claim() -> Amount {
        Amount::from_coins(1)
    }

    /// Pool funding large enough for several maximum claims
    pub fn ample_funding() -> Amount {
        Amount::from_coins(50)
    }

    /// The standard configuration
    pub fn default_config() -> LedgerConfig {
        LedgerConfig::default()
    }

    /// A configuration with a proportional loading of `percentage` per claim
    pub fn proportional_config(percentage: Decimal) -> LedgerConfig {
        let loading = Rate::from_percentage(percentage).unwrap();
        Self::with_curve(RepricingCurve::Proportional { loading })
    }

    /// A configuration where each claim adds a fixed 0.05 coin
    pub fn linear_config() -> LedgerConfig {
        Self::with_curve(RepricingCurve::Linear {
            increment: Amount::new(50_000_000_000_000_000),
        })
    }

    /// A configuration with a three-step surcharge table
    pub fn stepped_config() -> LedgerConfig {
        Self::with_curve(RepricingCurve::Stepped {
            surcharges: vec![
                Amount::new(20_000_000_000_000_000),
                Amount::new(50_000_000_000_000_000),
                Amount::new(100_000_000_000_000_000),
            ],
        })
    }

    /// A configuration with a heavy 50% loading
    pub fn high_risk_config() -> LedgerConfig {
        Self::proportional_config(dec!(50))
    }

    fn with_curve(repricing: RepricingCurve) -> LedgerConfig {
        LedgerConfig {
            policy: PolicyTerms {
                repricing,
                ..PolicyTerms::default()
            },
            claims: ClaimTerms::default(),
        }
    }
}
