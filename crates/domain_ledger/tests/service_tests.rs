//! LedgerService tests

use std::sync::Arc;

use chrono::Duration;

use core_kernel::Amount;
use domain_billing::{TransactionKind, TransactionOutcome};
use domain_ledger::RejectionKind;
use domain_policy::PolicyStatus;
use test_utils::{assert_rejected_with, LedgerFixtures, LedgerScenario, TimeFixtures};

mod operations {
    use super::*;

    #[tokio::test]
    async fn test_lapse_timeline_through_service() {
        let scenario = LedgerScenario::builder()
            .with_pool_funding(LedgerFixtures::ample_funding())
            .with_insured_customers(1)
            .build()
            .await;
        let service = scenario.service();
        let customer = scenario.customer(0);
        assert!(service.is_insured(customer).await);

        scenario.advance(TimeFixtures::grace() + Duration::seconds(1));
        assert!(!service.is_insured(customer).await);
        assert_eq!(
            service.coverage_status(customer).await.state,
            PolicyStatus::Lapsed
        );

        let premium = service.premium(customer).await;
        assert_rejected_with(
            &service.pay_premium_for(customer, customer, premium).await,
            RejectionKind::PolicyLapsed,
        );
        assert!(service.refresh(customer).await);
        assert_rejected_with(
            &service.underwrite(customer, premium).await,
            RejectionKind::AlreadyBanned,
        );
    }

    #[tokio::test]
    async fn test_claim_then_cooldown() {
        let scenario = LedgerScenario::builder()
            .with_pool_funding(LedgerFixtures::ample_funding())
            .with_insured_customers(1)
            .build()
            .await;
        let service = scenario.service();
        let customer = scenario.customer(0);

        let settlement = service
            .claim(customer, LedgerFixtures::small_claim())
            .await
            .unwrap();
        assert!(settlement.disbursed);
        assert_eq!(settlement.payout.claim_number, 1);
        assert!(settlement.payout.premium_after > settlement.payout.premium_before);

        scenario.advance(Duration::hours(2));
        assert_rejected_with(
            &service.claim(customer, Amount::new(1)).await,
            RejectionKind::ClaimCooldownActive,
        );
        assert_eq!(scenario.payouts().sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_bans_only_lapsed() {
        let scenario = LedgerScenario::builder()
            .with_insured_customers(3)
            .build()
            .await;
        let service = scenario.service();

        scenario.advance(Duration::days(20));
        let late_joiner = LedgerFixtures::customer();
        scenario.insure(late_joiner).await;

        scenario.advance(Duration::days(15));
        let mut expected = scenario.customers().to_vec();
        expected.sort();
        assert_eq!(service.sweep().await, expected);
        assert!(service.is_insured(late_joiner).await);
        assert!(service.sweep().await.is_empty());
    }

    #[tokio::test]
    async fn test_deposit_funds_pool() {
        let scenario = LedgerScenario::builder().build().await;
        let service = scenario.service();
        let depositor = LedgerFixtures::customer();

        let balance = service
            .deposit(Some(depositor), Amount::from_coins(2))
            .await
            .unwrap();
        assert_eq!(balance, Amount::from_coins(2));
        let summary = service.pool_summary().await;
        assert_eq!(summary.total_deposits, Amount::from_coins(2));
        assert_eq!(service.transactions(Some(depositor)).await.len(), 1);
    }
}

mod payouts {
    use super::*;

    #[tokio::test]
    async fn test_payout_failure_is_journaled() {
        let scenario = LedgerScenario::builder()
            .with_pool_funding(LedgerFixtures::ample_funding())
            .with_insured_customers(1)
            .with_failing_payouts()
            .build()
            .await;
        let service = scenario.service();
        let customer = scenario.customer(0);

        let settlement = service
            .claim(customer, LedgerFixtures::small_claim())
            .await
            .unwrap();
        assert!(!settlement.disbursed);
        assert_eq!(service.policy(customer).await.unwrap().num_claims(), 1);

        let history = service.transactions(Some(customer)).await;
        let kinds: Vec<_> = history.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::Underwrite,
                TransactionKind::Claim,
                TransactionKind::Claim
            ]
        );
        assert!(history[1].outcome.is_success());
        assert!(matches!(
            history[2].outcome,
            TransactionOutcome::PayoutFailed { .. }
        ));
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_never_overdraw() {
        let scenario = LedgerScenario::builder()
            .with_insured_customers(8)
            .build()
            .await;
        let service = scenario.service().clone();
        let balance = service.pool_summary().await.total_balance;
        let share = Amount::new(balance.units() / 3);

        let mut handles = Vec::new();
        for customer in scenario.customers().to_vec() {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.claim(customer, share).await }));
        }

        let mut paid = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                paid += 1;
            }
        }
        assert_eq!(paid, 3);
        let summary = service.pool_summary().await;
        assert_eq!(
            summary.total_balance.units() + summary.total_claims_paid.units(),
            balance.units()
        );
    }

    #[tokio::test]
    async fn test_service_handles_share_state() {
        let scenario = LedgerScenario::builder().build().await;
        let first = scenario.service().clone();
        let second = Arc::new(scenario.service().clone());

        first.deposit(None, Amount::new(10)).await.unwrap();
        assert_eq!(second.pool_summary().await.total_balance, Amount::new(10));
    }
}
