//! Ledger configuration

use serde::{Deserialize, Serialize};

use core_kernel::CoreError;
use domain_claims::ClaimTerms;
use domain_policy::PolicyTerms;

/// Parameters a ledger is created with
///
/// Both sections fall back to their defaults when omitted, so an empty
/// config file yields the standard deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub policy: PolicyTerms,
    #[serde(default)]
    pub claims: ClaimTerms,
}

impl LedgerConfig {
    /// Validates both sections
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter as a `CoreError`
    pub fn validate(&self) -> Result<(), CoreError> {
        self.policy.validate()?;
        self.claims.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core_kernel::Amount;

    #[test]
    fn test_default_config_is_valid() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy.grace_period, Duration::days(30));
        assert_eq!(config.claims.cooldown, Duration::days(1));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: LedgerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_invalid_claims_section_rejected() {
        let mut config = LedgerConfig::default();
        config.claims.max_coverage = Amount::ZERO;
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_curve_without_repricing_rejected() {
        let config: LedgerConfig = serde_json::from_str(
            r#"{"policy": {"base_premium": 100, "grace_period": 60, "repricing": {"kind": "proportional", "loading": "0"}}}"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
        assert!(crate::PolicyLedger::new(config).is_err());
    }
}
