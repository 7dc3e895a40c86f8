//! Ports to the execution environment
//!
//! The ledger depends on exactly two things it does not own: the current
//! time and the ability to move funds out of the pool. Both are modeled as
//! port traits so the domain stays infrastructure-agnostic.
//!
//! ```text
//!            ┌──────────────────────────────┐
//!  Clock ───▶│        LedgerService         │───▶ PayoutPort
//! (now)      │  (serialized PolicyLedger)   │   (claim disbursement,
//!            └──────────────────────────────┘    after commit)
//! ```

use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::{ClaimId, CustomerId};
use crate::money::Amount;
use crate::temporal::Timestamp;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The downstream system refused the request
    #[error("Rejected by {system}: {message}")]
    Rejected {
        system: String,
        message: String,
    },

    /// The downstream system could not be reached
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl PortError {
    /// Creates a Rejected error
    pub fn rejected(system: impl Into<String>, message: impl Into<String>) -> Self {
        PortError::Rejected {
            system: system.into(),
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient failure
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. })
    }
}

/// Marker trait for all domain ports
///
/// Ports must be shareable across async tasks.
pub trait DomainPort: Send + Sync + 'static {}

/// Source of the current time
pub trait Clock: DomainPort {
    /// Returns the current time
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl DomainPort for SystemClock {}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same underlying time, so a test can hold one handle
/// while the service under test holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(RwLock::new(start)),
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = *current + by;
    }

    /// Sets the clock to an absolute time
    pub fn set(&self, to: Timestamp) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = to;
    }
}

impl DomainPort for ManualClock {}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// An approved claim payout to be moved out of the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutInstruction {
    pub claim_id: ClaimId,
    pub payee: CustomerId,
    pub amount: Amount,
    pub approved_at: Timestamp,
}

/// Outbound fund transfer
///
/// Invoked only after the ledger has committed the claim, and never while
/// the ledger is locked, so an adapter that calls back into the ledger sees
/// consistent state.
#[async_trait::async_trait]
pub trait PayoutPort: DomainPort {
    /// Disburses an approved claim to its payee
    async fn disburse(&self, instruction: &PayoutInstruction) -> Result<(), PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::days(31));
        assert_eq!(clock.now(), start + Duration::days(31));

        clock.set(start);
        assert_eq!(handle.now(), start);
    }

    #[test]
    fn test_port_error_transient() {
        assert!(PortError::connection("bank offline").is_transient());
        assert!(!PortError::rejected("bank", "account closed").is_transient());
        assert!(PortError::rejected("bank", "account closed")
            .to_string()
            .contains("bank"));
    }

    struct RecordingPayout(std::sync::Mutex<Vec<PayoutInstruction>>);

    impl DomainPort for RecordingPayout {}

    #[async_trait::async_trait]
    impl PayoutPort for RecordingPayout {
        async fn disburse(&self, instruction: &PayoutInstruction) -> Result<(), PortError> {
            self.0.lock().unwrap().push(instruction.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_payout_port_object_safe() {
        let port: Arc<dyn PayoutPort> = Arc::new(RecordingPayout(Default::default()));
        let instruction = PayoutInstruction {
            claim_id: ClaimId::new(),
            payee: CustomerId::new(),
            amount: Amount::new(10),
            approved_at: Utc::now(),
        };
        port.disburse(&instruction).await.unwrap();
    }
}
