//! Payout port adapters

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use core_kernel::{DomainPort, PayoutInstruction, PayoutPort, PortError};

/// Adapter that only logs each disbursement
///
/// Used when no settlement system is attached; the ledger debit is the
/// source of truth and the log line is the hand-off record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPayout;

impl DomainPort for LoggingPayout {}

#[async_trait]
impl PayoutPort for LoggingPayout {
    async fn disburse(&self, instruction: &PayoutInstruction) -> Result<(), PortError> {
        info!(
            claim_id = %instruction.claim_id,
            payee = %instruction.payee,
            amount = %instruction.amount,
            "disbursing claim payout"
        );
        Ok(())
    }
}

/// In-memory adapter that records instructions and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingPayout {
    sent: Mutex<Vec<PayoutInstruction>>,
    failing: bool,
}

impl RecordingPayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// An adapter that refuses every disbursement
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    /// Instructions accepted so far, oldest first
    pub async fn sent(&self) -> Vec<PayoutInstruction> {
        self.sent.lock().await.clone()
    }
}

impl DomainPort for RecordingPayout {}

#[async_trait]
impl PayoutPort for RecordingPayout {
    async fn disburse(&self, instruction: &PayoutInstruction) -> Result<(), PortError> {
        if self.failing {
            return Err(PortError::rejected("payout", "recipient account unavailable"));
        }
        self.sent.lock().await.push(instruction.clone());
        Ok(())
    }
}
