//! Ledger RPC abstraction.
//!
//! The rail never talks to a transport directly; a consumer supplies an
//! implementation (JSON-RPC client, wallet adapter bridge, or a mock in
//! tests). Submission awaits these calls strictly in sequence: simulate,
//! broadcast, then confirmation polling.

use async_trait::async_trait;

use crate::error::GeofenceError;
use crate::instruction::SubmitInstruction;

/// Result of a pre-flight simulation.
#[derive(Clone, Debug, Default)]
pub struct SimulationOutcome {
    /// Program error, if the simulated execution failed.
    pub err: Option<String>,
    /// Program log lines, useful for diagnostics on failure.
    pub logs: Vec<String>,
}

/// Observed status of a broadcast transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not yet finalized.
    Pending,
    /// Finalized by the ledger.
    Finalized,
    /// Executed and failed with a program error.
    Failed(String),
}

/// Minimal ledger surface the submission protocol needs.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Current slot, used as the ledger-observed salt nonce.
    async fn current_slot(&self) -> Result<u64, GeofenceError>;

    /// Pre-flight a transaction without broadcasting it.
    async fn simulate_transaction(
        &self,
        instruction: &SubmitInstruction,
    ) -> Result<SimulationOutcome, GeofenceError>;

    /// Sign and broadcast; returns the transaction signature.
    async fn send_transaction(
        &self,
        instruction: &SubmitInstruction,
    ) -> Result<String, GeofenceError>;

    /// Poll the status of a broadcast transaction.
    async fn transaction_status(
        &self,
        signature: &str,
    ) -> Result<TransactionStatus, GeofenceError>;
}
