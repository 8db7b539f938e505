//! Error types for the Solana geofence rail.
//!
//! Every failure class surfaces as a distinct variant with a
//! machine-readable code; nothing is collapsed into a generic failure.

use thiserror::Error;
use zkgeo_common::{PackError, QuantizeError, RegionError};

/// Aggregated error type for proof sessions and submission.
#[derive(Debug, Error)]
pub enum GeofenceError {
    /// Malformed bounding box, out-of-range coordinates, missing backend.
    /// Fails fast; never sent to the network.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Field element out of range, wrong signal count, wrong byte width.
    /// Fatal to the current attempt; never silently truncated or padded.
    #[error("encoding error: {0}")]
    Encoding(#[from] PackError),

    /// The proving backend failed. Surfaced verbatim; proof generation is
    /// expensive, so retrying is the caller's decision.
    #[error("proving backend error: {0}")]
    Backend(String),

    /// RPC, broadcast, or confirmation failure.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// Pre-flight simulation rejected the transaction. Fatal unless the
    /// session was configured with `force_submission`.
    #[error("simulation failed: {message}")]
    Simulation {
        message: String,
        logs: Vec<String>,
    },

    /// Confirmation did not reach finality in time. The transaction may
    /// still land; callers can retry confirmation with the signature.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Submission attempted out of order (e.g. no detected location).
    /// Rejected before any network call.
    #[error("state error: {0}")]
    State(String),
}

impl GeofenceError {
    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            GeofenceError::InvalidInput(_) => "INVALID_INPUT",
            GeofenceError::Encoding(_) => "ENCODING_ERROR",
            GeofenceError::Backend(_) => "BACKEND_ERROR",
            GeofenceError::Rpc(_) => "RPC_ERROR",
            GeofenceError::Simulation { .. } => "SIMULATION_FAILED",
            GeofenceError::Timeout(_) => "TIMEOUT",
            GeofenceError::State(_) => "STATE_ERROR",
        }
    }

    /// Whether the caller may reasonably retry with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GeofenceError::Rpc(_) | GeofenceError::Timeout(_))
    }
}

impl From<RegionError> for GeofenceError {
    fn from(err: RegionError) -> Self {
        GeofenceError::InvalidInput(err.to_string())
    }
}

impl From<QuantizeError> for GeofenceError {
    fn from(err: QuantizeError) -> Self {
        GeofenceError::InvalidInput(err.to_string())
    }
}
