//! The opaque proving backend.
//!
//! Proof generation is an external, CPU-bound call taking 10-30 s; the
//! session runs it on the blocking pool. The backend has no internal
//! concurrency of its own and cannot be cancelled once started.

use zkgeo_common::{ProverInput, ProverResponse};

use crate::error::GeofenceError;

/// An opaque Groth16 proving function.
///
/// Implementations wrap whatever actually computes the proof (a snarkjs
/// subprocess, a wasm runtime, a remote prover). Failures are surfaced
/// verbatim as [`GeofenceError::Backend`]; the session never retries.
pub trait ProvingBackend: Send + Sync {
    fn prove(&self, input: &ProverInput) -> Result<ProverResponse, GeofenceError>;
}
