//! Per-identity proof session: detect, prove, submit, confirm.
//!
//! One logical flow per identity, no shared mutable state between
//! sessions. The machine is `Unverified -> Proving -> Submitting ->
//! Verified`, with every failure edge leading back to `Unverified`.
//! Re-proving simply reruns the machine and overwrites the record.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use zkgeo_common::{
    pack_response, BoundingBox, GeoPoint, ProverInput, RegionCatalog, SignalLayout,
    DYNAMIC_REGION_HALF_SIZE,
};

use crate::address::{derive_record_address, Pubkey};
use crate::backend::ProvingBackend;
use crate::error::GeofenceError;
use crate::instruction::build_submit_instruction;
use crate::rpc::{LedgerRpc, TransactionStatus};

/// Session configuration; defaults match the deployed V1 circuit.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub program_id: Pubkey,
    pub layout: SignalLayout,
    /// Submit even when pre-flight simulation fails. Off by default;
    /// simulation failure aborts before broadcast.
    pub force_submission: bool,
    pub confirm_timeout: Duration,
    pub confirm_poll_interval: Duration,
    /// Client-side validity window; not enforced by the ledger record.
    pub validity_window: Duration,
}

impl SessionConfig {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            layout: SignalLayout::V1,
            force_submission: false,
            confirm_timeout: Duration::from_secs(60),
            confirm_poll_interval: Duration::from_millis(500),
            validity_window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Observable session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unverified,
    Proving,
    Submitting,
    Verified,
}

/// The region a session will prove membership in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedRegion {
    pub region_id: String,
    pub bounds: BoundingBox,
    pub point: GeoPoint,
}

/// Outcome of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedLocation {
    pub signature: String,
    pub record_address: Pubkey,
    pub region_id: String,
    /// Unix seconds; client bookkeeping only, the record has no expiry.
    pub valid_until_unix: u64,
}

/// A proof session for one identity.
pub struct ProofSession {
    identity: Pubkey,
    config: SessionConfig,
    rpc: Arc<dyn LedgerRpc>,
    backend: Arc<dyn ProvingBackend>,
    state: SessionState,
    detected: Option<DetectedRegion>,
    last_verified: Option<VerifiedLocation>,
}

impl ProofSession {
    pub fn new(
        identity: Pubkey,
        config: SessionConfig,
        rpc: Arc<dyn LedgerRpc>,
        backend: Arc<dyn ProvingBackend>,
    ) -> Self {
        Self {
            identity,
            config,
            rpc,
            backend,
            state: SessionState::Unverified,
            detected: None,
            last_verified: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn detected_region(&self) -> Option<&DetectedRegion> {
        self.detected.as_ref()
    }

    pub fn last_verified(&self) -> Option<&VerifiedLocation> {
        self.last_verified.as_ref()
    }

    /// Resolve the target region for a detected point.
    ///
    /// Picks the first catalog match; when nothing matches, synthesizes a
    /// dynamic box around the point (that synthesis is session policy, the
    /// catalog itself only reports matches).
    pub fn detect(&mut self, point: GeoPoint, catalog: &RegionCatalog) -> &DetectedRegion {
        let detected = match catalog.matching_regions(point).first() {
            Some(region) => DetectedRegion {
                region_id: region.id.clone(),
                bounds: region.bounds,
                point,
            },
            None => {
                let bounds = BoundingBox::around(point, DYNAMIC_REGION_HALF_SIZE);
                tracing::debug!(?bounds, "no catalog match, synthesized dynamic region");
                DetectedRegion {
                    region_id: "current-location".to_string(),
                    bounds,
                    point,
                }
            }
        };
        self.detected.insert(detected)
    }

    /// Use an externally-constructed region (geocoder lookup and the like).
    pub fn set_region(&mut self, region: DetectedRegion) {
        self.detected = Some(region);
    }

    /// Run the whole machine: prove membership, submit, await finality.
    ///
    /// On any failure the session returns to `Unverified`; a broadcast
    /// transaction cannot be retracted, but the error class tells the
    /// caller whether retrying confirmation makes sense.
    pub async fn prove_and_submit(&mut self) -> Result<VerifiedLocation, GeofenceError> {
        let result = self.run().await;
        match &result {
            Ok(verified) => {
                self.state = SessionState::Verified;
                self.last_verified = Some(verified.clone());
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), %err, "proof session failed");
                self.state = SessionState::Unverified;
            }
        }
        result
    }

    async fn run(&mut self) -> Result<VerifiedLocation, GeofenceError> {
        let region = self.detected.clone().ok_or_else(|| {
            GeofenceError::State("no detected location; call detect() before submitting".into())
        })?;
        if !region.bounds.contains(region.point) {
            return Err(GeofenceError::InvalidInput(format!(
                "point ({}, {}) lies outside the target region {}",
                region.point.lat, region.point.lon, region.region_id
            )));
        }

        // Salt is bound to a ledger-observed nonce, not client randomness,
        // so a malicious client cannot pick a colliding value at will.
        let slot = self.rpc.current_slot().await?;
        let salt = derive_salt(&self.identity, slot);
        let input = ProverInput::from_location(region.point, region.bounds, &salt)?;

        self.state = SessionState::Proving;
        tracing::info!(region = %region.region_id, slot, "generating membership proof");
        let backend = Arc::clone(&self.backend);
        let response = tokio::task::spawn_blocking(move || backend.prove(&input))
            .await
            .map_err(|e| GeofenceError::Backend(format!("proving task panicked: {e}")))??;

        let (proof, inputs) = pack_response(self.config.layout, &response)?;

        self.state = SessionState::Submitting;
        let instruction =
            build_submit_instruction(&self.config.program_id, &self.identity, &proof, &inputs);
        let record_address = derive_record_address(&self.config.program_id, &self.identity);

        let simulation = self.rpc.simulate_transaction(&instruction).await?;
        if let Some(message) = simulation.err {
            if self.config.force_submission {
                tracing::warn!(%message, "simulation failed, submitting anyway (forced)");
            } else {
                return Err(GeofenceError::Simulation {
                    message,
                    logs: simulation.logs,
                });
            }
        }

        let signature = self.rpc.send_transaction(&instruction).await?;
        tracing::info!(%signature, "transaction broadcast, awaiting finality");
        self.await_finality(&signature).await?;

        Ok(VerifiedLocation {
            signature,
            record_address,
            region_id: region.region_id,
            valid_until_unix: unix_now() + self.config.validity_window.as_secs(),
        })
    }

    async fn await_finality(&self, signature: &str) -> Result<(), GeofenceError> {
        let deadline = Instant::now() + self.config.confirm_timeout;
        loop {
            match self.rpc.transaction_status(signature).await? {
                TransactionStatus::Finalized => return Ok(()),
                TransactionStatus::Failed(err) => {
                    return Err(GeofenceError::Rpc(format!(
                        "transaction {signature} failed: {err}"
                    )))
                }
                TransactionStatus::Pending => {}
            }
            if Instant::now() >= deadline {
                return Err(GeofenceError::Timeout(format!(
                    "transaction {signature} not finalized within {:?}",
                    self.config.confirm_timeout
                )));
            }
            tokio::time::sleep(self.config.confirm_poll_interval).await;
        }
    }
}

/// Derive the witness salt from the identity and a ledger slot.
fn derive_salt(identity: &Pubkey, slot: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"zkgeo-salt");
    hasher.update(identity);
    hasher.update(slot.to_le_bytes());
    let digest = hasher.finalize();
    // The first 16 digest bytes as an integer; always below the field modulus.
    u128::from_le_bytes(digest[..16].try_into().expect("16 bytes")).to_string()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
