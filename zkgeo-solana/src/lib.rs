//! Solana-facing geofence submission rail.
//!
//! Takes a packed proof from `zkgeo-common` all the way to a finalized
//! ledger record: address derivation, instruction assembly, the RPC
//! abstraction, and the per-identity session state machine. Transport is
//! a trait; nothing in this crate opens a socket.

pub mod address;
pub mod backend;
pub mod error;
pub mod instruction;
pub mod record;
pub mod rpc;
pub mod session;

pub use address::{derive_record_address, Pubkey, PDA_MARKER, RECORD_SEED};
pub use backend::ProvingBackend;
pub use error::GeofenceError;
pub use instruction::{
    build_submit_instruction, submit_payload, AccountMeta, SubmitInstruction,
    SUBMIT_PAYLOAD_BYTES, SUBMIT_PROOF_DISCRIMINATOR, SYSTEM_PROGRAM_ID,
};
pub use record::VerifiedLocationRecord;
pub use rpc::{LedgerRpc, SimulationOutcome, TransactionStatus};
pub use session::{
    DetectedRegion, ProofSession, SessionConfig, SessionState, VerifiedLocation,
};
