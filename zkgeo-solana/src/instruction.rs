//! Instruction payloads for the on-chain verifier program.
//!
//! The submit instruction is fixed-size: an 8-byte discriminator, 256
//! bytes of proof operands, and 128 bytes of public inputs. No
//! variable-length fields; the verifier rejects anything else up front.

use serde::{Deserialize, Serialize};
use zkgeo_common::{ProofPacked, PublicInputsPacked};

use crate::address::{derive_record_address, Pubkey};

/// Discriminator of the `submit_location_proof` instruction.
pub const SUBMIT_PROOF_DISCRIMINATOR: [u8; 8] = [146, 106, 119, 160, 143, 248, 72, 122];

/// The native loader's account id (all zero bytes).
pub const SYSTEM_PROGRAM_ID: Pubkey = [0u8; 32];

/// Total submit payload size: discriminator + proof + public inputs.
pub const SUBMIT_PAYLOAD_BYTES: usize =
    8 + ProofPacked::BYTES + PublicInputsPacked::BOUNDS_BYTES;

/// Account reference within an instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A fully-assembled submit instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Serialize the fixed-size instruction data.
pub fn submit_payload(proof: &ProofPacked, inputs: &PublicInputsPacked) -> Vec<u8> {
    let mut data = Vec::with_capacity(SUBMIT_PAYLOAD_BYTES);
    data.extend_from_slice(&SUBMIT_PROOF_DISCRIMINATOR);
    data.extend_from_slice(&proof.to_bytes());
    data.extend_from_slice(&inputs.bounds_bytes());
    data
}

/// Build the submit instruction for an identity.
///
/// Account order is part of the program's contract: the signing identity,
/// the (possibly not yet existing) record account, then the system
/// program for record creation.
pub fn build_submit_instruction(
    program_id: &Pubkey,
    identity: &Pubkey,
    proof: &ProofPacked,
    inputs: &PublicInputsPacked,
) -> SubmitInstruction {
    let record = derive_record_address(program_id, identity);
    SubmitInstruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta {
                pubkey: *identity,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: record,
                is_signer: false,
                is_writable: true,
            },
            AccountMeta {
                pubkey: SYSTEM_PROGRAM_ID,
                is_signer: false,
                is_writable: false,
            },
        ],
        data: submit_payload(proof, inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_operands() -> (ProofPacked, PublicInputsPacked) {
        let word = |b: u8| -> [u8; 32] {
            let mut w = [0u8; 32];
            w[31] = b;
            w
        };
        (
            ProofPacked {
                proof_a: [word(1), word(2)],
                proof_b: [[word(3), word(4)], [word(5), word(6)]],
                proof_c: [word(7), word(8)],
            },
            PublicInputsPacked {
                min_lat: word(9),
                max_lat: word(10),
                min_lon: word(11),
                max_lon: word(12),
                nullifier: None,
            },
        )
    }

    #[test]
    fn payload_is_fixed_392_bytes() {
        let (proof, inputs) = sample_operands();
        let data = submit_payload(&proof, &inputs);
        assert_eq!(SUBMIT_PAYLOAD_BYTES, 392);
        assert_eq!(data.len(), SUBMIT_PAYLOAD_BYTES);
        assert_eq!(&data[..8], &SUBMIT_PROOF_DISCRIMINATOR);
        // Proof operands start right after the discriminator.
        assert_eq!(data[8 + 31], 1);
        // Public inputs occupy the last 128 bytes.
        assert_eq!(data[8 + 256 + 31], 9);
        assert_eq!(data[391], 12);
    }

    #[test]
    fn nullifier_is_not_part_of_the_v1_payload() {
        let (proof, mut inputs) = sample_operands();
        let without = submit_payload(&proof, &inputs);
        inputs.nullifier = Some([0xffu8; 32]);
        let with = submit_payload(&proof, &inputs);
        assert_eq!(without, with);
    }

    #[test]
    fn account_order_is_signer_record_system() {
        let (proof, inputs) = sample_operands();
        let program_id = [3u8; 32];
        let identity = [4u8; 32];
        let ix = build_submit_instruction(&program_id, &identity, &proof, &inputs);
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(ix.accounts[0].pubkey, identity);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(
            ix.accounts[1].pubkey,
            derive_record_address(&program_id, &identity)
        );
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, SYSTEM_PROGRAM_ID);
        assert!(!ix.accounts[2].is_writable);
    }
}
