//! Deterministic record address derivation.
//!
//! One verified-location record exists per identity, at an address derived
//! from a fixed seed tag and the identity's public key. No randomness, no
//! collision handling; the tag provides the hash domain separation and the
//! ledger serializes concurrent writes to the same address.

use sha2::{Digest, Sha256};

/// A 32-byte ledger public key.
pub type Pubkey = [u8; 32];

/// Seed tag for verified-location records.
pub const RECORD_SEED: &[u8] = b"user-state";

/// Domain separator of the ledger's program-address scheme.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive the verified-location record address for an identity.
pub fn derive_record_address(program_id: &Pubkey, identity: &Pubkey) -> Pubkey {
    let mut hasher = Sha256::new();
    hasher.update(RECORD_SEED);
    hasher.update(identity);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: Pubkey = [7u8; 32];

    #[test]
    fn derivation_is_deterministic() {
        let identity = [1u8; 32];
        assert_eq!(
            derive_record_address(&PROGRAM, &identity),
            derive_record_address(&PROGRAM, &identity)
        );
    }

    #[test]
    fn different_identities_get_different_addresses() {
        let a = derive_record_address(&PROGRAM, &[1u8; 32]);
        let b = derive_record_address(&PROGRAM, &[2u8; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn address_is_bound_to_the_program() {
        let identity = [1u8; 32];
        let a = derive_record_address(&[7u8; 32], &identity);
        let b = derive_record_address(&[8u8; 32], &identity);
        assert_ne!(a, b);
    }
}
