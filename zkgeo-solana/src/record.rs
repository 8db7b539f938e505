//! The ledger-resident verified-location record.
//!
//! The record is created by the verifier program on first successful
//! submission and overwritten on each re-verification; it is never
//! deleted by this subsystem. The client-side validity window is NOT
//! stored here; freshness beyond `last_verified_slot` is a client-trust
//! assumption.

use serde::{Deserialize, Serialize};

use crate::error::GeofenceError;

/// On-ledger record layout: flag, slot marker, nullifier, region tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedLocationRecord {
    pub is_verified: bool,
    pub last_verified_slot: u64,
    /// Zeroed for layouts without a nullifier signal.
    pub nullifier: [u8; 32],
    /// Region tag the program derives from the proven bounding box.
    pub region_id: [u8; 32],
}

impl VerifiedLocationRecord {
    /// Serialized size, excluding the 8-byte account discriminator.
    pub const SIZE: usize = 1 + 8 + 32 + 32;

    /// Parse the record from account data (discriminator already stripped).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GeofenceError> {
        if bytes.len() < Self::SIZE {
            return Err(GeofenceError::InvalidInput(format!(
                "record account holds {} bytes, expected at least {}",
                bytes.len(),
                Self::SIZE
            )));
        }
        let mut nullifier = [0u8; 32];
        nullifier.copy_from_slice(&bytes[9..41]);
        let mut region_id = [0u8; 32];
        region_id.copy_from_slice(&bytes[41..73]);
        Ok(Self {
            is_verified: bytes[0] != 0,
            last_verified_slot: u64::from_le_bytes(bytes[1..9].try_into().expect("8 bytes")),
            nullifier,
            region_id,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0] = self.is_verified as u8;
        out[1..9].copy_from_slice(&self.last_verified_slot.to_le_bytes());
        out[9..41].copy_from_slice(&self.nullifier);
        out[41..73].copy_from_slice(&self.region_id);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_account_bytes() {
        let record = VerifiedLocationRecord {
            is_verified: true,
            last_verified_slot: 123_456_789,
            nullifier: [0u8; 32],
            region_id: [0xabu8; 32],
        };
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), 73);
        assert_eq!(VerifiedLocationRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn short_account_data_is_rejected() {
        let err = VerifiedLocationRecord::from_bytes(&[0u8; 10]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
