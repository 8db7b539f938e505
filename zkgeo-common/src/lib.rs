//! Shared geofence proof pipeline.
//!
//! Everything the per-request packer and the offline verifying-key
//! converter have in common lives here: coordinate quantization, the
//! fixed-width field-element codec, the point transform layer, public
//! signal layout versioning, and region membership. Keeping both paths
//! on this one crate is deliberate; a byte-order or swap divergence
//! between them does not type-check differently, it just makes the
//! verifier reject everything.

pub mod field;
pub mod pack;
pub mod quant;
pub mod region;
pub mod transform;
pub mod vk;

pub use field::{decode_be, decode_le, encode_be, encode_le, parse_decimal, FieldCodecError,
    FIELD_BYTES, MODULUS, MODULUS_DECIMAL};
pub use pack::{
    pack_proof, pack_public_signals, pack_response, Groth16ProofJson, PackError, ProofPacked,
    ProverInput, ProverResponse, PublicInputsPacked, SignalLayout,
};
pub use quant::{dequantize, quantize, quantize_signal, QuantizeError, SCALE};
pub use region::{
    builtin_catalog, BoundingBox, GeoPoint, Region, RegionCatalog, RegionError,
    DYNAMIC_REGION_HALF_SIZE,
};
pub use transform::{negate_y, swap_pair};
pub use vk::{convert_verifying_key, render_rust_module, VerifyingKeyJson, VerifyingKeyTable};

impl ProverInput {
    /// Build the backend witness input from a detected point, the target
    /// geofence, and a salt decimal string.
    ///
    /// Quantization happens here, before proving; nothing downstream ever
    /// sees floating point again.
    pub fn from_location(
        point: GeoPoint,
        bounds: BoundingBox,
        salt: &str,
    ) -> Result<Self, QuantizeError> {
        Ok(Self {
            user_lat: quantize_signal(point.lat)?,
            user_lon: quantize_signal(point.lon)?,
            min_lat: quantize_signal(bounds.min_lat)?,
            max_lat: quantize_signal(bounds.max_lat)?,
            min_lon: quantize_signal(bounds.min_lon)?,
            max_lon: quantize_signal(bounds.max_lon)?,
            salt: salt.to_string(),
        })
    }
}
