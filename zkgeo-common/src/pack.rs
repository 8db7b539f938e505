//! Packing of backend proofs and public signals into verifier wire form.
//!
//! The proving backend is an opaque snarkjs-style function: decimal-string
//! coordinates in, decimal-string coordinates out. The on-chain verifier
//! wants 32-byte big-endian operands with `proof_a.y` negated and both G2
//! coordinate pairs swapped. This module owns that translation end to end
//! so the per-request path and the verifying-key converter can never
//! disagree on it.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{encode_be, parse_decimal, FieldCodecError, FIELD_BYTES};
use crate::transform::{negate_y, swap_pair};

#[derive(Debug, Error, PartialEq)]
pub enum PackError {
    #[error(transparent)]
    Codec(#[from] FieldCodecError),

    #[error("layout {layout:?} expects {expected} public signals, got {got}")]
    SignalCount {
        layout: SignalLayout,
        expected: usize,
        got: usize,
    },

    #[error("proof element {element} has {got} coordinate entries, expected {expected}")]
    PointShape {
        element: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("proof element {0} is not an affine point")]
    NotAffine(&'static str),

    #[error("unsupported proof protocol {0:?}, expected groth16")]
    UnsupportedProtocol(String),

    #[error("unsupported proof curve {0:?}, expected bn128")]
    UnsupportedCurve(String),

    #[error("IC table has {got} entries, expected nPublic + 1 = {expected}")]
    IcLength { expected: usize, got: usize },
}

/// Versioned public-signal contract of the deployed circuit.
///
/// The circuit went through layouts that exposed four bounding-box signals,
/// four plus a trailing nullifier, and four plus a leading nullifier. The
/// layout is chosen explicitly per deployment; a signal count that does not
/// match the declared layout is a hard error, never resolved by guessing
/// from the array length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalLayout {
    /// Four signals: `[min_lat, max_lat, min_lon, max_lon]`.
    V1,
    /// Five signals, nullifier at index 4.
    V2TrailingNullifier,
    /// Five signals, nullifier at index 0.
    V2LeadingNullifier,
}

impl SignalLayout {
    pub fn signal_count(&self) -> usize {
        match self {
            SignalLayout::V1 => 4,
            SignalLayout::V2TrailingNullifier | SignalLayout::V2LeadingNullifier => 5,
        }
    }

    /// Index of the first bounding-box signal.
    fn bounds_offset(&self) -> usize {
        match self {
            SignalLayout::V2LeadingNullifier => 1,
            _ => 0,
        }
    }

    fn nullifier_index(&self) -> Option<usize> {
        match self {
            SignalLayout::V1 => None,
            SignalLayout::V2TrailingNullifier => Some(4),
            SignalLayout::V2LeadingNullifier => Some(0),
        }
    }
}

/// Witness input for the membership circuit, as the backend consumes it.
///
/// Every value is a decimal string; coordinates are quantized and may be
/// negative (the circuit applies the field's sign convention).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProverInput {
    #[serde(rename = "userLat")]
    pub user_lat: String,
    #[serde(rename = "userLon")]
    pub user_lon: String,
    #[serde(rename = "minLat")]
    pub min_lat: String,
    #[serde(rename = "maxLat")]
    pub max_lat: String,
    #[serde(rename = "minLon")]
    pub min_lon: String,
    #[serde(rename = "maxLon")]
    pub max_lon: String,
    pub salt: String,
}

/// A Groth16 proof in the backend's native JSON shape.
///
/// Coordinates are projective; the third coordinate must be the affine
/// marker and is dropped during packing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Groth16ProofJson {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub curve: Option<String>,
}

/// Full backend response: proof plus ordered public signals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProverResponse {
    pub proof: Groth16ProofJson,
    #[serde(rename = "publicSignals")]
    pub public_signals: Vec<String>,
}

/// Proof operands in verifier wire form: 8 x 32 bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPacked {
    /// A with the y-coordinate negated.
    pub proof_a: [[u8; FIELD_BYTES]; 2],
    /// B with both coordinate pairs swapped.
    pub proof_b: [[[u8; FIELD_BYTES]; 2]; 2],
    /// C unchanged.
    pub proof_c: [[u8; FIELD_BYTES]; 2],
}

impl ProofPacked {
    pub const BYTES: usize = 8 * FIELD_BYTES;

    /// Concatenated operand bytes in verifier order:
    /// `a.x, a.y', b.x0, b.x1, b.y0, b.y1, c.x, c.y`.
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut out = [0u8; Self::BYTES];
        let words = [
            &self.proof_a[0],
            &self.proof_a[1],
            &self.proof_b[0][0],
            &self.proof_b[0][1],
            &self.proof_b[1][0],
            &self.proof_b[1][1],
            &self.proof_c[0],
            &self.proof_c[1],
        ];
        for (i, word) in words.iter().enumerate() {
            out[i * FIELD_BYTES..(i + 1) * FIELD_BYTES].copy_from_slice(*word);
        }
        out
    }
}

/// Named public inputs in verifier wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputsPacked {
    pub min_lat: [u8; FIELD_BYTES],
    pub max_lat: [u8; FIELD_BYTES],
    pub min_lon: [u8; FIELD_BYTES],
    pub max_lon: [u8; FIELD_BYTES],
    /// Present only for layouts that expose a nullifier signal. Not part
    /// of the V1 instruction payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullifier: Option<[u8; FIELD_BYTES]>,
}

impl PublicInputsPacked {
    pub const BOUNDS_BYTES: usize = 4 * FIELD_BYTES;

    /// Concatenated bounding-box operands: `min_lat, max_lat, min_lon, max_lon`.
    pub fn bounds_bytes(&self) -> [u8; Self::BOUNDS_BYTES] {
        let mut out = [0u8; Self::BOUNDS_BYTES];
        for (i, word) in [&self.min_lat, &self.max_lat, &self.min_lon, &self.max_lon]
            .iter()
            .enumerate()
        {
            out[i * FIELD_BYTES..(i + 1) * FIELD_BYTES].copy_from_slice(*word);
        }
        out
    }
}

/// Pack a backend proof into verifier operands.
pub fn pack_proof(proof: &Groth16ProofJson) -> Result<ProofPacked, PackError> {
    ensure_groth16_bn254(proof)?;

    let (a_x, a_y) = g1_affine(&proof.pi_a, "pi_a")?;
    let (b_x, b_y) = g2_affine(&proof.pi_b, "pi_b")?;
    let (c_x, c_y) = g1_affine(&proof.pi_c, "pi_c")?;

    let [b_x0, b_x1] = swap_pair(b_x);
    let [b_y0, b_y1] = swap_pair(b_y);

    Ok(ProofPacked {
        proof_a: [encode_be(&a_x)?, encode_be(&negate_y(&a_y))?],
        proof_b: [
            [encode_be(&b_x0)?, encode_be(&b_x1)?],
            [encode_be(&b_y0)?, encode_be(&b_y1)?],
        ],
        proof_c: [encode_be(&c_x)?, encode_be(&c_y)?],
    })
}

/// Pack the ordered public signals for the declared layout.
pub fn pack_public_signals(
    layout: SignalLayout,
    signals: &[String],
) -> Result<PublicInputsPacked, PackError> {
    let expected = layout.signal_count();
    if signals.len() != expected {
        return Err(PackError::SignalCount {
            layout,
            expected,
            got: signals.len(),
        });
    }

    let encode = |s: &String| -> Result<[u8; FIELD_BYTES], PackError> {
        Ok(encode_be(&parse_decimal(s)?)?)
    };

    let o = layout.bounds_offset();
    Ok(PublicInputsPacked {
        min_lat: encode(&signals[o])?,
        max_lat: encode(&signals[o + 1])?,
        min_lon: encode(&signals[o + 2])?,
        max_lon: encode(&signals[o + 3])?,
        nullifier: layout
            .nullifier_index()
            .map(|i| encode(&signals[i]))
            .transpose()?,
    })
}

/// Pack a full backend response in one step.
pub fn pack_response(
    layout: SignalLayout,
    response: &ProverResponse,
) -> Result<(ProofPacked, PublicInputsPacked), PackError> {
    let proof = pack_proof(&response.proof)?;
    let inputs = pack_public_signals(layout, &response.public_signals)?;
    Ok((proof, inputs))
}

fn ensure_groth16_bn254(proof: &Groth16ProofJson) -> Result<(), PackError> {
    if let Some(protocol) = &proof.protocol {
        if protocol != "groth16" {
            return Err(PackError::UnsupportedProtocol(protocol.clone()));
        }
    }
    if let Some(curve) = &proof.curve {
        if curve != "bn128" {
            return Err(PackError::UnsupportedCurve(curve.clone()));
        }
    }
    Ok(())
}

pub(crate) fn g1_affine(
    coords: &[String],
    element: &'static str,
) -> Result<(BigUint, BigUint), PackError> {
    match coords.len() {
        2 => {}
        3 => {
            if coords[2].trim() != "1" {
                return Err(PackError::NotAffine(element));
            }
        }
        got => {
            return Err(PackError::PointShape {
                element,
                expected: "2 (affine) or 3 (projective)",
                got,
            })
        }
    }
    Ok((parse_decimal(&coords[0])?, parse_decimal(&coords[1])?))
}

pub(crate) type G2Pair = [BigUint; 2];

pub(crate) fn g2_affine(
    coords: &[Vec<String>],
    element: &'static str,
) -> Result<(G2Pair, G2Pair), PackError> {
    match coords.len() {
        2 => {}
        3 => {
            let z = &coords[2];
            let affine = z.len() == 2 && z[0].trim() == "1" && z[1].trim() == "0";
            if !affine {
                return Err(PackError::NotAffine(element));
            }
        }
        got => {
            return Err(PackError::PointShape {
                element,
                expected: "2 (affine) or 3 (projective)",
                got,
            })
        }
    }
    let pair = |c: &Vec<String>| -> Result<G2Pair, PackError> {
        if c.len() != 2 {
            return Err(PackError::PointShape {
                element,
                expected: "2",
                got: c.len(),
            });
        }
        Ok([parse_decimal(&c[0])?, parse_decimal(&c[1])?])
    };
    Ok((pair(&coords[0])?, pair(&coords[1])?))
}
