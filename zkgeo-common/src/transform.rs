//! Group-element transformations between the proving backend's
//! representation and the on-chain verifier's.
//!
//! The backend emits snarkjs-native points; the fixed-function verifier
//! wants the first G1 element with a negated y-coordinate and every G2
//! coordinate pair with its two sub-coordinates swapped. Neither mismatch
//! is caught by type-checking, so both the per-request packer and the
//! one-time verifying-key converter must route through this module.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::field::MODULUS;

/// Negate a y-coordinate: `MODULUS - y` for `0 < y < MODULUS`.
///
/// `y == 0` maps to 0, not to `MODULUS`; the identity point keeps its
/// canonical encoding and the result stays inside the field.
pub fn negate_y(y: &BigUint) -> BigUint {
    if y.is_zero() {
        BigUint::zero()
    } else {
        &*MODULUS - y
    }
}

/// Swap the two sub-coordinates of a G2 coordinate pair.
///
/// Applied identically to the x pair and the y pair of every G2 element.
pub fn swap_pair<T>(pair: [T; 2]) -> [T; 2] {
    let [a, b] = pair;
    [b, a]
}
