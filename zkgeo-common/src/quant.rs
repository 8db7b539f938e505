//! Deterministic quantization of geographic degrees into circuit integers.
//!
//! Coordinates enter the circuit as `round(degree * 1e6)`. The field has no
//! native sign, so negative quantized values are emitted as signed decimal
//! strings and the external circuit applies its two's-complement-equivalent
//! mapping; this crate never reduces them itself.

use thiserror::Error;

/// Fixed-point scale: one millionth of a degree (~0.11 m at the equator).
pub const SCALE: i64 = 1_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum QuantizeError {
    #[error("coordinate {0} is not a finite number")]
    NotFinite(f64),
}

/// Quantize a degree value to a fixed-point integer.
pub fn quantize(degree: f64) -> Result<i64, QuantizeError> {
    if !degree.is_finite() {
        return Err(QuantizeError::NotFinite(degree));
    }
    Ok((degree * SCALE as f64).round() as i64)
}

/// Invert [`quantize`] for values it produced.
///
/// Not required to invert arbitrary integers; precision loss against the
/// original degree value is bounded by `1 / SCALE`.
pub fn dequantize(quantized: i64) -> f64 {
    quantized as f64 / SCALE as f64
}

/// Quantize a degree value to the signed decimal string the proving
/// backend expects as witness input.
pub fn quantize_signal(degree: f64) -> Result<String, QuantizeError> {
    Ok(quantize(degree)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quantizes_known_boundary() {
        // min_lat of the campus region from the worked example.
        assert_eq!(quantize(42.265).unwrap(), 42_265_000);
    }

    #[test]
    fn negative_longitudes_keep_their_sign() {
        assert_eq!(quantize(-83.7382).unwrap(), -83_738_200);
        assert_eq!(quantize_signal(-83.7382).unwrap(), "-83738200");
    }

    #[test]
    fn rejects_non_finite_input() {
        assert!(matches!(
            quantize(f64::NAN),
            Err(QuantizeError::NotFinite(_))
        ));
        assert!(quantize(f64::INFINITY).is_err());
    }

    #[test]
    fn zero_is_zero() {
        assert_eq!(quantize(0.0).unwrap(), 0);
        assert_eq!(dequantize(0), 0.0);
    }

    proptest! {
        #[test]
        fn round_trip_error_is_bounded(deg in -180.0f64..180.0f64) {
            let q = quantize(deg).unwrap();
            let back = dequantize(q);
            prop_assert!((back - deg).abs() <= 1.0 / SCALE as f64);
        }

        #[test]
        fn quantize_is_monotonic(a in -90.0f64..90.0f64, b in -90.0f64..90.0f64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(quantize(lo).unwrap() <= quantize(hi).unwrap());
        }
    }
}
