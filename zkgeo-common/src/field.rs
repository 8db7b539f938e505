//! Fixed-width byte codec for BN254 base-field elements.
//!
//! The pipeline talks to two consumers with opposite byte-order contracts:
//! verifier call arguments are 32-byte big-endian, while the embedded
//! verifying-key constant table is 32-byte little-endian. Both orders are
//! exposed explicitly so a caller can never pick one by accident.

use num_bigint::{BigInt, BigUint, Sign};
use once_cell::sync::Lazy;
use thiserror::Error;

/// Width of a canonical field-element wire encoding.
pub const FIELD_BYTES: usize = 32;

/// BN254 base field modulus (p).
pub const MODULUS_DECIMAL: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";

/// BN254 base field modulus as a big integer.
pub static MODULUS: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(MODULUS_DECIMAL.as_bytes(), 10)
        .expect("modulus literal parses")
});

/// Errors from field-element parsing and encoding.
///
/// Out-of-range values are always a hard error; the codec never silently
/// truncates or reduces.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldCodecError {
    #[error("value {0} is not a valid decimal integer")]
    ParseDecimal(String),

    #[error("value {0} is negative, field elements are non-negative")]
    Negative(String),

    #[error("value is >= the BN254 base field modulus")]
    Overflow,
}

/// Parse a non-negative decimal string into a field element.
///
/// This is the entry point for every coordinate and public signal coming
/// out of the proving backend.
pub fn parse_decimal(s: &str) -> Result<BigUint, FieldCodecError> {
    let value = s
        .trim()
        .parse::<BigInt>()
        .map_err(|_| FieldCodecError::ParseDecimal(s.to_string()))?;
    if value.sign() == Sign::Minus {
        return Err(FieldCodecError::Negative(s.to_string()));
    }
    let value = value.to_biguint().expect("non-negative");
    ensure_in_field(&value)?;
    Ok(value)
}

/// Reject values outside [0, MODULUS).
pub fn ensure_in_field(value: &BigUint) -> Result<(), FieldCodecError> {
    if *value >= *MODULUS {
        Err(FieldCodecError::Overflow)
    } else {
        Ok(())
    }
}

/// Encode a field element as 32 big-endian bytes (verifier argument order).
pub fn encode_be(value: &BigUint) -> Result<[u8; FIELD_BYTES], FieldCodecError> {
    ensure_in_field(value)?;
    let raw = value.to_bytes_be();
    let mut out = [0u8; FIELD_BYTES];
    out[FIELD_BYTES - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// Encode a field element as 32 little-endian bytes (constant-table order).
pub fn encode_le(value: &BigUint) -> Result<[u8; FIELD_BYTES], FieldCodecError> {
    ensure_in_field(value)?;
    let raw = value.to_bytes_le();
    let mut out = [0u8; FIELD_BYTES];
    out[..raw.len()].copy_from_slice(&raw);
    Ok(out)
}

/// Decode 32 big-endian bytes into an integer. Exact inverse of [`encode_be`].
pub fn decode_be(bytes: &[u8; FIELD_BYTES]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Decode 32 little-endian bytes into an integer. Exact inverse of [`encode_le`].
pub fn decode_le(bytes: &[u8; FIELD_BYTES]) -> BigUint {
    BigUint::from_bytes_le(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    #[test]
    fn modulus_matches_decimal_literal() {
        assert_eq!(MODULUS.to_str_radix(10), MODULUS_DECIMAL);
    }

    #[test]
    fn encode_be_pads_on_the_left() {
        let bytes = encode_be(&BigUint::from(0x1234u32)).unwrap();
        assert_eq!(&bytes[..30], &[0u8; 30]);
        assert_eq!(&bytes[30..], &[0x12, 0x34]);
    }

    #[test]
    fn encode_le_pads_on_the_right() {
        let bytes = encode_le(&BigUint::from(0x1234u32)).unwrap();
        assert_eq!(&bytes[..2], &[0x34, 0x12]);
        assert_eq!(&bytes[2..], &[0u8; 30]);
    }

    #[test]
    fn encode_rejects_modulus_and_above() {
        assert_eq!(encode_be(&MODULUS).unwrap_err(), FieldCodecError::Overflow);
        let above = &*MODULUS + BigUint::one();
        assert_eq!(encode_le(&above).unwrap_err(), FieldCodecError::Overflow);
    }

    #[test]
    fn max_element_round_trips() {
        let max = &*MODULUS - BigUint::one();
        assert_eq!(decode_be(&encode_be(&max).unwrap()), max);
        assert_eq!(decode_le(&encode_le(&max).unwrap()), max);
    }

    #[test]
    fn zero_round_trips() {
        let zero = BigUint::zero();
        assert_eq!(encode_be(&zero).unwrap(), [0u8; 32]);
        assert_eq!(decode_le(&encode_le(&zero).unwrap()), zero);
    }

    #[test]
    fn parse_decimal_rejects_negative_and_garbage() {
        assert_eq!(
            parse_decimal("-5").unwrap_err(),
            FieldCodecError::Negative("-5".to_string())
        );
        assert!(matches!(
            parse_decimal("not-a-number"),
            Err(FieldCodecError::ParseDecimal(_))
        ));
        assert_eq!(
            parse_decimal(MODULUS_DECIMAL).unwrap_err(),
            FieldCodecError::Overflow
        );
    }

    #[test]
    fn parse_decimal_accepts_boundary_value() {
        let max = (&*MODULUS - BigUint::one()).to_str_radix(10);
        assert_eq!(parse_decimal(&max).unwrap(), &*MODULUS - BigUint::one());
    }

    proptest! {
        #[test]
        fn be_round_trip(raw in proptest::collection::vec(any::<u8>(), 0..32)) {
            let value = BigUint::from_bytes_be(&raw);
            prop_assume!(value < *MODULUS);
            prop_assert_eq!(decode_be(&encode_be(&value).unwrap()), value);
        }

        #[test]
        fn le_round_trip(raw in proptest::collection::vec(any::<u8>(), 0..32)) {
            let value = BigUint::from_bytes_le(&raw);
            prop_assume!(value < *MODULUS);
            prop_assert_eq!(decode_le(&encode_le(&value).unwrap()), value);
        }

        #[test]
        fn be_and_le_agree_on_value(v in any::<u64>()) {
            let value = BigUint::from(v);
            let be = encode_be(&value).unwrap();
            let mut le = encode_le(&value).unwrap();
            le.reverse();
            prop_assert_eq!(be, le);
        }
    }
}
