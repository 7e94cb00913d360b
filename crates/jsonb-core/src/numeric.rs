//! Exact numeric values stored in containers.
//!
//! Numbers are arbitrary-precision decimals. On the wire a number is its
//! scale (little-endian `i64`) followed by the unscaled digits as a
//! little-endian two's-complement integer; the payload starts at a
//! [`Numeric::ALIGN`]-byte boundary of the payload region.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError};
use jsonb_buffers::{Reader, Writer};
use num_bigint::BigInt;

use crate::error::{JsonbError, Result};

const SCALE_LEN: usize = 8;

/// Largest accepted scale magnitude, positive or negative.
pub const MAX_SCALE: i64 = 0x3FFF;

/// An exact, totally ordered decimal number.
///
/// Equality and ordering are numeric, so `1.50 == 1.5` even though the two
/// serialize differently.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeric(pub BigDecimal);

impl Numeric {
    /// Alignment of a numeric payload within the payload region.
    pub const ALIGN: usize = 4;

    pub fn new(value: BigDecimal) -> Self {
        Numeric(value)
    }

    /// Whether the scale is within `±MAX_SCALE` and so can be stored.
    pub fn is_storable(&self) -> bool {
        let (_, scale) = self.0.as_bigint_and_exponent();
        (-MAX_SCALE..=MAX_SCALE).contains(&scale)
    }

    /// Deterministic byte serialization.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (digits, scale) = self.0.as_bigint_and_exponent();
        let magnitude = digits.to_signed_bytes_le();
        let mut writer = Writer::with_capacity(SCALE_LEN + magnitude.len());
        writer.i64(scale);
        writer.buf(&magnitude);
        writer.into_inner()
    }

    /// Inverse of [`Numeric::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() <= SCALE_LEN {
            return Err(JsonbError::InvalidNumeric);
        }
        let reader = Reader::new(bytes);
        let scale = reader.i64(0)?;
        if !(-MAX_SCALE..=MAX_SCALE).contains(&scale) {
            return Err(JsonbError::InvalidNumeric);
        }
        let digits = BigInt::from_signed_bytes_le(reader.tail(SCALE_LEN)?);
        Ok(Numeric(BigDecimal::new(digits, scale)))
    }

    /// Serialization of the normalized value (trailing zeros stripped).
    ///
    /// Numerically equal values share these bytes, which makes them the
    /// right input for hashing.
    pub fn normalized_bytes(&self) -> Vec<u8> {
        Numeric(self.0.normalized()).to_bytes()
    }
}

impl From<i64> for Numeric {
    fn from(v: i64) -> Self {
        Numeric(BigDecimal::from(v))
    }
}

impl From<BigDecimal> for Numeric {
    fn from(v: BigDecimal) -> Self {
        Numeric(v)
    }
}

impl FromStr for Numeric {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let n = Numeric(s.parse::<BigDecimal>()?);
        if !n.is_storable() {
            return Err(ParseBigDecimalError::Other(format!("scale of {s:?} out of range")));
        }
        Ok(n)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Numeric {
        s.parse().unwrap()
    }

    #[test]
    fn bytes_roundtrip() {
        for s in ["0", "1", "-1", "3.14159", "-0.001", "12345678901234567890123", "1e40"] {
            let n = num(s);
            assert_eq!(Numeric::from_bytes(&n.to_bytes()).unwrap(), n, "{s}");
        }
    }

    #[test]
    fn scale_is_preserved() {
        let n = num("1.50");
        let back = Numeric::from_bytes(&n.to_bytes()).unwrap();
        assert_eq!(back.to_string(), "1.50");
    }

    #[test]
    fn numeric_equality_ignores_scale() {
        assert_eq!(num("1.50"), num("1.5"));
        assert_ne!(num("1.50").to_bytes(), num("1.5").to_bytes());
        assert_eq!(num("1.50").normalized_bytes(), num("1.5").normalized_bytes());
    }

    #[test]
    fn total_order() {
        assert!(num("-2") < num("-1.5"));
        assert!(num("-1.5") < num("0"));
        assert!(num("0.1") < num("0.11"));
        assert!(num("99") < num("100"));
    }

    #[test]
    fn short_payload_is_rejected() {
        assert_eq!(Numeric::from_bytes(&[0; 8]), Err(JsonbError::InvalidNumeric));
        assert_eq!(Numeric::from_bytes(&[]), Err(JsonbError::InvalidNumeric));
    }

    #[test]
    fn scale_is_bounded() {
        assert!("1e16000".parse::<Numeric>().is_ok());
        assert!("1e20000".parse::<Numeric>().is_err());
        let mut bytes = num("7").to_bytes();
        bytes[..8].copy_from_slice(&i64::MIN.to_le_bytes());
        assert_eq!(Numeric::from_bytes(&bytes), Err(JsonbError::InvalidNumeric));
    }
}
