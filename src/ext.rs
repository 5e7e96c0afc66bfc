use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

use crate::error::EncodingError;

pub trait DecimalExt {
    /// Drops the fractional part, rounding toward zero.
    fn truncate_to_integer(&self) -> BigInt;

    /// Encodes a non-negative integral value as `0x`-prefixed hex.
    fn to_hex_quantity(&self) -> Result<String, EncodingError>;

    /// Plain notation with trailing zeros removed (`1.50` → `1.5`, `1E+2` → `100`).
    fn to_trimmed_string(&self) -> String;
}

impl DecimalExt for BigDecimal {
    fn truncate_to_integer(&self) -> BigInt {
        let (int, _) = self
            .with_scale_round(0, RoundingMode::Down)
            .into_bigint_and_exponent();
        int
    }

    fn to_hex_quantity(&self) -> Result<String, EncodingError> {
        if self.is_negative() {
            return Err(EncodingError::Negative(self.clone()));
        }
        if !self.is_integer() {
            return Err(EncodingError::Fractional(self.clone()));
        }
        self.truncate_to_integer().to_hex_quantity()
    }

    fn to_trimmed_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        self.normalized().to_plain_string()
    }
}

pub trait BigIntExt: Sized {
    fn to_hex_quantity(&self) -> Result<String, EncodingError>;
    fn from_hex_quantity(value: &str) -> Result<Self, EncodingError>;
}

impl BigIntExt for BigInt {
    fn to_hex_quantity(&self) -> Result<String, EncodingError> {
        if self.sign() == Sign::Minus {
            return Err(EncodingError::Negative(BigDecimal::from(self.clone())));
        }
        let (_, bytes) = self.to_bytes_be();
        let encoded = hex::encode(bytes);
        let digits = encoded.trim_start_matches('0');
        if digits.is_empty() {
            Ok("0x0".to_string())
        } else {
            Ok(format!("0x{digits}"))
        }
    }

    fn from_hex_quantity(value: &str) -> Result<Self, EncodingError> {
        let invalid = || EncodingError::InvalidHex(value.to_string());

        let (sign, body) = match value.strip_prefix('-') {
            Some(rest) => (Sign::Minus, rest),
            None => (Sign::Plus, value),
        };
        let digits = body.strip_prefix("0x").ok_or_else(invalid)?;
        if digits.is_empty() {
            return Err(invalid());
        }

        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let bytes = hex::decode(padded).map_err(|_| invalid())?;

        Ok(BigInt::from_bytes_be(sign, &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn hex_quantity_is_minimal_lowercase() {
        assert_eq!(dec("4").to_hex_quantity().unwrap(), "0x4");
        assert_eq!(dec("0").to_hex_quantity().unwrap(), "0x0");
        assert_eq!(dec("255").to_hex_quantity().unwrap(), "0xff");
        assert_eq!(dec("4096").to_hex_quantity().unwrap(), "0x1000");
        assert_eq!(
            dec("1000000000000000000").to_hex_quantity().unwrap(),
            "0xde0b6b3a7640000"
        );
    }

    #[test]
    fn hex_quantity_rejects_negative_and_fractional() {
        assert!(matches!(
            dec("-1").to_hex_quantity(),
            Err(EncodingError::Negative(_))
        ));
        assert!(matches!(
            dec("1.5").to_hex_quantity(),
            Err(EncodingError::Fractional(_))
        ));
    }

    #[test]
    fn integral_value_with_trailing_zero_scale_is_accepted() {
        assert_eq!(dec("16.000").to_hex_quantity().unwrap(), "0x10");
    }

    #[test]
    fn parses_hex_results() {
        assert_eq!(BigInt::from_hex_quantity("0x1f").unwrap(), BigInt::from(31));
        assert_eq!(BigInt::from_hex_quantity("0x0").unwrap(), BigInt::from(0));
        assert_eq!(BigInt::from_hex_quantity("-0x2").unwrap(), BigInt::from(-2));
        assert!(BigInt::from_hex_quantity("1f").is_err());
        assert!(BigInt::from_hex_quantity("0x").is_err());
        assert!(BigInt::from_hex_quantity("0xzz").is_err());
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(dec("1.999").truncate_to_integer(), BigInt::from(1));
        assert_eq!(dec("-1.999").truncate_to_integer(), BigInt::from(-1));
    }

    #[test]
    fn trimmed_string_drops_trailing_zeros() {
        assert_eq!(dec("1.500").to_trimmed_string(), "1.5");
        assert_eq!(dec("100").to_trimmed_string(), "100");
        assert_eq!(dec("0.000").to_trimmed_string(), "0");
    }
}
