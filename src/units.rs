//! Conversion between display units and on-chain base units.
//!
//! Base units are the wire-level integers a contract sees. Display units are
//! what a user types. The two are related by a fixed power of ten per asset.
//! Every conversion here is exact decimal arithmetic; converting *to* base
//! units rounds toward zero so a transfer never exceeds what was asked for.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::str::FromStr;

use crate::{error::EncodingError, ext::DecimalExt, types::CurrencyId};

/// Decimals of ICX and of every token not listed as a stablecoin.
pub const DEFAULT_DECIMALS: u32 = 18;
/// Decimals of the bridged USD stablecoins (`IUSDC`, `IUSDT`).
pub const STABLE_DECIMALS: u32 = 6;

/// Decimals for an optional currency key, defaulting to 18.
pub fn decimals_of(currency: Option<&CurrencyId>) -> u32 {
    currency.map(CurrencyId::decimals).unwrap_or(DEFAULT_DECIMALS)
}

fn ten_pow(exponent: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(1), -i64::from(exponent))
}

/// Display units → base units, flooring toward zero.
pub fn to_base_units(value: &BigDecimal, decimals: u32) -> BigInt {
    (value * ten_pow(decimals)).truncate_to_integer()
}

/// Base units → display units. Exact.
pub fn to_display_units(value: &BigInt, decimals: u32) -> BigDecimal {
    BigDecimal::new(value.clone(), i64::from(decimals))
}

/// Shifts any decimal value down by `decimals` places. Exact.
pub fn scale_down(value: &BigDecimal, decimals: u32) -> BigDecimal {
    value * BigDecimal::new(BigInt::from(1), i64::from(decimals))
}

/// [`to_base_units`] using the currency's own decimals.
pub fn to_base_units_for(value: &BigDecimal, currency: Option<&CurrencyId>) -> BigInt {
    to_base_units(value, decimals_of(currency))
}

/// [`to_display_units`] using the currency's own decimals.
pub fn to_display_units_for(value: &BigInt, currency: Option<&CurrencyId>) -> BigDecimal {
    to_display_units(value, decimals_of(currency))
}

/// Parses a user-supplied amount without going through floating point.
pub fn parse_amount(value: &str) -> Result<BigDecimal, EncodingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EncodingError::InvalidDecimal(value.to_string()));
    }
    BigDecimal::from_str(trimmed).map_err(|_| EncodingError::InvalidDecimal(value.to_string()))
}
