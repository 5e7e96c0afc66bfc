use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

use crate::units::{DEFAULT_DECIMALS, STABLE_DECIMALS};

/// Native asset of the chain. Everything else is an IRC-2 token contract.
pub const ICX: &str = "ICX";
/// Staked ICX, the only currency ICX converts to directly.
pub const SICX: &str = "sICX";

/// Reserve kept back from the ICX balance so the account can still pay fees.
pub const MINIMUM_ICX_FOR_ACTION: u32 = 2;

/// Currency key as used by the exchange (`"ICX"`, `"sICX"`, `"bnUSD"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyId(String);

impl CurrencyId {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn icx() -> Self {
        Self::new(ICX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sicx() -> Self {
        Self::new(SICX)
    }

    pub fn is_icx(&self) -> bool {
        self.0 == ICX
    }

    pub fn is_sicx(&self) -> bool {
        self.0 == SICX
    }

    /// Number of decimals between display units and base units.
    pub fn decimals(&self) -> u32 {
        match self.0.as_str() {
            "IUSDC" | "IUSDT" => STABLE_DECIMALS,
            _ => DEFAULT_DECIMALS,
        }
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for CurrencyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A display-unit amount of a given currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: CurrencyId,
    pub amount: BigDecimal,
}

impl CurrencyAmount {
    pub fn new(currency: CurrencyId, amount: BigDecimal) -> Self {
        Self { currency, amount }
    }
}

/// Largest amount of `amount.currency` that can be spent in one action.
///
/// ICX keeps [`MINIMUM_ICX_FOR_ACTION`] back for fees and never goes below zero;
/// tokens can be spent in full.
pub fn max_amount_spend(amount: &CurrencyAmount) -> CurrencyAmount {
    if !amount.currency.is_icx() {
        return amount.clone();
    }

    let reserve = BigDecimal::from(MINIMUM_ICX_FOR_ACTION);
    let spendable = if amount.amount > reserve {
        &amount.amount - reserve
    } else {
        BigDecimal::zero()
    };

    CurrencyAmount::new(amount.currency.clone(), spendable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(currency: &str, value: &str) -> CurrencyAmount {
        CurrencyAmount::new(CurrencyId::new(currency), BigDecimal::from_str(value).unwrap())
    }

    #[test]
    fn stablecoins_use_six_decimals() {
        assert_eq!(CurrencyId::new("IUSDC").decimals(), 6);
        assert_eq!(CurrencyId::new("IUSDT").decimals(), 6);
        assert_eq!(CurrencyId::new("bnUSD").decimals(), 18);
        assert_eq!(CurrencyId::icx().decimals(), 18);
    }

    #[test]
    fn icx_keeps_a_fee_reserve() {
        let spend = max_amount_spend(&amount("ICX", "10.5"));
        assert_eq!(spend.amount, BigDecimal::from_str("8.5").unwrap());
    }

    #[test]
    fn icx_below_reserve_spends_nothing() {
        assert!(max_amount_spend(&amount("ICX", "1.9")).amount.is_zero());
        assert!(max_amount_spend(&amount("ICX", "2")).amount.is_zero());
    }

    #[test]
    fn tokens_spend_everything() {
        let balance = amount("sICX", "3.25");
        assert_eq!(max_amount_spend(&balance), balance);
    }
}
