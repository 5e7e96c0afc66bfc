pub mod currency;
pub mod swap;

pub use currency::{CurrencyAmount, CurrencyId};
pub use swap::{Field, Side, SwapAction, SwapState};
