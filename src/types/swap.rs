use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::currency::CurrencyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Field {
    Input,
    Output,
}

impl Field {
    pub fn other(self) -> Self {
        match self {
            Field::Input => Field::Output,
            Field::Output => Field::Input,
        }
    }
}

/// One side of the swap form.
///
/// `percent` is the last quick-select applied to this side. The output side
/// only ever gets a non-zero percent through an explicit `SelectPercent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Side {
    pub currency_id: Option<CurrencyId>,
    pub percent: u8,
}

impl Side {
    pub fn new(currency_id: Option<CurrencyId>) -> Self {
        Self {
            currency_id,
            percent: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapState {
    /// Side whose amount was typed directly; the other one is derived.
    pub independent_field: Field,
    /// Raw user input, kept verbatim so partial decimals like `"1."` survive.
    pub typed_value: String,
    pub input: Side,
    pub output: Side,
    /// `None` sends the output to the sender.
    pub recipient: Option<String>,
}

impl SwapState {
    pub fn side(&self, field: Field) -> &Side {
        match field {
            Field::Input => &self.input,
            Field::Output => &self.output,
        }
    }

    pub fn side_mut(&mut self, field: Field) -> &mut Side {
        match field {
            Field::Input => &mut self.input,
            Field::Output => &mut self.output,
        }
    }

    pub fn currency(&self, field: Field) -> Option<&CurrencyId> {
        self.side(field).currency_id.as_ref()
    }

    /// Both sides never hold the same currency.
    pub fn has_distinct_currencies(&self) -> bool {
        match (&self.input.currency_id, &self.output.currency_id) {
            (Some(input), Some(output)) => input != output,
            _ => true,
        }
    }
}

impl Default for SwapState {
    fn default() -> Self {
        Self {
            independent_field: Field::Input,
            typed_value: String::new(),
            input: Side::new(Some(CurrencyId::new("sICX"))),
            output: Side::new(Some(CurrencyId::new("bnUSD"))),
            recipient: None,
        }
    }
}

/// Every way the swap form can change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SwapAction {
    /// Full reset, e.g. when restoring from a URL.
    #[serde(rename_all = "camelCase")]
    ReplaceState {
        field: Field,
        typed_value: String,
        input_currency_id: Option<CurrencyId>,
        output_currency_id: Option<CurrencyId>,
        recipient: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SelectCurrency { field: Field, currency_id: CurrencyId },
    /// `value` is the display amount already computed by the caller for `percent`.
    SelectPercent { field: Field, percent: u8, value: String },
    SwitchCurrencies,
    #[serde(rename_all = "camelCase")]
    TypeInput { field: Field, typed_value: String },
    SetRecipient { recipient: Option<String> },
}
