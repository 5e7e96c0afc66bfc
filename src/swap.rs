//! Swap form state machine.
//!
//! [`reduce`] is the only way a [`SwapState`] changes. It is pure: the caller
//! owns the current state and replaces it with the returned one.

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::Zero;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    ext::DecimalExt,
    types::{
        CurrencyAmount, CurrencyId, Field, Side, SwapAction, SwapState, currency::max_amount_spend,
    },
};

/// Quick-select percentages offered next to an amount field
pub const COMMON_PERCENTS: [u8; 4] = [25, 50, 75, 100];

/// Computes the state that follows `state` once `action` is applied.
pub fn reduce(state: &SwapState, action: SwapAction) -> SwapState {
    let next = match action {
        SwapAction::ReplaceState {
            field,
            typed_value,
            input_currency_id,
            output_currency_id,
            recipient,
        } => {
            let output_currency_id = match (&input_currency_id, output_currency_id) {
                (Some(input), Some(output)) if *input == output => None,
                (_, output) => output,
            };
            SwapState {
                independent_field: field,
                typed_value,
                input: Side::new(input_currency_id),
                output: Side::new(output_currency_id),
                recipient,
            }
        }
        SwapAction::SelectCurrency { field, currency_id } => {
            let other = field.other();
            let mut next = state.clone();

            if state.currency(other) == Some(&currency_id) {
                next.independent_field = state.independent_field.other();
                next.side_mut(other).currency_id = state.side(field).currency_id.clone();
                next.side_mut(other).percent = 0;
            }
            let side = next.side_mut(field);
            side.currency_id = Some(currency_id);
            side.percent = 0;
            next
        }
        SwapAction::SelectPercent {
            field,
            percent,
            value,
        } => {
            debug_assert!(percent <= 100, "percent {percent} above 100");
            let mut next = state.clone();
            next.independent_field = field;
            next.typed_value = value;
            next.side_mut(field).percent = percent;
            next
        }
        SwapAction::SwitchCurrencies => SwapState {
            independent_field: state.independent_field.other(),
            input: Side {
                percent: 0,
                ..state.output.clone()
            },
            output: state.input.clone(),
            ..state.clone()
        },
        SwapAction::TypeInput { field, typed_value } => SwapState {
            independent_field: field,
            typed_value,
            input: Side::new(state.input.currency_id.clone()),
            output: Side::new(state.output.currency_id.clone()),
            ..state.clone()
        },
        SwapAction::SetRecipient { recipient } => SwapState {
            recipient,
            ..state.clone()
        },
    };

    debug_assert!(
        next.has_distinct_currencies(),
        "both swap sides hold {:?}",
        next.input.currency_id
    );
    next
}

/// Owner of the current swap state
#[derive(Debug, Clone, Default)]
pub struct SwapStore {
    state: SwapState,
}

impl SwapStore {
    pub fn new(state: SwapState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    /// Applies `action`, replacing the held state wholesale.
    pub fn dispatch(&mut self, action: SwapAction) -> &SwapState {
        debug!(?action, "Dispatching swap action");
        self.state = reduce(&self.state, action);
        &self.state
    }
}

/// Per-currency balances in display units
pub trait BalanceLookup {
    fn balance_of(&self, currency: &CurrencyId) -> Option<BigDecimal>;
}

impl BalanceLookup for HashMap<CurrencyId, BigDecimal> {
    fn balance_of(&self, currency: &CurrencyId) -> Option<BigDecimal> {
        self.get(currency).cloned()
    }
}

/// Builds the `SelectPercent` action for `percent` of the spendable balance on `field`.
///
/// Returns `None` when no currency is selected on that side or `percent` is above 100.
/// A currency without a known balance selects zero.
pub fn percent_selection(
    state: &SwapState,
    field: Field,
    percent: u8,
    balances: &impl BalanceLookup,
) -> Option<SwapAction> {
    if percent > 100 {
        return None;
    }
    let currency = state.currency(field)?;
    let balance = balances.balance_of(currency).unwrap_or_else(BigDecimal::zero);
    let spendable = max_amount_spend(&CurrencyAmount::new(currency.clone(), balance));

    let value = (spendable.amount * BigDecimal::from(percent) / BigDecimal::from(100))
        .with_scale_round(i64::from(currency.decimals()), RoundingMode::Down);

    Some(SwapAction::SelectPercent {
        field,
        percent,
        value: value.to_trimmed_string(),
    })
}
