use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{
    contracts::{Contract, PoolId},
    payload::PayloadBuilder,
    transport::Transport,
    types::Params,
};
use crate::{
    config::{AddressBook, Settings},
    error::{ClientError, PayloadError, SwapError, TransportError},
    ext::BigIntExt,
    types::CurrencyId,
    units::{DEFAULT_DECIMALS, to_display_units, to_display_units_for},
};

/// Read-only contract queries
pub struct ClientService<T> {
    transport: Arc<T>,
    builder: PayloadBuilder,
    addresses: AddressBook,
}

impl<T: Transport> ClientService<T> {
    pub fn new(transport: Arc<T>, settings: &Settings) -> Self {
        let mut builder = PayloadBuilder::new(settings.network).with_step_limit(settings.step_limit);
        if let Some(account) = &settings.account {
            builder = builder.with_account(account.clone());
        }

        Self {
            transport,
            builder,
            addresses: settings.addresses.clone(),
        }
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    /// Calls a read-only `method` on `contract` after checking it against the method table.
    pub async fn call(
        &self,
        contract: Contract,
        method: &str,
        params: Params,
    ) -> Result<Value, ClientError> {
        let schema = contract.method(method)?;
        if !schema.is_read_only() {
            warn!(%contract, method, "Refusing to query a state-changing method");
            return Err(PayloadError::NotReadOnly(method.to_string()).into());
        }
        schema.check(&params)?;

        let to = self.addresses.get(contract)?;
        let payload = self.builder.build_call_payload(to, method, params)?;

        debug!(%contract, method, "Calling contract");
        Ok(self.transport.call(&payload).await?)
    }

    /// Calls a method whose result is a hex-encoded integer.
    pub async fn call_quantity(
        &self,
        contract: Contract,
        method: &str,
        params: Params,
    ) -> Result<BigInt, ClientError> {
        let result = self.call(contract, method, params).await?;
        decode_quantity(&result)
    }

    /// Price of the pool's base token in its quote token
    pub async fn get_price(&self, pool: PoolId) -> Result<BigDecimal, ClientError> {
        let raw = self
            .call_quantity(Contract::Dex, "getPrice", Params::new().with("_id", pool.0))
            .await?;
        Ok(to_display_units(&raw, DEFAULT_DECIMALS))
    }

    pub async fn get_quote_price_in_base(&self, pool: PoolId) -> Result<BigDecimal, ClientError> {
        let raw = self
            .call_quantity(
                Contract::Dex,
                "getQuotePriceInBase",
                Params::new().with("_id", pool.0),
            )
            .await?;
        Ok(to_display_units(&raw, DEFAULT_DECIMALS))
    }

    /// Token balance of `owner` in display units
    pub async fn balance_of(
        &self,
        currency: &CurrencyId,
        owner: &str,
    ) -> Result<BigDecimal, ClientError> {
        let contract = token_contract(currency)?;
        let raw = self
            .call_quantity(contract, "balanceOf", Params::new().with("_owner", owner))
            .await?;
        Ok(to_display_units_for(&raw, Some(currency)))
    }

    /// Liquidity tokens `owner` holds in `pool`
    pub async fn pool_balance(&self, owner: &str, pool: PoolId) -> Result<BigDecimal, ClientError> {
        let raw = self
            .call_quantity(
                Contract::Dex,
                "balanceOf",
                Params::new().with("_owner", owner).with("_id", pool.0),
            )
            .await?;
        Ok(to_display_units(&raw, DEFAULT_DECIMALS))
    }

    /// Amount of `currency` held by `pool`
    pub async fn pool_total(
        &self,
        pool: PoolId,
        currency: &CurrencyId,
    ) -> Result<BigDecimal, ClientError> {
        let token = self.addresses.get(token_contract(currency)?)?.to_string();
        let raw = self
            .call_quantity(
                Contract::Dex,
                "getPoolTotal",
                Params::new().with("_id", pool.0).with("_token", token),
            )
            .await?;
        Ok(to_display_units_for(&raw, Some(currency)))
    }

    pub async fn proposal_count(&self) -> Result<u64, ClientError> {
        let raw = self
            .call_quantity(Contract::Governance, "getProposalCount", Params::new())
            .await?;
        raw.to_u64().ok_or_else(|| {
            TransportError::Response(format!("proposal count {raw} out of range")).into()
        })
    }
}

pub(crate) fn token_contract(currency: &CurrencyId) -> Result<Contract, SwapError> {
    Contract::for_currency(currency)
        .ok_or_else(|| SwapError::InvalidToken(format!("{currency} is not a token contract")))
}

pub(crate) fn decode_quantity(value: &Value) -> Result<BigInt, ClientError> {
    let hex = value
        .as_str()
        .ok_or_else(|| TransportError::Response(format!("expected a hex quantity, got {value}")))?;
    Ok(BigInt::from_hex_quantity(hex)?)
}
