use bigdecimal::BigDecimal;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::{
    client_service::{ClientService, token_contract},
    contracts::{Contract, PoolId},
    payload::PayloadBuilder,
    transport::Transport,
    types::{Params, SwapRequest, TransactionPayload},
};
use crate::{
    config::{AddressBook, Settings},
    error::{ClientError, PayloadError, SwapError},
    types::CurrencyId,
    units::{DEFAULT_DECIMALS, to_base_units, to_base_units_for},
};

/// Builds, schema-checks and submits state-changing transactions
pub struct TransactionService<T> {
    transport: Arc<T>,
    builder: PayloadBuilder,
    addresses: AddressBook,
    client_service: ClientService<T>,
}

impl<T: Transport> TransactionService<T> {
    /// Create a new transaction service; the settings must carry an account.
    pub fn new(transport: Arc<T>, settings: &Settings) -> Result<Self, PayloadError> {
        let account = settings.account.clone().ok_or(PayloadError::MissingAccount)?;
        let builder = PayloadBuilder::new(settings.network)
            .with_step_limit(settings.step_limit)
            .with_account(account);

        Ok(Self {
            client_service: ClientService::new(transport.clone(), settings),
            transport,
            builder,
            addresses: settings.addresses.clone(),
        })
    }

    /// Get the account address
    pub fn address(&self) -> &str {
        self.builder.account().unwrap_or_default()
    }

    /// Get a reference to the client service for read-only operations
    pub fn client_service(&self) -> &ClientService<T> {
        &self.client_service
    }

    /// Checks `method` against the method table and builds its payload.
    pub fn build(
        &self,
        contract: Contract,
        method: &str,
        params: Params,
        value: Option<&BigDecimal>,
    ) -> Result<TransactionPayload, PayloadError> {
        let schema = contract.method(method)?;
        if schema.is_read_only() {
            return Err(PayloadError::ReadOnly(method.to_string()));
        }
        if value.is_some() && !schema.is_payable() {
            return Err(PayloadError::NotPayable(method.to_string()));
        }
        schema.check(&params)?;

        let to = self.addresses.get(contract)?;
        self.builder.build_transaction_payload(to, method, params, value)
    }

    pub async fn send(
        &self,
        contract: Contract,
        method: &str,
        params: Params,
        value: Option<&BigDecimal>,
    ) -> Result<String, ClientError> {
        let payload = self.build(contract, method, params, value)?;
        self.submit(payload).await
    }

    /// Hands a built payload to the transport exactly once.
    pub async fn submit(&self, payload: TransactionPayload) -> Result<String, ClientError> {
        info!(
            to = payload.to(),
            method = payload.method().unwrap_or("<transfer>"),
            "Submitting transaction"
        );
        Ok(self.transport.send_transaction(&payload).await?)
    }

    /// Sends `value` ICX to `to`.
    pub async fn transfer_icx(&self, to: &str, value: &BigDecimal) -> Result<String, ClientError> {
        let payload = self.builder.build_native_transfer_payload(to, value)?;
        self.submit(payload).await
    }

    /// Turns a swap request into the transaction that executes it.
    ///
    /// ICX → sICX stakes; sICX → ICX and token → token go through a token
    /// transfer to the Dex carrying the swap instruction in `_data`.
    pub fn build_swap_payload(&self, request: &SwapRequest) -> Result<TransactionPayload, ClientError> {
        request.validate()?;
        let amount = request.amount_in()?;

        if request.input.is_icx() {
            if !request.output.is_sicx() {
                warn!(output = %request.output, "Unsupported ICX route");
                return Err(SwapError::InvalidSwap(format!(
                    "ICX can only be swapped to sICX, not {}",
                    request.output
                ))
                .into());
            }
            return Ok(self.build(Contract::Staking, "stakeICX", Params::new(), Some(&amount))?);
        }

        if request.output.is_icx() {
            if !request.input.is_sicx() {
                return Err(SwapError::InvalidSwap(format!(
                    "only sICX can be swapped to ICX, not {}",
                    request.input
                ))
                .into());
            }
            let data = json!({ "method": "_swap_icx" });
            return self.build_token_transfer(&request.input, Contract::Dex, &amount, Some(data));
        }

        let to_token = self.addresses.get(token_contract(&request.output)?)?;
        let minimum = to_base_units_for(&request.minimum_receive()?, Some(&request.output));
        let data = json!({
            "method": "_swap",
            "params": {
                "toToken": to_token,
                "minimumReceive": minimum.to_string(),
            }
        });

        self.build_token_transfer(&request.input, Contract::Dex, &amount, Some(data))
    }

    /// Execute a swap transaction
    pub async fn swap(&self, request: &SwapRequest) -> Result<String, ClientError> {
        let payload = self.build_swap_payload(request)?;
        self.submit(payload).await
    }

    /// Transfers `amount` (display units) of a token to `recipient`, with an optional JSON instruction.
    pub fn build_token_transfer(
        &self,
        currency: &CurrencyId,
        recipient: Contract,
        amount: &BigDecimal,
        data: Option<serde_json::Value>,
    ) -> Result<TransactionPayload, ClientError> {
        let token = token_contract(currency)?;
        let to = self.addresses.get(recipient)?;

        let mut params = Params::new()
            .with("_to", to)
            .with("_value", to_base_units_for(amount, Some(currency)));
        if let Some(data) = data {
            params.insert("_data", data.to_string().into_bytes());
        }

        Ok(self.build(token, "transfer", params, None)?)
    }

    /// Moves tokens into the Dex so they can be supplied as liquidity.
    pub async fn deposit(&self, currency: &CurrencyId, amount: &BigDecimal) -> Result<String, ClientError> {
        let payload = self.build_token_transfer(
            currency,
            Contract::Dex,
            amount,
            Some(json!({ "method": "_deposit" })),
        )?;
        self.submit(payload).await
    }

    /// Supplies previously deposited tokens to the `base`/`quote` pool.
    pub async fn add_liquidity(
        &self,
        base: &CurrencyId,
        quote: &CurrencyId,
        base_value: &BigDecimal,
        quote_value: &BigDecimal,
    ) -> Result<String, ClientError> {
        let params = Params::new()
            .with("_baseToken", self.addresses.get(token_contract(base)?)?)
            .with("_quoteToken", self.addresses.get(token_contract(quote)?)?)
            .with("_baseValue", to_base_units_for(base_value, Some(base)))
            .with("_quoteValue", to_base_units_for(quote_value, Some(quote)));

        self.send(Contract::Dex, "add", params, None).await
    }

    /// Burns `value` liquidity tokens of `pool`, optionally withdrawing the proceeds.
    pub async fn remove_liquidity(
        &self,
        pool: PoolId,
        value: &BigDecimal,
        withdraw: bool,
    ) -> Result<String, ClientError> {
        let params = Params::new()
            .with("_id", pool.0)
            .with("_value", to_base_units(value, DEFAULT_DECIMALS))
            .with("_withdraw", u32::from(withdraw));

        self.send(Contract::Dex, "remove", params, None).await
    }

    /// Withdraws deposited tokens from the Dex back to the wallet.
    pub async fn withdraw_deposit(
        &self,
        currency: &CurrencyId,
        value: &BigDecimal,
    ) -> Result<String, ClientError> {
        let params = Params::new()
            .with("_token", self.addresses.get(token_contract(currency)?)?)
            .with("_value", to_base_units_for(value, Some(currency)));

        self.send(Contract::Dex, "withdraw", params, None).await
    }

    /// Places an ICX order in the sICX/ICX queue.
    pub async fn place_icx_order(&self, value: &BigDecimal) -> Result<String, ClientError> {
        let dex = self.addresses.get(Contract::Dex)?.to_string();
        self.transfer_icx(&dex, value).await
    }

    pub async fn cancel_icx_order(&self) -> Result<String, ClientError> {
        self.send(Contract::Dex, "cancelSicxicxOrder", Params::new(), None)
            .await
    }

    pub async fn stake_icx(&self, value: &BigDecimal) -> Result<String, ClientError> {
        self.send(Contract::Staking, "stakeICX", Params::new(), Some(value))
            .await
    }

    pub async fn cast_vote(&self, vote_index: u64, support: bool) -> Result<String, ClientError> {
        let params = Params::new()
            .with("vote_index", vote_index)
            .with("vote", support);

        self.send(Contract::Governance, "castVote", params, None).await
    }
}

impl<T> std::fmt::Debug for TransactionService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionService")
            .field("address", &self.builder.account())
            .field("contracts", &self.addresses.len())
            .finish()
    }
}
