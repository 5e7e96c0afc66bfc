use bigdecimal::BigDecimal;
use chrono::Utc;
use num_bigint::BigInt;
use num_traits::Signed;
use tracing::{debug, warn};

use super::types::{CallData, CallPayload, Params, TransactionParts, TransactionPayload};
use crate::{
    config::Network,
    error::{EncodingError, PayloadError},
    ext::BigIntExt,
    units::{DEFAULT_DECIMALS, to_base_units},
};

pub const DEFAULT_STEP_LIMIT: u64 = 2_000_000;

/// Builds transport-ready payloads for any contract method.
///
/// Each build validates its inputs and returns a fresh, immutable payload.
/// Nothing here touches the network.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    nid: u32,
    account: Option<String>,
    step_limit: u64,
}

impl PayloadBuilder {
    pub fn new(network: Network) -> Self {
        Self {
            nid: network.nid(),
            account: None,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Read-only query of `method` on `to`.
    pub fn build_call_payload(
        &self,
        to: &str,
        method: &str,
        params: Params,
    ) -> Result<CallPayload, PayloadError> {
        let data = Self::call_data(method, &params)?;
        debug!(to, method, "built call payload");
        Ok(CallPayload::new(self.account.clone(), to.to_string(), data))
    }

    /// State-changing call of `method` on `to`, optionally carrying ICX.
    ///
    /// `attached_value` is in ICX display units and is floored to base units.
    pub fn build_transaction_payload(
        &self,
        to: &str,
        method: &str,
        params: Params,
        attached_value: Option<&BigDecimal>,
    ) -> Result<TransactionPayload, PayloadError> {
        let data = Self::call_data(method, &params)?;
        let value = attached_value.map(Self::encode_value).transpose()?;
        let payload = self.transaction(to, value, Some(data))?;
        debug!(to, method, value = payload.value(), "built transaction payload");
        Ok(payload)
    }

    /// Plain ICX transfer with no method call.
    pub fn build_native_transfer_payload(
        &self,
        to: &str,
        value: &BigDecimal,
    ) -> Result<TransactionPayload, PayloadError> {
        let value = Self::encode_value(value)?;
        let payload = self.transaction(to, Some(value), None)?;
        debug!(to, value = payload.value(), "built transfer payload");
        Ok(payload)
    }

    fn call_data(method: &str, params: &Params) -> Result<CallData, PayloadError> {
        if method.is_empty() || method.chars().any(char::is_whitespace) {
            warn!(method, "rejected malformed method name");
            return Err(PayloadError::InvalidMethod(method.to_string()));
        }
        Ok(CallData::new(method.to_string(), params.encode()?))
    }

    fn encode_value(value: &BigDecimal) -> Result<String, PayloadError> {
        if value.is_negative() {
            warn!(%value, "rejected negative value");
            return Err(EncodingError::Negative(value.clone()).into());
        }
        Ok(to_base_units(value, DEFAULT_DECIMALS).to_hex_quantity()?)
    }

    fn transaction(
        &self,
        to: &str,
        value: Option<String>,
        data: Option<CallData>,
    ) -> Result<TransactionPayload, PayloadError> {
        let from = self.account.clone().ok_or(PayloadError::MissingAccount)?;
        let timestamp = BigInt::from(Utc::now().timestamp_micros());

        Ok(TransactionPayload::new(TransactionParts {
            from,
            to: to.to_string(),
            value,
            step_limit: BigInt::from(self.step_limit).to_hex_quantity()?,
            timestamp: timestamp.to_hex_quantity()?,
            nid: BigInt::from(self.nid).to_hex_quantity()?,
            data,
        }))
    }
}
