use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::contracts::ParamKind;
use crate::{
    error::{PayloadError, SwapError},
    ext::DecimalExt,
    types::{CurrencyId, Field, SwapState},
    units::parse_amount,
};

/// A contract parameter before wire encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Addresses and plain strings go out verbatim.
    Str(String),
    /// Integral base-unit quantity; hex-encoded on the wire.
    Int(BigDecimal),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl ParamValue {
    /// Whether this value can fill a parameter of `kind`.
    pub fn fits(&self, kind: ParamKind) -> bool {
        matches!(
            (self, kind),
            (ParamValue::Str(_), ParamKind::Address | ParamKind::Str)
                | (ParamValue::Int(_), ParamKind::Int)
                | (ParamValue::Bool(_), ParamKind::Bool)
                | (ParamValue::Bytes(_), ParamKind::Bytes)
        )
    }

    fn encode(&self, name: &str) -> Result<Value, PayloadError> {
        let encoded = match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(n) => n.to_hex_quantity().map_err(|source| PayloadError::Param {
                name: name.to_string(),
                source,
            })?,
            ParamValue::Bool(true) => "0x1".to_string(),
            ParamValue::Bool(false) => "0x0".to_string(),
            ParamValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        };
        Ok(Value::String(encoded))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(BigDecimal::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Int(BigDecimal::from(value))
    }
}

impl From<BigDecimal> for ParamValue {
    fn from(value: BigDecimal) -> Self {
        ParamValue::Int(value)
    }
}

impl From<BigInt> for ParamValue {
    fn from(value: BigInt) -> Self {
        ParamValue::Int(BigDecimal::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        ParamValue::Bytes(value)
    }
}

/// Ordered parameter map for a contract method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn encode(&self) -> Result<IndexMap<String, Value>, PayloadError> {
        self.0
            .iter()
            .map(|(name, value)| Ok((name.clone(), value.encode(name)?)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Call,
}

/// Method name plus wire-encoded params
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallData {
    method: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    params: IndexMap<String, Value>,
}

impl CallData {
    pub(crate) fn new(method: String, params: IndexMap<String, Value>) -> Self {
        Self { method, params }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }
}

/// Read-only query, sent with `icx_call`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    to: String,
    data_type: DataType,
    data: CallData,
}

impl CallPayload {
    pub(crate) fn new(from: Option<String>, to: String, data: CallData) -> Self {
        Self {
            from,
            to,
            data_type: DataType::Call,
            data,
        }
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn method(&self) -> &str {
        self.data.method()
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        self.data.params()
    }
}

/// State-changing transaction, sent with `icx_sendTransaction` once signed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    version: String,
    from: String,
    to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    step_limit: String,
    timestamp: String,
    nid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<CallData>,
}

pub(crate) struct TransactionParts {
    pub from: String,
    pub to: String,
    pub value: Option<String>,
    pub step_limit: String,
    pub timestamp: String,
    pub nid: String,
    pub data: Option<CallData>,
}

impl TransactionPayload {
    pub(crate) const VERSION: &'static str = "0x3";

    pub(crate) fn new(parts: TransactionParts) -> Self {
        Self {
            version: Self::VERSION.to_string(),
            from: parts.from,
            to: parts.to,
            value: parts.value,
            step_limit: parts.step_limit,
            timestamp: parts.timestamp,
            nid: parts.nid,
            data_type: parts.data.as_ref().map(|_| DataType::Call),
            data: parts.data,
        }
    }

    pub fn sender(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// Attached ICX in base units, hex-encoded.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn nid(&self) -> &str {
        &self.nid
    }

    pub fn step_limit(&self) -> &str {
        &self.step_limit
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// `None` for a plain ICX transfer.
    pub fn method(&self) -> Option<&str> {
        self.data.as_ref().map(CallData::method)
    }

    pub fn params(&self) -> Option<&IndexMap<String, Value>> {
        self.data.as_ref().map(CallData::params)
    }

    pub fn is_native_transfer(&self) -> bool {
        self.data.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKind {
    Call,
    Transaction { value: Option<String> },
}

/// Either shape of outbound payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Call(CallPayload),
    Transaction(TransactionPayload),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Call(_) => PayloadKind::Call,
            Payload::Transaction(tx) => PayloadKind::Transaction {
                value: tx.value.clone(),
            },
        }
    }

    pub fn method(&self) -> Option<&str> {
        match self {
            Payload::Call(call) => Some(call.method()),
            Payload::Transaction(tx) => tx.method(),
        }
    }

    pub fn to(&self) -> &str {
        match self {
            Payload::Call(call) => call.to(),
            Payload::Transaction(tx) => tx.to(),
        }
    }
}

impl From<CallPayload> for Payload {
    fn from(value: CallPayload) -> Self {
        Payload::Call(value)
    }
}

impl From<TransactionPayload> for Payload {
    fn from(value: TransactionPayload) -> Self {
        Payload::Transaction(value)
    }
}

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub id: u64,
    pub params: P,
}

impl<'a, P: Serialize> RpcRequest<'a, P> {
    pub fn new(method: &'a str, id: u64, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            id,
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

/// Exact-input swap of `amount_in` of `input` for at least `minimum_receive` of `output`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub input: CurrencyId,
    pub output: CurrencyId,
    /// Display units, kept as a string to preserve precision
    pub amount_in: String,
    /// Display units of `output`
    pub minimum_receive: String,
}

impl SwapRequest {
    pub fn new(
        input: CurrencyId,
        output: CurrencyId,
        amount_in: impl Into<String>,
        minimum_receive: impl Into<String>,
    ) -> Self {
        Self {
            input,
            output,
            amount_in: amount_in.into(),
            minimum_receive: minimum_receive.into(),
        }
    }

    /// Builds a request from the swap form. Only input-side (exact-input) entry
    /// can be turned into a swap; the caller supplies the slippage-adjusted minimum.
    pub fn from_state(state: &SwapState, minimum_receive: impl Into<String>) -> Result<Self, SwapError> {
        if state.independent_field != Field::Input {
            return Err(SwapError::InvalidSwap(
                "only exact-input swaps can be submitted".to_string(),
            ));
        }

        let input = state
            .currency(Field::Input)
            .cloned()
            .ok_or_else(|| SwapError::InvalidToken("no input currency selected".to_string()))?;
        let output = state
            .currency(Field::Output)
            .cloned()
            .ok_or_else(|| SwapError::InvalidToken("no output currency selected".to_string()))?;

        let request = Self::new(input, output, state.typed_value.clone(), minimum_receive);
        request.validate()?;
        Ok(request)
    }

    pub fn amount_in(&self) -> Result<BigDecimal, SwapError> {
        Self::parse_positive("amount_in", &self.amount_in)
    }

    pub fn minimum_receive(&self) -> Result<BigDecimal, SwapError> {
        let value = parse_amount(&self.minimum_receive).map_err(|_| {
            SwapError::InvalidAmount("minimum_receive must be a valid number".to_string())
        })?;
        if value.is_negative() {
            return Err(SwapError::InvalidAmount(
                "minimum_receive cannot be negative".to_string(),
            ));
        }
        Ok(value)
    }

    fn parse_positive(name: &str, raw: &str) -> Result<BigDecimal, SwapError> {
        if raw.is_empty() {
            return Err(SwapError::InvalidAmount(format!("{name} cannot be empty")));
        }
        let value = parse_amount(raw)
            .map_err(|_| SwapError::InvalidAmount(format!("{name} must be a valid number")))?;
        if value.is_negative() || value.is_zero() {
            return Err(SwapError::InvalidAmount(format!("{name} must be positive")));
        }
        Ok(value)
    }

    /// Validate the swap request
    pub fn validate(&self) -> Result<(), SwapError> {
        if self.input.as_str().is_empty() {
            return Err(SwapError::InvalidToken("input cannot be empty".to_string()));
        }

        if self.output.as_str().is_empty() {
            return Err(SwapError::InvalidToken("output cannot be empty".to_string()));
        }

        if self.input == self.output {
            return Err(SwapError::InvalidSwap(format!(
                "cannot swap {} to itself",
                self.input
            )));
        }

        self.amount_in()?;
        self.minimum_receive()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn params_encode_numbers_as_hex() {
        let params = Params::new()
            .with("_owner", "hx1234")
            .with("_id", 4u64)
            .with("_flag", true)
            .with("_data", b"hi".to_vec());

        let encoded = params.encode().unwrap();
        assert_eq!(encoded["_owner"], "hx1234");
        assert_eq!(encoded["_id"], "0x4");
        assert_eq!(encoded["_flag"], "0x1");
        assert_eq!(encoded["_data"], "0x6869");
        assert_eq!(
            encoded.keys().collect::<Vec<_>>(),
            vec!["_owner", "_id", "_flag", "_data"]
        );
    }

    #[test]
    fn negative_param_names_the_parameter() {
        let params = Params::new().with("_value", BigDecimal::from_str("-3").unwrap());
        match params.encode() {
            Err(PayloadError::Param { name, .. }) => assert_eq!(name, "_value"),
            other => panic!("expected param error, got {other:?}"),
        }
    }

    #[test]
    fn swap_request_validation() {
        let ok = SwapRequest::new("sICX".into(), "bnUSD".into(), "10", "9.5");
        assert!(ok.validate().is_ok());

        let same = SwapRequest::new("sICX".into(), "sICX".into(), "10", "9.5");
        assert!(matches!(same.validate(), Err(SwapError::InvalidSwap(_))));

        let empty = SwapRequest::new("sICX".into(), "bnUSD".into(), "", "1");
        assert!(matches!(empty.validate(), Err(SwapError::InvalidAmount(_))));

        let zero = SwapRequest::new("sICX".into(), "bnUSD".into(), "0", "1");
        assert!(matches!(zero.validate(), Err(SwapError::InvalidAmount(_))));

        let garbage = SwapRequest::new("sICX".into(), "bnUSD".into(), "1", "lots");
        assert!(matches!(garbage.validate(), Err(SwapError::InvalidAmount(_))));
    }

    #[test]
    fn swap_request_from_input_side_state() {
        let state = SwapState {
            typed_value: "12.5".to_string(),
            ..SwapState::default()
        };
        let request = SwapRequest::from_state(&state, "30").unwrap();
        assert_eq!(request.input, CurrencyId::new("sICX"));
        assert_eq!(request.output, CurrencyId::new("bnUSD"));
        assert_eq!(request.amount_in, "12.5");
    }

    #[test]
    fn swap_request_rejects_exact_output_state() {
        let state = SwapState {
            independent_field: Field::Output,
            typed_value: "12.5".to_string(),
            ..SwapState::default()
        };
        assert!(matches!(
            SwapRequest::from_state(&state, "30"),
            Err(SwapError::InvalidSwap(_))
        ));
    }

    #[test]
    fn native_transfer_has_no_data_type() {
        let tx = TransactionPayload::new(TransactionParts {
            from: "hxabc".to_string(),
            to: "hxdef".to_string(),
            value: Some("0x1".to_string()),
            step_limit: "0x1".to_string(),
            timestamp: "0x1".to_string(),
            nid: "0x1".to_string(),
            data: None,
        });
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json.get("dataType").is_none());
        assert!(json.get("data").is_none());
        assert_eq!(json["version"], "0x3");
        assert!(tx.is_native_transfer());
    }
}
