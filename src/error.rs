use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::icon_rpc::contracts::{Contract, ParamKind};

/// Failures converting amounts into their wire encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("negative amount: {0}")]
    Negative(BigDecimal),
    #[error("amount has a fractional part: {0}")]
    Fractional(BigDecimal),
    #[error("invalid decimal `{0}`")]
    InvalidDecimal(String),
    #[error("invalid hex quantity `{0}`")]
    InvalidHex(String),
}

/// Local validation failures raised while building a payload.
///
/// These are synchronous and terminal for the call: no partial payload is
/// ever returned alongside one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("invalid method name `{0}`")]
    InvalidMethod(String),
    #[error("no account set for a state-changing transaction")]
    MissingAccount,
    #[error("no address configured for contract {0}")]
    MissingAddress(Contract),
    #[error("contract {contract} has no method `{method}`")]
    UnknownMethod { contract: Contract, method: String },
    #[error("method `{0}` changes state and must be sent as a transaction")]
    NotReadOnly(String),
    #[error("method `{0}` is read-only")]
    ReadOnly(String),
    #[error("method `{0}` does not accept an attached value")]
    NotPayable(String),
    #[error("missing parameter `{0}`")]
    MissingParam(String),
    #[error("unexpected parameter `{0}`")]
    UnexpectedParam(String),
    #[error("parameter `{name}` expects {expected}")]
    ParamKind { name: String, expected: ParamKind },
    #[error("parameter `{name}`: {source}")]
    Param {
        name: String,
        #[source]
        source: EncodingError,
    },
    #[error("attached value: {0}")]
    Value(#[from] EncodingError),
}

/// Failures reported by the transport collaborator, surfaced unchanged
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("no signer available to send a transaction")]
    Unsigned,
    #[error("signing failed: {0}")]
    Signature(String),
    #[error("malformed response: {0}")]
    Response(String),
}

/// Errors that can occur while preparing a swap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("Invalid swap: {0}")]
    InvalidSwap(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown network `{0}`")]
    UnknownNetwork(String),
    #[error("invalid rpc url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid step limit `{0}`")]
    StepLimit(String),
    #[error("failed to read address book {path}: {source}")]
    AddressBookIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed address book: {0}")]
    AddressBook(#[from] serde_json::Error),
}

/// Umbrella error for the service layer
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
