pub mod client_service;
pub mod contracts;
pub mod payload;
pub mod signer;
pub mod transaction_service;
pub mod transport;
pub mod types;

pub use client_service::ClientService;
pub use contracts::{Contract, PoolId};
pub use payload::PayloadBuilder;
pub use signer::{StaticSigner, TransactionSigner};
pub use transaction_service::TransactionService;
pub use transport::{JsonRpcTransport, Transport};
pub use types::{CallPayload, Params, Payload, PayloadKind, SwapRequest, TransactionPayload};
