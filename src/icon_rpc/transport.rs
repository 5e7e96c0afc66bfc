use serde::Serialize;
use serde_json::Value;
use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{debug, info, warn};
use url::Url;

use super::{
    signer::TransactionSigner,
    types::{CallPayload, RpcRequest, RpcResponse, TransactionPayload},
};
use crate::error::TransportError;

/// The two operations the client needs from a node connection
pub trait Transport: Send + Sync {
    /// Read-only and idempotent.
    fn call(&self, payload: &CallPayload) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// Mutating and not idempotent; resolves to the transaction hash.
    fn send_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// JSON-RPC 2.0 transport over HTTP
pub struct JsonRpcTransport {
    http: reqwest::Client,
    endpoint: Url,
    next_id: AtomicU64,
    signer: Option<Box<dyn TransactionSigner>>,
}

impl JsonRpcTransport {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            next_id: AtomicU64::new(1),
            signer: None,
        }
    }

    pub fn with_signer(mut self, signer: impl TransactionSigner + 'static) -> Self {
        self.signer = Some(Box::new(signer));
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request<P: Serialize>(&self, method: &str, params: P) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(method, id, params);

        debug!(method, id, "Sending rpc request");
        let response: RpcResponse = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        into_result(response)
    }
}

/// Splits a JSON-RPC response into its result or error.
pub(crate) fn into_result(response: RpcResponse) -> Result<Value, TransportError> {
    if let Some(error) = response.error {
        warn!(code = error.code, message = %error.message, "Rpc error");
        return Err(TransportError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| TransportError::Response("response has neither result nor error".to_string()))
}

impl Transport for JsonRpcTransport {
    async fn call(&self, payload: &CallPayload) -> Result<Value, TransportError> {
        self.request("icx_call", payload).await
    }

    async fn send_transaction(&self, payload: &TransactionPayload) -> Result<String, TransportError> {
        let signer = self.signer.as_ref().ok_or(TransportError::Unsigned)?;
        let signature = signer.sign(payload)?;

        let mut params = serde_json::to_value(payload)
            .map_err(|e| TransportError::Response(format!("failed to serialize payload: {e}")))?;
        if let Value::Object(map) = &mut params {
            map.insert("signature".to_string(), Value::String(signature));
        }

        let result = self.request("icx_sendTransaction", params).await?;
        let hash = result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TransportError::Response(format!("expected a transaction hash, got {result}")))?;

        info!(tx_hash = %hash, to = payload.to(), "Transaction submitted");
        Ok(hash)
    }
}

impl std::fmt::Debug for JsonRpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("signer", &self.signer.as_ref().map(|s| s.address()))
            .finish()
    }
}
