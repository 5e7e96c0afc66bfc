use super::types::TransactionPayload;
use crate::error::TransportError;

/// Wallet-side signing of built transactions.
///
/// Key handling lives with the wallet integration (software key store,
/// hardware device); the client only asks for an address and a signature.
pub trait TransactionSigner: Send + Sync {
    /// Address the wallet signs for
    fn address(&self) -> &str;

    /// Base64 signature over the serialized transaction
    fn sign(&self, payload: &TransactionPayload) -> Result<String, TransportError>;
}

/// Signer that returns a fixed signature for a fixed address
pub struct StaticSigner {
    address: String,
    signature: String,
}

impl StaticSigner {
    pub fn new(address: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            signature: signature.into(),
        }
    }
}

impl TransactionSigner for StaticSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign(&self, payload: &TransactionPayload) -> Result<String, TransportError> {
        if payload.sender() != self.address {
            return Err(TransportError::Signature(format!(
                "payload is from {} but signer holds {}",
                payload.sender(),
                self.address
            )));
        }
        Ok(self.signature.clone())
    }
}

impl std::fmt::Debug for StaticSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSigner")
            .field("address", &self.address)
            .field("signature", &"[REDACTED]")
            .finish()
    }
}
