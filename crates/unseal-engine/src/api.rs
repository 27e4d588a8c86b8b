//! Engine capability traits
//!
//! The external engine appears to the rest of the system as two narrow
//! capabilities: an SDK-level surface ([`EngineSdk`]) that can initialize
//! itself and construct instances, and a per-network instance ([`Engine`])
//! that generates ephemeral keypairs and decrypts handle batches.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use unseal_core::{DecryptedValues, DecryptionHandle, NetworkConfig};

use crate::error::EngineError;

/// Ephemeral decryption keypair generated by an engine instance.
///
/// The private half lives only in process memory for the duration of one
/// authorization session and is never transmitted.
#[derive(Clone)]
pub struct Keypair {
    pub public_key: Bytes,
    pub private_key: Bytes,
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// One batched decryption request, borrowed from an authorization session.
///
/// Field set mirrors the engine's decrypt entry point: handle/address pairs,
/// session key material, the user's signature, the canonical authorized
/// address list, and the validity window.
#[derive(Clone, Copy)]
pub struct DecryptionRequest<'a> {
    pub handles: &'a [DecryptionHandle],
    pub public_key: &'a Bytes,
    pub private_key: &'a Bytes,
    pub signature: &'a Bytes,
    pub contract_addresses: &'a [Address],
    pub user_address: Address,
    pub start_timestamp: u64,
    pub duration_days: u64,
}

/// A ready engine instance bound to one network.
#[async_trait]
pub trait Engine: Send + Sync + std::fmt::Debug {
    /// Generate a fresh ephemeral keypair for an authorization session.
    fn generate_keypair(&self) -> Keypair;

    /// Decrypt a batch of handles under a signed authorization. Atomic:
    /// either the whole batch decrypts or the call fails.
    async fn user_decrypt(
        &self,
        request: DecryptionRequest<'_>,
    ) -> Result<DecryptedValues, EngineError>;
}

/// SDK-level surface of the engine library.
#[async_trait]
pub trait EngineSdk: Send + Sync {
    /// One-time SDK initialization; must be called before instance
    /// construction.
    async fn init(&self) -> Result<(), EngineError>;

    /// Construct an instance for the resolved network config.
    async fn create_instance(
        &self,
        config: &NetworkConfig,
    ) -> Result<Arc<dyn Engine>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_debug_redacts_private_key() {
        let keypair = Keypair {
            public_key: Bytes::from_static(&[0xaa; 4]),
            private_key: Bytes::from_static(&[0xbb; 4]),
        };
        let rendered = format!("{:?}", keypair);
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("bbbbbbbb"));
    }
}
