//! Local wallet signer

use alloy_primitives::{Address, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolStruct;
use async_trait::async_trait;

use unseal_core::{authorization_domain, DecryptionAuthorization, WalletError, WalletProvider};

/// Wallet backed by an in-process private key, for CLI and test use.
///
/// A browser or extension wallet would implement [`WalletProvider`] over its
/// own transport instead; this one signs immediately with no interactive
/// approval step.
pub struct LocalWallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl LocalWallet {
    pub fn new(signer: PrivateKeySigner, chain_id: u64) -> Self {
        Self { signer, chain_id }
    }

    pub fn from_bytes(key: &B256, chain_id: u64) -> Result<Self, WalletError> {
        let signer = PrivateKeySigner::from_bytes(key)
            .map_err(|e| WalletError::Unavailable(format!("invalid private key: {e}")))?;
        Ok(Self::new(signer, chain_id))
    }

    pub fn random(chain_id: u64) -> Self {
        Self::new(PrivateKeySigner::random(), chain_id)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }

    async fn sign_authorization(
        &self,
        authorization: &DecryptionAuthorization,
    ) -> Result<Signature, WalletError> {
        let hash = authorization.eip712_signing_hash(&authorization_domain(self.chain_id));
        self.signer
            .sign_hash_sync(&hash)
            .map_err(|e| WalletError::Rejected(e.to_string()))
    }
}
