//! High-level decryption client

use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::Mutex;

use unseal_core::{
    deployment_for, distinct_addresses, filter_decryptable, DecryptedValues, DecryptionHandle,
    WalletError, WalletProvider,
};
use unseal_engine::{Engine, EngineManager};

use crate::decrypt::decrypt_batch;
use crate::error::ClientError;
use crate::session::{unix_now, AuthorizationSession};

/// One user's decryption pipeline: wallet, engine instance, and a cached
/// authorization session.
///
/// The session is reused across batches until the validity window closes,
/// a request touches an address it does not cover, or the wallet's active
/// account changes; any of those obtains a fresh signature over the full
/// address set of the triggering request.
pub struct UnsealClient {
    wallet: Arc<dyn WalletProvider>,
    chain_id: u64,
    engine: Arc<dyn Engine>,
    session: Mutex<Option<AuthorizationSession>>,
}

impl UnsealClient {
    /// Discover the wallet's chain, bring the engine up for it, and return a
    /// ready client.
    pub async fn connect(
        wallet: Arc<dyn WalletProvider>,
        manager: Arc<EngineManager>,
    ) -> Result<Self, ClientError> {
        let chain_id = wallet.chain_id().await?;
        let engine = manager.connect(wallet.clone(), chain_id).await?;

        tracing::info!(chain_id, "Decryption client connected");

        Ok(Self {
            wallet,
            chain_id,
            engine,
            session: Mutex::new(None),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Review-board contract for the connected chain, from the built-in
    /// deployment table.
    pub fn default_contract(&self) -> Result<Address, ClientError> {
        deployment_for(self.chain_id).ok_or(ClientError::UnknownDeployment(self.chain_id))
    }

    /// Decrypt a batch of handles, reusing the cached session when possible.
    ///
    /// A batch that is all sentinels resolves without a session at all, so a
    /// refresh over unwritten slots never prompts the user for a signature.
    pub async fn decrypt(
        &self,
        handles: &[DecryptionHandle],
    ) -> Result<DecryptedValues, ClientError> {
        let batch = filter_decryptable(handles);
        if batch.is_empty() {
            return Ok(DecryptedValues::new());
        }
        let addresses = distinct_addresses(&batch);

        let accounts = self.wallet.request_accounts().await?;
        let user = accounts.first().copied().ok_or_else(|| {
            ClientError::Wallet(WalletError::Unavailable("no accounts exposed".into()))
        })?;

        let mut cached = self.session.lock().await;
        let session = match cached.take() {
            Some(s) if s.reusable_for(user, &addresses, unix_now()) => s,
            stale => {
                if stale.is_some() {
                    tracing::debug!(user = %user, "Cached session unusable, re-authorizing");
                }
                AuthorizationSession::obtain(self.engine.as_ref(), self.wallet.as_ref(), &addresses)
                    .await?
            }
        };

        let result = decrypt_batch(self.engine.as_ref(), &session, &batch).await;
        *cached = Some(session);
        result
    }
}
