//! Batched decryption requests

use unseal_core::{distinct_addresses, filter_decryptable, DecryptedValues, DecryptionHandle};
use unseal_engine::{DecryptionRequest, Engine};

use crate::error::ClientError;
use crate::session::AuthorizationSession;

/// Decrypt a batch of handles under an existing session.
///
/// Sentinel handles are filtered out locally; a batch that is empty after
/// filtering returns an empty mapping without contacting the engine at all.
/// The session must still be inside its validity window and must cover every
/// contract address left in the batch. The engine call is atomic: either the
/// whole batch decrypts or the call fails.
pub async fn decrypt_batch(
    engine: &dyn Engine,
    session: &AuthorizationSession,
    handles: &[DecryptionHandle],
) -> Result<DecryptedValues, ClientError> {
    let batch = filter_decryptable(handles);
    if batch.is_empty() {
        tracing::debug!(requested = handles.len(), "Nothing decryptable in batch");
        return Ok(DecryptedValues::new());
    }

    if !session.is_valid() {
        return Err(ClientError::SessionExpired);
    }

    let addresses = distinct_addresses(&batch);
    if let Some(uncovered) = addresses.iter().find(|a| !session.covers(&[**a])) {
        return Err(ClientError::SessionNotAuthorized {
            address: *uncovered,
        });
    }

    let request = DecryptionRequest {
        handles: &batch,
        public_key: session.public_key(),
        private_key: session.private_key(),
        signature: session.signature(),
        contract_addresses: session.contract_addresses(),
        user_address: session.user_address(),
        start_timestamp: session.start_timestamp(),
        duration_days: session.duration_days(),
    };

    let values = engine.user_decrypt(request).await?;
    tracing::debug!(
        requested = batch.len(),
        decrypted = values.len(),
        "Decryption batch complete"
    );
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::LocalWallet;
    use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use unseal_core::SENTINEL_HANDLE;
    use unseal_engine::{EngineError, Keypair};

    /// Engine that "decrypts" a handle to a value derived from the handle
    /// itself, counting calls.
    #[derive(Debug)]
    struct CountingEngine {
        calls: AtomicUsize,
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn plaintext_for(handle: &B256) -> U256 {
        U256::from_be_bytes(keccak256(handle).0)
    }

    #[async_trait]
    impl Engine for CountingEngine {
        fn generate_keypair(&self) -> Keypair {
            Keypair {
                public_key: Bytes::from_static(&[0xaa; 32]),
                private_key: Bytes::from_static(&[0xbb; 32]),
            }
        }

        async fn user_decrypt(
            &self,
            request: DecryptionRequest<'_>,
        ) -> Result<DecryptedValues, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(request
                .handles
                .iter()
                .map(|h| (h.handle, plaintext_for(&h.handle)))
                .collect())
        }
    }

    async fn session_for(
        engine: &dyn Engine,
        addresses: &[Address],
    ) -> (AuthorizationSession, LocalWallet) {
        let wallet = LocalWallet::random(31_337);
        let session = AuthorizationSession::obtain(engine, &wallet, addresses)
            .await
            .unwrap();
        (session, wallet)
    }

    #[tokio::test]
    async fn test_sentinel_only_batch_skips_engine() {
        let engine = CountingEngine::new();
        let contract = Address::repeat_byte(0x11);
        let (session, _wallet) = session_for(&engine, &[contract]).await;

        let handles = vec![
            DecryptionHandle::new(SENTINEL_HANDLE, contract),
            DecryptionHandle::new(SENTINEL_HANDLE, contract),
        ];
        let values = decrypt_batch(&engine, &session, &handles).await.unwrap();

        assert!(values.is_empty());
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_preserves_handle_association() {
        let engine = CountingEngine::new();
        let a = Address::repeat_byte(0x11);
        let b = Address::repeat_byte(0x22);
        let (session, _wallet) = session_for(&engine, &[a, b]).await;

        let handles: Vec<_> = (1u8..=4)
            .map(|i| {
                DecryptionHandle::new(B256::repeat_byte(i), if i % 2 == 0 { a } else { b })
            })
            .collect();

        let values = decrypt_batch(&engine, &session, &handles).await.unwrap();

        assert_eq!(values.len(), 4);
        for h in &handles {
            assert_eq!(values[&h.handle], plaintext_for(&h.handle));
        }
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_sentinels_filtered_from_mixed_batch() {
        let engine = CountingEngine::new();
        let contract = Address::repeat_byte(0x11);
        let (session, _wallet) = session_for(&engine, &[contract]).await;

        let live = DecryptionHandle::new(B256::repeat_byte(0x01), contract);
        let handles = vec![DecryptionHandle::new(SENTINEL_HANDLE, contract), live];

        let values = decrypt_batch(&engine, &session, &handles).await.unwrap();

        assert_eq!(values.len(), 1);
        assert!(values.contains_key(&live.handle));
        assert!(!values.contains_key(&SENTINEL_HANDLE));
    }

    #[tokio::test]
    async fn test_uncovered_address_is_rejected() {
        let engine = CountingEngine::new();
        let covered = Address::repeat_byte(0x11);
        let uncovered = Address::repeat_byte(0x22);
        let (session, _wallet) = session_for(&engine, &[covered]).await;

        let handles = vec![
            DecryptionHandle::new(B256::repeat_byte(0x01), covered),
            DecryptionHandle::new(B256::repeat_byte(0x02), uncovered),
        ];
        let result = decrypt_batch(&engine, &session, &handles).await;

        assert!(matches!(
            result,
            Err(ClientError::SessionNotAuthorized { address }) if address == uncovered
        ));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_same_handle_decrypts_identically_across_batches() {
        let engine = CountingEngine::new();
        let contract = Address::repeat_byte(0x11);
        let (session, _wallet) = session_for(&engine, &[contract]).await;

        let shared = DecryptionHandle::new(B256::repeat_byte(0x07), contract);
        let first = decrypt_batch(&engine, &session, &[shared]).await.unwrap();
        let second = decrypt_batch(
            &engine,
            &session,
            &[shared, DecryptionHandle::new(B256::repeat_byte(0x08), contract)],
        )
        .await
        .unwrap();

        assert_eq!(first[&shared.handle], second[&shared.handle]);
    }
}
