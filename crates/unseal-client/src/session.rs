//! Decryption authorization sessions

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, Bytes, U256};

use unseal_core::{DecryptionAuthorization, WalletError, WalletProvider};
use unseal_engine::Engine;

use crate::error::ClientError;

/// Validity window granted with each signature, in days. Policy-fixed; the
/// session layer treats it as opaque.
pub const SESSION_DURATION_DAYS: u64 = 7;

const SECONDS_PER_DAY: u64 = 86_400;

/// Time-bounded, signer-bound permission to decrypt ciphertexts under a set
/// of ledger addresses.
///
/// The ephemeral private key stays in this struct for the session's lifetime
/// and is never serialized or transmitted. Sessions must be discarded when
/// the active wallet account changes; the signature is bound to one signer.
pub struct AuthorizationSession {
    public_key: Bytes,
    private_key: Bytes,
    signature: Bytes,
    contract_addresses: Vec<Address>,
    user_address: Address,
    start_timestamp: u64,
    duration_days: u64,
}

impl AuthorizationSession {
    /// Obtain a fresh session: generate an ephemeral keypair, canonicalize
    /// the address list, and ask the wallet to sign the binding payload.
    ///
    /// Signer rejection is an ordinary recoverable failure; nothing is
    /// cached and no decrypt is attempted.
    pub async fn obtain(
        engine: &dyn Engine,
        wallet: &dyn WalletProvider,
        contract_addresses: &[Address],
    ) -> Result<Self, ClientError> {
        let keypair = engine.generate_keypair();

        let mut addresses = contract_addresses.to_vec();
        addresses.sort_unstable();
        addresses.dedup();

        let accounts = wallet.request_accounts().await?;
        let user_address = accounts.first().copied().ok_or_else(|| {
            ClientError::Wallet(WalletError::Unavailable("no accounts exposed".into()))
        })?;

        let start_timestamp = unix_now();
        let payload = DecryptionAuthorization {
            publicKey: keypair.public_key.clone(),
            contractAddresses: addresses.clone(),
            startTimestamp: U256::from(start_timestamp),
            durationDays: U256::from(SESSION_DURATION_DAYS),
        };
        let signature = wallet.sign_authorization(&payload).await?;

        tracing::debug!(
            user = %user_address,
            contracts = addresses.len(),
            "Authorization session signed"
        );

        Ok(Self {
            public_key: keypair.public_key,
            private_key: keypair.private_key,
            signature: Bytes::copy_from_slice(&signature.as_bytes()),
            contract_addresses: addresses,
            user_address,
            start_timestamp,
            duration_days: SESSION_DURATION_DAYS,
        })
    }

    /// True if every address is in the authorized set.
    pub fn covers(&self, addresses: &[Address]) -> bool {
        addresses
            .iter()
            .all(|a| self.contract_addresses.binary_search(a).is_ok())
    }

    /// Valid at `now` (unix seconds): within the signed window.
    pub fn is_valid_at(&self, now: u64) -> bool {
        now < self.start_timestamp + self.duration_days * SECONDS_PER_DAY
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(unix_now())
    }

    /// Whether this session can serve a request for `user` over `addresses`
    /// at `now`. A session authorized for a superset is reusable; one
    /// authorized for a subset never is.
    pub fn reusable_for(&self, user: Address, addresses: &[Address], now: u64) -> bool {
        self.user_address == user && self.is_valid_at(now) && self.covers(addresses)
    }

    pub fn public_key(&self) -> &Bytes {
        &self.public_key
    }

    pub(crate) fn private_key(&self) -> &Bytes {
        &self.private_key
    }

    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    pub fn contract_addresses(&self) -> &[Address] {
        &self.contract_addresses
    }

    pub fn user_address(&self) -> Address {
        self.user_address
    }

    pub fn start_timestamp(&self) -> u64 {
        self.start_timestamp
    }

    pub fn duration_days(&self) -> u64 {
        self.duration_days
    }
}

impl fmt::Debug for AuthorizationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationSession")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("contract_addresses", &self.contract_addresses)
            .field("user_address", &self.user_address)
            .field("start_timestamp", &self.start_timestamp)
            .field("duration_days", &self.duration_days)
            .finish()
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
