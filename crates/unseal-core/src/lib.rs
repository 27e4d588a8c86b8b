//! unseal-core: Shared types for confidential-value decryption on a public ledger
//!
//! Values on the ledger are stored as homomorphic ciphertexts and referenced
//! by opaque fixed-width handles. Decrypting them requires an external
//! cryptographic engine plus a short-lived authorization signed by the user's
//! wallet. This crate defines the types that travel between those pieces:
//! handles, the network selection policy, the wallet capability, and the
//! signed authorization payload.
//!
//! # Privacy & Threat Model
//!
//! ## Adversary Model
//!
//! - **Ledger**: public; stores only ciphertexts and handles
//! - **Relayer/engine**: honest-but-curious; performs the decrypt transform
//! - **Security goal**: plaintext reaches the authorized end user only
//!
//! ## What Each Party Learns
//!
//! | Information | Ledger | Relayer |
//! |-------------|--------|---------|
//! | Ciphertext handles | YES | YES - part of the request |
//! | Plaintext values | NO | engine-boundary concern |
//! | User address, authorized contracts | NO | YES - signed authorization |
//! | Request timing, client identity | NO | YES - via network metadata |
//!
//! ## Public Information
//!
//! The following are intentionally public:
//! - Handles themselves (opaque, not decryptable without authorization)
//! - The contract addresses a user has authorized
//! - The authorization validity window

mod deployments;
mod error;
mod handle;
mod network;
mod wallet;

pub use deployments::{deployment_for, KnownDeployment, DEPLOYMENTS};
pub use error::CoreError;
pub use handle::{
    distinct_addresses, filter_decryptable, DecryptedValues, DecryptionHandle, SENTINEL_HANDLE,
};
pub use network::{
    policy_for, NetworkConfig, NetworkPolicy, NetworkTransport, DEFAULT_SEPOLIA_RPC,
    SEPOLIA_CHAIN_ID, SEPOLIA_RPC_ENV,
};
pub use wallet::{
    authorization_domain, parse_chain_id, DecryptionAuthorization, WalletError, WalletProvider,
};

pub type Result<T> = std::result::Result<T, CoreError>;
