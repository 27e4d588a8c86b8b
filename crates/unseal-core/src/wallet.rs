//! Wallet provider capability and the signed authorization payload

use std::borrow::Cow;

use alloy_primitives::{Address, Signature, U256};
use alloy_sol_types::{sol, Eip712Domain};
use async_trait::async_trait;
use thiserror::Error;

sol! {
    /// EIP-712 payload the user signs to authorize decryption. Binds the
    /// ephemeral public key to a canonical contract-address list and a
    /// validity window; the engine verifies the binding on every batch.
    #[derive(Debug)]
    struct DecryptionAuthorization {
        bytes publicKey;
        address[] contractAddresses;
        uint256 startTimestamp;
        uint256 durationDays;
    }
}

/// Domain separator for [`DecryptionAuthorization`] signatures on a chain.
pub fn authorization_domain(chain_id: u64) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed("UnsealDecryption")),
        Some(Cow::Borrowed("1")),
        Some(U256::from(chain_id)),
        None,
        None,
    )
}

#[derive(Error, Debug)]
pub enum WalletError {
    /// The user dismissed or denied the signing prompt. Recoverable;
    /// callers should offer a retry, not tear anything down.
    #[error("Signature request rejected: {0}")]
    Rejected(String),

    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// External wallet capability: account discovery, chain discovery, and the
/// structured off-chain signing operation used for decryption authorization.
///
/// The subsystem never manages keys for the signer identity itself, only for
/// its own ephemeral decryption keypair.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the wallet exposes; the first entry is the active account.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Chain id the wallet is currently connected to.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Sign the authorization payload with the active account, using the
    /// domain for the wallet's current chain.
    async fn sign_authorization(
        &self,
        authorization: &DecryptionAuthorization,
    ) -> Result<Signature, WalletError>;
}

/// Parse a chain id as wallets report it: "0xaa36a7" hex or plain decimal.
pub fn parse_chain_id(raw: &str) -> Result<u64, WalletError> {
    let parsed = match raw.strip_prefix("0x") {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => raw.parse(),
    };
    parsed.map_err(|_| WalletError::InvalidChainId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use alloy_sol_types::SolStruct;

    fn payload(addresses: Vec<Address>) -> DecryptionAuthorization {
        DecryptionAuthorization {
            publicKey: Bytes::from_static(&[0xaa; 32]),
            contractAddresses: addresses,
            startTimestamp: U256::from(1_700_000_000u64),
            durationDays: U256::from(7u64),
        }
    }

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id("0xaa36a7").unwrap(), 11_155_111);
        assert_eq!(parse_chain_id("11155111").unwrap(), 11_155_111);
        assert_eq!(parse_chain_id("0x7a69").unwrap(), 31_337);
        assert!(parse_chain_id("not-a-chain").is_err());
    }

    #[test]
    fn test_signing_hash_binds_addresses() {
        let domain = authorization_domain(11_155_111);
        let a = payload(vec![Address::repeat_byte(0x11)]);
        let b = payload(vec![Address::repeat_byte(0x22)]);
        assert_ne!(
            a.eip712_signing_hash(&domain),
            b.eip712_signing_hash(&domain)
        );
    }

    #[test]
    fn test_signing_hash_binds_chain() {
        let auth = payload(vec![Address::repeat_byte(0x11)]);
        assert_ne!(
            auth.eip712_signing_hash(&authorization_domain(1)),
            auth.eip712_signing_hash(&authorization_domain(11_155_111))
        );
    }
}
