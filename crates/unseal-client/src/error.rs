//! Client error types

use alloy_primitives::Address;
use thiserror::Error;

use unseal_core::WalletError;
use unseal_engine::EngineError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Authorization session expired")]
    SessionExpired,

    #[error("Session does not authorize contract {address}")]
    SessionNotAuthorized { address: Address },

    #[error("No known deployment for chain id {0}")]
    UnknownDeployment(u64),
}

pub type Result<T> = std::result::Result<T, ClientError>;
