//! Error types for unseal-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("No known deployment for chain id {0}")]
    UnknownDeployment(u64),
}
