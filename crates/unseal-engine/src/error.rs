//! Engine error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Bundle fetch failed from {url}: {reason}")]
    BundleFetch { url: String, reason: String },

    #[error("Engine bundle at {url} loaded but no SDK registered")]
    NotRegistered { url: String },

    #[error("Engine SDK not available after {attempts} attempts")]
    SdkUnavailable { attempts: u32 },

    #[error("SDK initialization failed: {0}")]
    InitFailed(String),

    #[error("Instance construction failed: {0}")]
    InstanceConstruction(String),

    #[error("Relayer returned status {status}: {message}")]
    Relayer { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
