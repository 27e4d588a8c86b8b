//! unseal-engine: Bootstrap, lifecycle and adapter for the external
//! cryptographic engine
//!
//! The engine that performs homomorphic-ciphertext operations is an external
//! library distributed as a versioned bundle. This crate owns its life:
//!
//! - [`SdkLoader`] fetches the bundle once per process and confirms the SDK
//!   registered itself in the process-wide [`registry`]
//! - [`EngineManager`] turns a (wallet provider, chain id) pair into a ready
//!   [`Engine`] instance, exposing the lifecycle as a watch channel
//! - [`RelayerSdk`]/[`RelayerEngine`] adapt the relayer-backed engine to the
//!   [`EngineSdk`]/[`Engine`] traits; nothing else knows its wire shape
//!
//! The FHE mathematics itself never runs in this process.

mod api;
mod bootstrap;
mod error;
mod manager;
pub mod registry;
mod relayer;

pub use api::{DecryptionRequest, Engine, EngineSdk, Keypair};
pub use bootstrap::{
    SdkActivator, SdkLoader, DEFAULT_BUNDLE_URL, ENGINE_BUNDLE_VERSION, SETTLE_DELAY,
};
pub use error::EngineError;
pub use manager::{EngineManager, EngineStatus, SDK_POLL_ATTEMPTS, SDK_POLL_INTERVAL};
pub use relayer::{EngineBundle, RelayerActivator, RelayerEngine, RelayerSdk};

pub type Result<T> = std::result::Result<T, EngineError>;
