//! Engine instance lifecycle

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};

use unseal_core::{NetworkConfig, WalletProvider};

use crate::api::{Engine, EngineSdk};
use crate::error::EngineError;
use crate::registry;

/// Interval between SDK availability checks.
pub const SDK_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum SDK availability checks before giving up.
pub const SDK_POLL_ATTEMPTS: u32 = 20;

/// Engine lifecycle as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Loading,
    Ready,
    Error(String),
}

struct ActiveEngine {
    provider: Arc<dyn WalletProvider>,
    chain_id: u64,
    engine: Arc<dyn Engine>,
}

/// Derives a ready engine instance from a (wallet provider, chain id) pair.
///
/// The instance is a pure function of the pair: connecting again with either
/// input changed drops the old instance and re-runs initialization from
/// scratch. The manager is the sole writer of the active instance; published
/// instances are immutable and freely shared.
pub struct EngineManager {
    status: watch::Sender<EngineStatus>,
    poll_interval: Duration,
    poll_attempts: u32,
    active: Mutex<Option<ActiveEngine>>,
}

impl EngineManager {
    pub fn new() -> Self {
        let (status, _) = watch::channel(EngineStatus::Uninitialized);
        Self {
            status,
            poll_interval: SDK_POLL_INTERVAL,
            poll_attempts: SDK_POLL_ATTEMPTS,
            active: Mutex::new(None),
        }
    }

    /// Override the SDK availability poll, mainly to keep tests fast.
    pub fn with_poll(mut self, interval: Duration, attempts: u32) -> Self {
        self.poll_interval = interval;
        self.poll_attempts = attempts;
        self
    }

    pub fn status(&self) -> EngineStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineStatus> {
        self.status.subscribe()
    }

    /// Get the engine for this (provider, chain id) pair, initializing or
    /// re-initializing as needed.
    ///
    /// Failures land in the observable status as well as the returned error,
    /// and never leave a partially-ready instance behind.
    pub async fn connect(
        &self,
        provider: Arc<dyn WalletProvider>,
        chain_id: u64,
    ) -> Result<Arc<dyn Engine>, EngineError> {
        let mut active = self.active.lock().await;

        if let Some(current) = active.as_ref() {
            if Arc::ptr_eq(&current.provider, &provider) && current.chain_id == chain_id {
                return Ok(current.engine.clone());
            }
        }

        *active = None;
        self.status.send_replace(EngineStatus::Loading);

        match self.initialize(provider.clone(), chain_id).await {
            Ok(engine) => {
                *active = Some(ActiveEngine {
                    provider,
                    chain_id,
                    engine: engine.clone(),
                });
                self.status.send_replace(EngineStatus::Ready);
                Ok(engine)
            }
            Err(e) => {
                tracing::warn!(chain_id, error = %e, "Engine initialization failed");
                self.status.send_replace(EngineStatus::Error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn initialize(
        &self,
        provider: Arc<dyn WalletProvider>,
        chain_id: u64,
    ) -> Result<Arc<dyn Engine>, EngineError> {
        let sdk = self.wait_for_sdk().await?;
        sdk.init().await?;

        let config = NetworkConfig::resolve(chain_id, provider);
        tracing::info!(
            chain_id,
            transport = config.transport_kind(),
            "Creating engine instance"
        );
        sdk.create_instance(&config).await
    }

    /// Bounded availability poll for the shared SDK registration.
    async fn wait_for_sdk(&self) -> Result<Arc<dyn EngineSdk>, EngineError> {
        for attempt in 1..=self.poll_attempts {
            if let Some(sdk) = registry::current() {
                if attempt > 1 {
                    tracing::debug!(attempt, "Engine SDK became available");
                }
                return Ok(sdk);
            }
            if attempt < self.poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        Err(EngineError::SdkUnavailable {
            attempts: self.poll_attempts,
        })
    }
}

impl Default for EngineManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uninitialized() {
        let manager = EngineManager::new();
        assert_eq!(manager.status(), EngineStatus::Uninitialized);
    }
}
