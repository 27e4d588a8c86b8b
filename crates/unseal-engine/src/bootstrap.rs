//! Engine bundle bootstrap
//!
//! The engine library is distributed as a versioned bundle at a fixed
//! network location. [`SdkLoader`] fetches it at most once per process: if an
//! SDK is already registered the load resolves immediately with no network
//! activity at all.

use std::sync::Arc;
use std::time::Duration;

use crate::error::EngineError;
use crate::registry;
use crate::relayer::RelayerActivator;

/// Bundle version this build understands.
pub const ENGINE_BUNDLE_VERSION: &str = "0.2.0";

/// Fixed versioned location of the engine bundle.
pub const DEFAULT_BUNDLE_URL: &str =
    "https://cdn.unseal-labs.io/engine/0.2.0/engine-bundle.json";

/// Grace period between activation and the registered-check. Engines may
/// signal "loaded" before finishing internal setup.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Turns fetched bundle bytes into a registered SDK.
///
/// Activation is fire-and-forget, like a script tag: the loader confirms
/// registration afterwards instead of trusting the activation signal.
pub trait SdkActivator: Send + Sync {
    fn activate(&self, bundle: &[u8]);
}

/// One-shot loader for the shared engine bundle.
pub struct SdkLoader {
    http: reqwest::Client,
    bundle_url: String,
    settle_delay: Duration,
    activator: Arc<dyn SdkActivator>,
}

impl SdkLoader {
    pub fn new(bundle_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            bundle_url: bundle_url.into(),
            settle_delay: SETTLE_DELAY,
            activator: Arc::new(RelayerActivator),
        }
    }

    pub fn with_activator(mut self, activator: Arc<dyn SdkActivator>) -> Self {
        self.activator = activator;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Fetch and activate the engine bundle, then confirm an SDK registered.
    ///
    /// Idempotent: short-circuits without network activity when an SDK is
    /// already present. Safe to call concurrently or redundantly; the
    /// check-then-act race risks only a duplicate fetch (first registration
    /// wins), never a corrupted registration. A bundle that fetched fine but
    /// never registered is reported as [`EngineError::NotRegistered`],
    /// distinct from a network failure.
    pub async fn load(&self) -> Result<(), EngineError> {
        if registry::is_registered() {
            tracing::debug!("Engine SDK already registered, skipping fetch");
            return Ok(());
        }

        tracing::info!(url = %self.bundle_url, "Fetching engine bundle");
        let bundle = self.fetch_bundle().await?;
        self.activator.activate(&bundle);

        tokio::time::sleep(self.settle_delay).await;

        if !registry::is_registered() {
            return Err(EngineError::NotRegistered {
                url: self.bundle_url.clone(),
            });
        }

        tracing::info!("Engine bundle loaded");
        Ok(())
    }

    async fn fetch_bundle(&self) -> Result<Vec<u8>, EngineError> {
        let resp = self
            .http
            .get(&self.bundle_url)
            .send()
            .await
            .map_err(|e| EngineError::BundleFetch {
                url: self.bundle_url.clone(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(EngineError::BundleFetch {
                url: self.bundle_url.clone(),
                reason: format!("status {}", resp.status()),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| EngineError::BundleFetch {
            url: self.bundle_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

impl Default for SdkLoader {
    fn default() -> Self {
        Self::new(DEFAULT_BUNDLE_URL)
    }
}
