//! Relayer-backed engine adapter
//!
//! The external engine performs the FHE transform behind a relayer service.
//! This module is the only code that knows the relayer's wire shape; the
//! rest of the system sees the [`EngineSdk`]/[`Engine`] traits.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};

use unseal_core::{DecryptedValues, DecryptionHandle, NetworkConfig};

use crate::api::{DecryptionRequest, Engine, EngineSdk, Keypair};
use crate::bootstrap::{SdkActivator, ENGINE_BUNDLE_VERSION};
use crate::error::EngineError;
use crate::registry;

/// Engine bundle manifest fetched from the versioned CDN location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineBundle {
    pub version: String,
    #[serde(rename = "relayerUrl")]
    pub relayer_url: String,
    #[serde(rename = "keysetDigest")]
    pub keyset_digest: B256,
}

impl EngineBundle {
    pub fn parse(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Default activator: parse the bundle and register a relayer SDK.
pub struct RelayerActivator;

impl SdkActivator for RelayerActivator {
    fn activate(&self, bundle: &[u8]) {
        match EngineBundle::parse(bundle) {
            Ok(manifest) => {
                let version = manifest.version.clone();
                if registry::register(Arc::new(RelayerSdk::new(manifest))) {
                    tracing::info!(version = %version, "Engine SDK registered");
                } else {
                    tracing::debug!("Engine SDK already registered, keeping existing");
                }
            }
            // A bundle that arrives but never comes up; the loader's settle
            // check reports it, not this call.
            Err(e) => tracing::warn!(error = %e, "Engine bundle failed to activate"),
        }
    }
}

/// SDK-level surface of the relayer engine.
pub struct RelayerSdk {
    manifest: EngineBundle,
}

impl RelayerSdk {
    pub fn new(manifest: EngineBundle) -> Self {
        Self { manifest }
    }
}

#[async_trait]
impl EngineSdk for RelayerSdk {
    async fn init(&self) -> Result<(), EngineError> {
        if self.manifest.version != ENGINE_BUNDLE_VERSION {
            return Err(EngineError::InitFailed(format!(
                "bundle version {} not supported (expected {})",
                self.manifest.version, ENGINE_BUNDLE_VERSION
            )));
        }
        if self.manifest.relayer_url.is_empty() {
            return Err(EngineError::InitFailed("bundle has no relayer URL".into()));
        }
        Ok(())
    }

    async fn create_instance(
        &self,
        config: &NetworkConfig,
    ) -> Result<Arc<dyn Engine>, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| EngineError::InstanceConstruction(e.to_string()))?;

        tracing::info!(
            chain_id = config.chain_id(),
            transport = config.transport_kind(),
            relayer = %self.manifest.relayer_url,
            "Engine instance created"
        );

        Ok(Arc::new(RelayerEngine {
            http,
            relayer_url: self.manifest.relayer_url.trim_end_matches('/').to_string(),
            chain_id: config.chain_id(),
        }))
    }
}

/// Wire request for one batched user decryption.
#[derive(Serialize)]
struct UserDecryptRequest<'a> {
    handles: &'a [DecryptionHandle],
    #[serde(rename = "publicKey")]
    public_key: &'a Bytes,
    signature: &'a Bytes,
    #[serde(rename = "contractAddresses")]
    contract_addresses: &'a [Address],
    #[serde(rename = "userAddress")]
    user_address: Address,
    #[serde(rename = "startTimestamp")]
    start_timestamp: u64,
    #[serde(rename = "durationDays")]
    duration_days: u64,
    #[serde(rename = "chainId")]
    chain_id: u64,
}

#[derive(Deserialize)]
struct UserDecryptResponse {
    values: HashMap<B256, U256>,
}

/// Engine instance bound to one network. Holds no session material; key
/// material arrives with each request and the ephemeral private key never
/// goes on the wire.
#[derive(Debug)]
pub struct RelayerEngine {
    http: reqwest::Client,
    relayer_url: String,
    chain_id: u64,
}

#[async_trait]
impl Engine for RelayerEngine {
    fn generate_keypair(&self) -> Keypair {
        let secret = StaticSecret::random_from_rng(rand::thread_rng());
        let public = PublicKey::from(&secret);
        Keypair {
            public_key: Bytes::copy_from_slice(public.as_bytes()),
            private_key: Bytes::copy_from_slice(&secret.to_bytes()),
        }
    }

    async fn user_decrypt(
        &self,
        request: DecryptionRequest<'_>,
    ) -> Result<DecryptedValues, EngineError> {
        let url = format!("{}/v1/user-decrypt", self.relayer_url);
        let wire = UserDecryptRequest {
            handles: request.handles,
            public_key: request.public_key,
            signature: request.signature,
            contract_addresses: request.contract_addresses,
            user_address: request.user_address,
            start_timestamp: request.start_timestamp,
            duration_days: request.duration_days,
            chain_id: self.chain_id,
        };

        let resp = self.http.post(&url).json(&wire).send().await?;
        if !resp.status().is_success() {
            return Err(EngineError::Relayer {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let decrypted: UserDecryptResponse = resp.json().await?;
        tracing::debug!(
            requested = request.handles.len(),
            decrypted = decrypted.values.len(),
            "User decryption batch complete"
        );
        Ok(decrypted.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_json(version: &str) -> Vec<u8> {
        format!(
            r#"{{"version":"{version}","relayerUrl":"http://localhost:8787","keysetDigest":"0x{}"}}"#,
            "11".repeat(32)
        )
        .into_bytes()
    }

    #[test]
    fn test_bundle_parse() {
        let bundle = EngineBundle::parse(&manifest_json("0.2.0")).unwrap();
        assert_eq!(bundle.version, "0.2.0");
        assert_eq!(bundle.relayer_url, "http://localhost:8787");
    }

    #[test]
    fn test_bundle_parse_rejects_garbage() {
        assert!(EngineBundle::parse(b"not json").is_err());
        assert!(EngineBundle::parse(br#"{"version":"0.2.0"}"#).is_err());
    }

    #[tokio::test]
    async fn test_init_rejects_version_mismatch() {
        let sdk = RelayerSdk::new(EngineBundle::parse(&manifest_json("9.9.9")).unwrap());
        assert!(matches!(
            sdk.init().await,
            Err(EngineError::InitFailed(_))
        ));

        let sdk = RelayerSdk::new(EngineBundle::parse(&manifest_json("0.2.0")).unwrap());
        assert!(sdk.init().await.is_ok());
    }

    #[test]
    fn test_keypair_is_fresh_per_call() {
        let engine = RelayerEngine {
            http: reqwest::Client::new(),
            relayer_url: "http://localhost:8787".into(),
            chain_id: 31_337,
        };
        let a = engine.generate_keypair();
        let b = engine.generate_keypair();
        assert_eq!(a.public_key.len(), 32);
        assert_eq!(a.private_key.len(), 32);
        assert_ne!(a.public_key, b.public_key);
        assert_ne!(a.private_key, a.public_key);
    }

    #[test]
    fn test_wire_request_field_names() {
        let handles = vec![DecryptionHandle::new(
            B256::repeat_byte(0x01),
            Address::repeat_byte(0x11),
        )];
        let public_key = Bytes::from_static(&[0xaa; 32]);
        let signature = Bytes::from_static(&[0xbb; 65]);
        let addresses = vec![Address::repeat_byte(0x11)];

        let wire = UserDecryptRequest {
            handles: &handles,
            public_key: &public_key,
            signature: &signature,
            contract_addresses: &addresses,
            user_address: Address::repeat_byte(0x22),
            start_timestamp: 1_700_000_000,
            duration_days: 7,
            chain_id: 31_337,
        };

        let value = serde_json::to_value(&wire).unwrap();
        for key in [
            "handles",
            "publicKey",
            "signature",
            "contractAddresses",
            "userAddress",
            "startTimestamp",
            "durationDays",
            "chainId",
        ] {
            assert!(value.get(key).is_some(), "missing wire field {key}");
        }
    }
}
