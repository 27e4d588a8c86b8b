//! Network selection policy
//!
//! The engine accepts either a plain RPC URL string or a live provider
//! capability. Which one a chain gets is a closed policy table, not inline
//! branching: Sepolia is pinned to an RPC URL because the engine is unstable
//! there when handed a provider handle (a documented engine quirk), while
//! every other chain passes the provider through and lets the engine validate
//! connectivity itself.

use std::fmt;
use std::sync::Arc;

use crate::wallet::WalletProvider;

/// Chain id of the well-known public test network.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Environment variable overriding the Sepolia RPC endpoint.
pub const SEPOLIA_RPC_ENV: &str = "UNSEAL_SEPOLIA_RPC";

/// Public default Sepolia RPC endpoint used when no override is set.
pub const DEFAULT_SEPOLIA_RPC: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Connection policy for a chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkPolicy {
    /// Named preset merged with an RPC URL override (env var or public
    /// default); the provider capability is not forwarded.
    PresetRpc,
    /// Hand the raw provider capability to the engine unchanged.
    ProviderPassthrough,
}

/// Look up the connection policy for a chain id.
pub fn policy_for(chain_id: u64) -> NetworkPolicy {
    match chain_id {
        SEPOLIA_CHAIN_ID => NetworkPolicy::PresetRpc,
        _ => NetworkPolicy::ProviderPassthrough,
    }
}

/// Transport the engine uses to reach the ledger network.
#[derive(Clone)]
pub enum NetworkTransport {
    RpcUrl(String),
    Provider(Arc<dyn WalletProvider>),
}

impl fmt::Debug for NetworkTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkTransport::RpcUrl(url) => f.debug_tuple("RpcUrl").field(url).finish(),
            NetworkTransport::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Immutable description of how to reach the ledger network for one chain id.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    chain_id: u64,
    transport: NetworkTransport,
}

impl NetworkConfig {
    /// Resolve the config for a chain id according to the policy table.
    pub fn resolve(chain_id: u64, provider: Arc<dyn WalletProvider>) -> Self {
        let transport = match policy_for(chain_id) {
            NetworkPolicy::PresetRpc => {
                let rpc = std::env::var(SEPOLIA_RPC_ENV)
                    .unwrap_or_else(|_| DEFAULT_SEPOLIA_RPC.to_string());
                NetworkTransport::RpcUrl(rpc)
            }
            NetworkPolicy::ProviderPassthrough => NetworkTransport::Provider(provider),
        };
        Self {
            chain_id,
            transport,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn transport(&self) -> &NetworkTransport {
        &self.transport
    }

    /// RPC URL if this config carries one.
    pub fn rpc_url(&self) -> Option<&str> {
        match &self.transport {
            NetworkTransport::RpcUrl(url) => Some(url),
            NetworkTransport::Provider(_) => None,
        }
    }

    /// Transport kind label for logging.
    pub fn transport_kind(&self) -> &'static str {
        match &self.transport {
            NetworkTransport::RpcUrl(_) => "rpc-url",
            NetworkTransport::Provider(_) => "provider",
        }
    }
}
