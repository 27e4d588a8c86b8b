//! Decryption CLI
//!
//! Run with:
//! ```bash
//! cargo run -p unseal-client --bin unseal -- \
//!     --bundle-url http://localhost:8787/engine-bundle.json \
//!     --private-key 0x... --chain-id 31337 0x<handle> [0x<handle> ...]
//! ```

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use unseal_client::{LocalWallet, UnsealClient};
use unseal_core::DecryptionHandle;
use unseal_engine::{EngineManager, SdkLoader};

#[derive(Parser, Debug)]
#[command(name = "unseal")]
#[command(about = "Decrypt confidential ledger values as an authorized user")]
struct Args {
    /// Engine bundle URL
    #[arg(long, default_value = unseal_engine::DEFAULT_BUNDLE_URL)]
    bundle_url: String,

    /// Hex private key of the authorizing account
    #[arg(long)]
    private_key: String,

    /// Chain id to connect to
    #[arg(long, default_value = "11155111")]
    chain_id: u64,

    /// Contract owning the handles (defaults to the known deployment for the
    /// chain)
    #[arg(long)]
    contract: Option<String>,

    /// Ciphertext handles to decrypt (hex)
    handles: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("unseal=info".parse()?))
        .init();

    let args = Args::parse();

    let key: B256 = args.private_key.parse()?;
    let wallet = Arc::new(LocalWallet::from_bytes(&key, args.chain_id)?);

    let contract: Address = match &args.contract {
        Some(raw) => raw.parse()?,
        None => unseal_core::deployment_for(args.chain_id).ok_or_else(|| {
            anyhow::anyhow!("no known deployment for chain {}", args.chain_id)
        })?,
    };

    let handles = args
        .handles
        .iter()
        .map(|raw| Ok(DecryptionHandle::new(raw.parse::<B256>()?, contract)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if handles.is_empty() {
        anyhow::bail!("no handles given");
    }

    SdkLoader::new(&args.bundle_url).load().await?;

    let manager = Arc::new(EngineManager::new());
    let client = UnsealClient::connect(wallet, manager).await?;

    let values = client.decrypt(&handles).await?;
    for h in &handles {
        match values.get(&h.handle) {
            Some(v) => println!("{} = {}", h.handle, v),
            None => println!("{} = <no value recorded>", h.handle),
        }
    }

    Ok(())
}
