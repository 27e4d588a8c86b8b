//! Ciphertext handle types

use std::collections::HashMap;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Reserved all-zero handle meaning "no ciphertext was ever recorded here".
///
/// Requesting it from the engine is undefined behavior on the engine side;
/// batches must be filtered before they go out.
pub const SENTINEL_HANDLE: B256 = B256::ZERO;

/// Opaque reference to an encrypted value on the ledger, scoped to the
/// contract that recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecryptionHandle {
    /// 32-byte ciphertext reference
    pub handle: B256,
    /// Ledger address the ciphertext lives under
    #[serde(rename = "contractAddress")]
    pub contract_address: Address,
}

impl DecryptionHandle {
    pub fn new(handle: B256, contract_address: Address) -> Self {
        Self {
            handle,
            contract_address,
        }
    }

    /// True if this is the reserved "nothing recorded" sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.handle == SENTINEL_HANDLE
    }
}

/// Plaintext values keyed by the handle they were decrypted from.
///
/// A missing key means "unknown" (sentinel or failed decryption), never zero.
pub type DecryptedValues = HashMap<B256, U256>;

/// Drop sentinel handles from a batch, preserving the order of the rest.
pub fn filter_decryptable(handles: &[DecryptionHandle]) -> Vec<DecryptionHandle> {
    handles.iter().copied().filter(|h| !h.is_sentinel()).collect()
}

/// Distinct contract addresses referenced by a batch, sorted and deduplicated
/// so the result is canonical regardless of handle order.
pub fn distinct_addresses(handles: &[DecryptionHandle]) -> Vec<Address> {
    let mut addrs: Vec<Address> = handles.iter().map(|h| h.contract_address).collect();
    addrs.sort_unstable();
    addrs.dedup();
    addrs
}
