//! Known confidential-board deployments
//!
//! Static table of review-board contract deployments keyed by chain id, used
//! by clients that don't supply an explicit contract address.

use alloy_primitives::{address, Address};

use crate::network::SEPOLIA_CHAIN_ID;

/// A known deployment of the confidential review-board contract.
pub struct KnownDeployment {
    pub chain_id: u64,
    pub name: &'static str,
    pub address: Address,
}

/// Deployments this build knows about.
pub const DEPLOYMENTS: &[KnownDeployment] = &[
    KnownDeployment {
        chain_id: SEPOLIA_CHAIN_ID,
        name: "sepolia",
        address: address!("0x99cbbdf446f029de6633df02d7bacbfdc79344fd"),
    },
    KnownDeployment {
        chain_id: 31_337,
        name: "localnet",
        address: address!("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
    },
];

/// Contract address for a chain id, if this build knows one.
pub fn deployment_for(chain_id: u64) -> Option<Address> {
    DEPLOYMENTS
        .iter()
        .find(|d| d.chain_id == chain_id)
        .map(|d| d.address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_deployments() {
        assert!(deployment_for(SEPOLIA_CHAIN_ID).is_some());
        assert!(deployment_for(31_337).is_some());
        assert_eq!(deployment_for(1), None);
    }

    #[test]
    fn test_chain_ids_unique() {
        for (i, a) in DEPLOYMENTS.iter().enumerate() {
            for b in &DEPLOYMENTS[i + 1..] {
                assert_ne!(a.chain_id, b.chain_id, "duplicate entry for {}", a.name);
            }
        }
    }
}
