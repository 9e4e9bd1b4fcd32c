//! Registry of known USDC deployments.
//!
//! The x402 "exact" scheme binds every authorization to a token contract on a
//! specific chain. This module maps network identifiers - canonical CAIP-2
//! strings and the legacy aliases some servers still send - to the USDC
//! deployment on that chain, including the EIP-712 domain parameters the
//! contract verifies signatures against.
//!
//! # Example
//!
//! ```
//! use x402_payer_proto::networks;
//!
//! let base = networks::usdc_deployment("eip155:8453").unwrap();
//! let alias = networks::usdc_deployment("base-mainnet").unwrap();
//! assert_eq!(base.chain_reference, alias.chain_reference);
//! ```

use alloy_primitives::{Address, address};

use crate::chain::ChainId;

/// EIP-712 domain parameters a token contract verifies signatures against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712TokenDomain {
    /// The token name as used in the EIP-712 domain.
    pub name: &'static str,
    /// The token version as used in the EIP-712 domain.
    pub version: &'static str,
}

/// A token deployment on a specific EVM chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenDeployment {
    /// Numeric EVM chain id (the CAIP-2 reference for `eip155`).
    pub chain_reference: u64,
    /// The token contract address.
    pub address: Address,
    /// Token decimals; 6 for USDC everywhere.
    pub decimals: u8,
    /// Domain parameters for EIP-712 signature verification.
    pub eip712: Eip712TokenDomain,
    /// The legacy network alias this deployment is known under.
    pub alias: &'static str,
}

impl TokenDeployment {
    /// The canonical CAIP-2 chain ID of this deployment.
    pub fn chain_id(&self) -> ChainId {
        ChainId::eip155(self.chain_reference)
    }
}

const USDC_DOMAIN: Eip712TokenDomain = Eip712TokenDomain {
    name: "USD Coin",
    version: "2",
};

/// USDC deployments this payer knows how to sign for.
static USDC_DEPLOYMENTS: &[TokenDeployment] = &[
    TokenDeployment {
        chain_reference: 8453,
        address: address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
        decimals: 6,
        eip712: USDC_DOMAIN,
        alias: "base-mainnet",
    },
    TokenDeployment {
        chain_reference: 84532,
        address: address!("0x036CbD53842c5426634e7929541eC2318f3dCF7e"),
        decimals: 6,
        eip712: USDC_DOMAIN,
        alias: "base-sepolia",
    },
    TokenDeployment {
        chain_reference: 1,
        address: address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        decimals: 6,
        eip712: USDC_DOMAIN,
        alias: "ethereum-mainnet",
    },
    TokenDeployment {
        chain_reference: 11155111,
        address: address!("0x1c7D4B196Cb0C7B01d064914d0da28F12c7d0b86"),
        decimals: 6,
        eip712: USDC_DOMAIN,
        alias: "ethereum-sepolia",
    },
    TokenDeployment {
        chain_reference: 5042002,
        address: address!("0x3600000000000000000000000000000000000000"),
        decimals: 6,
        eip712: USDC_DOMAIN,
        alias: "arc-testnet",
    },
];

/// Error returned when a network identifier has no known deployment.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unsupported network: {0}")]
pub struct UnsupportedNetwork(pub String);

/// Looks up the USDC deployment for a network identifier.
///
/// Accepts the canonical CAIP-2 form (`"eip155:8453"`) and the legacy alias
/// (`"base-mainnet"`); both resolve to the same deployment.
pub fn usdc_deployment(network: &str) -> Result<&'static TokenDeployment, UnsupportedNetwork> {
    let by_chain_id = network
        .parse::<ChainId>()
        .ok()
        .filter(|chain_id| chain_id.namespace == "eip155")
        .and_then(|chain_id| chain_id.reference.parse::<u64>().ok());
    USDC_DEPLOYMENTS
        .iter()
        .find(|deployment| {
            by_chain_id == Some(deployment.chain_reference) || deployment.alias == network
        })
        .ok_or_else(|| UnsupportedNetwork(network.to_string()))
}

/// Resolves a network identifier (CAIP-2 or alias) to its canonical chain ID.
pub fn resolve_chain_id(network: &str) -> Result<ChainId, UnsupportedNetwork> {
    usdc_deployment(network).map(|deployment| deployment.chain_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_caip2() {
        let deployment = usdc_deployment("eip155:8453").unwrap();
        assert_eq!(deployment.chain_reference, 8453);
        assert_eq!(
            deployment.address,
            address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913")
        );
    }

    #[test]
    fn test_alias_resolves_to_same_deployment() {
        let canonical = usdc_deployment("eip155:84532").unwrap();
        let alias = usdc_deployment("base-sepolia").unwrap();
        assert_eq!(canonical, alias);
    }

    #[test]
    fn test_unknown_network_rejected() {
        assert!(usdc_deployment("eip155:999999").is_err());
        assert!(usdc_deployment("polygon-mainnet").is_err());
        assert!(usdc_deployment("solana:mainnet").is_err());
    }

    #[test]
    fn test_resolve_chain_id() {
        let chain_id = resolve_chain_id("ethereum-mainnet").unwrap();
        assert_eq!(chain_id.to_string(), "eip155:1");
    }
}
