//! CAIP-2 chain identifier types.
//!
//! A [CAIP-2](https://standards.chainagnostic.org/CAIPs/caip-2) chain ID
//! consists of two parts separated by a colon:
//!
//! - **Namespace**: the blockchain ecosystem (e.g., `eip155` for EVM)
//! - **Reference**: the chain-specific identifier (e.g., `8453` for Base)
//!
//! Servers may also announce a network under a legacy alias such as
//! `"base-mainnet"`; see [`crate::networks`] for the mapping back to a
//! canonical chain ID.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// A CAIP-2 compliant blockchain identifier.
///
/// Serializes to/from a colon-separated string: `"eip155:8453"`.
///
/// # Example
///
/// ```
/// use x402_payer_proto::chain::ChainId;
///
/// let base: ChainId = "eip155:8453".parse().unwrap();
/// assert_eq!(base.namespace, "eip155");
/// assert_eq!(base.reference, "8453");
/// assert_eq!(base.to_string(), "eip155:8453");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainId {
    /// The blockchain namespace (e.g., `eip155` for EVM chains).
    pub namespace: String,
    /// The chain-specific reference (e.g., `8453` for Base).
    pub reference: String,
}

impl ChainId {
    /// Creates a new chain ID from namespace and reference components.
    pub fn new<N: Into<String>, R: Into<String>>(namespace: N, reference: R) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    /// Creates an `eip155` chain ID from a numeric EVM chain id.
    pub fn eip155(reference: u64) -> Self {
        Self::new("eip155", reference.to_string())
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.to_string()
    }
}

/// Error returned when parsing an invalid chain ID string.
///
/// A valid chain ID is `namespace:reference` with both components non-empty.
#[derive(Debug, thiserror::Error)]
#[error("Invalid chain id format {0}")]
pub struct ChainIdFormatError(String);

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, reference) = s.split_once(':').ok_or(ChainIdFormatError(s.into()))?;
        if namespace.is_empty() || reference.is_empty() {
            return Err(ChainIdFormatError(s.into()));
        }
        Ok(ChainId {
            namespace: namespace.into(),
            reference: reference.into(),
        })
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ChainId::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_serialize() {
        let chain_id = ChainId::eip155(8453);
        let serialized = serde_json::to_string(&chain_id).unwrap();
        assert_eq!(serialized, "\"eip155:8453\"");
    }

    #[test]
    fn test_chain_id_deserialize() {
        let chain_id: ChainId = serde_json::from_str("\"eip155:1\"").unwrap();
        assert_eq!(chain_id.namespace, "eip155");
        assert_eq!(chain_id.reference, "1");
    }

    #[test]
    fn test_chain_id_roundtrip() {
        let original = ChainId::new("eip155", "84532");
        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: ChainId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_chain_id_invalid_format() {
        assert!("base-mainnet".parse::<ChainId>().is_err());
        assert!("eip155:".parse::<ChainId>().is_err());
        assert!(":8453".parse::<ChainId>().is_err());
    }
}
