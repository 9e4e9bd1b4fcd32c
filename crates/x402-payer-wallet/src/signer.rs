//! The signing port: address derivation and EIP-712 digest signing.

use alloy_primitives::{Address, B256, Signature};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use std::fmt;
use x402_payer_proto::networks::TokenDeployment;

use crate::authorization::TransferAuthorization;

/// Signing failures.
///
/// [`SignerError::InvalidKey`] deliberately carries no payload: key material
/// must never travel through error messages or logs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SignerError {
    #[error("invalid private key")]
    InvalidKey,
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Capability to sign transfer authorizations for a fixed identity.
///
/// `address()` is a pure function of the underlying key and must match the
/// `from` field of every authorization signed through this port.
pub trait AuthorizationSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Signs the EIP-712 digest of `authorization` under `deployment`'s domain.
    fn sign_authorization(
        &self,
        authorization: &TransferAuthorization,
        deployment: &TokenDeployment,
    ) -> Result<Signature, SignerError>;
}

/// Signer over a locally held secp256k1 private key.
pub struct LocalAuthorizationSigner {
    inner: PrivateKeySigner,
}

impl LocalAuthorizationSigner {
    /// Parses a hex-encoded private key, `0x` prefix optional.
    ///
    /// Fails fast with [`SignerError::InvalidKey`] on malformed input, before
    /// any negotiation can start.
    pub fn from_hex(private_key: &str) -> Result<Self, SignerError> {
        let trimmed = private_key.trim();
        let hex_key = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let inner: PrivateKeySigner = hex_key.parse().map_err(|_| SignerError::InvalidKey)?;
        Ok(Self { inner })
    }

    fn sign_digest(&self, digest: B256) -> Result<Signature, SignerError> {
        self.inner
            .sign_hash_sync(&digest)
            .map_err(|e| SignerError::Signing(e.to_string()))
    }
}

impl AuthorizationSigner for LocalAuthorizationSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn sign_authorization(
        &self,
        authorization: &TransferAuthorization,
        deployment: &TokenDeployment,
    ) -> Result<Signature, SignerError> {
        self.sign_digest(authorization.signing_hash(deployment))
    }
}

// Never expose the key, even through Debug.
impl fmt::Debug for LocalAuthorizationSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAuthorizationSigner")
            .field("address", &self.inner.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{U256, address};
    use x402_payer_proto::networks;
    use x402_payer_proto::timestamp::UnixTimestamp;

    // Hardhat's first default account; test-only key.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_address_derivation() {
        let signer = LocalAuthorizationSigner::from_hex(TEST_KEY).unwrap();
        assert_eq!(
            signer.address(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_prefix_is_optional() {
        let with_prefix = LocalAuthorizationSigner::from_hex(TEST_KEY).unwrap();
        let without_prefix =
            LocalAuthorizationSigner::from_hex(TEST_KEY.strip_prefix("0x").unwrap()).unwrap();
        assert_eq!(with_prefix.address(), without_prefix.address());
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(matches!(
            LocalAuthorizationSigner::from_hex("0xdeadbeef"),
            Err(SignerError::InvalidKey)
        ));
        assert!(matches!(
            LocalAuthorizationSigner::from_hex("not hex at all"),
            Err(SignerError::InvalidKey)
        ));
    }

    #[test]
    fn test_signing_is_deterministic_per_key() {
        let signer = LocalAuthorizationSigner::from_hex(TEST_KEY).unwrap();
        let deployment = networks::usdc_deployment("base-mainnet").unwrap();
        let authorization = TransferAuthorization::new(
            signer.address(),
            address!("0x209693Bc6afc0C5328bA36FaF03C514EF312287C"),
            U256::from(100_000u64),
            UnixTimestamp::ZERO,
            UnixTimestamp::from_secs(1_700_000_000),
            alloy_primitives::B256::repeat_byte(0x42),
        )
        .unwrap();
        let first = signer
            .sign_authorization(&authorization, deployment)
            .unwrap();
        let second = signer
            .sign_authorization(&authorization, deployment)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = LocalAuthorizationSigner::from_hex(TEST_KEY).unwrap();
        let rendered = format!("{signer:?}");
        assert!(!rendered.contains("ac0974"));
    }
}
