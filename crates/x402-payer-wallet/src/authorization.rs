//! ERC-3009 transfer authorizations and their EIP-712 signing message.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolStruct, eip712_domain, sol};
use x402_payer_proto::networks::TokenDeployment;
use x402_payer_proto::proto::EvmAuthorization;
use x402_payer_proto::timestamp::UnixTimestamp;

sol!(
    /// Solidity layout of the ERC-3009 `TransferWithAuthorization` message.
    ///
    /// The field names and order must match the token contract's typed-data
    /// schema exactly; the verifier recomputes this struct hash from the
    /// restated authorization fields in the payment proof.
    struct TransferWithAuthorization {
        address from;
        address to;
        uint256 value;
        uint256 validAfter;
        uint256 validBefore;
        bytes32 nonce;
    }
);

/// Construction failures for [`TransferAuthorization`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("empty validity window: validAfter {valid_after} >= validBefore {valid_before}")]
    EmptyValidityWindow {
        valid_after: UnixTimestamp,
        valid_before: UnixTimestamp,
    },
}

/// Parameters of one ERC-3009 transfer: who pays whom, how much, and during
/// what time window. Immutable once constructed; consumed once by signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferAuthorization {
    pub from: Address,
    pub to: Address,
    /// Amount in the token's smallest units.
    pub value: U256,
    /// Not valid before this timestamp (inclusive).
    pub valid_after: UnixTimestamp,
    /// Expires at this timestamp (exclusive).
    pub valid_before: UnixTimestamp,
    /// Unique 32-byte nonce; never reused across authorizations.
    pub nonce: B256,
}

impl TransferAuthorization {
    /// Builds an authorization, enforcing `valid_after < valid_before`.
    pub fn new(
        from: Address,
        to: Address,
        value: U256,
        valid_after: UnixTimestamp,
        valid_before: UnixTimestamp,
        nonce: B256,
    ) -> Result<Self, AuthorizationError> {
        if valid_after >= valid_before {
            return Err(AuthorizationError::EmptyValidityWindow {
                valid_after,
                valid_before,
            });
        }
        Ok(Self {
            from,
            to,
            value,
            valid_after,
            valid_before,
            nonce,
        })
    }

    /// The EIP-712 digest to sign, domain-separated by the token deployment.
    ///
    /// The domain binds the signature to the token contract address and the
    /// chain id, so an authorization signed for one chain cannot validate on
    /// another.
    pub fn signing_hash(&self, deployment: &TokenDeployment) -> B256 {
        let domain = eip712_domain! {
            name: deployment.eip712.name,
            version: deployment.eip712.version,
            chain_id: deployment.chain_reference,
            verifying_contract: deployment.address,
        };
        let message = TransferWithAuthorization {
            from: self.from,
            to: self.to,
            value: self.value,
            validAfter: self.valid_after.into(),
            validBefore: self.valid_before.into(),
            nonce: self.nonce,
        };
        message.eip712_signing_hash(&domain)
    }

    /// The wire form restated in the payment proof.
    pub fn to_wire(&self) -> EvmAuthorization {
        EvmAuthorization {
            from: self.from,
            to: self.to,
            value: self.value,
            valid_after: self.valid_after,
            valid_before: self.valid_before,
            nonce: self.nonce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use x402_payer_proto::networks;

    fn authorization(nonce: B256) -> TransferAuthorization {
        TransferAuthorization::new(
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            address!("0x209693Bc6afc0C5328bA36FaF03C514EF312287C"),
            U256::from(100_000u64),
            UnixTimestamp::ZERO,
            UnixTimestamp::from_secs(1_700_000_000),
            nonce,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_validity_window() {
        let result = TransferAuthorization::new(
            Address::ZERO,
            Address::ZERO,
            U256::ZERO,
            UnixTimestamp::from_secs(10),
            UnixTimestamp::from_secs(10),
            B256::ZERO,
        );
        assert!(matches!(
            result,
            Err(AuthorizationError::EmptyValidityWindow { .. })
        ));
    }

    #[test]
    fn test_signing_hash_is_deterministic() {
        let deployment = networks::usdc_deployment("base-mainnet").unwrap();
        let auth = authorization(B256::repeat_byte(0x01));
        assert_eq!(auth.signing_hash(deployment), auth.signing_hash(deployment));
    }

    #[test]
    fn test_signing_hash_binds_to_chain() {
        let base = networks::usdc_deployment("base-mainnet").unwrap();
        let sepolia = networks::usdc_deployment("base-sepolia").unwrap();
        let auth = authorization(B256::repeat_byte(0x01));
        assert_ne!(auth.signing_hash(base), auth.signing_hash(sepolia));
    }

    #[test]
    fn test_signing_hash_binds_to_nonce() {
        let deployment = networks::usdc_deployment("base-mainnet").unwrap();
        let first = authorization(B256::repeat_byte(0x01));
        let second = authorization(B256::repeat_byte(0x02));
        assert_ne!(
            first.signing_hash(deployment),
            second.signing_hash(deployment)
        );
    }
}
