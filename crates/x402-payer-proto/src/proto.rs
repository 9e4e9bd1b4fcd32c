//! Payment requirement and payment proof envelopes.
//!
//! Both directions of the negotiation travel as base64-encoded JSON in HTTP
//! headers. The inbound [`PaymentRequired`] states the server's terms; the
//! outbound [`PaymentPayload`] restates the full signed authorization so the
//! verifier can recompute the EIP-712 digest independently. Critical fields
//! are required at decode time - a payload missing its scheme or version is
//! rejected, never silently defaulted.

use alloy_primitives::{Address, B256, Bytes, U256};
use base64::prelude::{BASE64_STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::timestamp::UnixTimestamp;

/// The one payment scheme this payer can sign.
pub const EXACT_SCHEME: &str = "exact";

/// Codec failures for the header envelopes.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    #[error("malformed payment requirement: {0}")]
    MalformedRequirement(String),
    #[error("unsupported payment scheme \"{0}\"")]
    UnsupportedScheme(String),
    #[error("malformed settlement acknowledgment: {0}")]
    MalformedSettlement(String),
}

/// Payment terms announced by a resource server on a 402 response.
///
/// `payTo`, `maxAmountRequired`, `validUntil`, `scheme`, and `x402Version`
/// are required; `network` is optional and may arrive either as a CAIP-2
/// string or a legacy alias (see [`crate::networks`]).
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    /// Protocol version the server speaks.
    pub x402_version: u8,

    /// Payment scheme tag; only `"exact"` is accepted.
    pub scheme: String,

    /// Network identifier, when the server pins one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Recipient of the transfer.
    pub pay_to: Address,

    /// Price in the token's smallest units, wire-encoded as a decimal string.
    #[serde_as(as = "DisplayFromStr")]
    pub max_amount_required: U256,

    /// Deadline after which the authorization must no longer validate.
    pub valid_until: UnixTimestamp,
}

impl PaymentRequired {
    /// Decodes a requirement from its base64 header value.
    pub fn from_header(header_value: &str) -> Result<Self, ProtoError> {
        let raw = BASE64_STANDARD
            .decode(header_value)
            .map_err(|e| ProtoError::MalformedRequirement(e.to_string()))?;
        let requirement: PaymentRequired = serde_json::from_slice(&raw)
            .map_err(|e| ProtoError::MalformedRequirement(e.to_string()))?;
        if requirement.scheme != EXACT_SCHEME {
            return Err(ProtoError::UnsupportedScheme(requirement.scheme));
        }
        Ok(requirement)
    }
}

/// The outbound payment proof attached to the retried request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version, echoed from the requirement.
    pub x402_version: u8,

    /// Payment scheme, echoed from the requirement.
    pub scheme: String,

    /// Network the authorization is bound to.
    pub network: String,

    /// The signature and the signed authorization fields.
    pub payload: ExactEvmPayload,
}

impl PaymentPayload {
    /// Encodes the proof as a base64 header value.
    pub fn to_header(&self) -> String {
        let raw = serde_json::to_vec(self).expect("proof serialization is infallible");
        BASE64_STANDARD.encode(raw)
    }
}

/// Signature plus the authorization it covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactEvmPayload {
    /// The EIP-712 signature over the authorization, `0x`-prefixed hex.
    pub signature: Bytes,

    /// The authorization fields, restated for independent verification.
    pub authorization: EvmAuthorization,
}

/// ERC-3009 authorization fields as they appear on the wire: value and
/// timestamps as decimal strings, nonce as `0x`-prefixed hex.
#[serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmAuthorization {
    pub from: Address,
    pub to: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub value: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub valid_after: UnixTimestamp,
    #[serde_as(as = "DisplayFromStr")]
    pub valid_before: UnixTimestamp,
    pub nonce: B256,
}

/// Informational settlement acknowledgment a server may attach to the paid
/// response. Read-only; parse failures are logged and swallowed by callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementAck {
    #[serde(default)]
    transaction: Option<String>,
    #[serde(default)]
    tx_hash: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

impl SettlementAck {
    /// Decodes an acknowledgment from its base64 header value.
    ///
    /// An acknowledgment without any transaction-hash-like field is treated
    /// as malformed.
    pub fn from_header(header_value: &str) -> Result<Self, ProtoError> {
        let raw = BASE64_STANDARD
            .decode(header_value)
            .map_err(|e| ProtoError::MalformedSettlement(e.to_string()))?;
        let ack: SettlementAck = serde_json::from_slice(&raw)
            .map_err(|e| ProtoError::MalformedSettlement(e.to_string()))?;
        if ack.transaction_hash().is_none() {
            return Err(ProtoError::MalformedSettlement(
                "missing transaction hash".to_string(),
            ));
        }
        Ok(ack)
    }

    /// The settlement transaction hash, whichever field name carried it.
    pub fn transaction_hash(&self) -> Option<&str> {
        self.transaction
            .as_deref()
            .or(self.tx_hash.as_deref())
    }
}
