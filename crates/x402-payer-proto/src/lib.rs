//! Wire types for payer-side x402 payments.
//!
//! This crate defines everything a paying client needs to talk the x402
//! protocol without touching a chain: CAIP-2 chain identifiers, the registry
//! of known USDC deployments, exact USD ⇄ smallest-unit conversion, and the
//! base64+JSON envelopes carried in the payment headers.
//!
//! # Modules
//!
//! - [`chain`] - CAIP-2 chain identifiers (`eip155:8453`)
//! - [`networks`] - known USDC deployments and legacy network aliases
//! - [`money`] - exact USD ⇄ smallest-unit conversion (10^6 units per dollar)
//! - [`timestamp`] - unix-seconds timestamps used in authorizations
//! - [`proto`] - payment requirement, payment proof, and settlement payloads
//! - [`headers`] - the canonical protocol header names

pub mod chain;
pub mod headers;
pub mod money;
pub mod networks;
pub mod proto;
pub mod timestamp;

pub use chain::ChainId;
pub use networks::{TokenDeployment, UnsupportedNetwork};
pub use proto::{PaymentPayload, PaymentRequired, ProtoError, SettlementAck};
pub use timestamp::UnixTimestamp;
