//! HTTP 402 payment negotiation over reqwest.
//!
//! [`X402Payer`] wraps an HTTP transport and answers `402 Payment Required`
//! challenges automatically: it parses the server's payment requirement,
//! checks it against the wallet's network, the caller's price ceiling, and
//! the remaining budget, signs an ERC-3009 authorization, and retries the
//! request once with the proof attached.
//!
//! The negotiation algorithm exists exactly once, parameterized over the
//! [`PaymentTransport`] capability; `reqwest::Client` is the production
//! implementation and tests script an in-memory one.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rust_decimal::Decimal;
//! use x402_payer_reqwest::{ResourceRequest, X402Payer};
//! use x402_payer_wallet::Wallet;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let wallet = Arc::new(Wallet::from_private_key(
//!     &std::env::var("EVM_PRIVATE_KEY")?,
//!     "base-mainnet",
//!     Decimal::from(10),
//! )?);
//! let payer = X402Payer::new(wallet);
//! let outcome = payer
//!     .request(ResourceRequest::get("https://api.example.com/premium".parse()?), None)
//!     .await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod outcome;
pub mod transport;

pub use engine::X402Payer;
pub use outcome::{NegotiationOutcome, PaymentReceipt};
pub use transport::{PaymentTransport, ResourceRequest, ResourceResponse, TransportError};
