//! Budgeted wallet for x402 payments.
//!
//! The wallet signs ERC-3009 `TransferWithAuthorization` messages for the
//! x402 "exact" scheme while tracking spend against a USD budget ceiling.
//! The afford-check and the spend-commit form a single critical section, so
//! concurrent payments can never jointly overshoot the budget.
//!
//! # Example
//!
//! ```no_run
//! use rust_decimal::Decimal;
//! use x402_payer_wallet::Wallet;
//!
//! let wallet = Wallet::from_private_key(
//!     &std::env::var("EVM_PRIVATE_KEY").unwrap(),
//!     "base-mainnet",
//!     Decimal::from(10),
//! ).unwrap();
//! println!("paying from {}", wallet.address());
//! ```

pub mod authorization;
pub mod ledger;
pub mod nonce;
pub mod signer;

pub use authorization::{AuthorizationError, TransferAuthorization};
pub use ledger::{PaymentError, PaymentRecord, SignedPayment, Wallet, WalletError, WalletSummary};
pub use nonce::{NonceSource, RandomNonceSource};
pub use signer::{AuthorizationSigner, LocalAuthorizationSigner, SignerError};
