//! The budgeted payment ledger.
//!
//! A [`Wallet`] owns a signing identity, a network, a USD budget ceiling, and
//! the append-only history of payments it has signed. It is the sole
//! authority for "can this spend proceed": the afford-check, the signature,
//! and the spend-commit run under one lock, so two concurrent payments can
//! never both pass a check that only one of them fits.

use alloy_primitives::{Address, B256, Bytes, Signature, U256};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Mutex;
use x402_payer_proto::chain::ChainId;
use x402_payer_proto::money::{self, MoneyError};
use x402_payer_proto::networks::{self, TokenDeployment, UnsupportedNetwork};
use x402_payer_proto::timestamp::UnixTimestamp;

use crate::authorization::{AuthorizationError, TransferAuthorization};
use crate::nonce::{NonceSource, RandomNonceSource};
use crate::signer::{AuthorizationSigner, LocalAuthorizationSigner, SignerError};

/// One signed payment, recorded exactly once per successful signing.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecord {
    pub timestamp: UnixTimestamp,
    pub to: Address,
    pub amount_usd: Decimal,
    pub amount_units: U256,
    pub network: ChainId,
    pub nonce: B256,
    pub signature: Bytes,
    pub resource_url: String,
}

/// Point-in-time view of wallet activity. Pure read; carries no key material.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    pub address: Address,
    pub network: ChainId,
    pub budget_usd: Decimal,
    pub spent_usd: Decimal,
    pub remaining_usd: Decimal,
    pub payment_count: usize,
}

/// The result of a successful [`Wallet::sign_payment`].
#[derive(Debug, Clone)]
pub struct SignedPayment {
    pub signature: Signature,
    pub nonce: B256,
    pub authorization: TransferAuthorization,
    pub amount_usd: Decimal,
}

/// Construction-time wallet failures. These are fatal: a wallet with a bad
/// key or an unknown network must never start negotiating.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(transparent)]
    UnsupportedNetwork(#[from] UnsupportedNetwork),
    #[error(transparent)]
    Signer(#[from] SignerError),
    #[error("budget {0} is negative")]
    NegativeBudget(Decimal),
}

/// Failures of a single payment attempt. `BudgetExceeded` leaves the ledger
/// state completely untouched.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("budget exceeded: need ${needed:.4}, ${remaining:.4} remaining")]
    BudgetExceeded { needed: Decimal, remaining: Decimal },
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    Signing(#[from] SignerError),
}

struct SpendState {
    budget_usd: Decimal,
    spent_usd: Decimal,
    payments: Vec<PaymentRecord>,
}

impl SpendState {
    fn remaining(&self) -> Decimal {
        (self.budget_usd - self.spent_usd).max(Decimal::ZERO)
    }
}

/// A budgeted x402 wallet.
///
/// Identity (key, derived address, network, token deployment) is fixed for
/// the life of the instance; spend state mutates only through
/// [`sign_payment`](Wallet::sign_payment) and [`reset`](Wallet::reset).
pub struct Wallet<S = LocalAuthorizationSigner, N = RandomNonceSource> {
    signer: S,
    nonces: N,
    address: Address,
    network: ChainId,
    deployment: &'static TokenDeployment,
    state: Mutex<SpendState>,
}

impl Wallet<LocalAuthorizationSigner, RandomNonceSource> {
    /// Builds a wallet from a hex private key, a network identifier (CAIP-2
    /// or legacy alias), and a USD budget ceiling.
    pub fn from_private_key(
        private_key: &str,
        network: &str,
        budget_usd: Decimal,
    ) -> Result<Self, WalletError> {
        let signer = LocalAuthorizationSigner::from_hex(private_key)?;
        Self::with_sources(signer, RandomNonceSource, network, budget_usd)
    }
}

impl<S: AuthorizationSigner, N: NonceSource> Wallet<S, N> {
    /// Builds a wallet over explicit signing and nonce capabilities.
    pub fn with_sources(
        signer: S,
        nonces: N,
        network: &str,
        budget_usd: Decimal,
    ) -> Result<Self, WalletError> {
        if budget_usd.is_sign_negative() {
            return Err(WalletError::NegativeBudget(budget_usd));
        }
        let deployment = networks::usdc_deployment(network)?;
        let address = signer.address();
        Ok(Self {
            signer,
            nonces,
            address,
            network: deployment.chain_id(),
            deployment,
            state: Mutex::new(SpendState {
                budget_usd,
                spent_usd: Decimal::ZERO,
                payments: Vec::new(),
            }),
        })
    }

    /// The payer address, derived from the key once at construction.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The canonical chain ID this wallet signs for.
    pub fn network(&self) -> &ChainId {
        &self.network
    }

    /// The token deployment authorizations are bound to.
    pub fn deployment(&self) -> &'static TokenDeployment {
        self.deployment
    }

    /// Whether the remaining budget covers `amount_usd`.
    pub fn can_afford(&self, amount_usd: Decimal) -> bool {
        self.remaining_usd() >= amount_usd
    }

    /// Remaining budget in USD, never negative.
    pub fn remaining_usd(&self) -> Decimal {
        self.lock_state().remaining()
    }

    /// Signs a payment authorization and records the spend.
    ///
    /// The whole sequence - afford check, nonce draw, signature, commit - is
    /// one critical section. Either the returned signature and the recorded
    /// spend both exist, or neither does; every failure path returns before
    /// any state mutation.
    pub fn sign_payment(
        &self,
        to: Address,
        amount_units: U256,
        valid_before: UnixTimestamp,
        resource_url: &str,
    ) -> Result<SignedPayment, PaymentError> {
        let amount_usd = money::units_to_usd(amount_units)?;

        let mut state = self.lock_state();
        let remaining = state.remaining();
        if amount_usd > remaining {
            return Err(PaymentError::BudgetExceeded {
                needed: amount_usd,
                remaining,
            });
        }

        let nonce = self.nonces.generate();
        let authorization = TransferAuthorization::new(
            self.address,
            to,
            amount_units,
            UnixTimestamp::ZERO,
            valid_before,
            nonce,
        )?;
        let signature = self
            .signer
            .sign_authorization(&authorization, self.deployment)?;

        // Commit point: spend and record move together.
        state.spent_usd += amount_usd;
        state.payments.push(PaymentRecord {
            timestamp: UnixTimestamp::now(),
            to,
            amount_usd,
            amount_units,
            network: self.network.clone(),
            nonce,
            signature: Bytes::from(signature.as_bytes().to_vec()),
            resource_url: resource_url.to_string(),
        });
        tracing::info!(
            to = %to,
            amount_usd = %amount_usd,
            remaining_usd = %state.remaining(),
            "signed payment authorization"
        );

        Ok(SignedPayment {
            signature,
            nonce,
            authorization,
            amount_usd,
        })
    }

    /// Snapshot of budget, spend, and payment count.
    pub fn summary(&self) -> WalletSummary {
        let state = self.lock_state();
        WalletSummary {
            address: self.address,
            network: self.network.clone(),
            budget_usd: state.budget_usd,
            spent_usd: state.spent_usd,
            remaining_usd: state.remaining(),
            payment_count: state.payments.len(),
        }
    }

    /// Cloned payment history, oldest first.
    pub fn payments(&self) -> Vec<PaymentRecord> {
        self.lock_state().payments.clone()
    }

    /// Clears spend and history; replaces the budget ceiling if given.
    /// Identity (address, key, network) is untouched.
    pub fn reset(&self, new_budget_usd: Option<Decimal>) {
        let mut state = self.lock_state();
        if let Some(budget) = new_budget_usd {
            state.budget_usd = budget;
        }
        state.spent_usd = Decimal::ZERO;
        state.payments.clear();
        tracing::debug!(budget_usd = %state.budget_usd, "wallet budget reset");
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SpendState> {
        self.state.lock().expect("wallet spend state lock poisoned")
    }
}

// Spend state is interior-mutable behind the lock; the identity fields are
// all immutable, so sharing &Wallet across tasks is sound.
impl<S, N> std::fmt::Debug for Wallet<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}
