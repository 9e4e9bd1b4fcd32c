//! Terminal outcomes of a payment negotiation.
//!
//! Every variant here is a business outcome the calling agent can reason
//! about and react to (raise `max_price_usd`, top up the budget, switch
//! networks), never a fault. The [`Display`](std::fmt::Display) rendering is
//! the agent-facing report string.

use alloy_primitives::{Address, B256};
use rust_decimal::Decimal;
use std::fmt;
use x402_payer_proto::SettlementAck;
use x402_payer_proto::chain::ChainId;

/// What was paid, surfaced alongside the final response.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub amount_usd: Decimal,
    pub pay_to: Address,
    pub network: ChainId,
    pub nonce: B256,
}

/// The terminal state of one negotiation. At most one payment attempt is
/// ever made; there is no loop back after a retry.
#[derive(Debug)]
pub enum NegotiationOutcome {
    /// The resource was delivered, with or without a payment along the way.
    Success {
        body: String,
        payment: Option<PaymentReceipt>,
        settlement: Option<SettlementAck>,
    },
    /// A non-402 error response before any payment.
    HttpError { status: u16, body: String },
    /// A 402 without any payment-requirement header.
    MissingPaymentHeader,
    /// The requirement header failed to decode or validate.
    MalformedRequirement { reason: String },
    /// The requirement names a network this payer has no deployment for.
    UnsupportedNetwork { network: String },
    /// The requirement's network resolves to a different chain than the
    /// wallet is configured for; nothing was signed.
    NetworkMismatch {
        required: String,
        configured: ChainId,
    },
    /// The price exceeds the effective ceiling (caller-supplied maximum, or
    /// the remaining budget when no maximum was given).
    PriceRejected {
        amount_usd: Decimal,
        limit_usd: Decimal,
        pay_to: Address,
    },
    /// The wallet cannot cover the amount even under the caller's ceiling.
    BudgetExceeded {
        amount_usd: Decimal,
        remaining_usd: Decimal,
    },
    /// Automatic payment is disabled; informational, nothing was signed.
    PaymentDeclined {
        amount_usd: Decimal,
        pay_to: Address,
    },
    /// The ledger refused or failed to sign.
    PaymentSigningFailed { reason: String },
    /// The paid retry still failed. The payment was already recorded as
    /// spent and is not rolled back.
    PostPaymentError {
        status: u16,
        body: String,
        payment: PaymentReceipt,
    },
}

impl NegotiationOutcome {
    /// Whether the resource was delivered.
    pub fn is_success(&self) -> bool {
        matches!(self, NegotiationOutcome::Success { .. })
    }

    /// The payment made during this negotiation, if any was recorded -
    /// including the [`PostPaymentError`](NegotiationOutcome::PostPaymentError)
    /// case, where the spend stands even though delivery failed.
    pub fn payment(&self) -> Option<&PaymentReceipt> {
        match self {
            NegotiationOutcome::Success { payment, .. } => payment.as_ref(),
            NegotiationOutcome::PostPaymentError { payment, .. } => Some(payment),
            _ => None,
        }
    }
}

impl fmt::Display for NegotiationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegotiationOutcome::Success { body, .. } => f.write_str(body),
            NegotiationOutcome::HttpError { status, body } => {
                write!(f, "Error {status}: {body}")
            }
            NegotiationOutcome::MissingPaymentHeader => {
                f.write_str("Error: received 402 but no payment-required header")
            }
            NegotiationOutcome::MalformedRequirement { reason } => {
                write!(f, "Error parsing payment requirement: {reason}")
            }
            NegotiationOutcome::UnsupportedNetwork { network } => {
                write!(f, "Error: the resource requires unsupported network {network}")
            }
            NegotiationOutcome::NetworkMismatch {
                required,
                configured,
            } => {
                write!(
                    f,
                    "Error: network mismatch. The resource requires {required}, \
                     the wallet is configured for {configured}"
                )
            }
            NegotiationOutcome::PriceRejected {
                amount_usd,
                limit_usd,
                pay_to,
            } => {
                write!(
                    f,
                    "Payment required: ${amount_usd:.4} USDC to {pay_to}. \
                     Exceeds the ${limit_usd:.4} limit; raise max_price_usd to proceed"
                )
            }
            NegotiationOutcome::BudgetExceeded {
                amount_usd,
                remaining_usd,
            } => {
                write!(
                    f,
                    "Payment required: ${amount_usd:.4} USDC. \
                     Insufficient budget: ${remaining_usd:.4} remaining"
                )
            }
            NegotiationOutcome::PaymentDeclined {
                amount_usd,
                pay_to,
            } => {
                write!(
                    f,
                    "Payment required: ${amount_usd:.4} USDC to {pay_to}. \
                     Automatic payment is disabled; nothing was paid"
                )
            }
            NegotiationOutcome::PaymentSigningFailed { reason } => {
                write!(f, "Payment signing failed: {reason}")
            }
            NegotiationOutcome::PostPaymentError {
                status,
                body,
                payment,
            } => {
                write!(
                    f,
                    "Error {status} after payment: {body}. \
                     The payment of ${:.4} to {} was already recorded and is not rolled back",
                    payment.amount_usd, payment.pay_to
                )
            }
        }
    }
}
