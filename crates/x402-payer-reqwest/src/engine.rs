//! The 402 negotiation state machine.

use alloy_primitives::Bytes;
use http::{HeaderName, HeaderValue, StatusCode};
use rust_decimal::Decimal;
use std::sync::Arc;
use url::Url;
use x402_payer_proto::proto::{ExactEvmPayload, PaymentPayload, PaymentRequired, SettlementAck};
use x402_payer_proto::{headers, money, networks};
use x402_payer_wallet::{PaymentError, Wallet};

use crate::outcome::{NegotiationOutcome, PaymentReceipt};
use crate::transport::{PaymentTransport, ResourceRequest, ResourceResponse, TransportError};

/// An x402-paying HTTP client.
///
/// Issues the caller's request verbatim, and when the server answers
/// `402 Payment Required`, runs the negotiation: parse the requirement,
/// enforce network/price/budget gates, sign through the wallet, retry once
/// with the proof attached, and classify the final outcome.
pub struct X402Payer<T = reqwest::Client> {
    wallet: Arc<Wallet>,
    transport: T,
    auto_pay: bool,
}

impl X402Payer<reqwest::Client> {
    /// Builds a payer over a fresh `reqwest::Client`.
    pub fn new(wallet: Arc<Wallet>) -> Self {
        Self::with_transport(wallet, reqwest::Client::new())
    }
}

impl<T: PaymentTransport> X402Payer<T> {
    /// Builds a payer over an explicit transport capability.
    pub fn with_transport(wallet: Arc<Wallet>, transport: T) -> Self {
        Self {
            wallet,
            transport,
            auto_pay: true,
        }
    }

    /// When disabled, a 402 challenge reports the required payment instead
    /// of paying it. Enabled by default.
    pub fn auto_pay(mut self, enabled: bool) -> Self {
        self.auto_pay = enabled;
        self
    }

    /// Convenience for a plain GET with no per-call price ceiling.
    pub async fn get(&self, url: Url) -> Result<NegotiationOutcome, TransportError> {
        self.request(ResourceRequest::get(url), None).await
    }

    /// Runs one full negotiation.
    ///
    /// `max_price_usd` is the caller's per-call ceiling; when absent, the
    /// wallet's remaining budget is the ceiling. Business outcomes (price
    /// rejected, budget exceeded, network mismatch, ...) come back as
    /// [`NegotiationOutcome`] variants; only transport failures are `Err`.
    /// At most one payment attempt is made per call.
    #[tracing::instrument(skip_all, fields(url = %request.url))]
    pub async fn request(
        &self,
        request: ResourceRequest,
        max_price_usd: Option<Decimal>,
    ) -> Result<NegotiationOutcome, TransportError> {
        let response = self.transport.execute(&request).await?;

        if response.status != StatusCode::PAYMENT_REQUIRED {
            if response.status.as_u16() >= 400 {
                return Ok(NegotiationOutcome::HttpError {
                    status: response.status.as_u16(),
                    body: response.body,
                });
            }
            return Ok(NegotiationOutcome::Success {
                body: response.body,
                payment: None,
                settlement: None,
            });
        }

        tracing::debug!("received 402 Payment Required");
        let Some(header_value) = response
            .header(headers::PAYMENT_REQUIRED)
            .or_else(|| response.header(headers::PAYMENT_REQUIRED_LEGACY))
        else {
            return Ok(NegotiationOutcome::MissingPaymentHeader);
        };

        let requirement = match PaymentRequired::from_header(header_value) {
            Ok(requirement) => requirement,
            Err(e) => {
                return Ok(NegotiationOutcome::MalformedRequirement {
                    reason: e.to_string(),
                });
            }
        };

        let amount_usd = match money::units_to_usd(requirement.max_amount_required) {
            Ok(amount) => amount,
            Err(e) => {
                return Ok(NegotiationOutcome::MalformedRequirement {
                    reason: e.to_string(),
                });
            }
        };

        // Never sign for a chain other than the wallet's; aliases of the
        // configured chain compare equal after resolution.
        if let Some(network) = &requirement.network {
            match networks::resolve_chain_id(network) {
                Err(_) => {
                    return Ok(NegotiationOutcome::UnsupportedNetwork {
                        network: network.clone(),
                    });
                }
                Ok(chain_id) if &chain_id != self.wallet.network() => {
                    tracing::warn!(
                        required = %network,
                        configured = %self.wallet.network(),
                        "refusing to sign for a different network"
                    );
                    return Ok(NegotiationOutcome::NetworkMismatch {
                        required: network.clone(),
                        configured: self.wallet.network().clone(),
                    });
                }
                Ok(_) => {}
            }
        }

        let remaining = self.wallet.remaining_usd();
        let ceiling = max_price_usd.unwrap_or(remaining);
        if amount_usd > ceiling {
            return Ok(NegotiationOutcome::PriceRejected {
                amount_usd,
                limit_usd: ceiling,
                pay_to: requirement.pay_to,
            });
        }
        if !self.wallet.can_afford(amount_usd) {
            return Ok(NegotiationOutcome::BudgetExceeded {
                amount_usd,
                remaining_usd: self.wallet.remaining_usd(),
            });
        }
        if !self.auto_pay {
            return Ok(NegotiationOutcome::PaymentDeclined {
                amount_usd,
                pay_to: requirement.pay_to,
            });
        }

        let signed = match self.wallet.sign_payment(
            requirement.pay_to,
            requirement.max_amount_required,
            requirement.valid_until,
            request.url.as_str(),
        ) {
            Ok(signed) => signed,
            // A concurrent payment may have drained the budget between the
            // gate above and the ledger's own atomic check.
            Err(PaymentError::BudgetExceeded { needed, remaining }) => {
                return Ok(NegotiationOutcome::BudgetExceeded {
                    amount_usd: needed,
                    remaining_usd: remaining,
                });
            }
            Err(e) => {
                return Ok(NegotiationOutcome::PaymentSigningFailed {
                    reason: e.to_string(),
                });
            }
        };

        let receipt = PaymentReceipt {
            amount_usd: signed.amount_usd,
            pay_to: requirement.pay_to,
            network: self.wallet.network().clone(),
            nonce: signed.nonce,
        };
        let proof = PaymentPayload {
            x402_version: requirement.x402_version,
            scheme: requirement.scheme.clone(),
            network: requirement
                .network
                .clone()
                .unwrap_or_else(|| self.wallet.network().to_string()),
            payload: ExactEvmPayload {
                signature: Bytes::from(signed.signature.as_bytes().to_vec()),
                authorization: signed.authorization.to_wire(),
            },
        };

        let mut paid_request = request;
        paid_request.headers.insert(
            HeaderName::from_static(headers::PAYMENT_SIGNATURE),
            HeaderValue::from_str(&proof.to_header())
                .expect("base64 is always a valid header value"),
        );
        tracing::info!(
            amount_usd = %signed.amount_usd,
            pay_to = %requirement.pay_to,
            "payment signed, retrying request with proof attached"
        );

        let paid_response = self.transport.execute(&paid_request).await?;
        if paid_response.status.as_u16() >= 400 {
            // A second 402 lands here too: one payment attempt per call.
            tracing::warn!(
                status = paid_response.status.as_u16(),
                "resource failed after the payment was recorded"
            );
            return Ok(NegotiationOutcome::PostPaymentError {
                status: paid_response.status.as_u16(),
                body: paid_response.body,
                payment: receipt,
            });
        }

        let settlement = read_settlement_ack(&paid_response);
        Ok(NegotiationOutcome::Success {
            body: paid_response.body,
            payment: Some(receipt),
            settlement,
        })
    }
}

/// Reads the optional settlement acknowledgment header. Informational only;
/// parse failures are logged and swallowed.
fn read_settlement_ack(response: &ResourceResponse) -> Option<SettlementAck> {
    let header_value = response
        .header(headers::PAYMENT_RESPONSE)
        .or_else(|| response.header(headers::PAYMENT_RESPONSE_LEGACY))?;
    match SettlementAck::from_header(header_value) {
        Ok(ack) => {
            tracing::info!(
                transaction = ack.transaction_hash().unwrap_or("unknown"),
                "payment settled"
            );
            Some(ack)
        }
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparseable settlement acknowledgment");
            None
        }
    }
}
