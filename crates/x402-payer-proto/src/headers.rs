//! Canonical protocol header names.
//!
//! The protocol contract of this client is:
//!
//! - A `402` response announces its terms in [`PAYMENT_REQUIRED`]; the legacy
//!   [`PAYMENT_REQUIRED_LEGACY`] name is also accepted, primary wins.
//! - The retried request carries the signed proof in [`PAYMENT_SIGNATURE`].
//! - A paid response may carry a settlement acknowledgment in
//!   [`PAYMENT_RESPONSE`] (or the legacy [`PAYMENT_RESPONSE_LEGACY`]).
//!
//! Header lookup is case-insensitive per HTTP, so the constants are the
//! lowercase canonical forms.

/// Requirement header set by the resource server on a 402 response.
pub const PAYMENT_REQUIRED: &str = "payment-required";

/// Legacy requirement header name, checked when [`PAYMENT_REQUIRED`] is absent.
pub const PAYMENT_REQUIRED_LEGACY: &str = "x-payment-required";

/// Proof header attached by this client on the paid retry.
pub const PAYMENT_SIGNATURE: &str = "payment-signature";

/// Optional settlement acknowledgment header on the paid response.
pub const PAYMENT_RESPONSE: &str = "payment-response";

/// Legacy settlement acknowledgment header name.
pub const PAYMENT_RESPONSE_LEGACY: &str = "x-payment-response";
