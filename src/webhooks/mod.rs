//! Inbound webhook verification for the telephony API.
//!
//! Webhook verification is stateless and independent of the HTTP client: it
//! needs only the raw request body, the [`SIGNATURE_HEADER`] value, and the
//! endpoint's signing secret.
//!
//! # Overview
//!
//! - [`construct_event`]: Verifies a delivery and decodes its JSON payload
//! - [`verify_signature`]: Verifies without decoding
//! - [`compute_signature`] and [`generate_test_header`]: Produce signatures
//!   for testing webhook handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use telephony_api::webhooks::{construct_event, DEFAULT_TOLERANCE_SECONDS, SIGNATURE_HEADER};
//!
//! let header = request.headers().get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()).unwrap_or("");
//! let event: CallCompleted = construct_event(&body, header, &secret, DEFAULT_TOLERANCE_SECONDS)?;
//! ```

mod verification;

pub use verification::{
    compute_signature, construct_event, generate_test_header, verify_signature,
    DEFAULT_TOLERANCE_SECONDS, SIGNATURE_HEADER, SIGNATURE_SCHEME,
};
