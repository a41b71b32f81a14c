//! Webhook signature verification for the telephony API.
//!
//! The platform signs each webhook delivery with HMAC-SHA256 over
//! `"{timestamp}.{raw payload}"` using the endpoint's signing secret, and
//! sends the result in the [`SIGNATURE_HEADER`] header:
//!
//! ```text
//! t=1700000000,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! Several `v1` entries may be present while a secret is being rolled; any
//! one matching is enough. Unknown schemes are ignored.
//!
//! # Security
//!
//! Signatures are compared in constant time. Every failure, whether the
//! header is malformed, stale, or carries the wrong signature, produces the
//! same `invalid_request_error` with the same message.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::clients::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// HTTP header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Telephony-Signature";

/// Default maximum age of a delivery, in seconds.
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 300;

/// The signature scheme this library verifies.
pub const SIGNATURE_SCHEME: &str = "v1";

const VERIFICATION_FAILED: &str = "Unable to verify webhook signature.";

/// A parsed signature header.
#[derive(Debug, PartialEq, Eq)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

/// Parses `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`.
///
/// Returns `None` without a timestamp or without any `v1` entry.
fn parse_header(header: &str) -> Option<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part.split_once('=')?;
        let value = value.trim();
        match key.trim() {
            "t" => {
                if timestamp.is_some() {
                    return None;
                }
                timestamp = Some(value.parse::<i64>().ok()?);
            }
            SIGNATURE_SCHEME if !value.is_empty() => signatures.push(value.to_string()),
            _ => {}
        }
    }

    if signatures.is_empty() {
        return None;
    }

    Some(SignatureHeader {
        timestamp: timestamp?,
        signatures,
    })
}

/// Computes the hex-encoded `v1` signature for a payload.
///
/// # Example
///
/// ```rust
/// use telephony_api::webhooks::compute_signature;
///
/// let signature = compute_signature(1_700_000_000, r#"{"foo":"bar"}"#, "whsec_test");
/// assert_eq!(signature.len(), 64);
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(timestamp: i64, payload: impl AsRef<[u8]>, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_ref());
    hex::encode(mac.finalize().into_bytes())
}

/// Builds a valid signature header, for testing webhook handlers.
///
/// # Example
///
/// ```rust
/// use telephony_api::webhooks::generate_test_header;
///
/// let header = generate_test_header(r#"{"foo":"bar"}"#, "whsec_test", 1_700_000_000);
/// assert!(header.starts_with("t=1700000000,v1="));
/// ```
#[must_use]
pub fn generate_test_header(payload: impl AsRef<[u8]>, secret: &str, timestamp: i64) -> String {
    let signature = compute_signature(timestamp, payload, secret);
    format!("t={timestamp},{SIGNATURE_SCHEME}={signature}")
}

fn verification_error() -> ApiError {
    ApiError::invalid_request(VERIFICATION_FAILED)
}

fn verify_at(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    tolerance_seconds: u64,
    now: i64,
) -> Result<(), ApiError> {
    let header = parse_header(signature_header).ok_or_else(verification_error)?;

    if now.abs_diff(header.timestamp) > tolerance_seconds {
        return Err(verification_error());
    }

    let expected = compute_signature(header.timestamp, payload, secret);
    let matched = header
        .signatures
        .iter()
        .fold(false, |matched, candidate| {
            matched | bool::from(expected.as_bytes().ct_eq(candidate.as_bytes()))
        });

    if matched {
        Ok(())
    } else {
        Err(verification_error())
    }
}

/// Returns `true` if `signature_header` is a fresh, valid signature of
/// `payload`. The payload is not parsed.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use telephony_api::webhooks::{generate_test_header, verify_signature};
///
/// let payload = r#"{"foo":"bar"}"#;
/// let header = generate_test_header(payload, "whsec_test", Utc::now().timestamp());
///
/// assert!(verify_signature(payload, &header, "whsec_test", 300));
/// assert!(!verify_signature(payload, &header, "whsec_other", 300));
/// ```
#[must_use]
pub fn verify_signature(
    payload: impl AsRef<[u8]>,
    signature_header: &str,
    secret: &str,
    tolerance_seconds: u64,
) -> bool {
    verify_at(
        payload.as_ref(),
        signature_header,
        secret,
        tolerance_seconds,
        Utc::now().timestamp(),
    )
    .is_ok()
}

/// Verifies a webhook delivery and decodes its payload.
///
/// The payload is only parsed after the signature has been verified.
///
/// # Errors
///
/// Returns an [`ApiError`] with kind `invalid_request_error` and status 400
/// if the header is malformed, the timestamp is outside
/// `tolerance_seconds`, no signature matches, or the verified payload does
/// not decode into `T`.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use telephony_api::webhooks::{construct_event, generate_test_header, DEFAULT_TOLERANCE_SECONDS};
///
/// let payload = r#"{"foo":"bar"}"#;
/// let header = generate_test_header(payload, "whsec_test", Utc::now().timestamp());
///
/// let event: serde_json::Value =
///     construct_event(payload, &header, "whsec_test", DEFAULT_TOLERANCE_SECONDS).unwrap();
/// assert_eq!(event["foo"], "bar");
/// ```
pub fn construct_event<T: DeserializeOwned>(
    payload: impl AsRef<[u8]>,
    signature_header: &str,
    secret: &str,
    tolerance_seconds: u64,
) -> Result<T, ApiError> {
    let payload = payload.as_ref();
    if let Err(error) = verify_at(
        payload,
        signature_header,
        secret,
        tolerance_seconds,
        Utc::now().timestamp(),
    ) {
        tracing::debug!("rejected webhook delivery with invalid signature");
        return Err(error);
    }

    serde_json::from_slice(payload).map_err(|e| {
        let mut error = verification_error();
        error.source = Some(e.into());
        error
    })
}

// Internal hex encoding
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}
