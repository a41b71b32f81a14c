//! HTTP response types for the telephony API.
//!
//! This module provides the [`HttpResponse`] type for accessing the status,
//! headers, and raw body of a terminal response.

use std::collections::HashMap;

/// Response header carrying the server-assigned request id.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Response header carrying the rate-limit wait in seconds.
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// A response received from the API.
///
/// Header names are stored lowercase; a header may carry several values.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use telephony_api::clients::HttpResponse;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-request-id".to_string(), vec!["req_123".to_string()]);
/// headers.insert("retry-after".to_string(), vec!["2".to_string()]);
///
/// let response = HttpResponse::new(429, headers, String::new());
/// assert!(!response.is_ok());
/// assert_eq!(response.request_id(), Some("req_123"));
/// assert_eq!(response.retry_after(), Some(2));
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, Vec<String>>,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` when the response carries no content to decode.
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        self.code == 204 || self.body.trim().is_empty()
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header(HEADER_REQUEST_ID)
    }

    /// Returns the `Retry-After` header as whole seconds.
    ///
    /// Only the integer-seconds form is recognized; HTTP-date values and
    /// garbage yield `None`.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        self.header(HEADER_RETRY_AFTER)
            .and_then(|value| value.trim().parse::<u64>().ok())
    }

    /// Returns the canonical reason phrase for the status code.
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        reqwest::StatusCode::from_u16(self.code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown Status")
    }

    /// Collects reqwest headers into the lowercase multi-value map.
    pub(crate) fn collect_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
