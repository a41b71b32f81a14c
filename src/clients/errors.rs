//! Error taxonomy for API calls.
//!
//! Every failed logical call surfaces exactly one classified error. The
//! classification is a pure function of the HTTP status code and, for
//! ambiguous 4xx codes, the `type` field of the error envelope.
//!
//! # Error Handling
//!
//! - [`ErrorKind`]: The closed set of error kinds
//! - [`ApiError`]: A classified error carrying diagnostic metadata
//! - [`ErrorEnvelope`]: The parsed error body returned by the platform
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type returned by the executor
//!
//! # Example
//!
//! ```rust,ignore
//! use telephony_api::clients::{ErrorKind, HttpError};
//!
//! match client.users().retrieve("usr_123").await {
//!     Ok(user) => println!("Found {}", user.id),
//!     Err(HttpError::Api(e)) if e.kind == ErrorKind::NotFound => {
//!         println!("No such user (request id {:?})", e.request_id);
//!     }
//!     Err(HttpError::Api(e)) if e.kind == ErrorKind::RateLimit => {
//!         println!("Slow down, retry after {:?}s", e.retry_after);
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The closed set of error kinds a failed call is classified into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401: missing or invalid credential.
    Authentication,
    /// 403: the credential lacks permission for the operation.
    Permission,
    /// 404: the resource does not exist.
    NotFound,
    /// 409: the request conflicts with current server state.
    Conflict,
    /// 422: the request was well-formed but failed validation.
    Validation,
    /// 429: too many requests.
    RateLimit,
    /// 5xx: the platform failed to process the request.
    Api,
    /// 400 and other client errors without a more specific type.
    InvalidRequest,
    /// No response was ever received (status 0).
    Connection,
}

impl ErrorKind {
    /// Returns the wire name of this kind (e.g. `"not_found_error"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication_error",
            Self::Permission => "permission_error",
            Self::NotFound => "not_found_error",
            Self::Conflict => "conflict_error",
            Self::Validation => "validation_error",
            Self::RateLimit => "rate_limit_error",
            Self::Api => "api_error",
            Self::InvalidRequest => "invalid_request_error",
            Self::Connection => "connection_error",
        }
    }

    /// Parses a wire name back into a kind.
    ///
    /// Returns `None` for types this library does not know about.
    #[must_use]
    pub fn from_type(value: &str) -> Option<Self> {
        let kind = match value {
            "authentication_error" => Self::Authentication,
            "permission_error" => Self::Permission,
            "not_found_error" => Self::NotFound,
            "conflict_error" => Self::Conflict,
            "validation_error" => Self::Validation,
            "rate_limit_error" => Self::RateLimit,
            "api_error" => Self::Api,
            "invalid_request_error" => Self::InvalidRequest,
            "connection_error" => Self::Connection,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` if a failure of this kind may succeed when retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Api | Self::Connection)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a failed response into an [`ErrorKind`].
///
/// Statuses with a dedicated kind are decided by status alone. Any other
/// 4xx status consults the envelope's `type` field and falls back to
/// [`ErrorKind::InvalidRequest`] when the type is absent or unknown.
///
/// # Example
///
/// ```rust
/// use telephony_api::clients::{classify, ErrorEnvelope, ErrorKind};
///
/// assert_eq!(classify(404, None), ErrorKind::NotFound);
/// assert_eq!(classify(503, None), ErrorKind::Api);
/// assert_eq!(classify(0, None), ErrorKind::Connection);
///
/// let envelope = ErrorEnvelope::from_value(serde_json::json!({"type": "conflict_error"}));
/// assert_eq!(classify(400, Some(&envelope)), ErrorKind::Conflict);
/// assert_eq!(classify(400, None), ErrorKind::InvalidRequest);
/// ```
#[must_use]
pub fn classify(status: u16, envelope: Option<&ErrorEnvelope>) -> ErrorKind {
    match status {
        0 => ErrorKind::Connection,
        401 => ErrorKind::Authentication,
        403 => ErrorKind::Permission,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        422 => ErrorKind::Validation,
        429 => ErrorKind::RateLimit,
        400..=499 => envelope
            .and_then(|e| e.error_type.as_deref())
            .and_then(ErrorKind::from_type)
            .unwrap_or(ErrorKind::InvalidRequest),
        _ => ErrorKind::Api,
    }
}

/// The error body returned by the platform.
///
/// The fields may appear at the top level or nested under an `error` key;
/// both shapes are accepted. An `error` key holding a plain string is
/// treated as the message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorEnvelope {
    /// Declared error type (e.g. `"invalid_request_error"`).
    pub error_type: Option<String>,
    /// Machine-readable error code.
    pub code: Option<String>,
    /// Human-readable message.
    pub message: Option<String>,
    /// The request parameter the error relates to.
    pub param: Option<String>,
    /// Link to documentation about this error.
    pub doc_url: Option<String>,
    /// The raw JSON body.
    pub raw: Value,
}

impl ErrorEnvelope {
    /// Parses an envelope from raw response bytes.
    ///
    /// Returns `None` if the body is empty or not JSON.
    #[must_use]
    pub fn parse(body: &[u8]) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        serde_json::from_slice::<Value>(body)
            .ok()
            .map(Self::from_value)
    }

    /// Builds an envelope from an already-parsed JSON value.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        let (fields, top_level_message) = match raw.get("error") {
            Some(nested @ Value::Object(_)) => (nested, None),
            Some(Value::String(message)) => (&raw, Some(message.clone())),
            _ => (&raw, None),
        };

        Self {
            error_type: string_field(fields, "type"),
            code: string_field(fields, "code"),
            message: string_field(fields, "message").or(top_level_message),
            param: string_field(fields, "param"),
            doc_url: string_field(fields, "doc_url"),
            raw: raw.clone(),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A classified API failure.
///
/// Always the terminal value of a failed call. It keeps the original
/// status code (0 when no response was received) together with the
/// metadata needed to log, alert, or contact support.
///
/// # Example
///
/// ```rust
/// use telephony_api::clients::{ApiError, ErrorEnvelope, ErrorKind};
///
/// let envelope = ErrorEnvelope::from_value(serde_json::json!({
///     "error": {"type": "invalid_request_error", "message": "Missing number", "param": "number"}
/// }));
/// let error = ApiError::from_response(400, "Bad Request", Some(envelope), Some("req_1".into()), None);
///
/// assert_eq!(error.kind, ErrorKind::InvalidRequest);
/// assert_eq!(error.param.as_deref(), Some("number"));
/// assert_eq!(error.request_id.as_deref(), Some("req_1"));
/// ```
#[derive(Debug, Error)]
#[error("{kind} ({status}): {message}")]
pub struct ApiError {
    /// The classified kind.
    pub kind: ErrorKind,
    /// The HTTP status code, or 0 if no response was received.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Request id from the `X-Request-Id` response header.
    pub request_id: Option<String>,
    /// Machine-readable error code.
    pub code: Option<String>,
    /// The request parameter the error relates to.
    pub param: Option<String>,
    /// Link to documentation about this error.
    pub doc_url: Option<String>,
    /// The raw error body, when it was valid JSON.
    pub raw: Option<Value>,
    /// Seconds from the `Retry-After` header (rate-limit errors only).
    pub retry_after: Option<u64>,
    /// The underlying transport error for connection failures.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Builds a classified error from a non-2xx response.
    ///
    /// When the body could not be parsed, `status_text` becomes the message.
    /// `retry_after` is only kept for rate-limit errors.
    #[must_use]
    pub fn from_response(
        status: u16,
        status_text: &str,
        envelope: Option<ErrorEnvelope>,
        request_id: Option<String>,
        retry_after: Option<u64>,
    ) -> Self {
        let kind = classify(status, envelope.as_ref());
        let retry_after = if kind == ErrorKind::RateLimit {
            retry_after
        } else {
            None
        };

        match envelope {
            Some(envelope) => Self {
                kind,
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| status_text.to_string()),
                request_id,
                code: envelope.code,
                param: envelope.param,
                doc_url: envelope.doc_url,
                raw: Some(envelope.raw),
                retry_after,
                source: None,
            },
            None => Self {
                kind,
                status,
                message: status_text.to_string(),
                request_id,
                code: None,
                param: None,
                doc_url: None,
                raw: None,
                retry_after,
                source: None,
            },
        }
    }

    /// Builds a connection error wrapping the underlying transport failure.
    #[must_use]
    pub fn connection(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind: ErrorKind::Connection,
            status: 0,
            message: message.into(),
            request_id: None,
            code: None,
            param: None,
            doc_url: None,
            raw: None,
            retry_after: None,
            source: Some(source.into()),
        }
    }

    /// Builds an `invalid_request_error` not tied to any HTTP exchange.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidRequest,
            status: 400,
            message: message.into(),
            request_id: None,
            code: None,
            param: None,
            doc_url: None,
            raw: None,
            retry_after: None,
            source: None,
        }
    }
}

/// Error returned when a request descriptor fails validation.
///
/// This error is raised before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path was empty.
    #[error("Request path cannot be empty.")]
    EmptyPath,

    /// A body was attached to a method that does not accept one.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that rejects a body.
        method: String,
    },

    /// The idempotency key was empty.
    #[error("Idempotency key cannot be empty.")]
    EmptyIdempotencyKey,

    /// A resource id was empty.
    #[error("{resource} id cannot be empty.")]
    EmptyResourceId {
        /// The resource the id belongs to.
        resource: &'static str,
    },
}

/// Unified error type for all executor failures.
///
/// Use [`HttpError::kind`] to branch on the taxonomy without matching
/// every variant.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A classified failure from the platform or the network.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// A successful response body did not match the expected shape.
    #[error("Failed to decode response body (status {status}): {source}")]
    Decode {
        /// The HTTP status of the response.
        status: u16,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
        /// Request id from the `X-Request-Id` response header.
        request_id: Option<String>,
    },
}

impl HttpError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(e) => e.kind,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Decode { .. } => ErrorKind::Api,
        }
    }

    /// Returns the HTTP status, if a response was involved.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::InvalidRequest(_) => None,
            Self::Decode { status, .. } => Some(*status),
        }
    }

    /// Returns the server-assigned request id, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api(e) => e.request_id.as_deref(),
            Self::InvalidRequest(_) => None,
            Self::Decode { request_id, .. } => request_id.as_deref(),
        }
    }

    /// Returns the inner [`ApiError`], if this is a classified API failure.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}
