//! Request descriptors for the telephony API.
//!
//! This module provides the [`HttpRequest`] type and its builder. A request
//! is immutable once built; the executor reads it as a template for every
//! attempt, so its idempotency key is replayed unchanged on each retry.

use std::fmt;
use std::time::Duration;

use crate::clients::errors::InvalidHttpRequestError;
use crate::config::AccountId;

/// HTTP methods supported by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` for methods that accept a request body.
    #[must_use]
    pub const fn accepts_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single logical API call.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use telephony_api::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/v1/phone_numbers")
///     .body(json!({"area_code": "415"}))
///     .idempotency_key("order-7781")
///     .timeout(Duration::from_secs(10))
///     .max_retries(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.idempotency_key.as_deref(), Some("order-7781"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// A path relative to the base URL, or an absolute URL used verbatim.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters to append to the URL, in insertion order.
    pub query: Vec<(String, String)>,
    /// Idempotency key sent on every attempt of this call.
    pub idempotency_key: Option<String>,
    /// Per-attempt timeout overriding the client default.
    pub timeout: Option<Duration>,
    /// Retry budget overriding the client default.
    pub max_retries: Option<u32>,
    /// Sub-account this call acts on, overriding the client default.
    pub account_id: Option<AccountId>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `path` is empty
    /// - a body is attached to `GET` or `DELETE`
    /// - the idempotency key is empty
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        if self.body.is_some() && !self.http_method.accepts_body() {
            return Err(InvalidHttpRequestError::UnexpectedBody {
                method: self.http_method.to_string(),
            });
        }

        if self
            .idempotency_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(InvalidHttpRequestError::EmptyIdempotencyKey);
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request: HttpRequest {
                http_method: method,
                path: path.into(),
                body: None,
                query: Vec::new(),
                idempotency_key: None,
                timeout: None,
                max_retries: None,
                account_id: None,
            },
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.push((key.into(), value.into()));
        self
    }

    /// Sets the idempotency key.
    ///
    /// The executor never generates keys itself; supply one for
    /// non-idempotent calls that should be safe to retry.
    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.request.idempotency_key = Some(key.into());
        self
    }

    /// Overrides the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Overrides the retry budget. `0` disables retries.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.request.max_retries = Some(retries);
        self
    }

    /// Scopes this call to a sub-account.
    #[must_use]
    pub fn account_id(mut self, account: AccountId) -> Self {
        self.request.account_id = Some(account);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        self.request.verify()?;
        Ok(self.request)
    }
}

/// Per-call options accepted by the resource helpers.
///
/// Every field is optional; unset fields fall back to the client defaults.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use telephony_api::clients::RequestOptions;
///
/// let options = RequestOptions::new()
///     .idempotency_key("provision-42")
///     .timeout(Duration::from_secs(5))
///     .query_param("limit", "25");
/// assert_eq!(options.query.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// Idempotency key sent on every attempt.
    pub idempotency_key: Option<String>,
    /// Sub-account override.
    pub account_id: Option<AccountId>,
    /// Per-attempt timeout override.
    pub timeout: Option<Duration>,
    /// Retry budget override.
    pub max_retries: Option<u32>,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the idempotency key.
    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Scopes the call to a sub-account.
    #[must_use]
    pub fn account_id(mut self, account: AccountId) -> Self {
        self.account_id = Some(account);
        self
    }

    /// Overrides the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the retry budget.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Builds a request for `method` and `path` carrying these options.
    pub(crate) fn to_request(
        &self,
        method: HttpMethod,
        path: impl Into<String>,
        body: Option<serde_json::Value>,
    ) -> Result<HttpRequest, InvalidHttpRequestError> {
        let mut builder = self.apply(HttpRequest::builder(method, path));
        if let Some(body) = body {
            builder = builder.body(body);
        }
        builder.build()
    }

    pub(crate) fn apply(&self, mut builder: HttpRequestBuilder) -> HttpRequestBuilder {
        for (key, value) in &self.query {
            builder = builder.query_param(key.clone(), value.clone());
        }
        if let Some(key) = &self.idempotency_key {
            builder = builder.idempotency_key(key.clone());
        }
        if let Some(account) = &self.account_id {
            builder = builder.account_id(account.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(retries) = self.max_retries {
            builder = builder.max_retries(retries);
        }
        builder
    }
}
