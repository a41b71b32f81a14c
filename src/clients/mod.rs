//! HTTP client types for telephony API communication.
//!
//! This module provides the request pipeline: turning a request descriptor
//! into an authenticated, retried, observable HTTP exchange and classifying
//! whatever comes back.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The executor; applies headers, timeout, retry, and events
//! - [`HttpRequest`]: An immutable descriptor for one logical call
//! - [`RequestOptions`]: Per-call overrides accepted by the resource helpers
//! - [`HttpResponse`]: A terminal response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`ApiError`] and [`ErrorKind`]: The classified error taxonomy
//! - [`EventHooks`]: Typed `on`/`off` subscription to request and response events
//! - [`RetryPolicy`]: The retry and backoff decisions
//! - [`rest::RestClient`]: The resource façade
//!
//! # Example
//!
//! ```rust,ignore
//! use telephony_api::{ApiKey, BaseUrl, ClientConfig};
//! use telephony_api::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//! let client = HttpClient::new(config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Post, "/v1/users")
//!     .body(serde_json::json!({"email": "ada@example.com"}))
//!     .idempotency_key("create-ada")
//!     .build()
//!     .unwrap();
//!
//! let user: serde_json::Value = client.execute(&request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! A call makes at most `1 + max_network_retries` attempts:
//!
//! - **429 (Rate Limited)**: Retried only when `Retry-After` is present, after
//!   `min(Retry-After, max_retry_after)`
//! - **5xx** and network failures (including per-attempt timeouts): Retried
//!   with exponential backoff plus up to 25% jitter
//! - **Other 4xx**: Returned immediately without retry
//!
//! Every attempt carries the same idempotency key.

mod errors;
mod events;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;
mod retry;

pub use errors::{
    classify, ApiError, ErrorEnvelope, ErrorKind, HttpError, InvalidHttpRequestError,
};
pub use events::{
    Event, EventHooks, EventKind, HookEvent, RequestEvent, ResponseEvent, SubscriptionId,
};
pub use http_client::{HttpClient, HEADER_ACCOUNT, HEADER_IDEMPOTENCY_KEY};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, RequestOptions};
pub use http_response::{HttpResponse, HEADER_REQUEST_ID, HEADER_RETRY_AFTER};
pub use retry::{RetryDecision, RetryPolicy};

// Re-export the REST client at the clients module level
pub use rest::RestClient;
