//! # Telephony API Rust Client
//!
//! A Rust client for the telephony platform's REST API, providing type-safe
//! configuration, a retrying request executor with a classified error
//! taxonomy, lazy auto-pagination, typed request/response events, and
//! webhook signature verification.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for credentials and account ids
//! - An async executor with timeout, retry with backoff, and idempotency keys
//! - Classified errors ([`ApiError`], [`ErrorKind`]) carrying status, code,
//!   and request id
//! - Typed `on`/`off` subscription to request and response events
//! - Cursor-based auto-pagination as a `futures::Stream`
//! - Constant-time webhook signature verification via [`webhooks`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use telephony_api::{ApiKey, AppInfo, BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .app_info(AppInfo::new("Dialer").version("2.1.0"))
//!     .max_network_retries(3)
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_network_retries(), 3);
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use telephony_api::{RestClient, ErrorKind, HttpError};
//! use telephony_api::clients::RequestOptions;
//!
//! let client = RestClient::new(config)?;
//!
//! match client.users().retrieve("usr_123", &RequestOptions::new()).await {
//!     Ok(user) => println!("found {}", user.id),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("no such user"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Pagination
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//!
//! let mut numbers = client.phone_numbers().list(&RequestOptions::new())?.auto_paging_each();
//! while let Some(number) = numbers.try_next().await? {
//!     println!("{}", number.number);
//! }
//! ```
//!
//! ## Observability
//!
//! ```rust,ignore
//! use telephony_api::clients::{RequestEvent, ResponseEvent};
//!
//! client.hooks().on::<RequestEvent>(|event| println!("-> {} {}", event.method, event.path));
//! client.hooks().on::<ResponseEvent>(|event| {
//!     println!("<- {} in {}ms ({:?})", event.status, event.elapsed_ms(), event.request_id);
//! });
//! ```
//!
//! The executor also logs through [`tracing`]: one `debug` event per
//! attempt and a `warn` event for every retry.
//!
//! ## Webhooks
//!
//! ```rust
//! use chrono::Utc;
//! use telephony_api::webhooks::{construct_event, generate_test_header, DEFAULT_TOLERANCE_SECONDS};
//!
//! let payload = r#"{"type":"call.completed"}"#;
//! let header = generate_test_header(payload, "whsec_test", Utc::now().timestamp());
//!
//! let event: serde_json::Value =
//!     construct_event(payload, &header, "whsec_test", DEFAULT_TOLERANCE_SECONDS).unwrap();
//! assert_eq!(event["type"], "call.completed");
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and the event registry belong to a
//!   client instance
//! - **Fail-fast validation**: Newtypes and request descriptors validate on
//!   construction
//! - **Thread-safe**: All client types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
pub mod webhooks;

// Re-export public types at crate root for convenience
pub use config::{AccountId, ApiKey, AppInfo, BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiError, ErrorKind, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, InvalidHttpRequestError, RequestOptions, RestClient,
};

// Re-export pagination types
pub use rest::{AutoPagingStream, ListPage, ListRequest};
