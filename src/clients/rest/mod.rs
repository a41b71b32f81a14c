//! REST API client for the telephony platform.
//!
//! This module provides [`RestClient`], the entry point built once from a
//! [`ClientConfig`](crate::ClientConfig). It owns a single
//! [`HttpClient`](crate::clients::HttpClient) and exposes:
//!
//! - Typed resources: `accounts()`, `users()`, `phone_numbers()`, `schedules()`
//! - Generic helpers: `get()`, `post()`, `patch()`, `put()`, `delete()`, `list()`
//! - The event subscriber registry: `hooks()`
//!
//! # Example
//!
//! ```rust,ignore
//! use telephony_api::{ApiKey, BaseUrl, ClientConfig, RestClient};
//! use telephony_api::clients::RequestOptions;
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("sk_live_123").unwrap())
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = RestClient::new(config)?;
//! let accounts = client.accounts().list(&RequestOptions::new())?.auto_paging_to_vec(None).await?;
//! ```

mod client;

pub use client::RestClient;
