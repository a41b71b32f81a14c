//! REST client implementation for the telephony API.
//!
//! This module provides the [`RestClient`] type: the entry point that owns
//! the executor, exposes the typed resources, and offers generic verb
//! helpers for endpoints without a typed model.

use serde::de::DeserializeOwned;

use crate::clients::{EventHooks, HttpClient, HttpError, HttpMethod, RequestOptions};
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::rest::resources::{Account, PhoneNumber, Schedule, User};
use crate::rest::{ListRequest, ResourceApi};

/// REST API client for the telephony platform.
///
/// The client is built once from a [`ClientConfig`]. Resource objects are
/// created at construction and share the client's executor, so they carry
/// no state of their own.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync` and cheap to clone; clones share the
/// connection pool and the event subscriber registry.
///
/// # Example
///
/// ```rust,ignore
/// use telephony_api::{ApiKey, BaseUrl, ClientConfig, RestClient};
/// use telephony_api::clients::{RequestOptions, ResponseEvent};
///
/// let config = ClientConfig::builder()
///     .api_key(ApiKey::new("sk_live_123")?)
///     .base_url(BaseUrl::new("https://api.example.com")?)
///     .build()?;
/// let client = RestClient::new(config)?;
///
/// client.hooks().on::<ResponseEvent>(|event| {
///     println!("{} {} -> {} in {}ms", event.method, event.path, event.status, event.elapsed_ms());
/// });
///
/// let user = client.users().retrieve("usr_123", &RequestOptions::new()).await?;
///
/// // Endpoints without a typed model
/// let usage: serde_json::Value = client.get("/v1/usage", &RequestOptions::new()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    http_client: HttpClient,
    accounts: ResourceApi<Account>,
    users: ResourceApi<User>,
    phone_numbers: ResourceApi<PhoneNumber>,
    schedules: ResourceApi<Schedule>,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the HTTP transport cannot
    /// be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http_client = HttpClient::new(config)?;

        tracing::debug!(
            base_url = %http_client.config().base_url().as_ref(),
            user_agent = %http_client.user_agent(),
            "created REST client"
        );

        Ok(Self {
            accounts: ResourceApi::new(http_client.clone()),
            users: ResourceApi::new(http_client.clone()),
            phone_numbers: ResourceApi::new(http_client.clone()),
            schedules: ResourceApi::new(http_client.clone()),
            http_client,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.http_client.config()
    }

    /// Returns the event subscriber registry for this client.
    #[must_use]
    pub fn hooks(&self) -> &EventHooks {
        self.http_client.hooks()
    }

    /// Returns the underlying executor.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Account operations.
    #[must_use]
    pub const fn accounts(&self) -> &ResourceApi<Account> {
        &self.accounts
    }

    /// User operations.
    #[must_use]
    pub const fn users(&self) -> &ResourceApi<User> {
        &self.users
    }

    /// Phone number operations.
    #[must_use]
    pub const fn phone_numbers(&self) -> &ResourceApi<PhoneNumber> {
        &self.phone_numbers
    }

    /// Schedule operations.
    #[must_use]
    pub const fn schedules(&self) -> &ResourceApi<Schedule> {
        &self.schedules
    }

    /// Sends a GET request and decodes the response into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails or the body does not decode.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, HttpError> {
        self.make_request(HttpMethod::Get, path, None, options).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails or the body does not decode.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        options: &RequestOptions,
    ) -> Result<T, HttpError> {
        self.make_request(HttpMethod::Post, path, Some(body), options)
            .await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails or the body does not decode.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        options: &RequestOptions,
    ) -> Result<T, HttpError> {
        self.make_request(HttpMethod::Patch, path, Some(body), options)
            .await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails or the body does not decode.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        options: &RequestOptions,
    ) -> Result<T, HttpError> {
        self.make_request(HttpMethod::Put, path, Some(body), options)
            .await
    }

    /// Sends a DELETE request.
    ///
    /// Use `()` or `Option<_>` as `T` for endpoints that answer 204.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails or the body does not decode.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, HttpError> {
        self.make_request(HttpMethod::Delete, path, None, options)
            .await
    }

    /// Prepares a paginated list call against `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the path or options are invalid.
    pub fn list<T: DeserializeOwned + Send + 'static>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ListRequest<T>, HttpError> {
        let request = options.to_request(HttpMethod::Get, path, None)?;
        Ok(ListRequest::new(self.http_client.clone(), request))
    }

    async fn make_request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> Result<T, HttpError> {
        let request = options.to_request(method, path, body)?;
        self.http_client.execute(&request).await
    }
}
