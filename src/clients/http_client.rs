//! Request executor for the telephony API.
//!
//! This module provides the [`HttpClient`] type, which turns an
//! [`HttpRequest`] into an authenticated, retried, observable HTTP exchange.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::clients::errors::{ApiError, ErrorEnvelope, HttpError};
use crate::clients::events::{Event, EventHooks, RequestEvent, ResponseEvent};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::{RetryDecision, RetryPolicy};
use crate::config::ClientConfig;
use crate::error::ConfigError;

/// Request header carrying the idempotency key.
pub const HEADER_IDEMPOTENCY_KEY: &str = "Idempotency-Key";

/// Request header selecting the sub-account a call acts on.
pub const HEADER_ACCOUNT: &str = "X-Account-Id";

/// Why an attempt produced no response.
#[derive(Debug)]
enum AttemptFailure {
    Timeout {
        after: Duration,
        source: tokio::time::error::Elapsed,
    },
    Transport(reqwest::Error),
}

impl AttemptFailure {
    /// Builder errors (e.g. an unparseable URL) fail identically on every
    /// attempt, so they are not worth retrying.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => !e.is_builder(),
        }
    }

    fn into_api_error(self) -> ApiError {
        match self {
            Self::Timeout { after, source } => ApiError::connection(
                format!("Request timed out after {}ms", after.as_millis()),
                source,
            ),
            Self::Transport(e) => ApiError::connection(
                format!("An error occurred while connecting to the API: {e}"),
                e,
            ),
        }
    }
}

/// Executes API calls.
///
/// The client handles:
/// - URL resolution against the configured base URL
/// - Default headers: content type, bearer credential, user agent
/// - Idempotency and account headers per request
/// - Per-attempt timeouts and retry with backoff
/// - Request/response events on the shared [`EventHooks`]
/// - Error classification
///
/// Cloning is cheap: clones share the connection pool, configuration, and
/// subscriber registry.
///
/// # Example
///
/// ```rust,ignore
/// use telephony_api::{ApiKey, BaseUrl, ClientConfig};
/// use telephony_api::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = ClientConfig::builder()
///     .api_key(ApiKey::new("sk_test_123")?)
///     .base_url(BaseUrl::new("https://api.example.com")?)
///     .build()?;
/// let client = HttpClient::new(config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/v1/users/usr_123").build()?;
/// let user: serde_json::Value = client.execute(&request).await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    hooks: Arc<EventHooks>,
    user_agent: String,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new executor with its own subscriber registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the TLS transport cannot
    /// be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| ConfigError::HttpClientBuild {
                reason: e.to_string(),
            })?;

        let user_agent = config.user_agent();

        Ok(Self {
            client,
            config: Arc::new(config),
            hooks: Arc::new(EventHooks::new()),
            user_agent,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the subscriber registry events are published to.
    #[must_use]
    pub fn hooks(&self) -> &EventHooks {
        &self.hooks
    }

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the headers that will be sent for `request`.
    ///
    /// The account header uses the request's account, falling back to the
    /// client-wide default.
    #[must_use]
    pub fn headers_for(&self, request: &HttpRequest) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Content-Type", "application/json".to_string()),
            ("Accept", "application/json".to_string()),
            (
                "Authorization",
                format!("Bearer {}", self.config.api_key().as_ref()),
            ),
            ("User-Agent", self.user_agent.clone()),
        ];

        if let Some(key) = &request.idempotency_key {
            headers.push((HEADER_IDEMPOTENCY_KEY, key.clone()));
        }

        if let Some(account) = self.account_for(request) {
            headers.push((HEADER_ACCOUNT, account.to_string()));
        }

        headers
    }

    fn account_for<'a>(&'a self, request: &'a HttpRequest) -> Option<&'a str> {
        request
            .account_id
            .as_ref()
            .or_else(|| self.config.account_id())
            .map(AsRef::as_ref)
    }

    /// Executes `request` and decodes the JSON response body into `T`.
    ///
    /// A 204 or empty body decodes from JSON `null`, so `()` and
    /// `Option<_>` are valid targets for calls without content.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Api`] for any classified failure,
    /// [`HttpError::InvalidRequest`] if the request fails validation, and
    /// [`HttpError::Decode`] if a successful body does not match `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, HttpError> {
        let response = self.send(request).await?;
        decode_body(&response)
    }

    /// Executes `request` and returns the raw terminal response.
    ///
    /// One [`RequestEvent`] is published before the first attempt and one
    /// [`ResponseEvent`] after the terminal response. Attempts are strictly
    /// sequential and all carry the same headers, including the
    /// idempotency key.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Api`] with a classified error for non-2xx
    /// terminal responses, or a connection error when no response could be
    /// obtained within the retry budget.
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.config.base_url().resolve(&request.path);
        let headers = self.headers_for(request);
        let policy = RetryPolicy::from_config(&self.config, request.max_retries);
        let timeout = request.timeout.unwrap_or_else(|| self.config.timeout());
        let account_id = self.account_for(request).map(String::from);

        let timestamp = Utc::now();
        let started = Instant::now();
        self.hooks.emit(&Event::Request(RequestEvent {
            method: request.http_method,
            path: request.path.clone(),
            account_id: account_id.clone(),
            idempotency_key: request.idempotency_key.clone(),
            timestamp,
        }));

        let mut attempt: u32 = 0;
        let response = loop {
            tracing::debug!(
                method = %request.http_method,
                path = %request.path,
                attempt = attempt + 1,
                max_attempts = policy.max_attempts(),
                "sending API request"
            );

            match self.attempt(request, &url, &headers, timeout).await {
                Ok(response) => {
                    let decision =
                        policy.decide_status(attempt, response.code, response.retry_after());
                    match decision {
                        RetryDecision::Retry { delay } => {
                            tracing::warn!(
                                method = %request.http_method,
                                path = %request.path,
                                status = response.code,
                                attempt = attempt + 1,
                                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                                "retrying API request after error status"
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        RetryDecision::Stop => break response,
                    }
                }
                Err(failure) => {
                    let decision = if failure.is_retryable() {
                        policy.decide_network(attempt)
                    } else {
                        RetryDecision::Stop
                    };
                    match decision {
                        RetryDecision::Retry { delay } => {
                            tracing::warn!(
                                method = %request.http_method,
                                path = %request.path,
                                error = ?failure,
                                attempt = attempt + 1,
                                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                                "retrying API request after network failure"
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        RetryDecision::Stop => {
                            return Err(HttpError::Api(failure.into_api_error()));
                        }
                    }
                }
            }
        };

        self.hooks.emit(&Event::Response(ResponseEvent {
            method: request.http_method,
            path: request.path.clone(),
            account_id,
            idempotency_key: request.idempotency_key.clone(),
            timestamp,
            status: response.code,
            request_id: response.request_id().map(String::from),
            elapsed: started.elapsed(),
        }));

        if response.is_ok() {
            return Ok(response);
        }

        let envelope = ErrorEnvelope::parse(response.body.as_bytes());
        Err(HttpError::Api(ApiError::from_response(
            response.code,
            response.status_text(),
            envelope,
            response.request_id().map(String::from),
            response.retry_after(),
        )))
    }

    /// Issues a single attempt bounded by `timeout`.
    async fn attempt(
        &self,
        request: &HttpRequest,
        url: &str,
        headers: &[(&'static str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, AttemptFailure> {
        let mut builder = self.client.request(request.http_method.as_reqwest(), url);
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let exchange = async {
            let res = builder.send().await?;
            let code = res.status().as_u16();
            let res_headers = HttpResponse::collect_headers(res.headers());
            let body = res.text().await?;
            Ok::<_, reqwest::Error>(HttpResponse::new(code, res_headers, body))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(AttemptFailure::Transport(e)),
            Err(source) => Err(AttemptFailure::Timeout {
                after: timeout,
                source,
            }),
        }
    }
}

/// Decodes a successful response body, treating no content as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, HttpError> {
    let decoded = if response.is_no_content() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(&response.body)
    };

    decoded.map_err(|source| HttpError::Decode {
        status: response.code,
        source,
        request_id: response.request_id().map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http_request::HttpMethod;
    use crate::config::{AccountId, ApiKey, AppInfo, BaseUrl};
    use std::collections::HashMap;

    fn create_test_config() -> ClientConfig {
        ClientConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .build()
            .unwrap()
    }

    fn header<'a>(headers: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_bearer_and_content_headers() {
        let client = HttpClient::new(create_test_config()).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, "/v1/users").build().unwrap();
        let headers = client.headers_for(&request);

        assert_eq!(header(&headers, "Authorization"), Some("Bearer sk_test_123"));
        assert_eq!(header(&headers, "Content-Type"), Some("application/json"));
        assert_eq!(header(&headers, "Accept"), Some("application/json"));
        assert!(header(&headers, HEADER_IDEMPOTENCY_KEY).is_none());
        assert!(header(&headers, HEADER_ACCOUNT).is_none());
    }

    #[test]
    fn test_user_agent_header_format() {
        let config = ClientConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .app_info(AppInfo::new("Dialer").version("3.0"))
            .build()
            .unwrap();
        let client = HttpClient::new(config).unwrap();

        assert!(client.user_agent().starts_with("Dialer/3.0 | "));
        assert!(client.user_agent().contains("Telephony API Library v"));
    }

    #[test]
    fn test_idempotency_and_account_headers() {
        let client = HttpClient::new(create_test_config()).unwrap();
        let request = HttpRequest::builder(HttpMethod::Post, "/v1/users")
            .idempotency_key("key-1")
            .account_id(AccountId::new("acct_1").unwrap())
            .build()
            .unwrap();
        let headers = client.headers_for(&request);

        assert_eq!(header(&headers, HEADER_IDEMPOTENCY_KEY), Some("key-1"));
        assert_eq!(header(&headers, HEADER_ACCOUNT), Some("acct_1"));
    }

    #[test]
    fn test_request_account_overrides_client_default() {
        let config = ClientConfig::builder()
            .api_key(ApiKey::new("sk_test_123").unwrap())
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .account_id(AccountId::new("acct_default").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(config).unwrap();

        let default_scoped = HttpRequest::builder(HttpMethod::Get, "/v1/users").build().unwrap();
        assert_eq!(
            header(&client.headers_for(&default_scoped), HEADER_ACCOUNT),
            Some("acct_default")
        );

        let overridden = HttpRequest::builder(HttpMethod::Get, "/v1/users")
            .account_id(AccountId::new("acct_other").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            header(&client.headers_for(&overridden), HEADER_ACCOUNT),
            Some("acct_other")
        );
    }

    #[test]
    fn test_clones_share_hooks() {
        let client = HttpClient::new(create_test_config()).unwrap();
        let clone = client.clone();
        client.hooks().on::<RequestEvent>(|_| {});

        assert_eq!(
            clone.hooks().listener_count(crate::clients::EventKind::Request),
            1
        );
    }

    #[test]
    fn test_decode_body_handles_no_content() {
        let response = HttpResponse::new(204, HashMap::new(), String::new());
        let _: () = decode_body(&response).unwrap();
        let value: Option<serde_json::Value> = decode_body(&response).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_body_reports_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            id: String,
        }

        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["req_7".to_string()]);
        let response = HttpResponse::new(200, headers, r#"{"name": "x"}"#.to_string());

        let error = decode_body::<Expected>(&response).unwrap_err();
        assert!(matches!(error, HttpError::Decode { status: 200, .. }));
        assert_eq!(error.request_id(), Some("req_7"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
