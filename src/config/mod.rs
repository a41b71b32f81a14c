//! Configuration types for the telephony API client.
//!
//! This module provides the core configuration types used to initialize
//! the client for communication with the platform's REST API.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The main configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ApiKey`]: A validated bearer credential with masked debug output
//! - [`BaseUrl`]: A validated API base URL
//! - [`AccountId`]: A validated multi-tenant account identifier
//! - [`AppInfo`]: Identity of the embedding application
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use telephony_api::{ApiKey, BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("sk_test_123").unwrap())
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .max_network_retries(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_network_retries(), 3);
//! ```

mod app_info;
mod newtypes;

pub use app_info::AppInfo;
pub use newtypes::{AccountId, ApiKey, BaseUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(80);

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_NETWORK_RETRIES: u32 = 2;

/// Default base delay for exponential backoff.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Default cap for exponential backoff delays (before jitter).
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Default cap applied to server-supplied `Retry-After` waits.
pub const DEFAULT_MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Library version from Cargo.toml.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for the telephony API client.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use telephony_api::{AccountId, ApiKey, AppInfo, BaseUrl, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .api_key(ApiKey::new("sk_test_123").unwrap())
///     .base_url(BaseUrl::new("https://api.example.com").unwrap())
///     .app_info(AppInfo::new("CallCenter").version("2.1.0"))
///     .account_id(AccountId::new("acct_42").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.account_id().map(AsRef::as_ref), Some("acct_42"));
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_key: ApiKey,
    base_url: BaseUrl,
    timeout: Duration,
    max_network_retries: u32,
    retry_base_delay: Duration,
    max_retry_delay: Duration,
    max_retry_after: Duration,
    app_info: Option<AppInfo>,
    account_id: Option<AccountId>,
    library_version: String,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the default number of retries after the first attempt.
    #[must_use]
    pub const fn max_network_retries(&self) -> u32 {
        self.max_network_retries
    }

    /// Returns the base delay for exponential backoff.
    #[must_use]
    pub const fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    /// Returns the cap for exponential backoff delays.
    #[must_use]
    pub const fn max_retry_delay(&self) -> Duration {
        self.max_retry_delay
    }

    /// Returns the cap applied to `Retry-After` waits.
    #[must_use]
    pub const fn max_retry_after(&self) -> Duration {
        self.max_retry_after
    }

    /// Returns the embedding application's identity, if configured.
    #[must_use]
    pub const fn app_info(&self) -> Option<&AppInfo> {
        self.app_info.as_ref()
    }

    /// Returns the default account scope, if configured.
    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    /// Returns the library version advertised in the `User-Agent`.
    #[must_use]
    pub fn library_version(&self) -> &str {
        &self.library_version
    }

    /// Builds the `User-Agent` header value.
    ///
    /// Format: `Telephony API Library v{version} | Rust {rust-version}`,
    /// prefixed with `{app} | ` when [`AppInfo`] is configured.
    #[must_use]
    pub fn user_agent(&self) -> String {
        let app_prefix = self
            .app_info
            .as_ref()
            .map_or(String::new(), |info| format!("{info} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        format!(
            "{app_prefix}Telephony API Library v{} | Rust {rust_version}",
            self.library_version
        )
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// Required fields are `api_key` and `base_url`. All other fields have
/// sensible defaults.
///
/// # Defaults
///
/// - `timeout`: 80 seconds
/// - `max_network_retries`: 2
/// - `retry_base_delay`: 500 milliseconds
/// - `max_retry_delay`: 8 seconds
/// - `max_retry_after`: 60 seconds
/// - `app_info`: `None`
/// - `account_id`: `None`
/// - `library_version`: the crate version
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<ApiKey>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
    max_network_retries: Option<u32>,
    retry_base_delay: Option<Duration>,
    max_retry_delay: Option<Duration>,
    max_retry_after: Option<Duration>,
    app_info: Option<AppInfo>,
    account_id: Option<AccountId>,
    library_version: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the default per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the default number of retries after the first attempt.
    #[must_use]
    pub const fn max_network_retries(mut self, retries: u32) -> Self {
        self.max_network_retries = Some(retries);
        self
    }

    /// Sets the base delay for exponential backoff.
    #[must_use]
    pub const fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    /// Sets the cap for exponential backoff delays.
    #[must_use]
    pub const fn max_retry_delay(mut self, delay: Duration) -> Self {
        self.max_retry_delay = Some(delay);
        self
    }

    /// Sets the cap applied to server-supplied `Retry-After` waits.
    #[must_use]
    pub const fn max_retry_after(mut self, delay: Duration) -> Self {
        self.max_retry_after = Some(delay);
        self
    }

    /// Sets the embedding application's identity.
    #[must_use]
    pub fn app_info(mut self, info: AppInfo) -> Self {
        self.app_info = Some(info);
        self
    }

    /// Sets the default account scope for every request.
    ///
    /// Individual requests may override it via
    /// [`HttpRequestBuilder::account_id`](crate::clients::HttpRequestBuilder::account_id).
    #[must_use]
    pub fn account_id(mut self, account: AccountId) -> Self {
        self.account_id = Some(account);
        self
    }

    /// Overrides the library version advertised in the `User-Agent`.
    #[must_use]
    pub fn library_version(mut self, version: impl Into<String>) -> Self {
        self.library_version = Some(version.into());
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `base_url` are not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(ClientConfig {
            api_key,
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_network_retries: self
                .max_network_retries
                .unwrap_or(DEFAULT_MAX_NETWORK_RETRIES),
            retry_base_delay: self.retry_base_delay.unwrap_or(DEFAULT_RETRY_BASE_DELAY),
            max_retry_delay: self.max_retry_delay.unwrap_or(DEFAULT_MAX_RETRY_DELAY),
            max_retry_after: self.max_retry_after.unwrap_or(DEFAULT_MAX_RETRY_AFTER),
            app_info: self.app_info,
            account_id: self.account_id,
            library_version: self
                .library_version
                .unwrap_or_else(|| LIBRARY_VERSION.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_builder() -> ClientConfigBuilder {
        ClientConfig::builder()
            .api_key(ApiKey::new("sk_test").unwrap())
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = ClientConfigBuilder::new()
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientConfigBuilder::new()
            .api_key(ApiKey::new("sk_test").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = base_builder().build().unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(80));
        assert_eq!(config.max_network_retries(), 2);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(500));
        assert_eq!(config.max_retry_delay(), Duration::from_secs(8));
        assert_eq!(config.max_retry_after(), Duration::from_secs(60));
        assert!(config.app_info().is_none());
        assert!(config.account_id().is_none());
        assert_eq!(config.library_version(), LIBRARY_VERSION);
    }

    #[test]
    fn test_user_agent_without_app_info() {
        let config = base_builder().build().unwrap();
        let user_agent = config.user_agent();

        assert!(user_agent.starts_with("Telephony API Library v"));
        assert!(user_agent.contains(LIBRARY_VERSION));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_app_info_and_version_override() {
        let config = base_builder()
            .app_info(AppInfo::new("CallCenter").version("2.1.0"))
            .library_version("9.9.9")
            .build()
            .unwrap();

        let user_agent = config.user_agent();
        assert!(user_agent.starts_with("CallCenter/2.1.0 | "));
        assert!(user_agent.contains("Telephony API Library v9.9.9"));
    }

    #[test]
    fn test_config_debug_does_not_leak_api_key() {
        let config = ClientConfig::builder()
            .api_key(ApiKey::new("sk_live_very_secret").unwrap())
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("ClientConfig"));
        assert!(!debug_str.contains("very_secret"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
    }
}
