//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated API key used as the bearer credential.
///
/// This newtype ensures the key is non-empty and masks its value
/// in debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ApiKey(*****)` instead of the actual key.
///
/// # Example
///
/// ```rust
/// use telephony_api::ApiKey;
///
/// let key = ApiKey::new("sk_live_123").unwrap();
/// assert_eq!(key.as_ref(), "sk_live_123");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated sub-account identifier for multi-tenant requests.
///
/// When attached to a request, the executor sends it in the account
/// header so the call acts on that sub-account instead of the key's own.
///
/// # Serialization
///
/// `AccountId` serializes to and deserializes from a plain string:
///
/// ```rust
/// use telephony_api::AccountId;
///
/// let id = AccountId::new("acct_123").unwrap();
/// assert_eq!(serde_json::to_string(&id).unwrap(), r#""acct_123""#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new validated account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccountId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            return Err(ConfigError::EmptyAccountId);
        }
        Ok(Self(id.to_string()))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated base URL for the platform's REST API.
///
/// Only absolute `http` and `https` URLs are accepted. Trailing slashes are
/// trimmed so that joining `"/v1/users"` never produces a double slash.
///
/// # Example
///
/// ```rust
/// use telephony_api::BaseUrl;
///
/// let url = BaseUrl::new("https://api.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("api.example.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    parsed: Url,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is not an absolute
    /// `http`/`https` URL with a host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/').to_string();

        let parsed = Url::parse(&trimmed).map_err(|_| ConfigError::InvalidBaseUrl { url: url.clone() })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self {
            url: trimmed,
            parsed,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.parsed.host_str()
    }

    /// Resolves a request path against this base URL.
    ///
    /// Absolute URLs (such as opaque `next_page_url` cursors) are returned
    /// verbatim. Relative paths are appended to the base URL, so a base of
    /// `https://api.example.com/api` and a path of `/v1/users` yields
    /// `https://api.example.com/api/v1/users`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.url)
        } else {
            format!("{}/{path}", self.url)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}
