//! Generic CRUD operations for platform resources.
//!
//! A resource type implements [`Resource`] to declare its name and collection
//! path. [`ResourceApi`] then pairs the standard verbs with those paths and
//! hands the call to the shared [`HttpClient`]:
//!
//! | Operation  | Method   | Path                  |
//! |------------|----------|-----------------------|
//! | `create`   | `POST`   | `{collection}`        |
//! | `retrieve` | `GET`    | `{collection}/{id}`   |
//! | `update`   | `PATCH`  | `{collection}/{id}`   |
//! | `delete`   | `DELETE` | `{collection}/{id}`   |
//! | `list`     | `GET`    | `{collection}`        |
//!
//! # Example: Defining a Resource
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use telephony_api::rest::Resource;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Voicemail {
//!     id: String,
//! }
//!
//! impl Resource for Voicemail {
//!     const NAME: &'static str = "Voicemail";
//!     const COLLECTION_PATH: &'static str = "/v1/voicemails";
//! }
//!
//! assert_eq!(Voicemail::member_path("vm 1"), "/v1/voicemails/vm%201");
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, IgnoredAny};

use crate::clients::{
    HttpClient, HttpError, HttpMethod, InvalidHttpRequestError, RequestOptions,
};
use crate::rest::ListRequest;

/// A platform object reachable under a collection path.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// The singular name, used in error messages.
    const NAME: &'static str;

    /// The collection path, e.g. `/v1/users`.
    const COLLECTION_PATH: &'static str;

    /// Returns the path of a single object. The id is percent-encoded.
    #[must_use]
    fn member_path(id: &str) -> String {
        format!("{}/{}", Self::COLLECTION_PATH, urlencoding::encode(id))
    }
}

/// Stateless CRUD wrapper for resource `R` over a shared executor.
pub struct ResourceApi<R> {
    client: HttpClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceApi<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceApi")
            .field("resource", &R::NAME)
            .field("path", &R::COLLECTION_PATH)
            .finish()
    }
}

impl<R: Resource> ResourceApi<R> {
    pub(crate) const fn new(client: HttpClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn member_path(id: &str) -> Result<String, HttpError> {
        if id.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyResourceId { resource: R::NAME }.into());
        }
        Ok(R::member_path(id))
    }

    /// Creates a new object.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails.
    pub async fn create(
        &self,
        params: serde_json::Value,
        options: &RequestOptions,
    ) -> Result<R, HttpError> {
        let request = options.to_request(HttpMethod::Post, R::COLLECTION_PATH, Some(params))?;
        self.client.execute(&request).await
    }

    /// Retrieves an object by id.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if `id` is empty or the call fails.
    pub async fn retrieve(&self, id: &str, options: &RequestOptions) -> Result<R, HttpError> {
        let request = options.to_request(HttpMethod::Get, Self::member_path(id)?, None)?;
        self.client.execute(&request).await
    }

    /// Partially updates an object.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if `id` is empty or the call fails.
    pub async fn update(
        &self,
        id: &str,
        params: serde_json::Value,
        options: &RequestOptions,
    ) -> Result<R, HttpError> {
        let request =
            options.to_request(HttpMethod::Patch, Self::member_path(id)?, Some(params))?;
        self.client.execute(&request).await
    }

    /// Deletes an object. Any response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if `id` is empty or the call fails.
    pub async fn delete(&self, id: &str, options: &RequestOptions) -> Result<(), HttpError> {
        let request = options.to_request(HttpMethod::Delete, Self::member_path(id)?, None)?;
        self.client.execute::<IgnoredAny>(&request).await?;
        Ok(())
    }

    /// Prepares a paginated list call. Nothing is sent until the returned
    /// [`ListRequest`] is consumed.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the options are invalid.
    pub fn list(&self, options: &RequestOptions) -> Result<ListRequest<R>, HttpError> {
        let request = options.to_request(HttpMethod::Get, R::COLLECTION_PATH, None)?;
        Ok(ListRequest::new(self.client.clone(), request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ErrorKind;
    use crate::config::{ApiKey, BaseUrl, ClientConfig};
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    struct Widget {
        #[allow(dead_code)]
        id: String,
    }

    impl Resource for Widget {
        const NAME: &'static str = "Widget";
        const COLLECTION_PATH: &'static str = "/v1/widgets";
    }

    fn api() -> ResourceApi<Widget> {
        let config = ClientConfig::builder()
            .api_key(ApiKey::new("sk_test").unwrap())
            .base_url(BaseUrl::new("https://api.example.com").unwrap())
            .build()
            .unwrap();
        ResourceApi::new(HttpClient::new(config).unwrap())
    }

    #[test]
    fn test_member_path_encodes_id() {
        assert_eq!(Widget::member_path("w_1"), "/v1/widgets/w_1");
        assert_eq!(Widget::member_path("a/b?c"), "/v1/widgets/a%2Fb%3Fc");
    }

    #[tokio::test]
    async fn test_empty_id_is_rejected_before_sending() {
        let error = api()
            .retrieve("  ", &RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            HttpError::InvalidRequest(InvalidHttpRequestError::EmptyResourceId { resource: "Widget" })
        ));
        assert_eq!(error.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_list_builds_get_on_collection() {
        let options = RequestOptions::new().query_param("limit", "10");
        let list = api().list(&options).unwrap();

        assert_eq!(list.request().http_method, HttpMethod::Get);
        assert_eq!(list.request().path, "/v1/widgets");
        assert_eq!(list.request().query.len(), 1);
    }

    #[test]
    fn test_debug_names_resource() {
        let debug = format!("{:?}", api());
        assert!(debug.contains("Widget"));
        assert!(debug.contains("/v1/widgets"));
    }
}
