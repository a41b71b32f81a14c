//! Cursor-based auto-pagination for list endpoints.
//!
//! List endpoints return a [`ListPage`] envelope whose `next_page_url` links
//! to the following page. [`AutoPagingStream`] walks that chain lazily:
//! a page is only requested once every item of the previous page has been
//! consumed, and nothing is requested after a page without a
//! `next_page_url`.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//!
//! let mut users = client.users().list(&RequestOptions::new())?.auto_paging_each();
//! while let Some(user) = users.try_next().await? {
//!     println!("{}", user.id);
//! }
//!
//! // Or collect a bounded number of items
//! let first_fifty = client.users().list(&RequestOptions::new())?.auto_paging_to_vec(Some(50)).await?;
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::{self, BoxStream};
use futures::{FutureExt, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};

/// Maximum number of items [`ListRequest::auto_paging_to_vec`] collects
/// when no limit is given.
pub const DEFAULT_AUTO_PAGING_LIMIT: usize = 10_000;

/// One page of a list response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListPage<T> {
    /// Always `"list"`.
    #[serde(default = "list_object")]
    pub object: String,
    /// The URL this page was fetched from.
    #[serde(default)]
    pub url: String,
    /// Opaque link to the next page; `None` on the last page.
    #[serde(default)]
    pub next_page_url: Option<String>,
    /// Opaque link to the previous page.
    #[serde(default)]
    pub previous_page_url: Option<String>,
    /// Items on this page, in server order.
    pub data: Vec<T>,
}

fn list_object() -> String {
    "list".to_string()
}

impl<T> ListPage<T> {
    /// Returns `true` if another page follows this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.next_page_link().is_some()
    }

    /// Returns the next page link, treating an empty string as absent.
    #[must_use]
    pub fn next_page_link(&self) -> Option<&str> {
        self.next_page_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

type PageFuture<T> = BoxFuture<'static, Result<ListPage<T>, HttpError>>;

enum Cursor<T> {
    Pending(PageFuture<T>),
    Buffered {
        items: VecDeque<T>,
        next_page_url: Option<String>,
    },
    Exhausted,
}

impl<T> Cursor<T> {
    fn from_page(page: ListPage<T>) -> Self {
        let next_page_url = page.next_page_link().map(String::from);
        Self::Buffered {
            items: page.data.into(),
            next_page_url,
        }
    }
}

/// A lazy, forward-only stream over every item of a paginated list.
///
/// Items are yielded in server page order. A page fetch failure is yielded
/// as an `Err` item at the point the page would have been consumed, after
/// which the stream ends. The stream is consumed by value and cannot be
/// restarted; request a new one from the list endpoint instead.
pub struct AutoPagingStream<T> {
    inner: BoxStream<'static, Result<T, HttpError>>,
}

impl<T: Send + 'static> AutoPagingStream<T> {
    /// Creates a stream from a first-page future and a function that fetches
    /// the page behind a `next_page_url`.
    ///
    /// Neither is polled until the stream itself is.
    pub fn new<First, Fetch, Next>(first_page: First, fetch_next_page: Fetch) -> Self
    where
        First: Future<Output = Result<ListPage<T>, HttpError>> + Send + 'static,
        Fetch: Fn(String) -> Next + Send + 'static,
        Next: Future<Output = Result<ListPage<T>, HttpError>> + Send + 'static,
    {
        let start = Cursor::Pending(first_page.boxed());

        let inner = stream::unfold((start, fetch_next_page), |(mut cursor, fetch)| async move {
            loop {
                match cursor {
                    Cursor::Pending(page) => match page.await {
                        Ok(page) => cursor = Cursor::from_page(page),
                        Err(e) => return Some((Err(e), (Cursor::Exhausted, fetch))),
                    },
                    Cursor::Buffered {
                        mut items,
                        next_page_url,
                    } => {
                        if let Some(item) = items.pop_front() {
                            let rest = Cursor::Buffered {
                                items,
                                next_page_url,
                            };
                            return Some((Ok(item), (rest, fetch)));
                        }
                        match next_page_url {
                            Some(url) => {
                                tracing::debug!(next_page_url = %url, "fetching next list page");
                                cursor = Cursor::Pending(fetch(url).boxed());
                            }
                            None => return None,
                        }
                    }
                    Cursor::Exhausted => return None,
                }
            }
        })
        .boxed();

        Self { inner }
    }

    /// Drains up to `limit` items into a vector.
    ///
    /// Stops as soon as `limit` items are collected, so no page beyond the
    /// one holding the last collected item is fetched.
    ///
    /// # Errors
    ///
    /// Returns the first page fetch error encountered.
    pub async fn to_vec(mut self, limit: usize) -> Result<Vec<T>, HttpError> {
        let mut items = Vec::new();
        while items.len() < limit {
            match self.next().await {
                Some(item) => items.push(item?),
                None => break,
            }
        }
        Ok(items)
    }
}

impl<T> Stream for AutoPagingStream<T> {
    type Item = Result<T, HttpError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl<T> std::fmt::Debug for AutoPagingStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoPagingStream").finish_non_exhaustive()
    }
}

/// A list call that has not been sent yet.
///
/// Returned by list endpoints. Fetch a single page with
/// [`first_page`](Self::first_page), or walk every page with
/// [`auto_paging_each`](Self::auto_paging_each).
#[derive(Clone, Debug)]
pub struct ListRequest<T> {
    client: HttpClient,
    request: HttpRequest,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned + Send + 'static> ListRequest<T> {
    pub(crate) const fn new(client: HttpClient, request: HttpRequest) -> Self {
        Self {
            client,
            request,
            _item: PhantomData,
        }
    }

    /// Returns the request for the first page.
    #[must_use]
    pub const fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Fetches only the first page.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails or the body is not a list
    /// envelope of `T`.
    pub async fn first_page(&self) -> Result<ListPage<T>, HttpError> {
        self.client.execute(&self.request).await
    }

    /// Returns a lazy stream over every item across all pages.
    ///
    /// Follow-up pages are fetched with `GET` on the opaque `next_page_url`,
    /// keeping the account, timeout, and retry overrides of the first call.
    #[must_use]
    pub fn auto_paging_each(self) -> AutoPagingStream<T> {
        let first_client = self.client.clone();
        let first_request = self.request.clone();
        let first_page = async move { first_client.execute(&first_request).await };

        let client = self.client;
        let template = self.request;
        AutoPagingStream::new(first_page, move |url| {
            let client = client.clone();
            let request = next_page_request(&template, url);
            async move { client.execute(&request).await }
        })
    }

    /// Collects up to `limit` items across pages, defaulting to
    /// [`DEFAULT_AUTO_PAGING_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns the first page fetch error encountered.
    pub async fn auto_paging_to_vec(self, limit: Option<usize>) -> Result<Vec<T>, HttpError> {
        self.auto_paging_each()
            .to_vec(limit.unwrap_or(DEFAULT_AUTO_PAGING_LIMIT))
            .await
    }
}

/// Builds the follow-up request for `url`, which is fetched verbatim.
fn next_page_request(template: &HttpRequest, url: String) -> HttpRequest {
    HttpRequest {
        http_method: HttpMethod::Get,
        path: url,
        body: None,
        query: Vec::new(),
        idempotency_key: None,
        timeout: template.timeout,
        max_retries: template.max_retries,
        account_id: template.account_id.clone(),
    }
}
