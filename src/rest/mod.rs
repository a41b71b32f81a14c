//! REST resource infrastructure for the telephony API.
//!
//! This module provides:
//!
//! - **[`Resource`] trait**: declares a resource's name and collection path
//! - **[`ResourceApi<R>`]**: stateless `create`/`retrieve`/`update`/`delete`/`list`
//!   operations over the shared executor
//! - **[`ListPage<T>`]**: the list response envelope
//! - **[`AutoPagingStream<T>`]** and **[`ListRequest<T>`]**: lazy traversal of
//!   every page behind a list call
//! - **[`resources`]**: typed models (`Account`, `User`, `PhoneNumber`, `Schedule`)
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use telephony_api::clients::RequestOptions;
//!
//! let options = RequestOptions::new().query_param("limit", "100");
//! let mut numbers = client.phone_numbers().list(&options)?.auto_paging_each();
//! while let Some(number) = numbers.try_next().await? {
//!     println!("{}", number.number);
//! }
//! ```

mod pagination;
mod resource;
pub mod resources;

pub use pagination::{AutoPagingStream, ListPage, ListRequest, DEFAULT_AUTO_PAGING_LIMIT};
pub use resource::{Resource, ResourceApi};
