//! Typed platform resources.
//!
//! Each model keeps the fields integrations commonly read and collects every
//! other field into an `extra` map, so new server-side fields survive a
//! decode and re-encode unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! use telephony_api::clients::RequestOptions;
//! use telephony_api::RestClient;
//!
//! let user = client.users().retrieve("usr_123", &RequestOptions::new()).await?;
//! println!("{} <{}>", user.id, user.email.unwrap_or_default());
//!
//! let number = client
//!     .phone_numbers()
//!     .create(
//!         serde_json::json!({"area_code": "415"}),
//!         &RequestOptions::new().idempotency_key("provision-415"),
//!     )
//!     .await?;
//! ```

mod account;
mod phone_number;
mod schedule;
mod user;

pub use account::{Account, AccountStatus};
pub use phone_number::PhoneNumber;
pub use schedule::{Schedule, ScheduleRule};
pub use user::User;
