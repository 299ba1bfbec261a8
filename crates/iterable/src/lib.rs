//! Iterable marketing and analytics SDK for Rust.
//!
//! # Example
//!
//! ```rust,ignore
//! use iterable::{Iterable, CommerceItem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), iterable::Error> {
//!     let client = Iterable::builder("api_key_xxx")
//!         .email("user@example.com")
//!         .build()?;
//!
//!     client.track("signup")
//!         .data_field("plan", "pro")
//!         .send()
//!         .await?;
//!
//!     let items = [CommerceItem::new("sku-1", "Mug", 12.5, 2)];
//!     client.track_purchase(25.0, &items, &Default::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! Payloads can also be built without a client through
//! [`IdentityContext::requests`], and handed to any HTTP stack.

mod builders;
mod client;
mod config;
mod error;
mod identity;
mod transport;
pub mod types;

pub use builders::EventRequestBuilder;
pub use client::{Iterable, SendableTrack};
pub use config::{Config, IterableBuilder};
pub use error::Error;
pub use identity::{IdentityContext, SharedInit, UserIdentity};
pub use transport::HttpTransport;
pub use types::{
    ApiResponse, CommerceItem, DataFields, Endpoint, EventPayload, LaunchContext,
    PushServicePlatform, UserInfo, RESERVED_KEYS,
};

/// Create an email identity for [`IdentityContext::with_user`].
pub fn email(e: impl Into<String>) -> Email {
    Email(e.into())
}

/// Create a user ID identity for [`IdentityContext::with_user`].
pub fn user_id(id: impl Into<String>) -> UserId {
    UserId(id.into())
}

/// Email identity wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(pub(crate) String);

impl Email {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// User ID identity wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub(crate) String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
