//! Payload types and serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Caller-supplied fields saved along with an event.
pub type DataFields = HashMap<String, Value>;

/// The payload delivered with a push notification.
pub type UserInfo = Map<String, Value>;

/// Body keys owned by the SDK.
pub mod keys {
    pub const API_KEY: &str = "apiKey";
    pub const EMAIL: &str = "email";
    pub const USER_ID: &str = "userId";
    pub const EVENT_NAME: &str = "eventName";
    pub const TOKEN: &str = "token";
    pub const APPLICATION_NAME: &str = "applicationName";
    pub const PLATFORM: &str = "platform";
    pub const TOTAL: &str = "total";
    pub const ITEMS: &str = "items";
    pub const CAMPAIGN_ID: &str = "campaignId";
    pub const TEMPLATE_ID: &str = "templateId";
    pub const APP_ALREADY_RUNNING: &str = "appAlreadyRunning";
}

/// Keys a caller may not use in `DataFields`.
///
/// Supplying any of these is rejected with [`crate::Error::InvalidArgument`]
/// rather than overwriting the SDK's own value.
pub const RESERVED_KEYS: &[&str] = &[
    keys::API_KEY,
    keys::EMAIL,
    keys::USER_ID,
    keys::EVENT_NAME,
    keys::TOKEN,
    keys::APPLICATION_NAME,
    keys::PLATFORM,
    keys::TOTAL,
    keys::ITEMS,
    keys::CAMPAIGN_ID,
    keys::TEMPLATE_ID,
    keys::APP_ALREADY_RUNNING,
];

/// Returns true if `key` is owned by the SDK.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Push service environment a device token belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushServicePlatform {
    Sandbox,
    #[default]
    Production,
}

impl PushServicePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushServicePlatform::Sandbox => "Sandbox",
            PushServicePlatform::Production => "Production",
        }
    }
}

impl fmt::Display for PushServicePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API endpoint a payload is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Endpoint {
    #[serde(rename = "users/registerDeviceToken")]
    RegisterDeviceToken,
    #[serde(rename = "commerce/trackPurchase")]
    TrackPurchase,
    #[serde(rename = "events/trackPushOpen")]
    TrackPushOpen,
    #[serde(rename = "events/track")]
    Track,
}

impl Endpoint {
    /// Path relative to the API root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::RegisterDeviceToken => "users/registerDeviceToken",
            Endpoint::TrackPurchase => "commerce/trackPurchase",
            Endpoint::TrackPushOpen => "events/trackPushOpen",
            Endpoint::Track => "events/track",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommerceItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl CommerceItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// A normalized request for one tracked event or action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub endpoint: Endpoint,
    pub body: Map<String, Value>,
}

impl EventPayload {
    /// Look up a body field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

/// Launch information handed over by the host platform at startup.
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    /// Set when the process was started by opening a push notification.
    pub remote_notification: Option<UserInfo>,
}

impl LaunchContext {
    /// Launch triggered by opening a push notification.
    pub fn from_notification(user_info: UserInfo) -> Self {
        Self {
            remote_notification: Some(user_info),
        }
    }

    pub fn opened_from_push(&self) -> bool {
        self.remote_notification.is_some()
    }
}

/// Response from the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
