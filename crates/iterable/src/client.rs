//! Iterable client implementation.

use crate::builders::EventRequestBuilder;
use crate::config::{Config, IterableBuilder};
use crate::identity::IdentityContext;
use crate::transport::HttpTransport;
use crate::types::{
    ApiResponse, CommerceItem, DataFields, EventPayload, LaunchContext, PushServicePlatform,
    UserInfo,
};
use crate::Error;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Iterable API client.
///
/// Each operation builds one payload for the client's identity and delivers
/// it with a single HTTP call.
///
/// # Example
///
/// ```rust,no_run
/// use iterable::Iterable;
///
/// #[tokio::main]
/// async fn main() -> Result<(), iterable::Error> {
///     let client = Iterable::builder("api_key_xxx")
///         .email("user@example.com")
///         .build()?;
///
///     client.track("level_complete")
///         .data_field("level", 3)
///         .send()
///         .await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Iterable {
    identity: Arc<IdentityContext>,
    config: Config,
    transport: Arc<HttpTransport>,
}

impl IterableBuilder {
    /// Build the Iterable client.
    pub fn build(self) -> Result<Iterable, Error> {
        let (identity, config) = self.build_parts()?;
        Iterable::from_identity(Arc::new(identity), config)
    }

    /// Build the client and install its identity as the shared instance.
    ///
    /// When `launch` says the process was opened from a push notification the
    /// push open is tracked before returning. A delivery failure is logged and
    /// does not fail initialization. The shared instance is only replaced once
    /// everything else has been built.
    pub async fn build_shared(self, launch: Option<&LaunchContext>) -> Result<Iterable, Error> {
        let (identity, config) = self.build_parts()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        let shared = identity.install_shared(launch)?;
        let client = Iterable {
            identity: shared.identity,
            config,
            transport,
        };

        if let Some(payload) = shared.launch_push_open {
            if let Err(e) = client.transport.send(&payload).await {
                warn!(error = %e, "failed to track launch push open");
            }
        }

        Ok(client)
    }
}

impl Iterable {
    /// Create a new builder with the given API key.
    pub fn builder(api_key: impl Into<String>) -> IterableBuilder {
        IterableBuilder::new(api_key)
    }

    /// Create a client for an existing identity.
    pub fn from_identity(identity: Arc<IdentityContext>, config: Config) -> Result<Self, Error> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self {
            identity,
            config,
            transport,
        })
    }

    /// Create a client for the shared identity.
    pub fn shared(config: Config) -> Result<Self, Error> {
        Self::from_identity(IdentityContext::shared()?, config)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the identity events are attributed to.
    pub fn identity(&self) -> &IdentityContext {
        &self.identity
    }

    fn requests(&self) -> EventRequestBuilder<'_> {
        self.identity.requests()
    }

    /// Register this device's push token in the identity's environment.
    pub async fn register_token(
        &self,
        token: &[u8],
        app_name: &str,
    ) -> Result<ApiResponse, Error> {
        self.register_token_with_platform(token, app_name, self.identity.environment())
            .await
    }

    /// Register this device's push token in the given environment.
    #[instrument(skip(self, token))]
    pub async fn register_token_with_platform(
        &self,
        token: &[u8],
        app_name: &str,
        platform: PushServicePlatform,
    ) -> Result<ApiResponse, Error> {
        let payload = self.requests().token_registration(token, app_name, platform)?;
        info!(platform = %platform, "registering device token");
        self.send(&payload).await
    }

    /// Track a purchase.
    #[instrument(skip(self, items, data_fields), fields(item_count = items.len()))]
    pub async fn track_purchase(
        &self,
        total: f64,
        items: &[CommerceItem],
        data_fields: &DataFields,
    ) -> Result<ApiResponse, Error> {
        let payload = self.requests().purchase(total, items, data_fields)?;
        self.send(&payload).await
    }

    /// Track a push open from the notification's userInfo.
    #[instrument(skip_all)]
    pub async fn track_push_open(
        &self,
        user_info: &UserInfo,
        data_fields: &DataFields,
    ) -> Result<ApiResponse, Error> {
        let payload = self.requests().push_open(user_info, data_fields)?;
        self.send(&payload).await
    }

    /// Track a push open from known campaign and template ids.
    #[instrument(skip(self, data_fields))]
    pub async fn track_push_open_by_ids(
        &self,
        campaign_id: i64,
        template_id: i64,
        app_already_running: bool,
        data_fields: &DataFields,
    ) -> Result<ApiResponse, Error> {
        let payload = self.requests().push_open_by_ids(
            campaign_id,
            template_id,
            app_already_running,
            data_fields,
        )?;
        self.send(&payload).await
    }

    /// Track a custom event.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use iterable::Iterable;
    /// # async fn example(client: &Iterable) -> Result<(), iterable::Error> {
    /// client.track("feature_used")
    ///     .data_field("feature", "export")
    ///     .send()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn track(&self, event_name: impl Into<String>) -> SendableTrack<'_> {
        SendableTrack {
            event_name: event_name.into(),
            data_fields: DataFields::new(),
            client: self,
        }
    }

    /// Deliver a prebuilt payload.
    pub async fn send(&self, payload: &EventPayload) -> Result<ApiResponse, Error> {
        self.transport.send(payload).await
    }
}

/// Sendable custom event builder.
#[derive(Debug)]
pub struct SendableTrack<'a> {
    event_name: String,
    data_fields: DataFields,
    client: &'a Iterable,
}

impl<'a> SendableTrack<'a> {
    /// Add a data field.
    pub fn data_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data_fields.insert(key.into(), value.into());
        self
    }

    /// Add several data fields.
    pub fn data_fields(mut self, fields: DataFields) -> Self {
        self.data_fields.extend(fields);
        self
    }

    /// Build the payload without sending it.
    pub fn build(&self) -> Result<EventPayload, Error> {
        self.client
            .requests()
            .custom_event(&self.event_name, &self.data_fields)
    }

    /// Send the event.
    #[instrument(skip(self), fields(event_name = %self.event_name))]
    pub async fn send(self) -> Result<ApiResponse, Error> {
        let payload = self.build()?;
        self.client.send(&payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> Iterable {
        Iterable::builder("key_123")
            .email("user@example.com")
            .build()
            .unwrap()
    }

    #[test]
    fn test_sendable_track_builds_payload() {
        let client = client();
        let payload = client
            .track("signup")
            .data_field("plan", "pro")
            .data_fields(DataFields::from([("seats".to_string(), json!(5))]))
            .build()
            .unwrap();

        assert_eq!(payload.get("eventName").unwrap(), "signup");
        assert_eq!(payload.get("plan").unwrap(), "pro");
        assert_eq!(payload.get("seats").unwrap(), 5);
        assert_eq!(payload.get("apiKey").unwrap(), "key_123");
    }

    #[test]
    fn test_sendable_track_empty_name_fails() {
        let client = client();
        assert!(matches!(
            client.track("").build(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_identity_shares_identity() {
        let identity = Arc::new(IdentityContext::create("key_123", "user@example.com").unwrap());
        let client = Iterable::from_identity(identity.clone(), Config::default()).unwrap();

        assert_eq!(client.identity(), identity.as_ref());
        assert_eq!(client.config().api_host(), crate::config::DEFAULT_API_HOST);
    }
}
