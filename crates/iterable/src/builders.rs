//! Request construction for each tracked operation.

use crate::identity::IdentityContext;
use crate::types::{
    is_reserved_key, keys, CommerceItem, DataFields, Endpoint, EventPayload, PushServicePlatform,
    UserInfo,
};
use crate::Error;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Nested userInfo object carrying campaign metadata.
const PUSH_METADATA_KEY: &str = "itbl";

/// Builds normalized payloads for one identity.
///
/// Every body carries the API key and the user identity, the operation's own
/// fields, and the caller's data fields merged at the top level. Data fields
/// may not use a key from [`crate::RESERVED_KEYS`].
#[derive(Debug, Clone, Copy)]
pub struct EventRequestBuilder<'a> {
    identity: &'a IdentityContext,
}

impl<'a> EventRequestBuilder<'a> {
    pub fn new(identity: &'a IdentityContext) -> Self {
        Self { identity }
    }

    /// Register a device push token.
    ///
    /// The token is sent lowercase hex encoded.
    pub fn token_registration(
        &self,
        token: &[u8],
        app_name: &str,
        platform: PushServicePlatform,
    ) -> Result<EventPayload, Error> {
        if token.is_empty() {
            return Err(Error::invalid("token cannot be empty"));
        }
        if app_name.is_empty() {
            return Err(Error::invalid("app_name cannot be empty"));
        }

        let mut body = self.base_body();
        body.insert(keys::TOKEN.into(), json!(hex::encode(token)));
        body.insert(keys::APPLICATION_NAME.into(), json!(app_name));
        body.insert(keys::PLATFORM.into(), json!(platform));

        Ok(self.finish(Endpoint::RegisterDeviceToken, body))
    }

    /// Track a purchase of `items` totalling `total`.
    pub fn purchase(
        &self,
        total: f64,
        items: &[CommerceItem],
        data_fields: &DataFields,
    ) -> Result<EventPayload, Error> {
        if !total.is_finite() {
            return Err(Error::invalid("total must be a finite number"));
        }
        if total < 0.0 {
            return Err(Error::invalid(format!("total cannot be negative: {}", total)));
        }
        // -0.0 compares equal to zero but would serialize with its sign
        let total = if total == 0.0 { 0.0 } else { total };
        if let Some(item) = items.iter().find(|i| !i.price.is_finite()) {
            return Err(Error::invalid(format!(
                "price of item {} must be a finite number",
                item.id
            )));
        }

        let mut body = self.base_body();
        body.insert(keys::TOTAL.into(), json!(total));
        body.insert(keys::ITEMS.into(), serde_json::to_value(items)?);
        merge_data_fields(&mut body, data_fields)?;

        Ok(self.finish(Endpoint::TrackPurchase, body))
    }

    /// Track a push open from the notification's userInfo.
    ///
    /// Campaign and template ids are read from the `itbl` object when present,
    /// otherwise from the top level. Ids that are missing or not numbers are
    /// left out. Other top-level userInfo keys are carried along unless the
    /// caller's data fields set the same key.
    pub fn push_open(
        &self,
        user_info: &UserInfo,
        data_fields: &DataFields,
    ) -> Result<EventPayload, Error> {
        let metadata = match user_info.get(PUSH_METADATA_KEY) {
            Some(Value::Object(m)) => m,
            _ => user_info,
        };

        let mut body = self.base_body();
        for key in [keys::CAMPAIGN_ID, keys::TEMPLATE_ID] {
            if let Some(id) = metadata.get(key).filter(|v| v.is_number()) {
                body.insert(key.into(), id.clone());
            }
        }
        merge_data_fields(&mut body, data_fields)?;

        for (key, value) in user_info {
            if key == PUSH_METADATA_KEY || is_reserved_key(key) || body.contains_key(key) {
                continue;
            }
            body.insert(key.clone(), value.clone());
        }

        Ok(self.finish(Endpoint::TrackPushOpen, body))
    }

    /// Track a push open from known campaign and template ids.
    pub fn push_open_by_ids(
        &self,
        campaign_id: i64,
        template_id: i64,
        app_already_running: bool,
        data_fields: &DataFields,
    ) -> Result<EventPayload, Error> {
        let mut body = self.base_body();
        body.insert(keys::CAMPAIGN_ID.into(), json!(campaign_id));
        body.insert(keys::TEMPLATE_ID.into(), json!(template_id));
        body.insert(keys::APP_ALREADY_RUNNING.into(), json!(app_already_running));
        merge_data_fields(&mut body, data_fields)?;

        Ok(self.finish(Endpoint::TrackPushOpen, body))
    }

    /// Track a custom event.
    pub fn custom_event(
        &self,
        event_name: &str,
        data_fields: &DataFields,
    ) -> Result<EventPayload, Error> {
        if event_name.is_empty() {
            return Err(Error::invalid("event_name cannot be empty"));
        }

        let mut body = self.base_body();
        body.insert(keys::EVENT_NAME.into(), json!(event_name));
        merge_data_fields(&mut body, data_fields)?;

        Ok(self.finish(Endpoint::Track, body))
    }

    fn base_body(&self) -> Map<String, Value> {
        let user = self.identity.user();
        let mut body = Map::new();
        body.insert(keys::API_KEY.into(), json!(self.identity.api_key()));
        body.insert(user.key().into(), json!(user.as_str()));
        body
    }

    fn finish(&self, endpoint: Endpoint, body: Map<String, Value>) -> EventPayload {
        debug!(endpoint = %endpoint, field_count = body.len(), "built payload");
        EventPayload { endpoint, body }
    }
}

fn merge_data_fields(body: &mut Map<String, Value>, data_fields: &DataFields) -> Result<(), Error> {
    if let Some(key) = data_fields.keys().find(|k| is_reserved_key(k)) {
        return Err(Error::invalid(format!(
            "data field `{}` collides with a reserved key",
            key
        )));
    }
    body.extend(data_fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(())
}
