//! Tests to verify payload JSON matches what the Iterable API expects.

use iterable::types::keys;
use iterable::{
    CommerceItem, DataFields, Endpoint, IdentityContext, PushServicePlatform, RESERVED_KEYS,
};
use serde_json::json;

fn identity() -> IdentityContext {
    IdentityContext::create("key_test", "user@test.com").unwrap()
}

#[test]
fn test_custom_event_json_structure() {
    let identity = identity();
    let data = DataFields::from([("sku".to_string(), json!("A1"))]);
    let payload = identity
        .requests()
        .custom_event("purchase_complete", &data)
        .unwrap();

    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(
        json,
        json!({
            "endpoint": "events/track",
            "body": {
                "apiKey": "key_test",
                "email": "user@test.com",
                "eventName": "purchase_complete",
                "sku": "A1"
            }
        })
    );
}

#[test]
fn test_token_registration_json_structure() {
    let identity = identity();
    let payload = identity
        .requests()
        .token_registration(b"\x01\xff", "MyApp", PushServicePlatform::Production)
        .unwrap();

    assert_eq!(payload.endpoint, Endpoint::RegisterDeviceToken);
    assert_eq!(
        serde_json::Value::Object(payload.body),
        json!({
            "apiKey": "key_test",
            "email": "user@test.com",
            "token": "01ff",
            "applicationName": "MyApp",
            "platform": "Production"
        })
    );
}

#[test]
fn test_purchase_json_structure() {
    let identity = identity();
    let items = [
        CommerceItem::new("sku-1", "Mug", 12.5, 2),
        CommerceItem::new("sku-2", "Tea", 3.0, 1),
    ];
    let payload = identity
        .requests()
        .purchase(28.0, &items, &DataFields::new())
        .unwrap();

    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["endpoint"], "commerce/trackPurchase");
    assert_eq!(json["body"]["total"], 28.0);
    assert_eq!(
        json["body"]["items"],
        json!([
            {"id": "sku-1", "name": "Mug", "price": 12.5, "quantity": 2},
            {"id": "sku-2", "name": "Tea", "price": 3.0, "quantity": 1}
        ])
    );
}

#[test]
fn test_push_open_json_structure() {
    let identity = identity();
    let payload = identity
        .requests()
        .push_open_by_ids(5, 6, true, &DataFields::new())
        .unwrap();

    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["endpoint"], "events/trackPushOpen");
    assert_eq!(json["body"]["campaignId"], 5);
    assert_eq!(json["body"]["templateId"], 6);
    assert_eq!(json["body"]["appAlreadyRunning"], true);
}

#[test]
fn test_every_reserved_key_is_rejected() {
    let identity = identity();

    for key in RESERVED_KEYS {
        let data = DataFields::from([(key.to_string(), json!("x"))]);
        assert!(
            identity.requests().custom_event("event", &data).is_err(),
            "{} should be rejected",
            key
        );
    }
}

#[test]
fn test_body_keys_are_camel_case() {
    assert_eq!(keys::APPLICATION_NAME, "applicationName");
    assert_eq!(keys::APP_ALREADY_RUNNING, "appAlreadyRunning");
    assert!(RESERVED_KEYS.iter().all(|k| !k.contains('_')));
}
