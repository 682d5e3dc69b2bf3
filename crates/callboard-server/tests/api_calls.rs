use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use callboard_db::{create_pool, DbRuntimeSettings};
use callboard_registry::{FakeRegistry, RegistryError};
use callboard_server::config::ProviderMode;
use callboard_server::{app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

fn setup(registry: Arc<FakeRegistry>) -> Router {
    let pool = create_pool(":memory:", DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        callboard_db::run_migrations(&conn).unwrap();
    }
    app(AppState {
        pool,
        registry,
        provider_mode: ProviderMode::Fake,
        api_key: Some("sk-test".to_string()),
        public_key: Some("pk-test".to_string()),
    })
}

fn registry() -> Arc<FakeRegistry> {
    Arc::new(
        FakeRegistry::new()
            .with_caller_number("pn-1", "+15550001111", "active")
            .with_caller_number("pn-2", "+15550002222", "released")
            .with_caller_number("pn-3", "+15550003333", "pending"),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn create_assistant_applies_defaults() {
    let registry = registry();
    let app = setup(registry.clone());

    let (status, body) = send(&app, "POST", "/assistants", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["assistant"]["id"].as_str().unwrap().starts_with("asst-"));
    assert_eq!(body["assistant"]["name"], "Voice Assistant");

    let configs = registry.registered_configs();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].model.model, "gpt-3.5-turbo");
    assert_eq!(configs[0].voice.voice_id, "rachel");
    assert_eq!(configs[0].silence_timeout_seconds, 30);
    assert_eq!(configs[0].interruption_threshold, 2);
    assert_eq!(configs[0].max_duration_seconds, 600);
}

#[tokio::test]
async fn create_assistant_with_overrides() {
    let registry = registry();
    let app = setup(registry.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/assistants",
        Some(json!({
            "name": "Billing",
            "systemPrompt": "Answer billing questions.",
            "model": { "provider": "anthropic", "model": "claude-3-haiku-20240307" },
            "voice": { "provider": "vapi", "voiceId": "Savannah" },
            "maxDurationSeconds": 300
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let config = &registry.registered_configs()[0];
    assert_eq!(config.name, "Billing");
    assert_eq!(config.model.provider, "anthropic");
    assert_eq!(config.model.temperature, Some(0.7));
    assert_eq!(config.voice.voice_id, "Savannah");
    assert_eq!(config.max_duration_seconds, 300);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = setup(registry());
    let request = Request::builder()
        .method("POST")
        .uri("/assistants")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn provider_failure_on_assistant_creation() {
    let registry = registry();
    registry.fail_create_assistant_with(RegistryError::rejected(401, "Invalid Key"));
    let app = setup(registry);

    let (status, body) = send(&app, "POST", "/assistants", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "provider_rejected");
}

#[tokio::test]
async fn web_call_is_created() {
    let registry = registry();
    let app = setup(registry.clone());

    let (status, body) = send(&app, "POST", "/calls", Some(json!({ "assistantId": "asst-1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "web");
    assert_eq!(body["call"]["assistantId"], "asst-1");
    assert!(body["call"].get("customer").is_none());
    assert_eq!(registry.calls().len(), 1);
}

#[tokio::test]
async fn outbound_call_is_created() {
    let app = setup(registry());
    let (status, body) = send(
        &app,
        "POST",
        "/calls",
        Some(json!({
            "assistantId": "asst-1",
            "phoneNumberId": "pn-1",
            "customerPhoneNumber": "+15551234567"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "outbound_phone");
    assert_eq!(body["call"]["phoneNumberId"], "pn-1");
    assert_eq!(body["call"]["customer"]["number"], "+15551234567");
}

#[tokio::test]
async fn call_validation_happens_before_the_provider() {
    let registry = registry();
    let app = setup(registry.clone());

    let cases = [
        json!({}),
        json!({ "assistantId": "" }),
        json!({ "assistantId": "asst-1", "customerPhoneNumber": "+15551234567" }),
        json!({ "assistantId": "asst-1", "phoneNumberId": "pn-1", "customerPhoneNumber": "555-1234" }),
        json!({ "assistantId": "asst-1", "phoneNumberId": "pn-1", "customerPhoneNumber": "+0123456789" }),
    ];
    for case in cases {
        let (status, body) = send(&app, "POST", "/calls", Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {case}");
        assert_eq!(body["code"], "validation_error");
        assert!(body["error"].is_string());
    }
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn insufficient_credits_maps_to_402() {
    let registry = registry();
    registry.fail_create_call_with(RegistryError::rejected(402, "Wallet balance is too low"));
    let app = setup(registry);

    let (status, body) = send(&app, "POST", "/calls", Some(json!({ "assistantId": "asst-1" }))).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "provider_rejected");
    assert!(body["error"].as_str().unwrap().contains("Insufficient credits"));
}

#[tokio::test]
async fn unknown_caller_number_maps_to_404() {
    let app = setup(registry());
    let (status, _) = send(
        &app,
        "POST",
        "/calls",
        Some(json!({
            "assistantId": "asst-1",
            "phoneNumberId": "pn-missing",
            "customerPhoneNumber": "+15551234567"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transport_failure_maps_to_500() {
    let registry = registry();
    registry.fail_create_call_with(RegistryError::Transport("connection reset".to_string()));
    let app = setup(registry);

    let (status, body) = send(&app, "POST", "/calls", Some(json!({ "assistantId": "asst-1" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "transport_error");
}

#[tokio::test]
async fn ending_a_call_is_idempotent() {
    let registry = registry();
    let app = setup(registry.clone());

    let (_, created) = send(&app, "POST", "/calls", Some(json!({ "assistantId": "asst-1" }))).await;
    let call_id = created["call"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/calls/{call_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["call"]["status"], "ended");

    let (status, body) = send(&app, "POST", "/calls/end", Some(json!({ "callId": call_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["call"]["id"], call_id.as_str());
    assert_eq!(body["call"]["status"], "ended");
}

#[tokio::test]
async fn end_call_requires_call_id() {
    let app = setup(registry());
    let (status, body) = send(&app, "POST", "/calls/end", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "callId is required");

    let (status, _) = send(&app, "DELETE", "/calls/call-unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn phone_numbers_lists_only_usable() {
    let app = setup(registry());
    let (status, body) = send(&app, "GET", "/phone-numbers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["hasPhoneNumbers"], true);
    let ids: Vec<_> = body["phoneNumbers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["pn-1", "pn-2"]);
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn provider_404_on_phone_numbers_is_empty_list() {
    let registry = registry();
    registry.fail_list_numbers_with(RegistryError::rejected(404, "Not Found"));
    let app = setup(registry);

    let (status, body) = send(&app, "GET", "/phone-numbers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["hasPhoneNumbers"], false);
    assert!(body["message"].as_str().unwrap().contains("No phone numbers"));
}

#[tokio::test]
async fn missing_credential_on_phone_numbers() {
    let registry = registry();
    registry.fail_list_numbers_with(RegistryError::NotConfigured);
    let app = setup(registry);

    let (status, body) = send(&app, "GET", "/phone-numbers", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "configuration_error");
}
