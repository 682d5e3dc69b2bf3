//! Drives `HttpRegistry` against a local stand-in for the provider API.

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use callboard_registry::{
    AssistantConfig, AssistantRegistry, CallRequest, HttpRegistry, HttpRegistryConfig, Rejection,
    RegistryError,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const KEY: &str = "test-private-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {KEY}"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid Key. Hot tip, you may be using the private key instead of the public key, or vice versa." })),
    )
}

fn mock_provider() -> Router {
    Router::new()
        .route(
            "/assistant",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "id": "asst-123",
                        "name": body["name"],
                        "firstMessage": body["firstMessage"],
                        "model": body["model"],
                        "orgId": "org-1",
                    })),
                )
            })
            .get(
                |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    let limit: usize = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
                    let all = vec![json!({ "id": "asst-a" }), json!({ "id": "asst-b" })];
                    (
                        StatusCode::OK,
                        Json(Value::Array(all.into_iter().take(limit).collect())),
                    )
                },
            ),
        )
        .route(
            "/phone-number",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                (
                    StatusCode::OK,
                    Json(json!([
                        { "id": "pn-1", "number": "+15550001111", "status": "active", "provider": "twilio" },
                        { "id": "pn-2", "number": "+15550002222", "status": "activating" }
                    ])),
                )
            }),
        )
        .route(
            "/call",
            post(|Json(body): Json<Value>| async move {
                if body["phoneNumberId"] == "pn-broke" {
                    return (
                        StatusCode::PAYMENT_REQUIRED,
                        Json(json!({ "message": "Wallet balance is too low" })),
                    );
                }
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "id": "call-1",
                        "assistantId": body["assistantId"],
                        "phoneNumberId": body["phoneNumberId"],
                        "customer": body["customer"],
                        "status": "queued",
                    })),
                )
            }),
        )
        .route(
            "/call/web",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "id": "call-web-1",
                    "assistantId": body["assistantId"],
                    "status": "queued",
                    "webCallUrl": "https://example.invalid/room",
                }))
            }),
        )
        .route(
            "/call/{id}",
            delete(|Path(id): Path<String>| async move {
                if id == "missing" {
                    return (
                        StatusCode::NOT_FOUND,
                        Json(json!({ "message": ["call not found"] })),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({ "id": id, "assistantId": "asst-1", "status": "in-progress" })),
                )
            }),
        )
}

async fn spawn_provider() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock_provider()).await.unwrap();
    });
    format!("http://{addr}")
}

fn registry(base_url: String, key: &str) -> HttpRegistry {
    HttpRegistry::new(HttpRegistryConfig {
        base_url,
        api_key: Some(key.to_string()),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn create_assistant_sends_resolved_config() {
    let registry = registry(spawn_provider().await, KEY);
    let config = AssistantConfig::default();

    let assistant = registry.create_assistant(&config).await.unwrap();
    assert_eq!(assistant.id, "asst-123");
    assert_eq!(assistant.name.as_deref(), Some("Voice Assistant"));
    assert_eq!(
        assistant.first_message.as_deref(),
        Some(config.first_message.as_str())
    );
}

#[tokio::test]
async fn list_assistants_honors_limit() {
    let registry = registry(spawn_provider().await, KEY);
    let assistants = registry.list_assistants(1).await.unwrap();
    assert_eq!(assistants.len(), 1);
    assert_eq!(assistants[0].id, "asst-a");
}

#[tokio::test]
async fn wrong_key_is_unauthorized() {
    let registry = registry(spawn_provider().await, "wrong-key");
    let err = registry.list_caller_numbers().await.unwrap_err();
    match err {
        RegistryError::Rejected { kind, status, .. } => {
            assert_eq!(kind, Rejection::Unauthorized);
            assert_eq!(status, 401);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn caller_numbers_keep_every_status() {
    let registry = registry(spawn_provider().await, KEY);
    let numbers = registry.list_caller_numbers().await.unwrap();
    assert_eq!(numbers.len(), 2);
    assert!(numbers[0].is_usable());
    assert!(!numbers[1].is_usable());

    let usable = callboard_registry::usable_caller_numbers(&registry).await.unwrap();
    assert_eq!(usable.len(), 1);
}

#[tokio::test]
async fn outbound_call_carries_customer_and_caller_id() {
    let registry = registry(spawn_provider().await, KEY);
    let call = registry
        .create_call(&CallRequest {
            assistant_id: "asst-1".to_string(),
            phone_number_id: Some("pn-1".to_string()),
            customer_number: Some("+15551234567".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(call.id, "call-1");
    assert_eq!(call.phone_number_id.as_deref(), Some("pn-1"));
    assert_eq!(
        call.customer.map(|c| c.number).as_deref(),
        Some("+15551234567")
    );
}

#[tokio::test]
async fn web_call_goes_to_web_endpoint() {
    let registry = registry(spawn_provider().await, KEY);
    let call = registry
        .create_call(&CallRequest {
            assistant_id: "asst-9".to_string(),
            ..CallRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(call.id, "call-web-1");
    assert_eq!(call.assistant_id, "asst-9");
}

#[tokio::test]
async fn insufficient_credits_keeps_provider_message() {
    let registry = registry(spawn_provider().await, KEY);
    let err = registry
        .create_call(&CallRequest {
            assistant_id: "asst-1".to_string(),
            phone_number_id: Some("pn-broke".to_string()),
            customer_number: Some("+15551234567".to_string()),
        })
        .await
        .unwrap_err();

    match &err {
        RegistryError::Rejected { kind, message, .. } => {
            assert_eq!(*kind, Rejection::InsufficientCredits);
            assert_eq!(message, "Wallet balance is too low");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_call_reports_ended() {
    let registry = registry(spawn_provider().await, KEY);
    let handle = registry.delete_call("call-1").await.unwrap();
    assert_eq!(handle.status, "ended");

    let err = registry.delete_call("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("call not found"));
}

#[tokio::test]
async fn unreachable_provider_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let registry = registry(format!("http://{addr}"), KEY);
    let err = registry.list_assistants(1).await.unwrap_err();
    assert!(matches!(err, RegistryError::Transport(_)));
}
