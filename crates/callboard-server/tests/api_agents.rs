use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use callboard_db::{create_pool, DbRuntimeSettings};
use callboard_registry::FakeRegistry;
use callboard_server::config::ProviderMode;
use callboard_server::{app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

fn setup() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.db");

    let pool = create_pool(path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        callboard_db::run_migrations(&conn).unwrap();
    }
    let app = app(AppState {
        pool,
        registry: Arc::new(FakeRegistry::new()),
        provider_mode: ProviderMode::Fake,
        api_key: None,
        public_key: None,
    });
    (app, dir)
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

fn scheduler() -> Value {
    json!({
        "name": "Clinic Scheduler",
        "description": "Books dental appointments",
        "systemPrompt": "You schedule appointments.",
        "firstMessage": "Hi! Want to book a cleaning?",
        "model": { "provider": "openai", "model": "gpt-4o-mini", "temperature": 0.4 },
        "voice": { "provider": "vapi", "voiceId": "Paige" },
        "maxDurationSeconds": 300
    })
}

#[tokio::test]
async fn first_listing_is_seeded_from_templates() {
    let (app, _dir) = setup();
    let (status, body) = send(&app, "GET", "/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let names: Vec<_> = body["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "Customer Support Agent",
            "Technical Support Specialist",
            "Sales Representative"
        ]
    );
}

#[tokio::test]
async fn create_get_replace_delete() {
    let (app, _dir) = setup();

    let (status, created) = send(&app, "POST", "/agents", Some(scheduler())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["agent"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("agent-"));
    assert!(created["agent"]["createdAt"].is_string());

    let (status, fetched) = send(&app, "GET", &format!("/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["agent"]["voice"]["voiceId"], "Paige");
    assert_eq!(fetched["agent"]["maxDurationSeconds"], 300);

    let mut edited = scheduler();
    edited["name"] = json!("Clinic Scheduler v2");
    edited["id"] = json!("ignored");
    let (status, replaced) = send(&app, "PUT", &format!("/agents/{id}"), Some(edited)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["agent"]["id"], id.as_str());
    assert_eq!(replaced["agent"]["name"], "Clinic Scheduler v2");
    assert_eq!(replaced["agent"]["createdAt"], created["agent"]["createdAt"]);

    let (status, _) = send(&app, "DELETE", &format!("/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn invalid_profile_is_rejected() {
    let (app, _dir) = setup();
    let mut profile = scheduler();
    profile["systemPrompt"] = json!("  ");

    let (status, body) = send(&app, "POST", "/agents", Some(profile)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "system prompt is required");

    let mut profile = scheduler();
    profile["voice"]["speed"] = json!(3.0);
    let (status, _) = send(&app, "POST", "/agents", Some(profile)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_appends_copy_suffix() {
    let (app, _dir) = setup();
    let (_, created) = send(&app, "POST", "/agents", Some(scheduler())).await;
    let id = created["agent"]["id"].as_str().unwrap();

    let (status, copy) = send(&app, "POST", &format!("/agents/{id}/duplicate"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["agent"]["name"], "Clinic Scheduler (Copy)");
    assert_ne!(copy["agent"]["id"], created["agent"]["id"]);
    assert_eq!(copy["agent"]["systemPrompt"], "You schedule appointments.");

    let (status, _) = send(&app, "POST", "/agents/agent-missing/duplicate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_name_and_description() {
    let (app, _dir) = setup();
    send(&app, "POST", "/agents", Some(scheduler())).await;

    let (_, body) = send(&app, "GET", "/agents?q=DENTAL", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["agents"][0]["name"], "Clinic Scheduler");

    let (_, body) = send(&app, "GET", "/agents?q=support", None).await;
    assert_eq!(body["count"], 2);

    let (_, body) = send(&app, "GET", "/agents?q=%20", None).await;
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn templates_filter_by_category() {
    let (app, _dir) = setup();

    let (status, body) = send(&app, "GET", "/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["templates"].as_array().unwrap().len(), 8);

    let (_, body) = send(&app, "GET", "/templates?category=sales", None).await;
    let ids: Vec<_> = body["templates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["sales-representative", "appointment-scheduler"]);

    let (status, body) = send(&app, "GET", "/templates?category=gardening", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn template_instantiates_into_a_profile() {
    let (app, _dir) = setup();

    let (status, body) = send(&app, "POST", "/templates/tutor/agents", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["agent"]["id"].as_str().unwrap().to_string();

    let (_, listing) = send(&app, "GET", "/agents", None).await;
    assert_eq!(listing["count"], 4);
    assert!(listing["agents"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == id.as_str()));

    let (status, _) = send(&app, "POST", "/templates/astronaut/agents", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_lists_voices_and_models_by_provider() {
    let (app, _dir) = setup();
    let (status, body) = send(&app, "GET", "/catalog", None).await;
    assert_eq!(status, StatusCode::OK);

    for provider in ["vapi", "11labs", "openai"] {
        assert!(!body["voices"][provider].as_array().unwrap().is_empty());
    }
    for provider in ["openai", "anthropic", "google", "groq"] {
        assert!(!body["models"][provider].as_array().unwrap().is_empty());
    }
    assert_eq!(body["models"]["groq"][1]["id"], "mixtral-8x7b-32768");
}
