//! Callboard server library logic.

pub mod api;
pub mod api_agents;
pub mod api_assistants;
pub mod api_calls;
pub mod api_diagnostics;
pub mod api_phone_numbers;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use callboard_db::DbPool;
use callboard_registry::AssistantRegistry;
use config::ProviderMode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool holding the profile store.
    pub pool: DbPool,
    /// Provider-side registry of assistants, numbers and calls.
    pub registry: Arc<dyn AssistantRegistry>,
    pub provider_mode: ProviderMode,
    /// Server-side credential, used only for diagnostics reporting.
    pub api_key: Option<String>,
    /// Client-exposed credential served by `/client-config`.
    pub public_key: Option<String>,
}

/// Maximum request body size (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/assistants", post(api_assistants::create_assistant_handler))
        .route("/calls", post(api_calls::create_call_handler))
        .route("/calls/end", post(api_calls::end_call_handler))
        .route("/calls/{call_id}", delete(api_calls::delete_call_handler))
        .route(
            "/phone-numbers",
            get(api_phone_numbers::list_phone_numbers_handler),
        )
        .route(
            "/agents",
            get(api_agents::list_agents_handler).post(api_agents::create_agent_handler),
        )
        .route(
            "/agents/{agent_id}",
            get(api_agents::get_agent_handler)
                .put(api_agents::replace_agent_handler)
                .delete(api_agents::delete_agent_handler),
        )
        .route(
            "/agents/{agent_id}/duplicate",
            post(api_agents::duplicate_agent_handler),
        )
        .route("/templates", get(api_agents::list_templates_handler))
        .route(
            "/templates/{template_id}/agents",
            post(api_agents::instantiate_template_handler),
        )
        .route("/catalog", get(api_agents::catalog_handler))
        .route(
            "/client-config",
            get(api_diagnostics::client_config_handler),
        )
        .route("/diagnostics", get(api_diagnostics::diagnostics_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use callboard_db::{create_pool, DbRuntimeSettings};
    use callboard_registry::FakeRegistry;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_check_returns_ok() {
        let pool = create_pool(":memory:", DbRuntimeSettings::default()).unwrap();
        let app = app(AppState {
            pool,
            registry: Arc::new(FakeRegistry::new()),
            provider_mode: ProviderMode::Fake,
            api_key: None,
            public_key: None,
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
