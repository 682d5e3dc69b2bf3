//! Client configuration and provider diagnostics.

use crate::api::ApiError;
use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use callboard_registry::RegistryError;
use callboard_types::ErrorClass;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub public_key: String,
    pub provider_mode: &'static str,
}

/// Handler for `GET /client-config`: the credential the browser-side voice
/// client authenticates with.
pub async fn client_config_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ClientConfigResponse>, ApiError> {
    let public_key = state.public_key.clone().ok_or_else(|| {
        ApiError::NotConfigured(
            "The voice provider public key is not configured. Set VAPI_PUBLIC_KEY.".to_string(),
        )
    })?;

    Ok(Json(ClientConfigResponse {
        public_key,
        provider_mode: state.provider_mode.as_str(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl CheckResult {
    fn from_result<T>(result: Result<Vec<T>, RegistryError>) -> Self {
        match result {
            Ok(items) => Self {
                success: true,
                count: Some(items.len()),
                error: None,
                status_code: None,
            },
            Err(e) => Self {
                success: false,
                count: None,
                status_code: match &e {
                    RegistryError::Rejected { status, .. } => Some(*status),
                    _ => None,
                },
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub assistants_list: CheckResult,
    pub phone_numbers_list: CheckResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsResponse {
    pub api_key_present: bool,
    pub public_key_present: bool,
    pub api_key_length: usize,
    pub public_key_length: usize,
    pub provider_mode: &'static str,
    pub test_results: TestResults,
    pub overall_status: &'static str,
    pub timestamp: String,
}

/// Handler for `GET /diagnostics`.
///
/// Reports which credentials are present and checks the registry. Without a
/// server credential in HTTP mode nothing is checked and the response is a
/// configuration error carrying the credential summary.
pub async fn diagnostics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let key_len = |key: &Option<String>| key.as_ref().map_or(0, String::len);
    let api_key_present = state.api_key.is_some();
    let public_key_present = state.public_key.is_some();

    if !api_key_present && state.provider_mode == crate::config::ProviderMode::Http {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "apiKeyPresent": false,
                "publicKeyPresent": public_key_present,
                "apiKeyLength": 0,
                "publicKeyLength": key_len(&state.public_key),
                "testResults": {},
                "error": "VAPI_API_KEY not configured",
                "code": ErrorClass::Configuration.as_str(),
            })),
        )
            .into_response();
    }

    let assistants_list = CheckResult::from_result(state.registry.list_assistants(1).await);
    let phone_numbers_list = CheckResult::from_result(state.registry.list_caller_numbers().await);
    let all_passed = assistants_list.success && phone_numbers_list.success;

    if !all_passed {
        tracing::warn!("provider diagnostics reported failures");
    }

    Json(DiagnosticsResponse {
        api_key_present,
        public_key_present,
        api_key_length: key_len(&state.api_key),
        public_key_length: key_len(&state.public_key),
        provider_mode: state.provider_mode.as_str(),
        test_results: TestResults {
            assistants_list,
            phone_numbers_list,
        },
        overall_status: if all_passed {
            "All tests passed"
        } else {
            "Some tests failed"
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
    .into_response()
}
