//! Shared API plumbing: the error type and blocking database access.

use crate::AppState;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use callboard_agents::AgentStoreError;
use callboard_registry::{Rejection, RegistryError};
use callboard_types::ErrorClass;
use rusqlite::Connection;
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Every response body is `{"error": <message>, "code": <tag>}` where the tag
/// is an [`ErrorClass`] string, or `internal_error` for local faults.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error(transparent)]
    Provider(#[from] RegistryError),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotConfigured(_) | ApiError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Provider(e) => match e {
                RegistryError::Rejected { kind, .. } => match kind {
                    Rejection::BadRequest => StatusCode::BAD_REQUEST,
                    Rejection::Unauthorized => StatusCode::UNAUTHORIZED,
                    Rejection::InsufficientCredits => StatusCode::PAYMENT_REQUIRED,
                    Rejection::NotFound => StatusCode::NOT_FOUND,
                    Rejection::Other => StatusCode::INTERNAL_SERVER_ERROR,
                },
                RegistryError::NotConfigured
                | RegistryError::Transport(_)
                | RegistryError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            ApiError::BadRequest(_) | ApiError::NotFound(_) => Some(ErrorClass::Validation),
            ApiError::NotConfigured(_) => Some(ErrorClass::Configuration),
            ApiError::Provider(e) => Some(e.class()),
            ApiError::InternalServerError(_) => None,
        }
    }

    pub fn code(&self) -> &'static str {
        self.class().map_or("internal_error", ErrorClass::as_str)
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::NotConfigured(msg)
            | ApiError::InternalServerError(msg) => msg.clone(),
            ApiError::Provider(e) => e.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
        }

        let body = Json(serde_json::json!({
            "error": self.message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AgentStoreError> for ApiError {
    fn from(e: AgentStoreError) -> Self {
        match &e {
            AgentStoreError::NotFound(id) => ApiError::NotFound(format!("agent {id}")),
            AgentStoreError::TemplateNotFound(id) => {
                ApiError::NotFound(format!("template {id}"))
            }
            AgentStoreError::Invalid(reason) => ApiError::BadRequest(reason.to_string()),
            AgentStoreError::Database(_) | AgentStoreError::Corrupt(_) => {
                ApiError::InternalServerError(e.to_string())
            }
        }
    }
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub(crate) async fn with_conn<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {e}")))?;
        f(&conn)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {e}")))?
}
