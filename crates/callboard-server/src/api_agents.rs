//! Agent profile CRUD, the template catalog, and voice/model options.

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path, Query},
    http::StatusCode,
};
use callboard_agents::{
    create_from_template, create_profile, delete_profile, duplicate_profile, get_profile,
    list_profiles, model_options, replace_profile, templates, templates_in, voice_options,
    ModelOption, VoiceOption,
};
use callboard_types::{AgentCategory, AgentProfile, AgentTemplate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ListAgentsQuery {
    /// Case-insensitive search over name and description.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentProfile>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub agent: AgentProfile,
}

/// Handler for `GET /agents`.
pub async fn list_agents_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ListAgentsQuery>,
) -> Result<Json<AgentsResponse>, ApiError> {
    let agents = with_conn(&state, move |conn| {
        Ok(list_profiles(conn, query.q.as_deref())?)
    })
    .await?;

    Ok(Json(AgentsResponse {
        count: agents.len(),
        agents,
    }))
}

/// Handler for `GET /agents/{agent_id}`.
pub async fn get_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<Json<AgentResponse>, ApiError> {
    let agent = with_conn(&state, move |conn| Ok(get_profile(conn, &agent_id)?)).await?;
    Ok(Json(AgentResponse { agent }))
}

/// Handler for `POST /agents`.
pub async fn create_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AgentProfile>, JsonRejection>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiError> {
    let Json(profile) = payload?;
    let agent = with_conn(&state, move |conn| Ok(create_profile(conn, profile)?)).await?;
    Ok((StatusCode::CREATED, Json(AgentResponse { agent })))
}

/// Handler for `PUT /agents/{agent_id}`. The body replaces the whole profile.
pub async fn replace_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(agent_id): Path<String>,
    payload: Result<Json<AgentProfile>, JsonRejection>,
) -> Result<Json<AgentResponse>, ApiError> {
    let Json(profile) = payload?;
    let agent = with_conn(&state, move |conn| {
        Ok(replace_profile(conn, &agent_id, profile)?)
    })
    .await?;
    Ok(Json(AgentResponse { agent }))
}

/// Handler for `DELETE /agents/{agent_id}`.
pub async fn delete_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_conn(&state, move |conn| Ok(delete_profile(conn, &agent_id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `POST /agents/{agent_id}/duplicate`.
pub async fn duplicate_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiError> {
    let agent = with_conn(&state, move |conn| Ok(duplicate_profile(conn, &agent_id)?)).await?;
    Ok((StatusCode::CREATED, Json(AgentResponse { agent })))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTemplatesQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<AgentTemplate>,
}

/// Handler for `GET /templates`.
pub async fn list_templates_handler(
    Query(query): Query<ListTemplatesQuery>,
) -> Result<Json<TemplatesResponse>, ApiError> {
    let templates: Vec<AgentTemplate> = match query.category.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let category: AgentCategory = raw.trim().parse().map_err(ApiError::BadRequest)?;
            templates_in(category).cloned().collect()
        }
        _ => templates().to_vec(),
    };
    Ok(Json(TemplatesResponse { templates }))
}

/// Handler for `POST /templates/{template_id}/agents`.
pub async fn instantiate_template_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(template_id): Path<String>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiError> {
    let agent = with_conn(&state, move |conn| {
        Ok(create_from_template(conn, &template_id)?)
    })
    .await?;
    tracing::info!(agent_id = %agent.id, "agent created from template");
    Ok((StatusCode::CREATED, Json(AgentResponse { agent })))
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub voices: BTreeMap<&'static str, &'static [VoiceOption]>,
    pub models: BTreeMap<&'static str, &'static [ModelOption]>,
}

/// Handler for `GET /catalog`.
pub async fn catalog_handler() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        voices: voice_options().iter().copied().collect(),
        models: model_options().iter().copied().collect(),
    })
}
