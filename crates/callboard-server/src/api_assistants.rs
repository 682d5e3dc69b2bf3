//! `POST /assistants`: registers an assistant with the provider.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{rejection::JsonRejection, Extension, Json};
use callboard_registry::{Assistant, AssistantConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInput {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInput {
    pub provider: Option<String>,
    pub voice_id: Option<String>,
}

/// Request body for assistant creation. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistantRequest {
    pub name: Option<String>,
    pub first_message: Option<String>,
    pub model: Option<ModelInput>,
    pub voice: Option<VoiceInput>,
    pub system_prompt: Option<String>,
    pub silence_timeout_seconds: Option<u32>,
    pub response_delay_seconds: Option<f32>,
    pub interruption_threshold: Option<u32>,
    pub end_call_phrases: Option<Vec<String>>,
    pub max_duration_seconds: Option<u32>,
}

impl CreateAssistantRequest {
    /// Overlays the request on the default assistant configuration.
    pub fn into_config(self) -> Result<AssistantConfig, ApiError> {
        let mut config = AssistantConfig::default();

        if let Some(name) = self.name.filter(|n| !n.trim().is_empty()) {
            config.name = name;
        }
        if let Some(message) = self.first_message {
            config.first_message = message;
        }
        if let Some(prompt) = self.system_prompt.filter(|p| !p.trim().is_empty()) {
            config.system_prompt = prompt;
        }
        if let Some(model) = self.model {
            if let Some(provider) = model.provider {
                config.model.provider = provider;
            }
            if let Some(id) = model.model {
                config.model.model = id;
            }
            if let Some(temperature) = model.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(ApiError::BadRequest(format!(
                        "temperature must be between 0 and 2, got {temperature}"
                    )));
                }
                config.model.temperature = Some(temperature);
            }
        }
        if let Some(voice) = self.voice {
            if let Some(provider) = voice.provider {
                config.voice.provider = provider;
            }
            if let Some(id) = voice.voice_id {
                config.voice.voice_id = id;
            }
        }
        if let Some(seconds) = self.silence_timeout_seconds {
            config.silence_timeout_seconds = seconds;
        }
        if let Some(delay) = self.response_delay_seconds {
            if delay < 0.0 {
                return Err(ApiError::BadRequest(
                    "responseDelaySeconds cannot be negative".to_string(),
                ));
            }
            config.response_delay_seconds = delay;
        }
        if let Some(words) = self.interruption_threshold {
            config.interruption_threshold = words;
        }
        if let Some(phrases) = self.end_call_phrases {
            config.end_call_phrases = phrases;
        }
        if let Some(max) = self.max_duration_seconds {
            if max == 0 {
                return Err(ApiError::BadRequest(
                    "maxDurationSeconds must be positive".to_string(),
                ));
            }
            config.max_duration_seconds = max;
        }

        Ok(config)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateAssistantResponse {
    pub assistant: Assistant,
}

/// Handler for `POST /assistants`.
pub async fn create_assistant_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<CreateAssistantRequest>, JsonRejection>,
) -> Result<Json<CreateAssistantResponse>, ApiError> {
    let Json(request) = payload?;
    let config = request.into_config()?;

    let assistant = state.registry.create_assistant(&config).await?;
    tracing::info!(assistant_id = %assistant.id, name = %config.name, "assistant created");

    Ok(Json(CreateAssistantResponse { assistant }))
}
