//! Agent profile definitions.
//!
//! An `AgentProfile` is the persisted bundle of conversational-agent
//! configuration: who the agent is, how it opens the conversation, which
//! language model and voice it uses, and how turn taking and termination
//! behave. Profiles are stored as a JSON array without schema versioning, so
//! every optional field deserializes from a missing key, and keys this build
//! does not know are carried in `extra` so a rewrite keeps them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// How the assistant opens the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirstMessageMode {
    /// The assistant speaks `first_message` as soon as the call connects.
    AssistantSpeaksFirst,
    /// The assistant stays silent until the caller speaks.
    AssistantWaitsForUser,
    /// The assistant opens with a message generated by the model.
    AssistantSpeaksFirstWithModelGeneratedMessage,
}

/// Language-model policy for an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// Provider slug, e.g. `openai`, `anthropic`, `groq`.
    pub provider: String,
    /// Provider-specific model id.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_recognition_enabled: Option<bool>,
    /// Model ids the provider may fall back to, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_models: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: Some(0.7),
            max_tokens: None,
            emotion_recognition_enabled: None,
            fallback_models: None,
            extra: Map::new(),
        }
    }
}

/// Voice policy for an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Provider slug, e.g. `vapi`, `11labs`, `openai`.
    pub provider: String,
    /// Provider-specific voice id.
    pub voice_id: String,
    /// Speech speed multiplier (1.0 is normal).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,

    // ElevenLabs tuning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_boost: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_speaker_boost: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            provider: "vapi".to_string(),
            voice_id: "Elliot".to_string(),
            speed: None,
            pitch: None,
            stability: None,
            similarity_boost: None,
            style: None,
            use_speaker_boost: None,
            extra: Map::new(),
        }
    }
}

/// Speech-to-text policy for an agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriberConfig {
    /// Provider slug, e.g. `deepgram`.
    #[serde(default)]
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_format: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_detection_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Silence, in milliseconds, that ends the caller's turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpointing: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A saved, reusable bundle of agent configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    /// Opaque identifier assigned by the profile store.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message_mode: Option<FirstMessageMode>,

    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcriber: Option<TranscriberConfig>,
    /// Profile-level temperature, used when the model sets none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruptions_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_delay_seconds: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_request_delay_seconds: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_words_to_interrupt_assistant: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_call_phrases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_call_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_seconds: Option<u32>,

    /// Ambient sound played behind the assistant (`off`, `office`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_sound: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reasons a profile is rejected before it is stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileValidationError {
    #[error("agent name is required")]
    MissingName,
    #[error("system prompt is required")]
    MissingSystemPrompt,
    #[error("model provider and model id are required")]
    MissingModel,
    #[error("voice provider and voice id are required")]
    MissingVoice,
    #[error("temperature must be between 0 and 2, got {0}")]
    TemperatureOutOfRange(f32),
    #[error("voice speed must be between 0.5 and 2, got {0}")]
    SpeedOutOfRange(f32),
    #[error("max duration must be positive")]
    ZeroMaxDuration,
}

impl AgentProfile {
    /// Checks the fields the form marks as required and the numeric ranges
    /// the provider accepts.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::MissingName);
        }
        if self.system_prompt.trim().is_empty() {
            return Err(ProfileValidationError::MissingSystemPrompt);
        }
        if self.model.provider.trim().is_empty() || self.model.model.trim().is_empty() {
            return Err(ProfileValidationError::MissingModel);
        }
        if self.voice.provider.trim().is_empty() || self.voice.voice_id.trim().is_empty() {
            return Err(ProfileValidationError::MissingVoice);
        }
        for t in [self.model.temperature, self.temperature].into_iter().flatten() {
            if !(0.0..=2.0).contains(&t) {
                return Err(ProfileValidationError::TemperatureOutOfRange(t));
            }
        }
        if let Some(s) = self.voice.speed {
            if !(0.5..=2.0).contains(&s) {
                return Err(ProfileValidationError::SpeedOutOfRange(s));
            }
        }
        if self.max_duration_seconds == Some(0) {
            return Err(ProfileValidationError::ZeroMaxDuration);
        }
        Ok(())
    }

    /// Returns `true` if the name or description contains `needle`,
    /// ignoring case.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Template grouping shown in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentCategory {
    CustomerService,
    Sales,
    Healthcare,
    Education,
    Personal,
    Business,
}

impl AgentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomerService => "customer-service",
            Self::Sales => "sales",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Personal => "personal",
            Self::Business => "business",
        }
    }
}

impl std::str::FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer-service" => Ok(Self::CustomerService),
            "sales" => Ok(Self::Sales),
            "healthcare" => Ok(Self::Healthcare),
            "education" => Ok(Self::Education),
            "personal" => Ok(Self::Personal),
            "business" => Ok(Self::Business),
            other => Err(format!("unknown agent category: {other}")),
        }
    }
}

/// A preset profile users can clone into their own list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AgentCategory,
    /// Profile fields applied when the template is cloned. `id` and the
    /// timestamps are left empty.
    pub config: AgentProfile,
}
