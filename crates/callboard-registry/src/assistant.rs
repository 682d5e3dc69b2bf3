//! Resolved assistant configuration.
//!
//! An `AssistantConfig` is the immutable snapshot taken from an
//! `AgentProfile` when a call starts: every optional profile knob is either
//! carried through or replaced by its documented default. The same snapshot
//! is sent inline to the web voice client and registered with the provider
//! for phone calls.

use callboard_types::{
    AgentProfile, FirstMessageMode, ModelConfig, TranscriberConfig, VoiceConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub(crate) const DEFAULT_NAME: &str = "Voice Assistant";
pub(crate) const DEFAULT_FIRST_MESSAGE: &str =
    "Hello! I am your AI assistant. How can I help you today?";
pub(crate) const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and friendly AI assistant. \
     Be conversational and engaging while helping users with their queries.";
pub(crate) const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_SILENCE_TIMEOUT_SECONDS: u32 = 30;
const DEFAULT_RESPONSE_DELAY_SECONDS: f32 = 0.4;
const DEFAULT_INTERRUPTION_THRESHOLD: u32 = 2;
const DEFAULT_MAX_DURATION_SECONDS: u32 = 600;
const DEFAULT_END_CALL_PHRASES: &[&str] = &["goodbye", "bye", "end call", "hang up"];
const TRANSCRIBER_KEYS: &[&str] = &[
    "provider",
    "model",
    "language",
    "smartFormat",
    "languageDetectionEnabled",
    "keywords",
    "endpointing",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub name: String,
    pub first_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message_mode: Option<FirstMessageMode>,
    pub system_prompt: String,
    pub model: ModelConfig,
    pub voice: VoiceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcriber: Option<TranscriberConfig>,
    pub silence_timeout_seconds: u32,
    pub response_delay_seconds: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_request_delay_seconds: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruptions_enabled: Option<bool>,
    /// Words the caller must speak before the assistant yields the turn.
    pub interruption_threshold: u32,
    pub end_call_phrases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_call_message: Option<String>,
    pub max_duration_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_sound: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            first_message: DEFAULT_FIRST_MESSAGE.to_string(),
            first_message_mode: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: ModelConfig {
                provider: "openai".to_string(),
                model: "gpt-3.5-turbo".to_string(),
                temperature: Some(DEFAULT_TEMPERATURE),
                ..ModelConfig::default()
            },
            voice: VoiceConfig {
                provider: "11labs".to_string(),
                voice_id: "rachel".to_string(),
                ..VoiceConfig::default()
            },
            transcriber: None,
            silence_timeout_seconds: DEFAULT_SILENCE_TIMEOUT_SECONDS,
            response_delay_seconds: DEFAULT_RESPONSE_DELAY_SECONDS,
            llm_request_delay_seconds: None,
            interruptions_enabled: None,
            interruption_threshold: DEFAULT_INTERRUPTION_THRESHOLD,
            end_call_phrases: DEFAULT_END_CALL_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            end_call_message: None,
            max_duration_seconds: DEFAULT_MAX_DURATION_SECONDS,
            background_sound: None,
        }
    }
}

impl AssistantConfig {
    /// Resolves a profile into a snapshot, filling unset knobs with defaults.
    pub fn from_profile(profile: &AgentProfile) -> Self {
        let defaults = Self::default();

        let non_empty = |value: &str, fallback: String| {
            if value.trim().is_empty() {
                fallback
            } else {
                value.to_string()
            }
        };

        let mut model = profile.model.clone();
        if model.temperature.is_none() {
            model.temperature = Some(profile.temperature.unwrap_or(DEFAULT_TEMPERATURE));
        }

        Self {
            name: non_empty(&profile.name, defaults.name),
            first_message: profile
                .first_message
                .clone()
                .unwrap_or(defaults.first_message),
            first_message_mode: profile.first_message_mode,
            system_prompt: non_empty(&profile.system_prompt, defaults.system_prompt),
            model,
            voice: profile.voice.clone(),
            transcriber: profile.transcriber.clone(),
            silence_timeout_seconds: defaults.silence_timeout_seconds,
            response_delay_seconds: profile
                .response_delay_seconds
                .unwrap_or(defaults.response_delay_seconds),
            llm_request_delay_seconds: profile.llm_request_delay_seconds,
            interruptions_enabled: profile.interruptions_enabled,
            interruption_threshold: profile
                .num_words_to_interrupt_assistant
                .unwrap_or(defaults.interruption_threshold),
            end_call_phrases: profile
                .end_call_phrases
                .clone()
                .unwrap_or(defaults.end_call_phrases),
            end_call_message: profile.end_call_message.clone(),
            max_duration_seconds: profile
                .max_duration_seconds
                .unwrap_or(defaults.max_duration_seconds),
            background_sound: profile.background_sound.clone(),
        }
    }

    /// Builds the provider's assistant object: the system prompt travels as
    /// the first model message, and unset optional knobs are omitted.
    pub fn provider_payload(&self) -> Value {
        let mut model = Map::new();
        model.insert("provider".into(), json!(self.model.provider));
        model.insert("model".into(), json!(self.model.model));
        if let Some(t) = self.model.temperature {
            model.insert("temperature".into(), json!(t));
        }
        if let Some(max) = self.model.max_tokens {
            model.insert("maxTokens".into(), json!(max));
        }
        if self.model.emotion_recognition_enabled == Some(true) {
            model.insert("emotionRecognitionEnabled".into(), json!(true));
        }
        if let Some(fallbacks) = self.model.fallback_models.as_ref().filter(|f| !f.is_empty()) {
            model.insert("fallbackModels".into(), json!(fallbacks));
        }
        model.insert(
            "messages".into(),
            json!([{ "role": "system", "content": self.system_prompt }]),
        );

        let mut voice = Map::new();
        voice.insert("provider".into(), json!(self.voice.provider));
        voice.insert("voiceId".into(), json!(self.voice.voice_id));
        let tuning = [
            ("speed", self.voice.speed),
            ("pitch", self.voice.pitch),
            ("stability", self.voice.stability),
            ("similarityBoost", self.voice.similarity_boost),
            ("style", self.voice.style),
        ];
        for (key, value) in tuning {
            if let Some(value) = value {
                voice.insert(key.into(), json!(value));
            }
        }
        if let Some(boost) = self.voice.use_speaker_boost {
            voice.insert("useSpeakerBoost".into(), json!(boost));
        }

        let mut payload = Map::new();
        payload.insert("name".into(), json!(self.name));
        payload.insert("firstMessage".into(), json!(self.first_message));
        if let Some(mode) = self.first_message_mode {
            payload.insert("firstMessageMode".into(), json!(mode));
        }
        payload.insert("model".into(), Value::Object(model));
        payload.insert("voice".into(), Value::Object(voice));
        if let Some(transcriber) = &self.transcriber {
            let mut transcriber = serde_json::to_value(transcriber).unwrap_or(Value::Null);
            if let Value::Object(fields) = &mut transcriber {
                // Keys this build does not model stay in storage only.
                fields.retain(|key, _| TRANSCRIBER_KEYS.contains(&key.as_str()));
            }
            payload.insert("transcriber".into(), transcriber);
        }
        payload.insert(
            "silenceTimeoutSeconds".into(),
            json!(self.silence_timeout_seconds),
        );
        payload.insert(
            "responseDelaySeconds".into(),
            json!(self.response_delay_seconds),
        );
        if let Some(delay) = self.llm_request_delay_seconds {
            payload.insert("llmRequestDelaySeconds".into(), json!(delay));
        }
        if let Some(enabled) = self.interruptions_enabled {
            payload.insert("interruptionsEnabled".into(), json!(enabled));
        }
        payload.insert(
            "numWordsToInterruptAssistant".into(),
            json!(self.interruption_threshold),
        );
        payload.insert("endCallPhrases".into(), json!(self.end_call_phrases));
        if let Some(message) = &self.end_call_message {
            payload.insert("endCallMessage".into(), json!(message));
        }
        payload.insert("maxDurationSeconds".into(), json!(self.max_duration_seconds));
        if let Some(sound) = &self.background_sound {
            payload.insert("backgroundSound".into(), json!(sound));
        }

        Value::Object(payload)
    }
}
