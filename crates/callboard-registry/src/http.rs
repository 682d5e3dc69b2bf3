//! REST implementation of the registry.

use crate::assistant::AssistantConfig;
use crate::error::RegistryError;
use crate::registry::AssistantRegistry;
use crate::types::{Assistant, CallHandle, CallRequest, CallerNumber};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "https://api.vapi.ai";

#[derive(Clone)]
pub struct HttpRegistryConfig {
    pub base_url: String,
    /// Server-side bearer credential. `None` makes every call fail with
    /// `RegistryError::NotConfigured`.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for HttpRegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for HttpRegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRegistryConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRegistry {
    pub fn new(config: HttpRegistryConfig) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RegistryError::Transport(format!("failed to build HTTP client: {e}")))?;

        let api_key = config.api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("voice provider API key missing; registry calls will fail");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RegistryError> {
        let key = self.api_key.as_deref().ok_or(RegistryError::NotConfigured)?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, url).bearer_auth(key))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, RegistryError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            tracing::warn!(status = status.as_u16(), %message, "voice provider rejected request");
            return Err(RegistryError::rejected(status.as_u16(), message));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Extracts the `message` field from a provider error body. The provider
/// sends either a string or a list of validation strings.
fn provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    }
}

#[async_trait]
impl AssistantRegistry for HttpRegistry {
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<Assistant, RegistryError> {
        let builder = self
            .request(Method::POST, "/assistant")?
            .json(&config.provider_payload());
        let assistant: Assistant = self.send(builder).await?;
        tracing::info!(assistant_id = %assistant.id, "registered assistant with provider");
        Ok(assistant)
    }

    async fn list_assistants(&self, limit: usize) -> Result<Vec<Assistant>, RegistryError> {
        let builder = self
            .request(Method::GET, "/assistant")?
            .query(&[("limit", limit)]);
        self.send(builder).await
    }

    async fn list_caller_numbers(&self) -> Result<Vec<CallerNumber>, RegistryError> {
        let builder = self.request(Method::GET, "/phone-number")?;
        self.send(builder).await
    }

    async fn create_call(&self, request: &CallRequest) -> Result<CallHandle, RegistryError> {
        let builder = match &request.customer_number {
            Some(number) => {
                let mut body = json!({
                    "assistantId": request.assistant_id,
                    "customer": { "number": number },
                });
                if let Some(id) = &request.phone_number_id {
                    body["phoneNumberId"] = json!(id);
                }
                self.request(Method::POST, "/call")?.json(&body)
            }
            None => self
                .request(Method::POST, "/call/web")?
                .json(&json!({ "assistantId": request.assistant_id })),
        };

        let handle: CallHandle = self.send(builder).await?;
        tracing::info!(call_id = %handle.id, status = %handle.status, "provider created call");
        Ok(handle)
    }

    async fn delete_call(&self, call_id: &str) -> Result<CallHandle, RegistryError> {
        let builder = self.request(Method::DELETE, &format!("/call/{call_id}"))?;
        let mut handle: CallHandle = self.send(builder).await?;
        handle.status = "ended".to_string();
        Ok(handle)
    }
}
