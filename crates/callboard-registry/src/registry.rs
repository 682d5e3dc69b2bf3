use crate::assistant::AssistantConfig;
use crate::error::RegistryError;
use crate::types::{Assistant, CallHandle, CallRequest, CallerNumber};
use async_trait::async_trait;
use std::sync::Arc;

/// Provider-side catalog of assistants, phone numbers and calls.
#[async_trait]
pub trait AssistantRegistry: Send + Sync {
    /// Registers an assistant built from `config`.
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<Assistant, RegistryError>;

    /// Lists up to `limit` assistants. Used for connectivity diagnostics.
    async fn list_assistants(&self, limit: usize) -> Result<Vec<Assistant>, RegistryError>;

    /// Lists every phone number on the account, whatever its status.
    async fn list_caller_numbers(&self) -> Result<Vec<CallerNumber>, RegistryError>;

    async fn create_call(&self, request: &CallRequest) -> Result<CallHandle, RegistryError>;

    /// Ends a call. Ending an already-ended call succeeds.
    async fn delete_call(&self, call_id: &str) -> Result<CallHandle, RegistryError>;
}

#[async_trait]
impl<T: AssistantRegistry + ?Sized> AssistantRegistry for Arc<T> {
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<Assistant, RegistryError> {
        (**self).create_assistant(config).await
    }

    async fn list_assistants(&self, limit: usize) -> Result<Vec<Assistant>, RegistryError> {
        (**self).list_assistants(limit).await
    }

    async fn list_caller_numbers(&self) -> Result<Vec<CallerNumber>, RegistryError> {
        (**self).list_caller_numbers().await
    }

    async fn create_call(&self, request: &CallRequest) -> Result<CallHandle, RegistryError> {
        (**self).create_call(request).await
    }

    async fn delete_call(&self, call_id: &str) -> Result<CallHandle, RegistryError> {
        (**self).delete_call(call_id).await
    }
}

/// Lists the numbers that can place outbound calls. A provider 404 means the
/// account has no numbers at all.
pub async fn usable_caller_numbers<R: AssistantRegistry + ?Sized>(
    registry: &R,
) -> Result<Vec<CallerNumber>, RegistryError> {
    match registry.list_caller_numbers().await {
        Ok(numbers) => Ok(numbers.into_iter().filter(CallerNumber::is_usable).collect()),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
