//! In-memory registry.

use crate::assistant::AssistantConfig;
use crate::error::RegistryError;
use crate::registry::AssistantRegistry;
use crate::types::{Assistant, CallHandle, CallRequest, CallerNumber, Customer};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct FakeState {
    assistants: Vec<(Assistant, AssistantConfig)>,
    numbers: Vec<CallerNumber>,
    calls: HashMap<String, CallHandle>,
    call_order: Vec<String>,
    fail_create_assistant: Option<RegistryError>,
    fail_create_call: Option<RegistryError>,
    fail_list_numbers: Option<RegistryError>,
}

/// Registry that keeps assistants, numbers and calls in memory.
///
/// Failures can be injected per operation; an injected failure stays in
/// place until cleared with [`FakeRegistry::clear_failures`].
#[derive(Default)]
pub struct FakeRegistry {
    state: Mutex<FakeState>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A panic while holding the lock only happens in a failing test; the
        // state is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_caller_number(self, id: &str, number: &str, status: &str) -> Self {
        self.lock().numbers.push(CallerNumber {
            id: id.to_string(),
            number: number.to_string(),
            status: status.to_string(),
            name: None,
        });
        self
    }

    pub fn fail_create_assistant_with(&self, error: RegistryError) {
        self.lock().fail_create_assistant = Some(error);
    }

    pub fn fail_create_call_with(&self, error: RegistryError) {
        self.lock().fail_create_call = Some(error);
    }

    pub fn fail_list_numbers_with(&self, error: RegistryError) {
        self.lock().fail_list_numbers = Some(error);
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.fail_create_assistant = None;
        state.fail_create_call = None;
        state.fail_list_numbers = None;
    }

    /// Configurations registered so far, oldest first.
    pub fn registered_configs(&self) -> Vec<AssistantConfig> {
        self.lock()
            .assistants
            .iter()
            .map(|(_, config)| config.clone())
            .collect()
    }

    /// Calls created so far, oldest first, with their current status.
    pub fn calls(&self) -> Vec<CallHandle> {
        let state = self.lock();
        state
            .call_order
            .iter()
            .filter_map(|id| state.calls.get(id).cloned())
            .collect()
    }
}

#[async_trait]
impl AssistantRegistry for FakeRegistry {
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<Assistant, RegistryError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_create_assistant.clone() {
            return Err(err);
        }

        let assistant = Assistant {
            id: format!("asst-{}", uuid::Uuid::new_v4()),
            name: Some(config.name.clone()),
            first_message: Some(config.first_message.clone()),
            created_at: Some(Utc::now().to_rfc3339()),
        };
        state.assistants.push((assistant.clone(), config.clone()));
        Ok(assistant)
    }

    async fn list_assistants(&self, limit: usize) -> Result<Vec<Assistant>, RegistryError> {
        Ok(self
            .lock()
            .assistants
            .iter()
            .take(limit)
            .map(|(assistant, _)| assistant.clone())
            .collect())
    }

    async fn list_caller_numbers(&self) -> Result<Vec<CallerNumber>, RegistryError> {
        let state = self.lock();
        match &state.fail_list_numbers {
            Some(err) => Err(err.clone()),
            None => Ok(state.numbers.clone()),
        }
    }

    async fn create_call(&self, request: &CallRequest) -> Result<CallHandle, RegistryError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_create_call.clone() {
            return Err(err);
        }

        if let Some(number_id) = &request.phone_number_id {
            if !state.numbers.iter().any(|n| &n.id == number_id) {
                return Err(RegistryError::rejected(
                    404,
                    format!("phone number {number_id} not found"),
                ));
            }
        }

        let handle = CallHandle {
            id: format!("call-{}", uuid::Uuid::new_v4()),
            assistant_id: request.assistant_id.clone(),
            status: "queued".to_string(),
            phone_number_id: request.phone_number_id.clone(),
            customer: request
                .customer_number
                .as_ref()
                .map(|number| Customer {
                    number: number.clone(),
                }),
        };
        state.call_order.push(handle.id.clone());
        state.calls.insert(handle.id.clone(), handle.clone());
        Ok(handle)
    }

    async fn delete_call(&self, call_id: &str) -> Result<CallHandle, RegistryError> {
        let mut state = self.lock();
        let handle = state
            .calls
            .get_mut(call_id)
            .ok_or_else(|| RegistryError::rejected(404, format!("call {call_id} not found")))?;
        handle.status = "ended".to_string();
        Ok(handle.clone())
    }
}
