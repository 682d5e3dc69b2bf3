//! Call creation and termination.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{rejection::JsonRejection, Extension, Json, Path};
use callboard_registry::{CallHandle, CallRequest};
use callboard_types::{is_valid_customer_number, CallRoute};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallRequest {
    pub assistant_id: Option<String>,
    pub phone_number_id: Option<String>,
    pub customer_phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCallResponse {
    pub call: CallHandle,
    #[serde(rename = "type")]
    pub route: CallRoute,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndCallRequest {
    pub call_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallResponse {
    pub call: CallHandle,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

impl CreateCallRequest {
    /// Validates the body and decides the route. A customer number selects
    /// outbound phone routing and must come with a caller-id number.
    fn into_call_request(self) -> Result<(CallRequest, CallRoute), ApiError> {
        let assistant_id = required(self.assistant_id, "assistantId")?;
        let phone_number_id = self
            .phone_number_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let customer_number = match self.customer_phone_number {
            Some(number) if !number.trim().is_empty() => {
                let number = number.trim().to_string();
                if !is_valid_customer_number(&number) {
                    return Err(ApiError::BadRequest(format!(
                        "customerPhoneNumber must be in E.164 format, got {number}"
                    )));
                }
                if phone_number_id.is_none() {
                    return Err(ApiError::BadRequest(
                        "phoneNumberId is required for outbound phone calls".to_string(),
                    ));
                }
                Some(number)
            }
            _ => None,
        };

        let route = if customer_number.is_some() {
            CallRoute::OutboundPhone
        } else {
            CallRoute::Web
        };

        Ok((
            CallRequest {
                assistant_id,
                phone_number_id,
                customer_number,
            },
            route,
        ))
    }
}

/// Handler for `POST /calls`.
pub async fn create_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<CreateCallRequest>, JsonRejection>,
) -> Result<Json<CreateCallResponse>, ApiError> {
    let Json(body) = payload?;
    let (request, route) = body.into_call_request()?;

    let call = state.registry.create_call(&request).await?;
    tracing::info!(
        call_id = %call.id,
        assistant_id = %request.assistant_id,
        route = route.as_str(),
        "call created"
    );

    Ok(Json(CreateCallResponse { call, route }))
}

async fn end_call(state: &AppState, call_id: String) -> Result<Json<CallResponse>, ApiError> {
    let call = state.registry.delete_call(&call_id).await?;
    tracing::info!(call_id = %call_id, "call ended");
    Ok(Json(CallResponse { call }))
}

/// Handler for `DELETE /calls/{call_id}`.
pub async fn delete_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> Result<Json<CallResponse>, ApiError> {
    end_call(&state, call_id).await
}

/// Handler for `POST /calls/end`.
pub async fn end_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<EndCallRequest>, JsonRejection>,
) -> Result<Json<CallResponse>, ApiError> {
    let Json(body) = payload?;
    let call_id = required(body.call_id, "callId")?;
    end_call(&state, call_id).await
}
