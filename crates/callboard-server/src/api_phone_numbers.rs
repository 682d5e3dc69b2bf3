//! `GET /phone-numbers`: outbound-capable numbers on the provider account.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json};
use callboard_registry::CallerNumber;
use serde::Serialize;
use std::sync::Arc;

const NO_NUMBERS_MESSAGE: &str =
    "No phone numbers found. Purchase a phone number from the voice provider dashboard.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumbersResponse {
    pub phone_numbers: Vec<CallerNumber>,
    pub has_phone_numbers: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl PhoneNumbersResponse {
    fn new(phone_numbers: Vec<CallerNumber>, message: Option<&'static str>) -> Self {
        Self {
            has_phone_numbers: !phone_numbers.is_empty(),
            count: phone_numbers.len(),
            phone_numbers,
            message,
        }
    }
}

/// Handler for `GET /phone-numbers`.
///
/// Only `active` and `released` numbers are listed. A provider 404 is
/// reported as an empty list with guidance rather than as an error.
pub async fn list_phone_numbers_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<PhoneNumbersResponse>, ApiError> {
    match state.registry.list_caller_numbers().await {
        Ok(numbers) => {
            let usable: Vec<_> = numbers.into_iter().filter(CallerNumber::is_usable).collect();
            Ok(Json(PhoneNumbersResponse::new(usable, None)))
        }
        Err(e) if e.is_not_found() => {
            tracing::info!("provider reports no phone numbers");
            Ok(Json(PhoneNumbersResponse::new(
                Vec::new(),
                Some(NO_NUMBERS_MESSAGE),
            )))
        }
        Err(e) => Err(e.into()),
    }
}
