//! Provider-side records.

use serde::{Deserialize, Serialize};

/// An assistant registered with the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// An outbound-capable phone number owned by the provider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerNumber {
    pub id: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CallerNumber {
    /// Numbers in `active` or `released` status can place calls.
    pub fn is_usable(&self) -> bool {
        matches!(self.status.as_str(), "active" | "released")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub number: String,
}

/// Parameters for `create_call`. A customer number selects outbound phone
/// routing; without one the call is a web call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallRequest {
    pub assistant_id: String,
    pub phone_number_id: Option<String>,
    pub customer_number: Option<String>,
}

/// A call as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHandle {
    pub id: String,
    #[serde(default)]
    pub assistant_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_fields_are_ignored() {
        let json = r#"{"id":"pn-1","number":"+15550001111","status":"active","provider":"twilio","orgId":"o"}"#;
        let number: CallerNumber = serde_json::from_str(json).unwrap();
        assert_eq!(number.id, "pn-1");
        assert!(number.is_usable());
    }

    #[test]
    fn only_active_and_released_are_usable() {
        let mut number = CallerNumber {
            id: "pn".to_string(),
            number: "+15550001111".to_string(),
            status: "released".to_string(),
            name: None,
        };
        assert!(number.is_usable());
        number.status = "pending".to_string();
        assert!(!number.is_usable());
    }

    #[test]
    fn call_handle_wire_shape() {
        let handle = CallHandle {
            id: "call-1".to_string(),
            assistant_id: "asst-1".to_string(),
            status: "queued".to_string(),
            phone_number_id: Some("pn-1".to_string()),
            customer: Some(Customer {
                number: "+15551234567".to_string(),
            }),
        };
        let value = serde_json::to_value(&handle).unwrap();
        assert_eq!(value["assistantId"], "asst-1");
        assert_eq!(value["phoneNumberId"], "pn-1");
        assert_eq!(value["customer"]["number"], "+15551234567");
    }
}
