//! Registry failures and their classification.

use callboard_types::ErrorClass;
use thiserror::Error;

/// Why the provider refused a request, derived from its HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BadRequest,
    Unauthorized,
    InsufficientCredits,
    NotFound,
    Other,
}

impl Rejection {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::BadRequest,
            401 | 403 => Self::Unauthorized,
            402 => Self::InsufficientCredits,
            404 => Self::NotFound,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// No provider credential is configured.
    #[error("voice provider credential is not configured")]
    NotConfigured,

    /// The provider answered with a non-success status.
    #[error("voice provider rejected the request ({status}): {message}")]
    Rejected {
        kind: Rejection,
        status: u16,
        message: String,
    },

    /// The request never got a usable answer.
    #[error("voice provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with a body we could not decode.
    #[error("unexpected voice provider response: {0}")]
    Decode(String),
}

impl RegistryError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            kind: Rejection::from_status(status),
            status,
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotConfigured => ErrorClass::Configuration,
            Self::Rejected { .. } => ErrorClass::ProviderRejected,
            Self::Transport(_) | Self::Decode(_) => ErrorClass::Transport,
        }
    }

    /// Message suitable for display next to the control that failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured => {
                "The voice provider API key is not configured. Set VAPI_API_KEY.".to_string()
            }
            Self::Rejected { kind, message, .. } => match kind {
                Rejection::Unauthorized => {
                    "The voice provider rejected the API key. Check VAPI_API_KEY.".to_string()
                }
                Rejection::InsufficientCredits => {
                    "Insufficient credits on the voice provider account.".to_string()
                }
                Rejection::NotFound => {
                    "The requested assistant or phone number was not found.".to_string()
                }
                Rejection::BadRequest | Rejection::Other => {
                    format!("The voice provider rejected the request: {message}")
                }
            },
            Self::Transport(_) | Self::Decode(_) => {
                "Could not reach the voice provider. Please try again.".to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                kind: Rejection::NotFound,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
