use crate::client::ClientError;
use callboard_registry::RegistryError;
use callboard_types::{CallStatus, ErrorClass, PhoneNumberError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CallError {
    #[error("a call is already {0}")]
    SessionActive(CallStatus),

    #[error("no call in progress (status: {0})")]
    NotActive(CallStatus),

    #[error("only web calls accept spoken messages")]
    WebOnly,

    #[error("invalid destination number: {0}")]
    InvalidDestination(#[from] PhoneNumberError),

    #[error("no outbound capability: the account has no usable phone numbers")]
    NoOutboundCapability,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("call coordinator has stopped")]
    DriverStopped,
}

impl CallError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::SessionActive(_)
            | Self::NotActive(_)
            | Self::WebOnly
            | Self::InvalidDestination(_) => ErrorClass::Validation,
            Self::NoOutboundCapability => ErrorClass::Configuration,
            Self::Registry(e) => e.class(),
            Self::Client(e) => e.class(),
            Self::DriverStopped => ErrorClass::Session,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDestination(_) => {
                "Please enter a valid phone number with 8 to 15 digits.".to_string()
            }
            Self::NoOutboundCapability => {
                "No phone numbers are available for outbound calls. \
                 Add a phone number to your voice provider account first."
                    .to_string()
            }
            Self::Registry(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_follow_the_cause() {
        assert_eq!(
            CallError::from(PhoneNumberError::Length(3)).class(),
            ErrorClass::Validation
        );
        assert_eq!(
            CallError::NoOutboundCapability.class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            CallError::from(RegistryError::rejected(402, "x")).class(),
            ErrorClass::ProviderRejected
        );
        assert_eq!(
            CallError::from(ClientError::Transport("reset".into())).class(),
            ErrorClass::Transport
        );
    }

    #[test]
    fn registry_messages_pass_through() {
        let err = CallError::from(RegistryError::NotConfigured);
        assert!(err.user_message().contains("VAPI_API_KEY"));
    }
}
