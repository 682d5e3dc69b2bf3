//! Stable error classification shared by every boundary.
//!
//! Each crate keeps its own `thiserror` enum; this tag is what the display
//! layer and the HTTP surface key on, so the strings never change.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// A required credential or environment value is missing.
    #[serde(rename = "configuration_error")]
    Configuration,
    /// Malformed user input, rejected before any network call.
    #[serde(rename = "validation_error")]
    Validation,
    /// The provider returned a structured failure.
    #[serde(rename = "provider_rejected")]
    ProviderRejected,
    /// Network or timeout failure talking to the provider.
    #[serde(rename = "transport_error")]
    Transport,
    /// The voice client reported an error mid-call.
    #[serde(rename = "session_error")]
    Session,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration_error",
            Self::Validation => "validation_error",
            Self::ProviderRejected => "provider_rejected",
            Self::Transport => "transport_error",
            Self::Session => "session_error",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
