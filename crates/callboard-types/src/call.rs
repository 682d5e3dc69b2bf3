//! Call status and transcript records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a call session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// No session.
    #[default]
    Idle,
    /// Session requested, waiting for the provider to establish it.
    Connecting,
    /// Audio is flowing.
    Connected,
    /// Terminal state, shown briefly before returning to `Idle`.
    Ended,
}

impl CallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Ended => "ended",
        }
    }

    /// Returns `true` for `Connecting` and `Connected`.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptRole {
    User,
    Assistant,
    System,
}

/// One line of a call transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: TranscriptRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// How a call reaches the human on the other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallRoute {
    /// Browser-mediated audio session.
    Web,
    /// Provider-dialed telephone call.
    OutboundPhone,
}

impl CallRoute {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::OutboundPhone => "outbound_phone",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_string(&CallStatus::Connecting).unwrap(), "\"connecting\"");
        assert_eq!(CallStatus::Ended.to_string(), "ended");
        assert_eq!(CallStatus::default(), CallStatus::Idle);
    }

    #[test]
    fn only_connecting_and_connected_are_active() {
        assert!(!CallStatus::Idle.is_active());
        assert!(CallStatus::Connecting.is_active());
        assert!(CallStatus::Connected.is_active());
        assert!(!CallStatus::Ended.is_active());
    }

    #[test]
    fn route_wire_names() {
        assert_eq!(serde_json::to_string(&CallRoute::OutboundPhone).unwrap(), "\"outbound_phone\"");
        assert_eq!(CallRoute::Web.as_str(), "web");
    }
}
