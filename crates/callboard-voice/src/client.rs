//! The voice session client seam.

use crate::session::SessionConfig;
use async_trait::async_trait;
use callboard_types::ErrorClass;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The client has no public key to authenticate with.
    #[error("voice client public key is not configured")]
    NotConfigured,

    #[error("voice client rejected the request: {0}")]
    Rejected(String),

    #[error("voice client could not reach the provider: {0}")]
    Transport(String),
}

impl ClientError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotConfigured => ErrorClass::Configuration,
            Self::Rejected(_) => ErrorClass::ProviderRejected,
            Self::Transport(_) => ErrorClass::Transport,
        }
    }
}

/// Delivery options for [`VoiceSessionClient::say`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SayOptions {
    /// Hang up once the text has been spoken.
    pub end_call_after: bool,
    /// Whether the caller may talk over the message.
    pub interruptions_enabled: bool,
    /// Whether the message may cut off speech the assistant is producing.
    pub interrupt_assistant_enabled: bool,
}

impl Default for SayOptions {
    fn default() -> Self {
        Self {
            end_call_after: false,
            interruptions_enabled: true,
            interrupt_assistant_enabled: true,
        }
    }
}

impl SayOptions {
    /// The system line recorded when a message is sent, e.g.
    /// `Manual say: "Hi" | end call after | interrupt user: enabled | interrupt assistant: disabled`.
    pub fn describe(&self, text: &str) -> String {
        let toggle = |on: bool| if on { "enabled" } else { "disabled" };
        let mut parts = vec![format!("Manual say: \"{text}\"")];
        if self.end_call_after {
            parts.push("end call after".to_string());
        }
        parts.push(format!("interrupt user: {}", toggle(self.interruptions_enabled)));
        parts.push(format!(
            "interrupt assistant: {}",
            toggle(self.interrupt_assistant_enabled)
        ));
        parts.join(" | ")
    }
}

/// Browser-side audio session. Notifications are delivered separately as
/// [`SessionEvent`](crate::SessionEvent) values.
#[async_trait]
pub trait VoiceSessionClient: Send + Sync {
    /// Begins a web audio session for `config`. Returning `Ok` means the
    /// request was accepted; establishment is signalled by a `Started` event.
    async fn start(&self, config: &SessionConfig) -> Result<(), ClientError>;

    async fn stop(&self) -> Result<(), ClientError>;

    async fn set_muted(&self, muted: bool) -> Result<(), ClientError>;

    /// Asks the assistant to speak `text`.
    async fn say(&self, text: &str, options: SayOptions) -> Result<(), ClientError>;
}
