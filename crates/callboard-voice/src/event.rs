use callboard_types::TranscriptRole;
use serde::Serialize;

/// Stage outcome reported while the client sets up a web call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Started,
    Completed,
    Failed,
}

/// One step of web call setup, e.g. `web-call-creation` or `daily-join`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProgress {
    pub stage: String,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Notification from the voice session client.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The audio session is established.
    Started,
    /// The remote side terminated the session.
    Ended,
    SpeechStarted,
    SpeechEnded,
    /// A finalized transcript line. Partial transcripts are never delivered.
    TranscriptFinal { role: TranscriptRole, text: String },
    /// Remote audio level in `0.0..=1.0`.
    VolumeLevel(f32),
    /// The assistant invoked a tool.
    FunctionCall { name: String },
    /// The assistant decided to hang up. An `Ended` follows.
    Hang,
    StartProgress(StartProgress),
    /// Setup finished; `total_ms` is the time from request to join.
    StartSucceeded { total_ms: u64 },
    /// Setup failed at `stage`. The session never connects.
    StartFailed { stage: String, error: String },
    /// The client hit an unrecoverable error.
    Error(String),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Ended => "ended",
            Self::SpeechStarted => "speech_started",
            Self::SpeechEnded => "speech_ended",
            Self::TranscriptFinal { .. } => "transcript_final",
            Self::VolumeLevel(_) => "volume_level",
            Self::FunctionCall { .. } => "function_call",
            Self::Hang => "hang",
            Self::StartProgress(_) => "start_progress",
            Self::StartSucceeded { .. } => "start_succeeded",
            Self::StartFailed { .. } => "start_failed",
            Self::Error(_) => "error",
        }
    }
}
