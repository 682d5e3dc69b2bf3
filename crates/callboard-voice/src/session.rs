//! Session state owned by the coordinator.

use callboard_registry::{AssistantConfig, CallerNumber};
use callboard_types::{
    AgentProfile, CallRoute, CallStatus, ErrorClass, PhoneNumber, TranscriptEntry,
};
use crate::event::StartProgress;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Resolved configuration a session runs with.
pub type SessionConfig = AssistantConfig;

/// Takes the immutable snapshot a session holds for its whole lifetime.
pub fn snapshot_profile(profile: &AgentProfile) -> Arc<SessionConfig> {
    Arc::new(SessionConfig::from_profile(profile))
}

/// The classified reason a session ended abnormally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFailure {
    pub class: ErrorClass,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct CallSession {
    pub status: CallStatus,
    pub route: Option<CallRoute>,
    pub config: Option<Arc<SessionConfig>>,
    pub transcript: Vec<TranscriptEntry>,
    pub muted: bool,
    pub remote_speaking: bool,
    pub volume_level: f32,
    pub destination: Option<PhoneNumber>,
    pub caller_number: Option<CallerNumber>,
    /// Provider call id, known for phone calls once placed.
    pub call_id: Option<String>,
    /// Duration anchor, set on entering `connected`.
    pub connected_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cancel_requested: bool,
    /// Web call setup steps in arrival order.
    pub start_progress: Vec<StartProgress>,
    pub last_error: Option<SessionFailure>,
}

impl CallSession {
    /// Elapsed connected time at `now`. Frozen once the session has ended.
    pub fn duration_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        let Some(anchor) = self.connected_at else {
            return chrono::Duration::zero();
        };
        let until = match self.status {
            CallStatus::Ended | CallStatus::Idle => self.ended_at.unwrap_or(now),
            _ => now,
        };
        (until - anchor).max(chrono::Duration::zero())
    }

    /// Seconds left before the advisory maximum duration.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        let max = self.config.as_ref()?.max_duration_seconds;
        Some((i64::from(max) - self.duration_at(now).num_seconds()).max(0))
    }

    /// True while connected with under a minute of advisory time left.
    pub fn approaching_limit(&self, now: DateTime<Utc>) -> bool {
        self.status == CallStatus::Connected
            && self.remaining_seconds(now).is_some_and(|left| left < 60)
    }

    pub fn view(&self, now: DateTime<Utc>) -> CallView {
        CallView {
            status: self.status,
            route: self.route,
            assistant_name: self.config.as_ref().map(|c| c.name.clone()),
            transcript: self.transcript.clone(),
            muted: self.muted,
            remote_speaking: self.remote_speaking,
            volume_level: self.volume_level,
            destination: self.destination.clone(),
            caller_number: self.caller_number.as_ref().map(|n| n.number.clone()),
            call_id: self.call_id.clone(),
            duration_seconds: self.duration_at(now).num_seconds(),
            remaining_seconds: self.remaining_seconds(now),
            approaching_limit: self.approaching_limit(now),
            start_progress: self.start_progress.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Read-only rendering of a session at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallView {
    pub status: CallStatus,
    pub route: Option<CallRoute>,
    pub assistant_name: Option<String>,
    pub transcript: Vec<TranscriptEntry>,
    pub muted: bool,
    pub remote_speaking: bool,
    pub volume_level: f32,
    pub destination: Option<PhoneNumber>,
    pub caller_number: Option<String>,
    pub call_id: Option<String>,
    pub duration_seconds: i64,
    pub remaining_seconds: Option<i64>,
    pub approaching_limit: bool,
    pub start_progress: Vec<StartProgress>,
    pub last_error: Option<SessionFailure>,
}
