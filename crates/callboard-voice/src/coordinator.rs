//! The call session state machine.

use crate::client::{SayOptions, VoiceSessionClient};
use crate::clock::Clock;
use crate::error::CallError;
use crate::event::SessionEvent;
use crate::session::{snapshot_profile, CallSession, CallView, SessionFailure};
use callboard_registry::{usable_caller_numbers, AssistantRegistry, CallRequest};
use callboard_types::{
    normalize_destination, AgentProfile, CallRoute, CallStatus, ErrorClass, TranscriptEntry,
    TranscriptRole,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How long an ended session stays visible before returning to idle.
pub const QUIESCENCE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(3);

/// Owns the single call session.
///
/// At most one session is non-ended at a time. Starting while `connecting`
/// or `connected` is rejected; starting from `ended` resets to idle first.
pub struct CallCoordinator<C, R> {
    client: C,
    registry: R,
    clock: Arc<dyn Clock>,
    session: CallSession,
}

impl<C: VoiceSessionClient, R: AssistantRegistry> CallCoordinator<C, R> {
    pub fn new(client: C, registry: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            registry,
            clock,
            session: CallSession::default(),
        }
    }

    pub fn session(&self) -> &CallSession {
        &self.session
    }

    pub fn status(&self) -> CallStatus {
        self.session.status
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn view(&self) -> CallView {
        self.session.view(self.clock.now())
    }

    pub fn duration(&self) -> chrono::Duration {
        self.session.duration_at(self.clock.now())
    }

    pub fn remaining_seconds(&self) -> Option<i64> {
        self.session.remaining_seconds(self.clock.now())
    }

    pub fn approaching_limit(&self) -> bool {
        self.session.approaching_limit(self.clock.now())
    }

    fn transition(&mut self, next: CallStatus) {
        let previous = self.session.status;
        if previous == next {
            return;
        }
        info!(from = %previous, to = %next, "call status changed");
        self.session.status = next;
    }

    fn append(&mut self, role: TranscriptRole, text: impl Into<String>) {
        self.session.transcript.push(TranscriptEntry {
            role,
            text: text.into(),
            timestamp: self.clock.now(),
        });
    }

    fn finish(&mut self) {
        self.session.ended_at = Some(self.clock.now());
        self.session.remote_speaking = false;
        self.session.volume_level = 0.0;
        self.transition(CallStatus::Ended);
    }

    /// Ends a session whose setup never completed.
    fn fail_start(&mut self, class: ErrorClass, message: String) {
        self.append(
            TranscriptRole::System,
            format!("Failed to start call: {message}"),
        );
        self.fail(class, message);
    }

    fn fail(&mut self, class: ErrorClass, message: String) {
        warn!(class = %class, %message, "call failed");
        self.session.last_error = Some(SessionFailure { class, message });
        self.finish();
    }

    /// Applies the quiescence timer: an ended session becomes idle once the
    /// interval has passed. Returns the status afterwards.
    pub fn tick(&mut self) -> CallStatus {
        if self.session.status == CallStatus::Ended {
            let now = self.clock.now();
            let quiet = chrono::Duration::seconds(QUIESCENCE_INTERVAL.as_secs() as i64);
            if self
                .session
                .ended_at
                .map_or(true, |ended| now - ended >= quiet)
            {
                self.transition(CallStatus::Idle);
            }
        }
        self.session.status
    }

    /// Starts a session for `profile`: a web call without `destination`, an
    /// outbound phone call with one.
    ///
    /// Precondition failures (session already active, bad destination, no
    /// caller number) leave the state untouched. Once the session is
    /// `connecting`, provider failures end it with a classified error.
    pub async fn start_session(
        &mut self,
        profile: &AgentProfile,
        destination: Option<&str>,
    ) -> Result<(), CallError> {
        let status = self.session.status;
        if status.is_active() {
            return Err(CallError::SessionActive(status));
        }

        let destination = destination.map(normalize_destination).transpose()?;

        let caller_number = match &destination {
            Some(_) => {
                let numbers = usable_caller_numbers(&self.registry).await?;
                match numbers.into_iter().next() {
                    Some(number) => Some(number),
                    None => return Err(CallError::NoOutboundCapability),
                }
            }
            None => None,
        };

        self.transition(CallStatus::Idle);

        let config = snapshot_profile(profile);
        let route = if destination.is_some() {
            CallRoute::OutboundPhone
        } else {
            CallRoute::Web
        };
        self.session = CallSession {
            route: Some(route),
            config: Some(Arc::clone(&config)),
            destination,
            caller_number,
            ..CallSession::default()
        };
        self.transition(CallStatus::Connecting);
        info!(route = route.as_str(), assistant = %config.name, "starting call");

        match route {
            CallRoute::Web => {
                if let Err(e) = self.client.start(&config).await {
                    self.fail_start(e.class(), e.to_string());
                    return Err(e.into());
                }
                Ok(())
            }
            CallRoute::OutboundPhone => self.place_phone_call().await,
        }
    }

    async fn place_phone_call(&mut self) -> Result<(), CallError> {
        let Some(config) = self.session.config.clone() else {
            return Err(CallError::NotActive(self.session.status));
        };

        let assistant = match self.registry.create_assistant(&config).await {
            Ok(assistant) => assistant,
            Err(e) => {
                self.fail_start(e.class(), e.user_message());
                return Err(e.into());
            }
        };

        let request = CallRequest {
            assistant_id: assistant.id,
            phone_number_id: self.session.caller_number.as_ref().map(|n| n.id.clone()),
            customer_number: self
                .session
                .destination
                .as_ref()
                .map(|d| d.as_str().to_string()),
        };

        match self.registry.create_call(&request).await {
            Ok(handle) => {
                info!(call_id = %handle.id, "outbound call placed");
                self.session.call_id = Some(handle.id);
                self.session.connected_at = Some(self.clock.now());
                self.transition(CallStatus::Connected);
                self.append(TranscriptRole::System, "Call connected successfully");
                Ok(())
            }
            Err(e) => {
                self.fail_start(e.class(), e.user_message());
                Err(e.into())
            }
        }
    }

    /// Requests the end of the current session.
    ///
    /// A connecting web session cannot be aborted; the request is recorded
    /// and honoured when the session reports `started` or `ended`.
    pub async fn end_session(&mut self) -> Result<(), CallError> {
        match self.session.status {
            CallStatus::Connecting => {
                info!("end requested while connecting");
                self.session.cancel_requested = true;
                self.append(TranscriptRole::System, "Call cancellation requested");
                Ok(())
            }
            CallStatus::Connected => {
                if self.session.route == Some(CallRoute::Web) {
                    if let Err(e) = self.client.stop().await {
                        warn!(error = %e, "voice client stop failed; ending locally");
                    }
                }
                self.append(TranscriptRole::System, "Call ended");
                self.finish();
                Ok(())
            }
            other => Err(CallError::NotActive(other)),
        }
    }

    /// Mutes or unmutes the local microphone. Local state follows the request
    /// even if the client refuses it.
    pub async fn toggle_mute(&mut self, muted: bool) -> Result<(), CallError> {
        if self.session.status != CallStatus::Connected {
            return Err(CallError::NotActive(self.session.status));
        }
        self.session.muted = muted;
        if self.session.route == Some(CallRoute::Web) {
            if let Err(e) = self.client.set_muted(muted).await {
                warn!(error = %e, muted, "voice client rejected mute change");
            }
        }
        self.append(
            TranscriptRole::System,
            if muted {
                "Microphone muted"
            } else {
                "Microphone unmuted"
            },
        );
        Ok(())
    }

    /// Has the assistant speak `text` on a connected web call.
    pub async fn say(&mut self, text: &str, options: SayOptions) -> Result<(), CallError> {
        if self.session.status != CallStatus::Connected {
            return Err(CallError::NotActive(self.session.status));
        }
        if self.session.route != Some(CallRoute::Web) {
            return Err(CallError::WebOnly);
        }
        self.client.say(text, options).await?;
        self.append(TranscriptRole::System, options.describe(text));
        Ok(())
    }

    /// Applies one notification from the voice client.
    pub async fn handle_event(&mut self, event: SessionEvent) {
        let status = self.session.status;
        match event {
            SessionEvent::Started => match status {
                CallStatus::Connecting => {
                    self.session.connected_at = Some(self.clock.now());
                    self.transition(CallStatus::Connected);
                    self.append(TranscriptRole::System, "Call connected successfully");
                    if self.session.cancel_requested {
                        info!("session started after end request; terminating");
                        if let Err(e) = self.client.stop().await {
                            warn!(error = %e, "voice client stop failed; ending locally");
                        }
                        self.append(TranscriptRole::System, "Call ended");
                        self.finish();
                    }
                }
                CallStatus::Connected => debug!("duplicate started notification"),
                CallStatus::Idle | CallStatus::Ended => {
                    warn!(status = %status, "started notification without a pending call; stopping");
                    if let Err(e) = self.client.stop().await {
                        warn!(error = %e, "voice client stop failed");
                    }
                }
            },
            SessionEvent::Ended => {
                if status.is_active() {
                    self.append(TranscriptRole::System, "Call ended");
                    self.finish();
                } else {
                    debug!(status = %status, "ended notification ignored");
                }
            }
            SessionEvent::SpeechStarted => {
                if status.is_active() {
                    self.session.remote_speaking = true;
                }
            }
            SessionEvent::SpeechEnded => self.session.remote_speaking = false,
            SessionEvent::TranscriptFinal { role, text } => {
                if status == CallStatus::Idle {
                    warn!("transcript outside a call ignored");
                } else {
                    self.append(role, text);
                }
            }
            SessionEvent::VolumeLevel(level) => {
                if status.is_active() {
                    self.session.volume_level = level.clamp(0.0, 1.0);
                }
            }
            SessionEvent::FunctionCall { name } => {
                if status.is_active() {
                    self.append(TranscriptRole::System, format!("Function called: {name}"));
                }
            }
            SessionEvent::Hang => {
                if status.is_active() {
                    self.append(TranscriptRole::System, "Call ended by assistant");
                }
            }
            SessionEvent::StartProgress(progress) => {
                if status == CallStatus::Connecting {
                    debug!(stage = %progress.stage, status = ?progress.status, "call setup progress");
                    self.session.start_progress.push(progress);
                }
            }
            SessionEvent::StartSucceeded { total_ms } => {
                if status.is_active() {
                    self.append(TranscriptRole::System, format!("Call started in {total_ms}ms"));
                }
            }
            SessionEvent::StartFailed { stage, error } => {
                if status == CallStatus::Connecting {
                    self.append(
                        TranscriptRole::System,
                        format!("Call failed at stage: {stage} - {error}"),
                    );
                    self.fail(ErrorClass::Session, error);
                } else {
                    warn!(status = %status, %stage, "setup failure outside a pending call ignored");
                }
            }
            SessionEvent::Error(detail) => {
                if status.is_active() {
                    self.append(TranscriptRole::System, format!("Error: {detail}"));
                    self.fail(ErrorClass::Session, detail);
                } else {
                    warn!(status = %status, %detail, "client error outside a call ignored");
                }
            }
        }
    }
}
