//! Task wrapper that serializes commands and client notifications.

use crate::client::{SayOptions, VoiceSessionClient};
use crate::coordinator::CallCoordinator;
use crate::error::CallError;
use crate::event::SessionEvent;
use crate::session::CallView;
use callboard_registry::AssistantRegistry;
use callboard_types::{AgentProfile, CallStatus};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// How often the driver checks the quiescence timer.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

type Reply<T> = oneshot::Sender<Result<T, CallError>>;

enum Command {
    Start {
        profile: Box<AgentProfile>,
        destination: Option<String>,
        reply: Reply<()>,
    },
    End {
        reply: Reply<()>,
    },
    Mute {
        muted: bool,
        reply: Reply<()>,
    },
    Say {
        text: String,
        options: SayOptions,
        reply: Reply<()>,
    },
    View {
        reply: oneshot::Sender<CallView>,
    },
}

/// Owns a coordinator and feeds it one message at a time.
pub struct CoordinatorDriver<C, R> {
    coordinator: CallCoordinator<C, R>,
    events: mpsc::Receiver<SessionEvent>,
    commands: mpsc::Receiver<Command>,
}

/// Cloneable handle for issuing commands to a running driver.
#[derive(Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::Sender<Command>,
}

impl<C, R> CoordinatorDriver<C, R>
where
    C: VoiceSessionClient + 'static,
    R: AssistantRegistry + 'static,
{
    pub fn new(
        coordinator: CallCoordinator<C, R>,
        events: mpsc::Receiver<SessionEvent>,
    ) -> (Self, CoordinatorHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let driver = Self {
            coordinator,
            events,
            commands: rx,
        };
        (driver, CoordinatorHandle { commands: tx })
    }

    pub fn coordinator(&self) -> &CallCoordinator<C, R> {
        &self.coordinator
    }

    /// Applies every event already queued. Returns how many were applied.
    pub async fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.coordinator.handle_event(event).await;
            applied += 1;
        }
        applied
    }

    async fn apply(&mut self, command: Command) {
        // A dropped reply receiver just means the caller stopped waiting.
        match command {
            Command::Start {
                profile,
                destination,
                reply,
            } => {
                let result = self
                    .coordinator
                    .start_session(&profile, destination.as_deref())
                    .await;
                let _ = reply.send(result);
            }
            Command::End { reply } => {
                let _ = reply.send(self.coordinator.end_session().await);
            }
            Command::Mute { muted, reply } => {
                let _ = reply.send(self.coordinator.toggle_mute(muted).await);
            }
            Command::Say {
                text,
                options,
                reply,
            } => {
                let _ = reply.send(self.coordinator.say(&text, options).await);
            }
            Command::View { reply } => {
                let _ = reply.send(self.coordinator.view());
            }
        }
    }

    /// Runs until every handle is dropped and the event channel closes.
    pub async fn run(mut self) -> CallCoordinator<C, R> {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        let mut events_open = true;
        let mut commands_open = true;

        while events_open || commands_open {
            tokio::select! {
                event = self.events.recv(), if events_open => match event {
                    Some(event) => self.coordinator.handle_event(event).await,
                    None => events_open = false,
                },
                command = self.commands.recv(), if commands_open => match command {
                    Some(command) => {
                        self.coordinator.tick();
                        self.apply(command).await;
                    }
                    None => commands_open = false,
                },
                _ = ticker.tick() => {
                    self.coordinator.tick();
                }
            }
        }

        tracing::debug!("coordinator driver stopped");
        self.coordinator
    }

    pub fn spawn(self) -> JoinHandle<CallCoordinator<C, R>> {
        tokio::spawn(self.run())
    }
}

impl CoordinatorHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, CallError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(build(tx))
            .await
            .map_err(|_| CallError::DriverStopped)?;
        rx.await.map_err(|_| CallError::DriverStopped)?
    }

    pub async fn start_session(
        &self,
        profile: AgentProfile,
        destination: Option<String>,
    ) -> Result<(), CallError> {
        self.request(|reply| Command::Start {
            profile: Box::new(profile),
            destination,
            reply,
        })
        .await
    }

    pub async fn end_session(&self) -> Result<(), CallError> {
        self.request(|reply| Command::End { reply }).await
    }

    pub async fn toggle_mute(&self, muted: bool) -> Result<(), CallError> {
        self.request(|reply| Command::Mute { muted, reply }).await
    }

    pub async fn say(&self, text: impl Into<String>, options: SayOptions) -> Result<(), CallError> {
        let text = text.into();
        self.request(|reply| Command::Say {
            text,
            options,
            reply,
        })
        .await
    }

    pub async fn view(&self) -> Result<CallView, CallError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::View { reply: tx })
            .await
            .map_err(|_| CallError::DriverStopped)?;
        rx.await.map_err(|_| CallError::DriverStopped)
    }

    pub async fn status(&self) -> Result<CallStatus, CallError> {
        Ok(self.view().await?.status)
    }
}
