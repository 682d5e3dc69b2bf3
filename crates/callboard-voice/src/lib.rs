//! Call session coordination for Callboard.
//!
//! The [`CallCoordinator`] owns the single call session and moves it through
//! `idle → connecting → connected → ended → idle`. It talks to two
//! collaborators passed in at construction:
//!
//! - a [`VoiceSessionClient`], the browser-side audio session used for web
//!   calls, whose notifications arrive as [`SessionEvent`] values;
//! - an [`AssistantRegistry`](callboard_registry::AssistantRegistry), used to
//!   register assistants and place outbound phone calls.
//!
//! Mutating operations take `&mut self`, so one command or notification is
//! applied to completion before the next. [`CoordinatorDriver`] wraps a
//! coordinator in a task that serializes commands from a
//! [`CoordinatorHandle`] with events from an mpsc channel.

pub mod client;
pub mod clock;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod event;
pub mod session;

pub use client::{ClientError, SayOptions, VoiceSessionClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{CallCoordinator, QUIESCENCE_INTERVAL};
pub use driver::{CoordinatorDriver, CoordinatorHandle};
pub use error::CallError;
pub use event::{SessionEvent, StageStatus, StartProgress};
pub use session::{snapshot_profile, CallSession, CallView, SessionConfig, SessionFailure};
