//! Shared types and error classifications for Callboard.
//!
//! This crate provides the foundational types used across all Callboard
//! crates: the persisted agent profile and its nested model/voice
//! configuration, call status and transcript records, the stable error
//! classification shared by every boundary, and phone-number normalization.
//!
//! No crate in the workspace depends on anything *except* `callboard-types`
//! for cross-cutting type definitions. This keeps the dependency graph clean
//! and prevents circular dependencies.

pub mod agent;
pub mod call;
pub mod error;
pub mod phone;

pub use agent::{
    AgentCategory, AgentProfile, AgentTemplate, FirstMessageMode, ModelConfig,
    ProfileValidationError, TranscriberConfig, VoiceConfig,
};
pub use call::{CallRoute, CallStatus, TranscriptEntry, TranscriptRole};
pub use error::ErrorClass;
pub use phone::{is_valid_customer_number, normalize_destination, PhoneNumber, PhoneNumberError};
