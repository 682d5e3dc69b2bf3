//! Assistant Registry client for Callboard.
//!
//! The registry is the provider-side catalog of assistants, phone numbers and
//! calls. Everything that talks to it goes through the [`AssistantRegistry`]
//! trait, which has two implementations:
//!
//! - [`HttpRegistry`] forwards to the provider's REST API with a bearer
//!   credential.
//! - [`FakeRegistry`] keeps everything in memory. It backs tests and the
//!   `fake` provider mode, so the HTTP surface behaves the same without a
//!   provider account.
//!
//! Every failure is a [`RegistryError`] that distinguishes "not configured",
//! "rejected by the provider" and "transport" failures.

mod assistant;
mod error;
mod fake;
mod http;
mod registry;
mod types;

pub use assistant::AssistantConfig;
pub use error::{Rejection, RegistryError};
pub use fake::FakeRegistry;
pub use http::{HttpRegistry, HttpRegistryConfig, DEFAULT_PROVIDER_URL};
pub use registry::{usable_caller_numbers, AssistantRegistry};
pub use types::{Assistant, CallHandle, CallRequest, CallerNumber, Customer};
