//! Agent profile catalog for Callboard.
//!
//! Implements CRUD over the persisted profile list, the built-in template
//! catalog, and the voice/model option lists shown by the profile form.
//!
//! Profiles live as one JSON array under a single key in the local
//! key-value table. Every write rewrites the whole array; there is a single
//! writer and no partial-field updates, so no row-level schema is needed.

mod catalog;
mod store;
mod templates;

pub use catalog::{model_options, voice_options, ModelOption, VoiceOption};
pub use store::{
    create_from_template, create_profile, delete_profile, duplicate_profile, get_profile,
    list_profiles, load_profiles, replace_profile, AgentStoreError, PROFILES_KEY,
    SEEDED_TEMPLATE_COUNT,
};
pub use templates::{find_template, templates, templates_in};
