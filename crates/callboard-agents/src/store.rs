//! Profile CRUD over the key-value table.

use crate::templates::{find_template, templates};
use callboard_db::{kv_get, kv_put};
use callboard_types::{AgentProfile, ProfileValidationError};
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Key holding the JSON array of profiles.
pub const PROFILES_KEY: &str = "vapi-agents";

/// Number of templates copied into an empty store on first load.
pub const SEEDED_TEMPLATE_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum AgentStoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("stored profile list is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("agent not found: {0}")]
    NotFound(String),
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("invalid agent profile: {0}")]
    Invalid(#[from] ProfileValidationError),
}

fn new_profile_id() -> String {
    format!("agent-{}", uuid::Uuid::new_v4())
}

/// One element of the stored array. Elements that no longer decode as a
/// profile are kept verbatim and written back unchanged.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StoredRecord {
    Profile(AgentProfile),
    Unreadable(Value),
}

/// The stored array in its original order.
#[derive(Debug, Default)]
struct ProfileList {
    records: Vec<StoredRecord>,
}

impl ProfileList {
    /// Reads the array. `None` means the key has never been written.
    fn read(conn: &Connection) -> Result<Option<Self>, AgentStoreError> {
        let Some(json) = kv_get(conn, PROFILES_KEY)? else {
            return Ok(None);
        };
        let raw: Vec<Value> = serde_json::from_str(&json)?;

        let records = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| match serde_json::from_value(value.clone()) {
                Ok(profile) => StoredRecord::Profile(profile),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping unreadable agent profile");
                    StoredRecord::Unreadable(value)
                }
            })
            .collect();
        Ok(Some(Self { records }))
    }

    /// Reads the array, seeding it from the first templates when the key has
    /// never been written.
    fn load(conn: &Connection) -> Result<Self, AgentStoreError> {
        if let Some(list) = Self::read(conn)? {
            return Ok(list);
        }

        let now = Utc::now();
        let list = Self {
            records: templates()
                .iter()
                .take(SEEDED_TEMPLATE_COUNT)
                .map(|template| {
                    StoredRecord::Profile(AgentProfile {
                        id: new_profile_id(),
                        created_at: Some(now),
                        updated_at: Some(now),
                        ..template.config.clone()
                    })
                })
                .collect(),
        };
        list.save(conn)?;
        tracing::info!(count = list.records.len(), "seeded agent profiles from templates");
        Ok(list)
    }

    fn save(&self, conn: &Connection) -> Result<(), AgentStoreError> {
        let json = serde_json::to_string(&self.records)?;
        kv_put(conn, PROFILES_KEY, &json)?;
        Ok(())
    }

    fn profiles(&self) -> impl Iterator<Item = &AgentProfile> {
        self.records.iter().filter_map(|record| match record {
            StoredRecord::Profile(profile) => Some(profile),
            StoredRecord::Unreadable(_) => None,
        })
    }

    fn find(&self, id: &str) -> Result<&AgentProfile, AgentStoreError> {
        self.profiles()
            .find(|p| p.id == id)
            .ok_or_else(|| AgentStoreError::NotFound(id.to_string()))
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut AgentProfile, AgentStoreError> {
        self.records
            .iter_mut()
            .find_map(|record| match record {
                StoredRecord::Profile(profile) if profile.id == id => Some(profile),
                _ => None,
            })
            .ok_or_else(|| AgentStoreError::NotFound(id.to_string()))
    }

    fn push(&mut self, profile: AgentProfile) {
        self.records.push(StoredRecord::Profile(profile));
    }

    /// Drops the profiles with `id`. Returns `false` if there were none.
    fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| {
            !matches!(record, StoredRecord::Profile(profile) if profile.id == id)
        });
        self.records.len() != before
    }
}

/// Loads every readable profile, seeding the list from the first templates
/// when the key has never been written.
pub fn load_profiles(conn: &Connection) -> Result<Vec<AgentProfile>, AgentStoreError> {
    Ok(ProfileList::load(conn)?.profiles().cloned().collect())
}

/// Lists profiles, optionally filtered by a case-insensitive search over
/// name and description.
pub fn list_profiles(
    conn: &Connection,
    query: Option<&str>,
) -> Result<Vec<AgentProfile>, AgentStoreError> {
    let profiles = load_profiles(conn)?;
    Ok(match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => profiles.into_iter().filter(|p| p.matches(q)).collect(),
        None => profiles,
    })
}

pub fn get_profile(conn: &Connection, id: &str) -> Result<AgentProfile, AgentStoreError> {
    ProfileList::load(conn)?.find(id).cloned()
}

/// Stores a new profile under a fresh id. Any id in `profile` is ignored.
pub fn create_profile(
    conn: &Connection,
    profile: AgentProfile,
) -> Result<AgentProfile, AgentStoreError> {
    profile.validate()?;

    let mut list = ProfileList::load(conn)?;
    let now = Utc::now();
    let created = AgentProfile {
        id: new_profile_id(),
        created_at: Some(now),
        updated_at: Some(now),
        ..profile
    };
    list.push(created.clone());
    list.save(conn)?;

    tracing::info!(agent_id = %created.id, name = %created.name, "created agent profile");
    Ok(created)
}

/// Replaces the profile stored under `id`. The id and creation timestamp are
/// preserved; every other field comes from `profile`.
pub fn replace_profile(
    conn: &Connection,
    id: &str,
    profile: AgentProfile,
) -> Result<AgentProfile, AgentStoreError> {
    profile.validate()?;

    let mut list = ProfileList::load(conn)?;
    let slot = list.find_mut(id)?;

    let replaced = AgentProfile {
        id: slot.id.clone(),
        created_at: slot.created_at,
        updated_at: Some(Utc::now()),
        ..profile
    };
    *slot = replaced.clone();
    list.save(conn)?;

    tracing::info!(agent_id = %id, "replaced agent profile");
    Ok(replaced)
}

pub fn delete_profile(conn: &Connection, id: &str) -> Result<(), AgentStoreError> {
    let mut list = ProfileList::load(conn)?;
    if !list.remove(id) {
        return Err(AgentStoreError::NotFound(id.to_string()));
    }
    list.save(conn)?;

    tracing::info!(agent_id = %id, "deleted agent profile");
    Ok(())
}

/// Copies a profile under a new id, appending ` (Copy)` to its name.
pub fn duplicate_profile(conn: &Connection, id: &str) -> Result<AgentProfile, AgentStoreError> {
    let mut list = ProfileList::load(conn)?;
    let source = list.find(id)?;

    let now = Utc::now();
    let copy = AgentProfile {
        id: new_profile_id(),
        name: format!("{} (Copy)", source.name),
        created_at: Some(now),
        updated_at: Some(now),
        ..source.clone()
    };
    list.push(copy.clone());
    list.save(conn)?;

    tracing::info!(source_id = %id, agent_id = %copy.id, "duplicated agent profile");
    Ok(copy)
}

/// Clones a built-in template into a new stored profile.
pub fn create_from_template(
    conn: &Connection,
    template_id: &str,
) -> Result<AgentProfile, AgentStoreError> {
    let template = find_template(template_id)
        .ok_or_else(|| AgentStoreError::TemplateNotFound(template_id.to_string()))?;
    create_profile(conn, template.config.clone())
}
