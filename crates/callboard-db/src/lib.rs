//! Local persistence for Callboard.
//!
//! Provides SQLite connection pooling (via `r2d2`), embedded SQL migrations,
//! and a flat key-value table. Agent profiles are stored as a single JSON
//! document under one key, so the key-value helpers are the only query
//! surface the rest of the workspace needs.
//!
//! In-memory databases (`:memory:`) are supported for tests; the pool keeps
//! one connection in that case so every caller sees the same data.

mod kv;
mod migrations;
mod pool;

pub use kv::{kv_get, kv_put};
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
