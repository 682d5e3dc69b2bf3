//! Embedded schema migrations.
//!
//! Each migration is a SQL file compiled into the binary. The schema version
//! is SQLite's `user_version`: migration `n` (1-based) runs only when the
//! stored version is below `n`, and bumps it inside the same transaction.

use rusqlite::Connection;
use thiserror::Error;

/// Schema steps in order. Append only.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_kv_store",
    include_str!("migrations/001_kv_store.sql"),
)];

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration '{name}' failed: {source}")]
    ExecutionFailed {
        name: &'static str,
        source: rusqlite::Error,
    },

    #[error("failed to read schema version: {0}")]
    VersionQuery(rusqlite::Error),

    #[error("database schema version {found} is newer than this build supports ({known})")]
    UnknownVersion { found: usize, known: usize },
}

/// Brings the schema up to date and returns how many migrations ran.
///
/// # Errors
///
/// Fails if a migration does not apply (its changes are rolled back) or if the
/// database was written by a newer build.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    apply(conn, MIGRATIONS)
}

fn schema_version(conn: &Connection) -> Result<usize, MigrationError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .map(|v| v.max(0) as usize)
        .map_err(MigrationError::VersionQuery)
}

fn apply(conn: &Connection, migrations: &[(&'static str, &'static str)]) -> Result<usize, MigrationError> {
    let current = schema_version(conn)?;
    if current > migrations.len() {
        return Err(MigrationError::UnknownVersion {
            found: current,
            known: migrations.len(),
        });
    }

    for (index, &(name, sql)) in migrations.iter().enumerate().skip(current) {
        let version = index + 1;
        let failed = |source| MigrationError::ExecutionFailed { name, source };

        tracing::info!(migration = name, version, "applying migration");
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version as i64)
            .map_err(failed)?;
        tx.commit().map_err(failed)?;
    }

    Ok(migrations.len() - current)
}
