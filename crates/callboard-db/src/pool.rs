//! Connection pool creation and configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

const MEMORY_PATH: &str = ":memory:";

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections. Forced to 1 for
    /// in-memory databases.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),
}

/// Creates a SQLite connection pool.
///
/// File-backed databases run in WAL mode. `:memory:` gets a single shared
/// connection, since every new in-memory connection would otherwise open an
/// empty database.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the connection pool cannot be created.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let in_memory = db_path == MEMORY_PATH;
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = if in_memory {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(db_path)
    };

    let busy_timeout_ms = settings.busy_timeout_ms;
    let manager = manager.with_flags(flags).with_init(move |conn| {
        if !in_memory {
            let journal_mode: String =
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            if journal_mode != "wal" {
                tracing::warn!(journal_mode = %journal_mode, "sqlite refused WAL journal mode");
            }
        }
        conn.execute_batch(&format!("PRAGMA busy_timeout = {busy_timeout_ms};"))
    });

    let max_size = if in_memory { 1 } else { settings.pool_max_size.max(1) };
    tracing::debug!(path = db_path, max_size, "creating sqlite pool");

    let pool = Pool::builder().max_size(max_size).build(manager)?;
    Ok(pool)
}
