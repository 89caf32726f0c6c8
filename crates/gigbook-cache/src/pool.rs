//! Database connection pool management
//!
//! Wraps SQLx's `SqlitePool` with:
//! - Parent directory creation for file databases
//! - WAL journal mode so reports can read while a resolution is written
//! - Versioned schema migrations tracked in `PRAGMA user_version`
//! - An in-memory mode for tests
//!
//! The pool is shared by the resolution store and the booking snapshot
//! reader, so both see the same file.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::CacheError;

/// Ordered schema migrations; the index + 1 is the schema version
const MIGRATIONS: &[&str] = &[include_str!("migrations/20250601_initial.sql")];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Manages a pool of SQLite connections for the Gigbook database
///
/// File databases get up to 5 connections and a 5-second busy timeout to
/// ride out write contention. In-memory databases use one connection,
/// since each SQLite in-memory connection is its own database.
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Opens (creating if needed) the database at `db_path` and migrates it
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the directory or connection
    /// cannot be created, or `CacheError::MigrationFailed` if the schema
    /// cannot be brought up to date.
    pub async fn new(db_path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CacheError::ConnectionFailed(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                CacheError::ConnectionFailed(format!(
                    "Failed to open database at {}: {}",
                    db_path.display(),
                    e
                ))
            })?;

        Self::migrate(&pool).await?;

        tracing::info!(path = %db_path.display(), "Database opened");

        Ok(Self { pool })
    }

    /// Creates a migrated in-memory database for tests
    ///
    /// # Errors
    ///
    /// Same as [`DatabasePool::new`].
    pub async fn in_memory() -> Result<Self, CacheError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                CacheError::ConnectionFailed(format!("Failed to create in-memory database: {}", e))
            })?;

        Self::migrate(&pool).await?;

        tracing::debug!("In-memory database initialized");

        Ok(Self { pool })
    }

    /// Returns a reference to the underlying SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Current schema version of the database
    pub async fn schema_version(&self) -> Result<i64, CacheError> {
        Self::user_version(&self.pool).await
    }

    async fn user_version(pool: &SqlitePool) -> Result<i64, CacheError> {
        let row = sqlx::query("PRAGMA user_version").fetch_one(pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    /// Applies every migration newer than the stored `user_version`
    async fn migrate(pool: &SqlitePool) -> Result<(), CacheError> {
        let current = Self::user_version(pool)
            .await
            .map_err(|e| CacheError::MigrationFailed(e.to_string()))?;

        for (index, sql) in MIGRATIONS.iter().enumerate() {
            let version = index as i64 + 1;
            if version <= current {
                continue;
            }

            let mut tx = pool.begin().await?;
            sqlx::raw_sql(sql).execute(&mut *tx).await.map_err(|e| {
                CacheError::MigrationFailed(format!("Migration {} failed: {}", version, e))
            })?;
            // PRAGMA does not accept bound parameters.
            sqlx::raw_sql(&format!("PRAGMA user_version = {version}"))
                .execute(&mut *tx)
                .await
                .map_err(|e| CacheError::MigrationFailed(e.to_string()))?;
            tx.commit().await?;

            tracing::debug!(version, "Applied schema migration");
        }

        Ok(())
    }
}
