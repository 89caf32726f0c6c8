//! Gigbook Cache - Local SQLite persistence
//!
//! SQLite-backed adapters for:
//! - Conflict resolutions (owned by the conflict engine)
//! - Read-only booking snapshots (rows owned by the booking subsystem)
//!
//! ## Architecture
//!
//! This crate implements the `IResolutionStore` and
//! `IBookingSnapshotProvider` ports from `gigbook-core`. It is a driven
//! (secondary) adapter in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteResolutionStore`] - `IResolutionStore` implementation
//! - [`SqliteBookingSnapshot`] - `IBookingSnapshotProvider` implementation
//! - [`CacheError`] - Error types for cache operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use gigbook_cache::{DatabasePool, SqliteBookingSnapshot, SqliteResolutionStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/home/user/.local/share/gigbook/gigbook.db")).await?;
//! let store = SqliteResolutionStore::new(pool.pool().clone());
//! let snapshot = SqliteBookingSnapshot::new(pool.pool().clone());
//! // Hand both to gigbook_conflict::ConflictService...
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod repository;

pub use pool::DatabasePool;
pub use repository::{SqliteBookingSnapshot, SqliteResolutionStore};

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be turned back into a domain value
    #[error("Invalid row in {table}: {message}")]
    InvalidRow { table: &'static str, message: String },
}

impl From<sqlx::Error> for CacheError {
    fn from(e: sqlx::Error) -> Self {
        CacheError::QueryFailed(e.to_string())
    }
}
