//! Resolution store port (driven/secondary port)
//!
//! Persists the pairs a performer has explicitly accepted so that they
//! stop resurfacing in conflict reports.
//!
//! ## Design Notes
//!
//! - Keyed by `(UserId, BookingPair)`. `BookingPair` is canonical by
//!   construction, so lookups never depend on argument order.
//! - `create` must behave as an upsert: concurrent or repeated calls for
//!   the same key leave exactly one live resolution.
//! - `delete` is idempotent and reports whether a row was removed.
//! - Errors are returned as-is; callers must not read a failed `find` as
//!   "no resolution".

use chrono::NaiveDate;

use crate::domain::{BookingPair, ConflictResolution, UserId};

/// Port trait for persisted conflict resolutions
#[async_trait::async_trait]
pub trait IResolutionStore: Send + Sync {
    /// Looks up the live resolution for an exact canonical pair
    async fn find(
        &self,
        user_id: UserId,
        pair: BookingPair,
    ) -> anyhow::Result<Option<ConflictResolution>>;

    /// Records a resolution, replacing any existing one for the same pair
    async fn create(
        &self,
        user_id: UserId,
        pair: BookingPair,
        conflict_date: NaiveDate,
        notes: Option<String>,
    ) -> anyhow::Result<ConflictResolution>;

    /// Removes the resolution for a pair
    ///
    /// Returns `false` if there was nothing to remove.
    async fn delete(&self, user_id: UserId, pair: BookingPair) -> anyhow::Result<bool>;

    /// Returns all live resolutions for a user, oldest first
    async fn list_all(&self, user_id: UserId) -> anyhow::Result<Vec<ConflictResolution>>;
}
