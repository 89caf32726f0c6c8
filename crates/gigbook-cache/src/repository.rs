//! SQLite implementations of the Gigbook ports
//!
//! [`SqliteResolutionStore`] owns the `conflict_resolutions` table.
//! [`SqliteBookingSnapshot`] reads the `bookings` table, which belongs to
//! the booking subsystem, and never writes to it.
//!
//! ## Type Mapping
//!
//! | Domain Type         | SQL Type | Strategy                                  |
//! |---------------------|----------|-------------------------------------------|
//! | BookingId, UserId   | INTEGER  | `as_i64()` / `TryFrom<i64>`               |
//! | BookingPair         | 2x INTEGER | `booking_low`, `booking_high` columns   |
//! | ResolutionId        | TEXT     | UUID string via `to_string()` / `FromStr` |
//! | NaiveDate           | TEXT     | `YYYY-MM-DD`                              |
//! | NaiveTime           | TEXT     | `HH:MM` (`HH:MM:SS` accepted on read)     |
//! | DateTime<Utc>       | TEXT     | RFC 3339 via `to_rfc3339()`               |
//! | BookingStatus       | TEXT     | snake_case via `as_str()` / `FromStr`     |

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use gigbook_core::domain::booking::{parse_date, parse_time, DATE_FORMAT};
use gigbook_core::domain::{
    Booking, BookingId, BookingPair, BookingStatus, ConflictResolution, ResolutionId, UserId,
};
use gigbook_core::ports::{IBookingSnapshotProvider, IResolutionStore};

use crate::CacheError;

const BOOKINGS: &str = "bookings";
const RESOLUTIONS: &str = "conflict_resolutions";

// ============================================================================
// Helper functions for type conversion
// ============================================================================

fn invalid(table: &'static str, message: impl Into<String>) -> CacheError {
    CacheError::InvalidRow {
        table,
        message: message.into(),
    }
}

/// Parse a DateTime<Utc> from RFC 3339, falling back to SQLite's default format
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| invalid(RESOLUTIONS, format!("bad timestamp '{}': {}", s, e)))
}

/// Parse an optional time column; blank values count as missing
fn parse_optional_time(
    value: Option<String>,
    booking_id: i64,
) -> Result<Option<chrono::NaiveTime>, CacheError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_time(s)
            .map(Some)
            .map_err(|e| invalid(BOOKINGS, format!("booking {}: {}", booking_id, e))),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ============================================================================
// Row mapping functions
// ============================================================================

/// Reconstruct a validated Booking from a `bookings` row
fn booking_from_row(row: &SqliteRow) -> Result<Booking, CacheError> {
    let raw_id: i64 = row.try_get("id")?;
    let client_name: String = row.try_get("client_name")?;
    let event_date: String = row.try_get("event_date")?;
    let start_time: Option<String> = row.try_get("start_time")?;
    let end_time: Option<String> = row.try_get("end_time")?;
    let venue: Option<String> = row.try_get("venue")?;
    let status: String = row.try_get("status")?;

    let context = |e: gigbook_core::domain::DomainError| {
        invalid(BOOKINGS, format!("booking {}: {}", raw_id, e))
    };

    let id = BookingId::new(raw_id).map_err(context)?;
    let event_date = parse_date(&event_date).map_err(context)?;
    let status: BookingStatus = status.parse().map_err(context)?;

    let mut booking = Booking::new(id, client_name, event_date, status);
    if let Some(start) = parse_optional_time(start_time, raw_id)? {
        booking = booking.with_start_time(start);
    }
    if let Some(end) = parse_optional_time(end_time, raw_id)? {
        booking = booking.with_end_time(end);
    }
    if let Some(venue) = venue.filter(|v| !v.trim().is_empty()) {
        booking = booking.with_venue(venue);
    }

    booking.validate().map_err(context)?;
    Ok(booking)
}

/// Reconstruct a ConflictResolution from a `conflict_resolutions` row
fn resolution_from_row(row: &SqliteRow) -> Result<ConflictResolution, CacheError> {
    let id: String = row.try_get("id")?;
    let user_id: i64 = row.try_get("user_id")?;
    let booking_low: i64 = row.try_get("booking_low")?;
    let booking_high: i64 = row.try_get("booking_high")?;
    let conflict_date: String = row.try_get("conflict_date")?;
    let resolved_by: i64 = row.try_get("resolved_by")?;
    let notes: Option<String> = row.try_get("notes")?;
    let resolved_at: String = row.try_get("resolved_at")?;

    let context = |e: gigbook_core::domain::DomainError| {
        invalid(RESOLUTIONS, format!("resolution {}: {}", id, e))
    };

    let pair = BookingPair::new(
        BookingId::new(booking_low).map_err(context)?,
        BookingId::new(booking_high).map_err(context)?,
    )
    .map_err(context)?;

    Ok(ConflictResolution::from_parts(
        id.parse::<ResolutionId>().map_err(context)?,
        UserId::new(user_id).map_err(context)?,
        pair,
        parse_date(&conflict_date).map_err(context)?,
        UserId::new(resolved_by).map_err(context)?,
        notes,
        parse_datetime(&resolved_at)?,
    ))
}

// ============================================================================
// IResolutionStore implementation
// ============================================================================

/// SQLite-backed store of conflict resolutions
///
/// The `(user_id, booking_low, booking_high)` unique key makes `create` a
/// single-statement upsert, so concurrent double submits leave one row.
pub struct SqliteResolutionStore {
    pool: SqlitePool,
}

impl SqliteResolutionStore {
    /// Creates a new store using the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IResolutionStore for SqliteResolutionStore {
    async fn find(
        &self,
        user_id: UserId,
        pair: BookingPair,
    ) -> anyhow::Result<Option<ConflictResolution>> {
        let row = sqlx::query(
            "SELECT * FROM conflict_resolutions \
             WHERE user_id = ? AND booking_low = ? AND booking_high = ?",
        )
        .bind(user_id.as_i64())
        .bind(pair.low().as_i64())
        .bind(pair.high().as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(resolution_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        user_id: UserId,
        pair: BookingPair,
        conflict_date: NaiveDate,
        notes: Option<String>,
    ) -> anyhow::Result<ConflictResolution> {
        let draft = ConflictResolution::new(user_id, pair, conflict_date, notes);

        // An existing row keeps its id; everything else is replaced.
        let row = sqlx::query(
            "INSERT INTO conflict_resolutions \
             (id, user_id, booking_low, booking_high, conflict_date, \
              resolved_by, notes, resolved_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (user_id, booking_low, booking_high) DO UPDATE SET \
              conflict_date = excluded.conflict_date, \
              resolved_by = excluded.resolved_by, \
              notes = excluded.notes, \
              resolved_at = excluded.resolved_at \
             RETURNING *",
        )
        .bind(draft.id().to_string())
        .bind(user_id.as_i64())
        .bind(pair.low().as_i64())
        .bind(pair.high().as_i64())
        .bind(format_date(conflict_date))
        .bind(draft.resolved_by().as_i64())
        .bind(draft.notes())
        .bind(draft.resolved_at().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let stored = resolution_from_row(&row)?;
        tracing::trace!(
            resolution_id = %stored.id(),
            user_id = %user_id,
            pair = %pair,
            "Saved conflict resolution"
        );
        Ok(stored)
    }

    async fn delete(&self, user_id: UserId, pair: BookingPair) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM conflict_resolutions \
             WHERE user_id = ? AND booking_low = ? AND booking_high = ?",
        )
        .bind(user_id.as_i64())
        .bind(pair.low().as_i64())
        .bind(pair.high().as_i64())
        .execute(&self.pool)
        .await?;

        let removed = result.rows_affected() > 0;
        tracing::trace!(user_id = %user_id, pair = %pair, removed, "Deleted conflict resolution");
        Ok(removed)
    }

    async fn list_all(&self, user_id: UserId) -> anyhow::Result<Vec<ConflictResolution>> {
        let rows = sqlx::query(
            "SELECT * FROM conflict_resolutions WHERE user_id = ? \
             ORDER BY resolved_at ASC, booking_low ASC, booking_high ASC",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut resolutions = Vec::with_capacity(rows.len());
        for row in &rows {
            resolutions.push(resolution_from_row(row)?);
        }

        Ok(resolutions)
    }
}

// ============================================================================
// IBookingSnapshotProvider implementation
// ============================================================================

/// Read-only view of the `bookings` table
///
/// Rows are validated on the way out. A malformed row fails the whole read
/// rather than being skipped, since dropping a booking could hide a
/// conflict.
pub struct SqliteBookingSnapshot {
    pool: SqlitePool,
}

impl SqliteBookingSnapshot {
    /// Creates a new snapshot reader using the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IBookingSnapshotProvider for SqliteBookingSnapshot {
    async fn list_bookings(&self, user_id: UserId) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query(
            "SELECT id, client_name, event_date, start_time, end_time, venue, status \
             FROM bookings WHERE user_id = ? ORDER BY event_date ASC, id ASC",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in &rows {
            bookings.push(booking_from_row(row)?);
        }

        tracing::trace!(user_id = %user_id, count = bookings.len(), "Read booking snapshot");
        Ok(bookings)
    }

    async fn get_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
    ) -> anyhow::Result<Option<Booking>> {
        let row = sqlx::query(
            "SELECT id, client_name, event_date, start_time, end_time, venue, status \
             FROM bookings WHERE user_id = ? AND id = ?",
        )
        .bind(user_id.as_i64())
        .bind(booking_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(booking_from_row(r)?)),
            None => Ok(None),
        }
    }
}
