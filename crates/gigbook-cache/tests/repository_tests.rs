//! Integration tests for the SQLite adapters
//!
//! Each test creates a fresh in-memory database. Bookings are seeded with
//! raw SQL because the booking table is owned by another subsystem and
//! the adapters only read it.

use std::sync::Arc;

use chrono::NaiveDate;

use gigbook_cache::{DatabasePool, SqliteBookingSnapshot, SqliteResolutionStore};
use gigbook_conflict::{ConflictError, ConflictService};
use gigbook_core::domain::{BookingId, BookingPair, BookingStatus, Severity, UserId};
use gigbook_core::ports::{IBookingSnapshotProvider, IResolutionStore};

// ============================================================================
// Test helpers
// ============================================================================

async fn setup() -> DatabasePool {
    DatabasePool::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

fn user() -> UserId {
    UserId::new(1).unwrap()
}

fn bid(id: i64) -> BookingId {
    BookingId::new(id).unwrap()
}

fn pair(a: i64, b: i64) -> BookingPair {
    BookingPair::new(bid(a), bid(b)).unwrap()
}

fn june_16() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
}

#[allow(clippy::too_many_arguments)]
async fn seed_booking(
    db: &DatabasePool,
    id: i64,
    user_id: i64,
    client: &str,
    date: &str,
    start: Option<&str>,
    end: Option<&str>,
    status: &str,
) {
    sqlx::query(
        "INSERT INTO bookings (id, user_id, client_name, event_date, start_time, end_time, status) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(client)
    .bind(date)
    .bind(start)
    .bind(end)
    .bind(status)
    .execute(db.pool())
    .await
    .expect("seed booking");
}

/// Bookings 1 and 2 from the overlapping wedding/brunch scenario
async fn seed_overlap(db: &DatabasePool) {
    seed_booking(db, 1, 1, "Rivera Wedding", "2025-06-16", Some("19:00"), Some("23:00"), "confirmed").await;
    seed_booking(db, 2, 1, "Jazz Brunch Co", "2025-06-16", Some("20:00"), Some("22:00"), "new").await;
}

fn service(db: &DatabasePool) -> ConflictService {
    ConflictService::new(
        Arc::new(SqliteBookingSnapshot::new(db.pool().clone())),
        Arc::new(SqliteResolutionStore::new(db.pool().clone())),
    )
}

// ============================================================================
// Resolution store tests
// ============================================================================

#[tokio::test]
async fn test_create_and_find_resolution() {
    let db = setup().await;
    let store = SqliteResolutionStore::new(db.pool().clone());

    let created = store
        .create(user(), pair(2, 1), june_16(), Some("Support slot".into()))
        .await
        .unwrap();

    let found = store.find(user(), pair(1, 2)).await.unwrap().unwrap();
    assert_eq!(found.id(), created.id());
    assert_eq!(found.pair(), pair(1, 2));
    assert_eq!(found.conflict_date(), june_16());
    assert_eq!(found.notes(), Some("Support slot"));
    assert_eq!(found.resolved_by(), user());
}

#[tokio::test]
async fn test_find_missing_resolution() {
    let db = setup().await;
    let store = SqliteResolutionStore::new(db.pool().clone());

    assert!(store.find(user(), pair(1, 2)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_twice_keeps_one_row() {
    let db = setup().await;
    let store = SqliteResolutionStore::new(db.pool().clone());

    let first = store.create(user(), pair(1, 2), june_16(), None).await.unwrap();
    let later = NaiveDate::from_ymd_opt(2025, 6, 17).unwrap();
    let second = store
        .create(user(), pair(2, 1), later, Some("moved".into()))
        .await
        .unwrap();

    assert_eq!(second.id(), first.id());
    assert_eq!(second.conflict_date(), later);
    assert_eq!(second.notes(), Some("moved"));

    let all = store.list_all(user()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_keep_one_row() {
    let db = setup().await;
    let store = Arc::new(SqliteResolutionStore::new(db.pool().clone()));

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.create(user(), pair(1, 2), june_16(), None).await })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.create(user(), pair(2, 1), june_16(), None).await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    assert_eq!(store.list_all(user()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_resolution() {
    let db = setup().await;
    let store = SqliteResolutionStore::new(db.pool().clone());
    store.create(user(), pair(1, 2), june_16(), None).await.unwrap();

    assert!(store.delete(user(), pair(2, 1)).await.unwrap());
    assert!(!store.delete(user(), pair(1, 2)).await.unwrap());
    assert!(store.find(user(), pair(1, 2)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_resolutions_are_scoped_per_user() {
    let db = setup().await;
    let store = SqliteResolutionStore::new(db.pool().clone());
    let other = UserId::new(2).unwrap();

    store.create(user(), pair(1, 2), june_16(), None).await.unwrap();
    store.create(other, pair(1, 2), june_16(), None).await.unwrap();
    store.create(other, pair(3, 4), june_16(), None).await.unwrap();

    assert_eq!(store.list_all(user()).await.unwrap().len(), 1);
    assert_eq!(store.list_all(other).await.unwrap().len(), 2);

    assert!(store.delete(other, pair(1, 2)).await.unwrap());
    assert!(store.find(user(), pair(1, 2)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_schema_rejects_unsorted_pair() {
    let db = setup().await;

    let result = sqlx::query(
        "INSERT INTO conflict_resolutions \
         (id, user_id, booking_low, booking_high, conflict_date, resolved_by, resolved_at) \
         VALUES ('x', 1, 5, 2, '2025-06-16', 1, '2025-06-01T00:00:00Z')",
    )
    .execute(db.pool())
    .await;

    assert!(result.is_err());
}

// ============================================================================
// Booking snapshot tests
// ============================================================================

#[tokio::test]
async fn test_list_bookings_for_user() {
    let db = setup().await;
    seed_overlap(&db).await;
    seed_booking(&db, 3, 2, "Someone Else", "2025-06-16", None, None, "new").await;
    let snapshot = SqliteBookingSnapshot::new(db.pool().clone());

    let bookings = snapshot.list_bookings(user()).await.unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].client_name(), "Rivera Wedding");
    assert_eq!(bookings[0].status(), BookingStatus::Confirmed);
    assert_eq!(bookings[0].time_display(), "19:00\u{2013}23:00");
}

#[tokio::test]
async fn test_get_booking_respects_owner() {
    let db = setup().await;
    seed_overlap(&db).await;
    let snapshot = SqliteBookingSnapshot::new(db.pool().clone());

    assert!(snapshot.get_booking(user(), bid(2)).await.unwrap().is_some());
    assert!(snapshot
        .get_booking(UserId::new(2).unwrap(), bid(2))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_blank_times_read_as_missing() {
    let db = setup().await;
    seed_booking(&db, 3, 1, "Open Mic Night", "2025-06-16", Some(""), None, "new").await;
    let snapshot = SqliteBookingSnapshot::new(db.pool().clone());

    let booking = snapshot.get_booking(user(), bid(3)).await.unwrap().unwrap();
    assert!(booking.start_time().is_none());
    assert!(booking.time_window().is_none());
}

#[tokio::test]
async fn test_malformed_booking_fails_snapshot() {
    let db = setup().await;
    seed_overlap(&db).await;
    seed_booking(&db, 7, 1, "Broken", "16/06/2025", None, None, "new").await;
    let snapshot = SqliteBookingSnapshot::new(db.pool().clone());

    let err = snapshot.list_bookings(user()).await.unwrap_err();
    assert!(err.to_string().contains("booking 7"));
}

// ============================================================================
// End-to-end through ConflictService
// ============================================================================

#[tokio::test]
async fn test_service_reports_and_resolves() {
    let db = setup().await;
    seed_overlap(&db).await;
    let service = service(&db);

    let report = service.conflicts_for_user(user()).await.unwrap();
    assert_eq!(report.conflicts.len(), 2);
    assert_eq!(report.conflicts[0].severity, Severity::Hard);
    assert_eq!(report.conflicts[0].overlap_minutes, Some(120));

    service
        .resolve_conflict(user(), bid(2), bid(1), None, None)
        .await
        .unwrap();

    let report = service.conflicts_for_user(user()).await.unwrap();
    assert!(report.conflicts.is_empty());
    assert_eq!(report.summary().resolved, 1);

    assert!(service.unresolve_conflict(user(), bid(1), bid(2)).await.unwrap());
    assert!(!service.unresolve_conflict(user(), bid(1), bid(2)).await.unwrap());
}

#[tokio::test]
async fn test_service_resolution_survives_time_edit() {
    let db = setup().await;
    seed_overlap(&db).await;
    let service = service(&db);
    service
        .resolve_conflict(user(), bid(1), bid(2), Some(june_16()), None)
        .await
        .unwrap();

    sqlx::query("UPDATE bookings SET start_time = '21:00', end_time = '23:30' WHERE id = 2")
        .execute(db.pool())
        .await
        .unwrap();

    let report = service.conflicts_for_user(user()).await.unwrap();
    assert!(report.conflicts.is_empty());
}

#[tokio::test]
async fn test_service_cancelled_booking_drops_out() {
    let db = setup().await;
    seed_overlap(&db).await;
    let service = service(&db);

    sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = 2")
        .execute(db.pool())
        .await
        .unwrap();

    let report = service.conflicts_for_user(user()).await.unwrap();
    assert!(report.conflicts.is_empty());
    assert!(report.resolved.is_empty());
}

#[tokio::test]
async fn test_service_missing_booking_is_invalid_input() {
    let db = setup().await;
    seed_overlap(&db).await;
    let service = service(&db);

    let err = service
        .resolve_conflict(user(), bid(1), bid(40), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ConflictError::BookingNotFound { .. }));
}

#[tokio::test]
async fn test_service_surfaces_closed_pool() {
    let db = setup().await;
    seed_overlap(&db).await;
    let service = service(&db);
    db.pool().close().await;

    let err = service.conflicts_for_user(user()).await.unwrap_err();
    assert!(matches!(err, ConflictError::SnapshotUnavailable(_)));
}
