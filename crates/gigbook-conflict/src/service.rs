//! Conflict service - the engine's external operations
//!
//! Wires the booking snapshot provider and the resolution store to the
//! detector and reporter. Every call takes a fresh snapshot; nothing is
//! cached between calls.
//!
//! Store failures are surfaced immediately as
//! [`ConflictError::ResolutionStoreUnavailable`]. A failed lookup is never
//! read as "no resolution exists".

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use gigbook_core::{
    domain::{Booking, BookingId, BookingPair, ConflictResolution, UserId},
    ports::{IBookingSnapshotProvider, IResolutionStore},
};

use crate::{
    error::ConflictError,
    reporter::{ConflictReport, ConflictReporter},
};

/// Entry point for reporting and resolving booking conflicts
pub struct ConflictService {
    snapshot: Arc<dyn IBookingSnapshotProvider>,
    store: Arc<dyn IResolutionStore>,
}

impl ConflictService {
    pub fn new(
        snapshot: Arc<dyn IBookingSnapshotProvider>,
        store: Arc<dyn IResolutionStore>,
    ) -> Self {
        Self { snapshot, store }
    }

    /// Whole-calendar summary for a performer
    pub async fn conflicts_for_user(&self, user_id: UserId) -> Result<ConflictReport, ConflictError> {
        let bookings = self.bookings(user_id).await?;
        let resolutions = self.list_resolutions(user_id).await?;

        let report = ConflictReporter::report_for_user(user_id, &bookings, &resolutions);
        let summary = report.summary();
        debug!(
            user_id = %user_id,
            hard = summary.hard,
            soft = summary.soft,
            resolved = summary.resolved,
            "Built conflict report"
        );

        Ok(report)
    }

    /// Conflicts involving a single booking, seen from that booking
    pub async fn conflicts_for_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
    ) -> Result<ConflictReport, ConflictError> {
        let bookings = self.bookings(user_id).await?;
        let target = find_in(&bookings, user_id, booking_id)?;
        let resolutions = self.list_resolutions(user_id).await?;

        Ok(ConflictReporter::report_for_booking(
            user_id,
            target,
            &bookings,
            &resolutions,
        ))
    }

    /// Accepts the conflict between two bookings
    ///
    /// Argument order does not matter. Both bookings must exist in the
    /// user's current calendar. When `conflict_date` is omitted the event
    /// date of the lower booking id is recorded. Calling this again for the
    /// same pair replaces the earlier resolution.
    pub async fn resolve_conflict(
        &self,
        user_id: UserId,
        a: BookingId,
        b: BookingId,
        conflict_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<ConflictResolution, ConflictError> {
        let pair = BookingPair::new(a, b)?;

        let bookings = self.bookings(user_id).await?;
        let low = find_in(&bookings, user_id, pair.low())?;
        find_in(&bookings, user_id, pair.high())?;

        let conflict_date = conflict_date.unwrap_or_else(|| low.event_date());

        let resolution = self
            .store
            .create(user_id, pair, conflict_date, notes)
            .await
            .map_err(ConflictError::ResolutionStoreUnavailable)?;

        info!(
            user_id = %user_id,
            pair = %pair,
            date = %conflict_date,
            resolution_id = %resolution.id(),
            "Conflict resolved"
        );

        Ok(resolution)
    }

    /// Withdraws a resolution so the pair is reported again
    ///
    /// Returns `false` if the pair had no resolution.
    pub async fn unresolve_conflict(
        &self,
        user_id: UserId,
        a: BookingId,
        b: BookingId,
    ) -> Result<bool, ConflictError> {
        let pair = BookingPair::new(a, b)?;

        let removed = self
            .store
            .delete(user_id, pair)
            .await
            .map_err(ConflictError::ResolutionStoreUnavailable)?;

        if removed {
            info!(user_id = %user_id, pair = %pair, "Conflict unresolved");
        } else {
            debug!(user_id = %user_id, pair = %pair, "No resolution to remove");
        }

        Ok(removed)
    }

    /// Looks up the stored resolution for a pair
    pub async fn resolution_for(
        &self,
        user_id: UserId,
        a: BookingId,
        b: BookingId,
    ) -> Result<Option<ConflictResolution>, ConflictError> {
        let pair = BookingPair::new(a, b)?;
        self.store
            .find(user_id, pair)
            .await
            .map_err(ConflictError::ResolutionStoreUnavailable)
    }

    /// All stored resolutions for a performer
    pub async fn list_resolutions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ConflictResolution>, ConflictError> {
        self.store
            .list_all(user_id)
            .await
            .map_err(ConflictError::ResolutionStoreUnavailable)
    }

    async fn bookings(&self, user_id: UserId) -> Result<Vec<Booking>, ConflictError> {
        self.snapshot
            .list_bookings(user_id)
            .await
            .map_err(ConflictError::SnapshotUnavailable)
    }
}

fn find_in(
    bookings: &[Booking],
    user_id: UserId,
    booking_id: BookingId,
) -> Result<&Booking, ConflictError> {
    bookings
        .iter()
        .find(|b| b.id() == booking_id)
        .ok_or(ConflictError::BookingNotFound {
            user_id,
            booking_id,
        })
}
