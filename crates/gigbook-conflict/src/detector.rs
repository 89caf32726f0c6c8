//! Conflict detection logic
//!
//! Runs the overlap calculator over every unordered pair of a performer's
//! active bookings. Pairwise comparison is quadratic, which is fine for a
//! single calendar; grouping by event date first is the way to scale it.

use gigbook_core::domain::{Booking, BookingPair, Conflict};
use tracing::{debug, warn};

use crate::overlap::{classify, Classification};

/// Detects scheduling conflicts among a set of bookings
pub struct ConflictDetector;

impl ConflictDetector {
    /// Returns every conflict among the active bookings in `bookings`
    ///
    /// Cancelled and completed bookings are ignored. Output is ordered by
    /// canonical pair, independent of input order.
    pub fn detect_all(bookings: &[Booking]) -> Vec<Conflict> {
        let active = active_sorted(bookings);
        let mut conflicts = Vec::new();

        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                if let Some(conflict) = build_conflict(a, b) {
                    conflicts.push(conflict);
                }
            }
        }

        debug!(
            bookings = bookings.len(),
            active = active.len(),
            conflicts = conflicts.len(),
            "Detected booking conflicts"
        );

        conflicts
    }

    /// Returns the conflicts between `target` and the active bookings in
    /// `others`
    ///
    /// `others` may contain `target` itself; it is skipped. An inactive
    /// target has no conflicts.
    pub fn detect_one(target: &Booking, others: &[Booking]) -> Vec<Conflict> {
        if !target.is_active() {
            debug!(booking_id = %target.id(), status = %target.status(), "Target booking inactive");
            return Vec::new();
        }

        active_sorted(others)
            .into_iter()
            .filter(|other| other.id() != target.id())
            .filter_map(|other| build_conflict(target, other))
            .collect()
    }
}

fn active_sorted(bookings: &[Booking]) -> Vec<&Booking> {
    let mut active: Vec<&Booking> = bookings.iter().filter(|b| b.is_active()).collect();
    active.sort_by_key(|b| b.id());
    active
}

fn build_conflict(a: &Booking, b: &Booking) -> Option<Conflict> {
    let Classification::Conflict {
        severity,
        overlap_minutes,
        reason,
    } = classify(a, b)
    else {
        return None;
    };

    // Duplicate ids in a snapshot are malformed upstream data.
    let pair = match BookingPair::new(a.id(), b.id()) {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, "Skipping malformed booking pair");
            return None;
        }
    };

    Some(Conflict::new(
        pair,
        a.event_date(),
        severity,
        overlap_minutes,
        reason,
    ))
}
