//! Conflict reporter
//!
//! Merges detector output with a performer's stored resolutions and shapes
//! the result for the two consumers: the whole-calendar summary and the
//! single-booking detail view.
//!
//! A resolution suppresses its pair regardless of the date it was recorded
//! for. It describes the relationship between two bookings, so a
//! reschedule does not bring the conflict back. Suppressed conflicts stay
//! available in [`ConflictReport::resolved`] for audit and undo.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use gigbook_core::domain::{
    Booking, BookingId, BookingPair, BookingStatus, Conflict, ConflictReason,
    ConflictResolution, Severity, UserId,
};

use crate::detector::ConflictDetector;

/// One side of a conflict, as seen from `booking_id`
///
/// The client, status, venue and time fields describe the counterpart
/// (`with_booking_id`). `can_edit`/`can_reject` say whether that
/// counterpart can still be changed from this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictView {
    pub booking_id: BookingId,
    pub with_booking_id: BookingId,
    pub severity: Severity,
    pub client_name: String,
    pub status: BookingStatus,
    pub venue: Option<String>,
    pub time_display: String,
    pub message: String,
    pub can_edit: bool,
    pub can_reject: bool,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_minutes: Option<u32>,
}

impl ConflictView {
    /// The canonical pair behind this view
    pub fn pair(&self) -> Option<BookingPair> {
        BookingPair::new(self.booking_id, self.with_booking_id).ok()
    }
}

/// A conflict hidden by a stored resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConflictView {
    #[serde(flatten)]
    pub view: ConflictView,
    pub resolution: ConflictResolution,
}

/// Output of a report run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    /// Unresolved conflicts, hard first
    pub conflicts: Vec<ConflictView>,
    /// Conflicts suppressed by a resolution
    pub resolved: Vec<ResolvedConflictView>,
}

/// Counts of distinct conflicting pairs in a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub hard: usize,
    pub soft: usize,
    pub resolved: usize,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Counts each pair once, even when both perspectives are listed
    pub fn summary(&self) -> ReportSummary {
        let mut hard = HashSet::new();
        let mut soft = HashSet::new();
        for view in &self.conflicts {
            let Some(pair) = view.pair() else { continue };
            match view.severity {
                Severity::Hard => hard.insert(pair),
                Severity::Soft => soft.insert(pair),
            };
        }

        let resolved: HashSet<_> = self
            .resolved
            .iter()
            .map(|r| r.resolution.pair())
            .collect();

        ReportSummary {
            hard: hard.len(),
            soft: soft.len(),
            resolved: resolved.len(),
        }
    }
}

/// Builds conflict reports from a booking snapshot and resolutions
pub struct ConflictReporter;

impl ConflictReporter {
    /// Whole-calendar report for `user_id`
    ///
    /// Every conflicting pair appears twice, once from each booking's
    /// perspective. Resolutions belonging to other users are ignored.
    pub fn report_for_user(
        user_id: UserId,
        bookings: &[Booking],
        resolutions: &[ConflictResolution],
    ) -> ConflictReport {
        let conflicts = ConflictDetector::detect_all(bookings);
        let index = index_bookings(bookings);
        let resolved_pairs = index_resolutions(user_id, resolutions);

        let mut report = ConflictReport::default();
        for conflict in &conflicts {
            let pair = conflict.pair();
            let (Some(low), Some(high)) = (index.get(&pair.low()), index.get(&pair.high())) else {
                continue;
            };

            let views = [
                build_view(low, high, conflict),
                build_view(high, low, conflict),
            ];
            push_views(&mut report, views, resolved_pairs.get(&pair).copied());
        }

        sort_report(&mut report);
        report
    }

    /// Detail report for a single booking
    ///
    /// Every entry is seen from `target`'s perspective.
    pub fn report_for_booking(
        user_id: UserId,
        target: &Booking,
        bookings: &[Booking],
        resolutions: &[ConflictResolution],
    ) -> ConflictReport {
        let conflicts = ConflictDetector::detect_one(target, bookings);
        let index = index_bookings(bookings);
        let resolved_pairs = index_resolutions(user_id, resolutions);

        let mut report = ConflictReport::default();
        for conflict in &conflicts {
            let pair = conflict.pair();
            let Some(other) = pair.other(target.id()).and_then(|id| index.get(&id)) else {
                continue;
            };

            push_views(
                &mut report,
                [build_view(target, other, conflict)],
                resolved_pairs.get(&pair).copied(),
            );
        }

        sort_report(&mut report);
        report
    }
}

fn index_bookings(bookings: &[Booking]) -> HashMap<BookingId, &Booking> {
    bookings.iter().map(|b| (b.id(), b)).collect()
}

fn index_resolutions(
    user_id: UserId,
    resolutions: &[ConflictResolution],
) -> HashMap<BookingPair, &ConflictResolution> {
    resolutions
        .iter()
        .filter(|r| r.user_id() == user_id)
        .map(|r| (r.pair(), r))
        .collect()
}

fn push_views<const N: usize>(
    report: &mut ConflictReport,
    views: [ConflictView; N],
    resolution: Option<&ConflictResolution>,
) {
    match resolution {
        Some(resolution) => report
            .resolved
            .extend(views.into_iter().map(|view| ResolvedConflictView {
                view,
                resolution: resolution.clone(),
            })),
        None => report.conflicts.extend(views),
    }
}

fn build_view(from: &Booking, with: &Booking, conflict: &Conflict) -> ConflictView {
    let editable = with.status().is_editable();

    ConflictView {
        booking_id: from.id(),
        with_booking_id: with.id(),
        severity: conflict.severity(),
        client_name: with.client_name().to_string(),
        status: with.status(),
        venue: with.venue().map(str::to_string),
        time_display: with.time_display(),
        message: conflict_message(with, conflict),
        can_edit: editable,
        can_reject: editable,
        date: conflict.date(),
        overlap_minutes: conflict.overlap_minutes(),
    }
}

/// Message describing the conflict with `with`; both perspectives use the
/// same wording with the counterpart swapped
fn conflict_message(with: &Booking, conflict: &Conflict) -> String {
    let client = with.client_name();
    match conflict.reason() {
        ConflictReason::TimeOverlap => format!(
            "Overlaps with {} ({}) by {} minutes",
            client,
            with.time_display(),
            conflict.overlap_minutes().unwrap_or(0)
        ),
        ConflictReason::MissingTime => format!(
            "Same day as {}: {}",
            client,
            ConflictReason::MissingTime.description()
        ),
        ConflictReason::SameDay => format!(
            "Same day as {} ({}), no time overlap",
            client,
            with.time_display()
        ),
    }
}

fn sort_report(report: &mut ConflictReport) {
    report.conflicts.sort_by(compare_views);
    report
        .resolved
        .sort_by(|a, b| compare_views(&a.view, &b.view));
}

fn compare_views(a: &ConflictView, b: &ConflictView) -> std::cmp::Ordering {
    b.severity
        .cmp(&a.severity)
        .then(a.booking_id.cmp(&b.booking_id))
        .then(a.with_booking_id.cmp(&b.with_booking_id))
}
