//! Overlap calculator
//!
//! Compares the date/time windows of two bookings and classifies the
//! collision, if any. Pure and symmetric: `classify(a, b)` and
//! `classify(b, a)` always agree.

use chrono::{NaiveTime, Timelike};

use gigbook_core::domain::{Booking, ConflictReason, Severity};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Result of comparing two bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Different days (or the same booking): no collision
    NoConflict,
    /// The bookings collide
    Conflict {
        severity: Severity,
        /// `None` when either time window is incomplete
        overlap_minutes: Option<u32>,
        reason: ConflictReason,
    },
}

impl Classification {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Classification::Conflict { .. })
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            Classification::Conflict { severity, .. } => Some(*severity),
            Classification::NoConflict => None,
        }
    }
}

/// Classifies the collision between two bookings
///
/// 1. Different calendar dates never conflict.
/// 2. Same date with an incomplete time window on either side is a hard
///    conflict: missing data must not be downgraded to a warning.
/// 3. Same date with both windows known: positive overlap is hard,
///    otherwise soft with `overlap_minutes = Some(0)`.
///
/// Intervals are half-open, so a booking ending at 20:00 and another
/// starting at 20:00 do not overlap.
pub fn classify(a: &Booking, b: &Booking) -> Classification {
    if a.id() == b.id() || a.event_date() != b.event_date() {
        return Classification::NoConflict;
    }

    let (Some(window_a), Some(window_b)) = (a.time_window(), b.time_window()) else {
        return Classification::Conflict {
            severity: Severity::Hard,
            overlap_minutes: None,
            reason: ConflictReason::MissingTime,
        };
    };

    let overlap = overlap_minutes(window_a, window_b);
    if overlap > 0 {
        Classification::Conflict {
            severity: Severity::Hard,
            overlap_minutes: Some(overlap),
            reason: ConflictReason::TimeOverlap,
        }
    } else {
        Classification::Conflict {
            severity: Severity::Soft,
            overlap_minutes: Some(0),
            reason: ConflictReason::SameDay,
        }
    }
}

/// Minutes shared by two `[start, end)` windows on the same day
pub fn overlap_minutes(a: (NaiveTime, NaiveTime), b: (NaiveTime, NaiveTime)) -> u32 {
    let (start_a, end_a) = to_minutes(a);
    let (start_b, end_b) = to_minutes(b);

    let overlap = end_a.min(end_b) - start_a.max(start_b);
    u32::try_from(overlap.max(0)).unwrap_or(0)
}

/// Converts a window to minutes from midnight; an end before the start
/// runs past midnight into the next day
fn to_minutes((start, end): (NaiveTime, NaiveTime)) -> (i64, i64) {
    let start = minutes_of(start);
    let mut end = minutes_of(end);
    if end < start {
        end += MINUTES_PER_DAY;
    }
    (start, end)
}

fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gigbook_core::domain::{BookingId, BookingStatus};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn booking(id: i64, date: (i32, u32, u32)) -> Booking {
        Booking::new(
            BookingId::new(id).unwrap(),
            format!("Client {id}"),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            BookingStatus::New,
        )
    }

    fn timed(id: i64, date: (i32, u32, u32), start: (u32, u32), end: (u32, u32)) -> Booking {
        booking(id, date).with_times(time(start.0, start.1), time(end.0, end.1))
    }

    #[test]
    fn test_different_dates_never_conflict() {
        let a = timed(1, (2025, 6, 16), (19, 0), (23, 0));
        let b = timed(2, (2025, 6, 17), (19, 0), (23, 0));
        assert_eq!(classify(&a, &b), Classification::NoConflict);

        let a = booking(1, (2025, 6, 16));
        let b = booking(2, (2025, 6, 17));
        assert_eq!(classify(&a, &b), Classification::NoConflict);
    }

    #[test]
    fn test_overlapping_windows_are_hard() {
        let a = timed(1, (2025, 6, 16), (19, 0), (23, 0));
        let b = timed(2, (2025, 6, 16), (20, 0), (22, 0));

        assert_eq!(
            classify(&a, &b),
            Classification::Conflict {
                severity: Severity::Hard,
                overlap_minutes: Some(120),
                reason: ConflictReason::TimeOverlap,
            }
        );
    }

    #[test]
    fn test_missing_times_fail_safe_to_hard() {
        let a = booking(3, (2025, 6, 16));
        let b = timed(4, (2025, 6, 16), (9, 0), (11, 0));

        assert_eq!(
            classify(&a, &b),
            Classification::Conflict {
                severity: Severity::Hard,
                overlap_minutes: None,
                reason: ConflictReason::MissingTime,
            }
        );
    }

    #[test]
    fn test_partial_window_counts_as_missing() {
        let a = booking(1, (2025, 6, 16)).with_start_time(time(8, 0));
        let b = timed(2, (2025, 6, 16), (20, 0), (22, 0));

        let result = classify(&a, &b);
        assert_eq!(result.severity(), Some(Severity::Hard));
        assert!(matches!(
            result,
            Classification::Conflict {
                reason: ConflictReason::MissingTime,
                overlap_minutes: None,
                ..
            }
        ));
    }

    #[test]
    fn test_adjacent_windows_are_soft() {
        let a = timed(5, (2025, 7, 1), (18, 0), (20, 0));
        let b = timed(6, (2025, 7, 1), (20, 0), (22, 0));

        assert_eq!(
            classify(&a, &b),
            Classification::Conflict {
                severity: Severity::Soft,
                overlap_minutes: Some(0),
                reason: ConflictReason::SameDay,
            }
        );
    }

    #[test]
    fn test_classification_is_symmetric() {
        let cases = [
            (
                timed(1, (2025, 6, 16), (19, 0), (23, 0)),
                timed(2, (2025, 6, 16), (20, 0), (22, 0)),
            ),
            (
                booking(3, (2025, 6, 16)),
                timed(4, (2025, 6, 16), (9, 0), (11, 0)),
            ),
            (
                timed(5, (2025, 7, 1), (18, 0), (20, 0)),
                timed(6, (2025, 7, 1), (20, 0), (22, 0)),
            ),
            (
                timed(7, (2025, 7, 1), (22, 0), (2, 0)),
                timed(8, (2025, 7, 1), (23, 30), (23, 45)),
            ),
        ];

        for (a, b) in &cases {
            assert_eq!(classify(a, b), classify(b, a));
        }
    }

    #[test]
    fn test_booking_never_conflicts_with_itself() {
        let a = timed(1, (2025, 6, 16), (19, 0), (23, 0));
        assert_eq!(classify(&a, &a), Classification::NoConflict);

        let untimed = booking(2, (2025, 6, 16));
        assert!(!classify(&untimed, &untimed).is_conflict());
    }

    #[test]
    fn test_overnight_window_wraps_past_midnight() {
        let late = timed(1, (2025, 8, 2), (22, 0), (2, 0));
        let after = timed(2, (2025, 8, 2), (23, 0), (23, 30));

        let result = classify(&late, &after);
        assert!(matches!(
            result,
            Classification::Conflict {
                severity: Severity::Hard,
                overlap_minutes: Some(30),
                ..
            }
        ));
    }

    #[test]
    fn test_contained_window_overlap() {
        assert_eq!(
            overlap_minutes((time(10, 0), time(16, 0)), (time(11, 15), time(12, 45))),
            90
        );
        assert_eq!(
            overlap_minutes((time(10, 0), time(11, 0)), (time(12, 0), time(13, 0))),
            0
        );
    }
}
