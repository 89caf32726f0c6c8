//! Conflict domain entities
//!
//! This module defines the derived `Conflict` record produced by the
//! detector and the persisted `ConflictResolution` a performer creates
//! when they accept a collision.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{BookingPair, ResolutionId, UserId};

/// How serious a scheduling collision is
///
/// Ordering follows priority: `Hard > Soft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Same day, no known time overlap
    Soft,
    /// Known time overlap, or times missing so overlap cannot be ruled out
    Hard,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Hard => "hard",
            Severity::Soft => "soft",
        };
        write!(f, "{}", s)
    }
}

/// Why two bookings were classified as conflicting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// At least one booking lacks a full time window
    MissingTime,
    /// Both windows are known and intersect
    TimeOverlap,
    /// Both windows are known and do not intersect
    SameDay,
}

impl ConflictReason {
    /// Fixed human-readable description of the reason
    pub fn description(&self) -> &'static str {
        match self {
            ConflictReason::MissingTime => "missing time information \u{2014} cannot rule out overlap",
            ConflictReason::TimeOverlap => "time overlap",
            ConflictReason::SameDay => "same-day booking, no time overlap",
        }
    }
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A scheduling collision between two active bookings
///
/// Conflicts are derived on every report and never persisted. The pair is
/// canonical, so the same collision seen from either booking is the same
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pair: BookingPair,
    date: NaiveDate,
    severity: Severity,
    overlap_minutes: Option<u32>,
    reason: ConflictReason,
}

impl Conflict {
    pub fn new(
        pair: BookingPair,
        date: NaiveDate,
        severity: Severity,
        overlap_minutes: Option<u32>,
        reason: ConflictReason,
    ) -> Self {
        Self {
            pair,
            date,
            severity,
            overlap_minutes,
            reason,
        }
    }

    pub fn pair(&self) -> BookingPair {
        self.pair
    }

    /// The calendar date both bookings fall on
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Minutes of overlap; `None` when a time window is missing
    pub fn overlap_minutes(&self) -> Option<u32> {
        self.overlap_minutes
    }

    pub fn reason(&self) -> ConflictReason {
        self.reason
    }
}

/// A performer's decision to stop reporting a specific conflicting pair
///
/// Resolutions are keyed by `(user_id, pair)`; they are created and
/// deleted but never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    id: ResolutionId,
    user_id: UserId,
    pair: BookingPair,
    conflict_date: NaiveDate,
    resolved_by: UserId,
    notes: Option<String>,
    resolved_at: DateTime<Utc>,
}

impl ConflictResolution {
    /// Creates a new resolution made by `user_id` now
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use gigbook_core::domain::conflict::ConflictResolution;
    /// use gigbook_core::domain::newtypes::{BookingId, BookingPair, UserId};
    ///
    /// let pair = BookingPair::new(BookingId::new(2).unwrap(), BookingId::new(1).unwrap()).unwrap();
    /// let user = UserId::new(1).unwrap();
    /// let resolution = ConflictResolution::new(
    ///     user,
    ///     pair,
    ///     NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
    ///     Some("Support slot, fine to double up".to_string()),
    /// );
    ///
    /// assert_eq!(resolution.resolved_by(), user);
    /// assert_eq!(resolution.pair().low().as_i64(), 1);
    /// ```
    pub fn new(
        user_id: UserId,
        pair: BookingPair,
        conflict_date: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: ResolutionId::new(),
            user_id,
            pair,
            conflict_date,
            resolved_by: user_id,
            notes: notes.filter(|n| !n.trim().is_empty()),
            resolved_at: Utc::now(),
        }
    }

    /// Rebuilds a resolution from stored fields
    pub fn from_parts(
        id: ResolutionId,
        user_id: UserId,
        pair: BookingPair,
        conflict_date: NaiveDate,
        resolved_by: UserId,
        notes: Option<String>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            pair,
            conflict_date,
            resolved_by,
            notes,
            resolved_at,
        }
    }

    pub fn id(&self) -> &ResolutionId {
        &self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn pair(&self) -> BookingPair {
        self.pair
    }

    /// The date the conflict occurred on when it was resolved
    pub fn conflict_date(&self) -> NaiveDate {
        self.conflict_date
    }

    pub fn resolved_by(&self) -> UserId {
        self.resolved_by
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }
}
