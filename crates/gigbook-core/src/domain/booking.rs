//! Booking domain entity
//!
//! Bookings are owned by the external booking subsystem. The conflict
//! engine only ever reads them, so this type is a closed, validated
//! snapshot record rather than a mutable aggregate.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::BookingId;

/// Display format for times of day (`19:00`)
pub const TIME_FORMAT: &str = "%H:%M";

/// Storage/display format for calendar dates (`2025-06-16`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Enquiry received, nothing agreed yet
    New,
    /// Being negotiated
    InProgress,
    /// Agreed with the client
    Confirmed,
    /// The event has taken place
    Completed,
    /// Called off
    Cancelled,
}

impl BookingStatus {
    /// Returns true if bookings in this status take part in conflict detection
    ///
    /// `Completed` and `Cancelled` are terminal and never conflict.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Returns true if a booking in this status may still be edited or
    /// rejected from a conflict view
    pub fn is_editable(&self) -> bool {
        matches!(self, BookingStatus::New | BookingStatus::InProgress)
    }

    /// Returns the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::New => "new",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(BookingStatus::New),
            "in_progress" => Ok(BookingStatus::InProgress),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// A performance booking as seen by the conflict engine
///
/// Start and end times are independent options: well-formed data has both
/// or neither, but partial records do occur and must be representable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    client_name: String,
    event_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    venue: Option<String>,
    status: BookingStatus,
}

impl Booking {
    /// Creates a booking with no time window and no venue
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use gigbook_core::domain::booking::{Booking, BookingStatus};
    /// use gigbook_core::domain::newtypes::BookingId;
    ///
    /// let booking = Booking::new(
    ///     BookingId::new(1).unwrap(),
    ///     "Rivera Wedding",
    ///     NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
    ///     BookingStatus::Confirmed,
    /// )
    /// .with_times(
    ///     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
    /// );
    ///
    /// assert_eq!(booking.time_display(), "19:00\u{2013}23:00");
    /// ```
    pub fn new(
        id: BookingId,
        client_name: impl Into<String>,
        event_date: NaiveDate,
        status: BookingStatus,
    ) -> Self {
        Self {
            id,
            client_name: client_name.into(),
            event_date,
            start_time: None,
            end_time: None,
            venue: None,
            status,
        }
    }

    /// Sets both ends of the time window
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Sets only the start time
    pub fn with_start_time(mut self, start: NaiveTime) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Sets only the end time
    pub fn with_end_time(mut self, end: NaiveTime) -> Self {
        self.end_time = Some(end);
        self
    }

    /// Sets the venue
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    /// Checks the record is usable by the engine
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationFailed` if the client name is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.client_name.trim().is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "booking {} has an empty client name",
                self.id
            )));
        }
        Ok(())
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    pub fn venue(&self) -> Option<&str> {
        self.venue.as_deref()
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns true if this booking takes part in conflict detection
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the full time window, or `None` if either end is missing
    pub fn time_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Human-readable time window, e.g. `19:00–23:00` or `Time not specified`
    pub fn time_display(&self) -> String {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!(
                "{}\u{2013}{}",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            ),
            (Some(start), None) => format!("From {}", start.format(TIME_FORMAT)),
            (None, Some(end)) => format!("Until {}", end.format(TIME_FORMAT)),
            (None, None) => "Time not specified".to_string(),
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| DomainError::InvalidDateTime(format!("'{s}': {e}")))
}

/// Parses an `HH:MM` (or `HH:MM:SS`) time of day
pub fn parse_time(s: &str) -> Result<NaiveTime, DomainError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| DomainError::InvalidDateTime(format!("'{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking::new(BookingId::new(1).unwrap(), "Blue Note", date(2025, 6, 16), status)
    }

    #[test]
    fn test_status_activity() {
        assert!(BookingStatus::New.is_active());
        assert!(BookingStatus::InProgress.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Completed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }

    #[test]
    fn test_status_editability() {
        assert!(BookingStatus::New.is_editable());
        assert!(BookingStatus::InProgress.is_editable());
        assert!(!BookingStatus::Confirmed.is_editable());
        assert!(!BookingStatus::Completed.is_editable());
        assert!(!BookingStatus::Cancelled.is_editable());
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in [
            BookingStatus::New,
            BookingStatus::InProgress,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<BookingStatus>().unwrap(), status);
        }
        assert!(matches!(
            "pending".parse::<BookingStatus>(),
            Err(DomainError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BookingStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_time_window_requires_both_ends() {
        let b = booking(BookingStatus::New);
        assert!(b.time_window().is_none());

        let b = booking(BookingStatus::New).with_start_time(time(19, 0));
        assert!(b.time_window().is_none());

        let b = booking(BookingStatus::New).with_times(time(19, 0), time(23, 0));
        assert_eq!(b.time_window(), Some((time(19, 0), time(23, 0))));
    }

    #[test]
    fn test_time_display() {
        assert_eq!(
            booking(BookingStatus::New).time_display(),
            "Time not specified"
        );
        assert_eq!(
            booking(BookingStatus::New)
                .with_times(time(19, 0), time(23, 0))
                .time_display(),
            "19:00\u{2013}23:00"
        );
        assert_eq!(
            booking(BookingStatus::New)
                .with_start_time(time(9, 30))
                .time_display(),
            "From 09:30"
        );
        assert_eq!(
            booking(BookingStatus::New)
                .with_end_time(time(11, 0))
                .time_display(),
            "Until 11:00"
        );
    }

    #[test]
    fn test_validate_rejects_blank_client() {
        let b = Booking::new(
            BookingId::new(2).unwrap(),
            "   ",
            date(2025, 6, 16),
            BookingStatus::New,
        );
        assert!(matches!(b.validate(), Err(DomainError::ValidationFailed(_))));
        assert!(booking(BookingStatus::New).validate().is_ok());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_date("2025-07-01").unwrap(), date(2025, 7, 1));
        assert!(parse_date("01/07/2025").is_err());
        assert_eq!(parse_time("20:00").unwrap(), time(20, 0));
        assert_eq!(parse_time("20:00:00").unwrap(), time(20, 0));
        assert!(parse_time("8pm").is_err());
    }
}
