//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// Integer-based ID types
// ============================================================================

/// Identifier of a booking, stable and unique per user
///
/// Booking ids come from the external booking subsystem. Only strictly
/// positive values are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct BookingId(i64);

impl BookingId {
    /// Create a BookingId, rejecting zero and negative values
    pub fn new(id: i64) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::InvalidId(format!(
                "BookingId must be positive, got {id}"
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for BookingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::InvalidId(format!("Invalid BookingId '{s}': {e}")))?;
        Self::new(id)
    }
}

impl TryFrom<i64> for BookingId {
    type Error = DomainError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<BookingId> for i64 {
    fn from(id: BookingId) -> Self {
        id.0
    }
}

/// Identifier of a performer account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Create a UserId, rejecting zero and negative values
    pub fn new(id: i64) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::InvalidId(format!(
                "UserId must be positive, got {id}"
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::InvalidId(format!("Invalid UserId '{s}': {e}")))?;
        Self::new(id)
    }
}

impl TryFrom<i64> for UserId {
    type Error = DomainError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

// ============================================================================
// UUID-based ID types
// ============================================================================

/// Identifier for persisted conflict resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolutionId(Uuid);

impl ResolutionId {
    /// Create a new random ResolutionId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a ResolutionId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResolutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ResolutionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResolutionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid ResolutionId: {e}")))
    }
}

// ============================================================================
// Canonical booking pair
// ============================================================================

/// An unordered pair of distinct bookings in canonical (ascending) form
///
/// The only way to build one is [`BookingPair::new`], which sorts its
/// arguments, so `low() < high()` always holds. This value is the lookup
/// key for conflict resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPair", into = "RawPair")]
pub struct BookingPair {
    low: BookingId,
    high: BookingId,
}

impl BookingPair {
    /// Build the canonical pair for two bookings, in either order
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SelfPair` if both ids are the same booking.
    ///
    /// # Example
    ///
    /// ```
    /// use gigbook_core::domain::newtypes::{BookingId, BookingPair};
    ///
    /// let a = BookingId::new(9).unwrap();
    /// let b = BookingId::new(4).unwrap();
    ///
    /// let pair = BookingPair::new(a, b).unwrap();
    /// assert_eq!(pair, BookingPair::new(b, a).unwrap());
    /// assert_eq!(pair.low(), b);
    /// ```
    pub fn new(a: BookingId, b: BookingId) -> Result<Self, DomainError> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Ok(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => Err(DomainError::SelfPair(a.as_i64())),
        }
    }

    /// The smaller booking id
    #[must_use]
    pub const fn low(&self) -> BookingId {
        self.low
    }

    /// The larger booking id
    #[must_use]
    pub const fn high(&self) -> BookingId {
        self.high
    }

    /// Returns true if `id` is one of the two bookings
    #[must_use]
    pub fn contains(&self, id: BookingId) -> bool {
        self.low == id || self.high == id
    }

    /// Returns the counterpart of `id`, or `None` if `id` is not in the pair
    #[must_use]
    pub fn other(&self, id: BookingId) -> Option<BookingId> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl Display for BookingPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[derive(Serialize, Deserialize)]
struct RawPair([i64; 2]);

impl TryFrom<RawPair> for BookingPair {
    type Error = DomainError;

    fn try_from(raw: RawPair) -> Result<Self, Self::Error> {
        BookingPair::new(BookingId::new(raw.0[0])?, BookingId::new(raw.0[1])?)
    }
}

impl From<BookingPair> for RawPair {
    fn from(pair: BookingPair) -> Self {
        RawPair([pair.low.as_i64(), pair.high.as_i64()])
    }
}
