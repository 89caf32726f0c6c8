//! Error types for the conflict engine

use thiserror::Error;

use gigbook_core::domain::{BookingId, DomainError, UserId};

/// Errors that can occur while reporting or resolving booking conflicts
#[derive(Debug, Error)]
pub enum ConflictError {
    /// Malformed input rejected at the boundary (bad id, self pair, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced booking is not in the user's current snapshot
    #[error("booking {booking_id} not found for user {user_id}")]
    BookingNotFound {
        user_id: UserId,
        booking_id: BookingId,
    },

    /// The resolution store failed; never treated as "no resolution"
    #[error("resolution store unavailable: {0}")]
    ResolutionStoreUnavailable(#[source] anyhow::Error),

    /// The booking snapshot could not be read
    #[error("booking snapshot unavailable: {0}")]
    SnapshotUnavailable(#[source] anyhow::Error),
}

impl ConflictError {
    /// Returns true for errors caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ConflictError::InvalidInput(_) | ConflictError::BookingNotFound { .. }
        )
    }
}

impl From<DomainError> for ConflictError {
    fn from(e: DomainError) -> Self {
        ConflictError::InvalidInput(e.to_string())
    }
}
