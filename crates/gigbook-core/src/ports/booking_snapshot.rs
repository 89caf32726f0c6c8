//! Booking snapshot port (driven/secondary port)
//!
//! Bookings are created, edited and deleted by the booking subsystem.
//! The conflict engine reads them through this port at report time and
//! never writes back.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because read failures are adapter-specific.
//! - Every call is a fresh point-in-time read. Implementations must not
//!   cache across calls.
//! - Implementations validate rows before returning them, so the engine
//!   only ever sees fully-typed `Booking` values.

use crate::domain::{Booking, BookingId, UserId};

/// Port trait for reading a performer's current bookings
#[async_trait::async_trait]
pub trait IBookingSnapshotProvider: Send + Sync {
    /// Returns every booking owned by `user_id`, in any status
    async fn list_bookings(&self, user_id: UserId) -> anyhow::Result<Vec<Booking>>;

    /// Returns a single booking, or `None` if the user has no such booking
    async fn get_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
    ) -> anyhow::Result<Option<Booking>>;
}
