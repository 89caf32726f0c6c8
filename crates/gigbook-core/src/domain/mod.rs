//! Domain entities and business logic
//!
//! This module contains the core domain types for Gigbook:
//! - Newtypes for type-safe identifiers and the canonical booking pair
//! - The read-only booking snapshot record
//! - Conflict and conflict resolution types
//! - Domain-specific error types

pub mod booking;
pub mod conflict;
pub mod errors;
pub mod newtypes;

// Re-export commonly used types
pub use booking::{Booking, BookingStatus};
pub use conflict::{Conflict, ConflictReason, ConflictResolution, Severity};
pub use errors::DomainError;
pub use newtypes::*;
