//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the conflict engine
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IBookingSnapshotProvider`] - Read-only access to a performer's bookings
//! - [`IResolutionStore`] - Persistent storage for accepted conflicts

pub mod booking_snapshot;
pub mod resolution_store;

pub use booking_snapshot::IBookingSnapshotProvider;
pub use resolution_store::IResolutionStore;
