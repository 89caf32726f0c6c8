//! Gigbook Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Booking`, `Conflict`, `ConflictResolution`
//! - **Newtypes** - `BookingId`, `UserId`, and the canonical `BookingPair`
//! - **Port definitions** - Traits for adapters: `IBookingSnapshotProvider`, `IResolutionStore`
//! - **Configuration** - YAML config file loading and validation
//!
//! # Architecture
//!
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! The conflict engine in `gigbook-conflict` orchestrates domain
//! entities through these port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
