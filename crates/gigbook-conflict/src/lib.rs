//! Gigbook Conflict - Booking conflict detection and resolution
//!
//! Provides:
//! - Pairwise overlap classification of same-day bookings
//! - Whole-calendar and single-booking conflict reports
//! - Persistent resolutions that suppress accepted conflicts

pub mod detector;
pub mod error;
pub mod overlap;
pub mod reporter;
pub mod service;

pub use detector::ConflictDetector;
pub use error::ConflictError;
pub use overlap::{classify, Classification};
pub use reporter::{ConflictReport, ConflictReporter, ConflictView, ReportSummary, ResolvedConflictView};
pub use service::ConflictService;
