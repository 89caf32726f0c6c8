//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including malformed identifiers and invalid booking records.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// ID parsing error or non-positive identifier
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// A booking pair was built from the same booking twice
    #[error("A booking cannot conflict with itself: {0}")]
    SelfPair(i64),

    /// Unknown booking status string
    #[error("Invalid booking status: {0}")]
    InvalidStatus(String),

    /// Invalid calendar date or time-of-day string
    #[error("Invalid date or time: {0}")]
    InvalidDateTime(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
