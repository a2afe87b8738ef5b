//! Fatal errors surfaced by the timetabling engine.
//!
//! Validation problems found before a run starts are reported through
//! [`TimetableError::Validation`] or [`TimetableError::InvalidCatalog`].
//! A missing timeslot during a run means the catalog does not cover the
//! configured time domain and aborts the run.

use crate::models::Weekday;
use crate::validation::ValidationError;

/// Errors that abort catalog construction, configuration or a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimetableError {
    /// A single invalid value (gene, timeslot, parsed weekday).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The catalog failed structural validation.
    #[error("invalid catalog: {} problem(s), first: {}", .0.len(), first_message(.0))]
    InvalidCatalog(Vec<ValidationError>),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No timeslot exists for the requested (day, period).
    #[error("no timeslot for {day} period {period}")]
    SlotLookup {
        /// Requested day.
        day: Weekday,
        /// Requested period.
        period: u32,
    },
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;
