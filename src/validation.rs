//! Input validation for timetabling catalogs.
//!
//! Checks structural integrity of the reference collections before a run.
//! Detects:
//! - Duplicate IDs within a collection
//! - Duplicate (day, period) timeslots
//! - Non-positive periods
//! - Home rooms that reference unknown rooms
//! - Empty teacher, room, course or group collections
//! - Configured (day, period) cells without a timeslot

use std::collections::HashSet;
use std::fmt;

use crate::models::{Course, Room, StudentGroup, Teacher, TimeDomain, TimeSlot};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two records in one collection share the same ID.
    DuplicateId,
    /// Two timeslots share the same (day, period).
    DuplicateTimeslot,
    /// A period is below 1.
    InvalidPeriod,
    /// A day is outside the weekday set.
    InvalidDay,
    /// A group's home room references a room that doesn't exist.
    InvalidRoomReference,
    /// A collection the engine draws from is empty.
    EmptyCollection,
    /// A configured (day, period) cell has no timeslot.
    MissingTimeslot,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates the reference collections of a timetabling problem.
///
/// Checks:
/// 1. No duplicate group, course, teacher, room or timeslot IDs
/// 2. No two timeslots share a (day, period)
/// 3. Every timeslot period is at least 1
/// 4. Every home room points to an existing room
/// 5. Groups, courses, teachers and rooms are non-empty
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(
    groups: &[StudentGroup],
    courses: &[Course],
    teachers: &[Teacher],
    rooms: &[Room],
    timeslots: &[TimeSlot],
) -> ValidationResult {
    let mut errors = Vec::new();

    for (label, len) in [
        ("group", groups.len()),
        ("course", courses.len()),
        ("teacher", teachers.len()),
        ("room", rooms.len()),
    ] {
        if len == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCollection,
                format!("At least one {label} is required"),
            ));
        }
    }

    check_unique_ids("group", groups.iter().map(|g| g.id), &mut errors);
    check_unique_ids("course", courses.iter().map(|c| c.id), &mut errors);
    check_unique_ids("teacher", teachers.iter().map(|t| t.id), &mut errors);
    check_unique_ids("timeslot", timeslots.iter().map(|s| s.id), &mut errors);
    let room_ids = check_unique_ids("room", rooms.iter().map(|r| r.id), &mut errors);

    let mut cells = HashSet::new();
    for slot in timeslots {
        if slot.period < 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriod,
                format!("Timeslot {}: period must be a positive integer", slot.id),
            ));
        }
        if !cells.insert(slot.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTimeslot,
                format!(
                    "Timeslot {} duplicates {} period {}",
                    slot.id, slot.day, slot.period
                ),
            ));
        }
    }

    for group in groups {
        if let Some(room) = group.home_room {
            if !room_ids.contains(&room) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidRoomReference,
                    format!("Group '{}' references unknown home room {}", group.id, room),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that every cell of `domain` has a timeslot.
///
/// Mutation and initialization resolve slot ids through the catalog;
/// a gap here would surface mid-run as a lookup failure.
pub fn validate_coverage(timeslots: &[TimeSlot], domain: &TimeDomain) -> ValidationResult {
    let cells: HashSet<_> = timeslots.iter().map(TimeSlot::key).collect();
    let errors: Vec<_> = domain
        .cells()
        .filter(|cell| !cells.contains(cell))
        .map(|(day, period)| {
            ValidationError::new(
                ValidationErrorKind::MissingTimeslot,
                format!("No timeslot for {day} period {period}"),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique_ids(
    label: &str,
    ids: impl Iterator<Item = u32>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<u32> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
    seen
}
