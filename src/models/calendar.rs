//! Weekly calendar model.
//!
//! A timetable week is a grid of (day, period) cells. [`TimeSlot`] is the
//! catalog record naming one cell, [`TimeDomain`] is the configured set of
//! days and periods a chromosome covers.
//!
//! # Period Numbering
//! Periods are 1-based. Period 1 is the first lesson of the day.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::{ValidationError, ValidationErrorKind};

/// Timeslot identifier.
pub type SlotId = u32;

/// Day of the teaching week.
///
/// Ordered Monday first, so sorted views list days chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Monday through Friday.
    pub const SCHOOL_WEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// English day name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::new(
                    ValidationErrorKind::InvalidDay,
                    format!("Invalid day: {s}"),
                )
            })
    }
}

/// A catalog timeslot: one (day, period) cell of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: SlotId,
    /// Day of the week.
    pub day: Weekday,
    /// Period within the day (1-based).
    pub period: u32,
}

impl TimeSlot {
    /// Creates a timeslot, rejecting period 0.
    pub fn new(id: SlotId, day: Weekday, period: u32) -> Result<Self, ValidationError> {
        if period < 1 {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidPeriod,
                format!("Timeslot {id}: period must be a positive integer"),
            ));
        }
        Ok(Self { id, day, period })
    }

    /// Builds one slot per (day, period), ids starting at 1 in day-major order.
    ///
    /// Periods below 1 are skipped.
    pub fn grid(days: &[Weekday], periods: &[u32]) -> Vec<TimeSlot> {
        let mut slots = Vec::with_capacity(days.len() * periods.len());
        let mut next_id: SlotId = 1;
        for &day in days {
            for &period in periods.iter().filter(|&&p| p >= 1) {
                slots.push(TimeSlot {
                    id: next_id,
                    day,
                    period,
                });
                next_id += 1;
            }
        }
        slots
    }

    /// The (day, period) key of this slot.
    #[inline]
    pub fn key(&self) -> (Weekday, u32) {
        (self.day, self.period)
    }
}

/// The configured (day × period) domain a chromosome covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDomain {
    /// Teaching days, in the order genes are laid out.
    pub days: Vec<Weekday>,
    /// Periods per day, in the order genes are laid out.
    pub periods: Vec<u32>,
}

impl TimeDomain {
    /// Creates a domain from days and periods.
    pub fn new(days: Vec<Weekday>, periods: Vec<u32>) -> Self {
        Self { days, periods }
    }

    /// Number of (day, period) cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.days.len() * self.periods.len()
    }

    /// Whether the domain contains the given cell.
    pub fn contains(&self, day: Weekday, period: u32) -> bool {
        self.days.contains(&day) && self.periods.contains(&period)
    }

    /// Iterates cells in day-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Weekday, u32)> + '_ {
        self.days
            .iter()
            .flat_map(move |&d| self.periods.iter().map(move |&p| (d, p)))
    }
}

impl Default for TimeDomain {
    fn default() -> Self {
        Self {
            days: Weekday::SCHOOL_WEEK.to_vec(),
            periods: (1..=6).collect(),
        }
    }
}
