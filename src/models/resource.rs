//! Teaching resources: teachers and rooms.
//!
//! A lesson occupies exactly one teacher and one room for one
//! (day, period) cell. Both are exclusive: two lessons in the same cell
//! may not share either.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Weekday;

/// Teacher identifier.
pub type TeacherId = u32;
/// Room identifier.
pub type RoomId = u32;

/// A teacher with preferred teaching times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: TeacherId,
    /// Display name.
    pub name: String,
    /// Cells this teacher prefers to teach in.
    ///
    /// Lessons outside this set are penalized; an empty set means every
    /// lesson is outside the preference.
    pub preferred_times: BTreeSet<(Weekday, u32)>,
}

impl Teacher {
    /// Creates a teacher without preferred times.
    pub fn new(id: TeacherId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            preferred_times: BTreeSet::new(),
        }
    }

    /// Adds a preferred (day, period) cell.
    pub fn with_preferred_time(mut self, day: Weekday, period: u32) -> Self {
        self.preferred_times.insert((day, period));
        self
    }

    /// Replaces the preferred cells.
    pub fn with_preferred_times(
        mut self,
        times: impl IntoIterator<Item = (Weekday, u32)>,
    ) -> Self {
        self.preferred_times = times.into_iter().collect();
        self
    }

    /// Whether this teacher prefers the given cell.
    #[inline]
    pub fn prefers(&self, day: Weekday, period: u32) -> bool {
        self.preferred_times.contains(&(day, period))
    }
}

/// A room lessons can be held in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Display name or number.
    pub name: String,
}

impl Room {
    /// Creates a room.
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
