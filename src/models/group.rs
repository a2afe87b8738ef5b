//! Student groups and courses.

use serde::{Deserialize, Serialize};

use super::RoomId;

/// Student group identifier.
pub type GroupId = u32;
/// Course identifier.
pub type CourseId = u32;

/// A student group (class section) that follows one weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentGroup {
    /// Unique group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Designated home room. `None` = no home-room preference.
    pub home_room: Option<RoomId>,
}

impl StudentGroup {
    /// Creates a group without a home room.
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            home_room: None,
        }
    }

    /// Sets the home room.
    pub fn with_home_room(mut self, room: RoomId) -> Self {
        self.home_room = Some(room);
        self
    }
}

/// A course (subject) that can be taught in a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: CourseId,
    /// Display name.
    pub name: String,
}

impl Course {
    /// Creates a course.
    pub fn new(id: CourseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
