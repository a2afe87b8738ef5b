//! Read-only reference catalog for one timetabling run.
//!
//! Bundles the five collections and precomputes the id→record and
//! (day, period)→slot maps the evaluator, operators and repair consult on
//! every gene. Built once; never mutated during a run.

use std::collections::HashMap;

use super::{
    Course, CourseId, GroupId, Room, RoomId, SlotId, StudentGroup, Teacher, TeacherId, TimeDomain,
    TimeSlot, Weekday,
};
use crate::error::{Result, TimetableError};
use crate::validation::{validate_catalog, validate_coverage};

/// Validated reference data with O(1) lookups.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<StudentGroup>,
    courses: Vec<Course>,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    timeslots: Vec<TimeSlot>,
    teacher_index: HashMap<TeacherId, usize>,
    course_index: HashMap<CourseId, usize>,
    group_index: HashMap<GroupId, usize>,
    slot_lookup: HashMap<(Weekday, u32), SlotId>,
}

impl Catalog {
    /// Validates the collections and builds the lookup maps.
    ///
    /// # Errors
    /// [`TimetableError::InvalidCatalog`] with every problem found.
    pub fn new(
        groups: Vec<StudentGroup>,
        courses: Vec<Course>,
        teachers: Vec<Teacher>,
        rooms: Vec<Room>,
        timeslots: Vec<TimeSlot>,
    ) -> Result<Self> {
        validate_catalog(&groups, &courses, &teachers, &rooms, &timeslots)
            .map_err(TimetableError::InvalidCatalog)?;

        let teacher_index = teachers.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
        let course_index = courses.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        let group_index = groups.iter().enumerate().map(|(i, g)| (g.id, i)).collect();
        let slot_lookup = timeslots.iter().map(|s| (s.key(), s.id)).collect();

        Ok(Self {
            groups,
            courses,
            teachers,
            rooms,
            timeslots,
            teacher_index,
            course_index,
            group_index,
            slot_lookup,
        })
    }

    /// Fails unless every cell of `domain` has a timeslot.
    pub fn ensure_covers(&self, domain: &TimeDomain) -> Result<()> {
        validate_coverage(&self.timeslots, domain).map_err(TimetableError::InvalidCatalog)
    }

    /// Student groups, in catalog order.
    pub fn groups(&self) -> &[StudentGroup] {
        &self.groups
    }

    /// Courses, in catalog order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Teachers, in catalog order.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// Rooms, in catalog order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Timeslots, in catalog order.
    pub fn timeslots(&self) -> &[TimeSlot] {
        &self.timeslots
    }

    /// Looks up a teacher by id.
    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teacher_index.get(&id).map(|&i| &self.teachers[i])
    }

    /// Looks up a group by id.
    pub fn group(&self, id: GroupId) -> Option<&StudentGroup> {
        self.group_index.get(&id).map(|&i| &self.groups[i])
    }

    /// Looks up a course by id.
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.course_index.get(&id).map(|&i| &self.courses[i])
    }

    /// Whether a course id exists.
    pub fn has_course(&self, id: CourseId) -> bool {
        self.course_index.contains_key(&id)
    }

    /// Whether the teacher prefers the cell. Unknown teachers prefer nothing.
    #[inline]
    pub fn teacher_prefers(&self, id: TeacherId, day: Weekday, period: u32) -> bool {
        self.teacher(id).is_some_and(|t| t.prefers(day, period))
    }

    /// The group's home room, if it has one.
    #[inline]
    pub fn home_room(&self, id: GroupId) -> Option<RoomId> {
        self.group(id).and_then(|g| g.home_room)
    }

    /// Resolves the slot id for a cell.
    ///
    /// # Errors
    /// [`TimetableError::SlotLookup`] if the catalog has no such timeslot.
    pub fn slot_id(&self, day: Weekday, period: u32) -> Result<SlotId> {
        self.slot_lookup
            .get(&(day, period))
            .copied()
            .ok_or(TimetableError::SlotLookup { day, period })
    }
}
