//! Timetabling domain models.
//!
//! The catalog side of the problem: who teaches, where, what, to whom and
//! when. All records carry a stable integer identity and are read-only for
//! the duration of a run.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | University |
//! |-------------|--------|------------|
//! | StudentGroup | Class | Section |
//! | Course | Subject | Module |
//! | Teacher | Teacher | Lecturer |
//! | Room | Classroom | Lecture hall / Lab |
//! | TimeSlot | Lesson period | Teaching block |

mod calendar;
mod catalog;
mod group;
mod resource;

pub use calendar::{SlotId, TimeDomain, TimeSlot, Weekday};
pub use catalog::Catalog;
pub use group::{Course, CourseId, GroupId, StudentGroup};
pub use resource::{Room, RoomId, Teacher, TeacherId};
