//! A single scheduled lesson.

use serde::{Deserialize, Serialize};

use crate::models::{CourseId, GroupId, RoomId, SlotId, TeacherId, Weekday};
use crate::validation::{ValidationError, ValidationErrorKind};

/// One (group, day, period) → (course, teacher, room) assignment.
///
/// `timeslot_id` must name the catalog slot with the same day and period;
/// operators that move a gene re-resolve it through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub group_id: GroupId,
    pub day: Weekday,
    pub period: u32,
    pub timeslot_id: SlotId,
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    /// Operators leave this gene alone under [`FixedGenePolicy::Preserve`].
    ///
    /// [`FixedGenePolicy::Preserve`]: crate::ga::FixedGenePolicy::Preserve
    #[serde(default)]
    pub is_fixed: bool,
}

impl Gene {
    /// Creates a gene scheduled in the default Monday to Friday week.
    ///
    /// # Errors
    /// - [`ValidationErrorKind::InvalidPeriod`] if `period < 1`
    /// - [`ValidationErrorKind::InvalidDay`] if `day` is a weekend day
    pub fn new(
        group_id: GroupId,
        day: Weekday,
        period: u32,
        timeslot_id: SlotId,
        course_id: CourseId,
        teacher_id: TeacherId,
        room_id: RoomId,
    ) -> Result<Self, ValidationError> {
        Self::for_week(
            &Weekday::SCHOOL_WEEK,
            group_id,
            day,
            period,
            timeslot_id,
            course_id,
            teacher_id,
            room_id,
        )
    }

    /// Creates a gene scheduled in a configured set of teaching days.
    ///
    /// # Errors
    /// - [`ValidationErrorKind::InvalidPeriod`] if `period < 1`
    /// - [`ValidationErrorKind::InvalidDay`] if `day` is not in `days`
    #[allow(clippy::too_many_arguments)]
    pub fn for_week(
        days: &[Weekday],
        group_id: GroupId,
        day: Weekday,
        period: u32,
        timeslot_id: SlotId,
        course_id: CourseId,
        teacher_id: TeacherId,
        room_id: RoomId,
    ) -> Result<Self, ValidationError> {
        if period < 1 {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidPeriod,
                format!("Gene for group {group_id} on {day}: period must be a positive integer"),
            ));
        }
        let gene = Self {
            group_id,
            day,
            period,
            timeslot_id,
            course_id,
            teacher_id,
            room_id,
            is_fixed: false,
        };
        gene.check_day(days)?;
        Ok(gene)
    }

    /// Marks the gene as fixed.
    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    /// Checks the gene's day against a configured weekday set.
    ///
    /// # Errors
    /// [`ValidationErrorKind::InvalidDay`] if `day` is not in `days`.
    pub fn check_day(&self, days: &[Weekday]) -> Result<(), ValidationError> {
        if days.contains(&self.day) {
            Ok(())
        } else {
            Err(ValidationError::new(
                ValidationErrorKind::InvalidDay,
                format!("Invalid day: {}. Expected one of {:?}", self.day, days),
            ))
        }
    }

    /// The (day, period) cell this lesson occupies.
    #[inline]
    pub fn cell(&self) -> (Weekday, u32) {
        (self.day, self.period)
    }
}
