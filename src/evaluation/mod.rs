//! Timetable fitness evaluation.
//!
//! Scores a chromosome as the sum of ten independent penalty terms
//! (lower = better, 0 = no violations). Evaluation is pure: no RNG, no
//! shared state, and the same chromosome always yields the same bits.
//!
//! # Submodules
//!
//! - [`penalties`]: the individual hard and soft terms
//! - [`analysis`]: per-cell conflict listing for reporting

pub mod analysis;
pub mod penalties;

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::ga::Chromosome;
use crate::models::{Catalog, GroupId, RoomId, StudentGroup, Teacher, TeacherId, Weekday};

pub use analysis::{Conflict, ConflictKind, ConflictReport};

/// Each penalty term of one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PenaltyBreakdown {
    pub teacher_conflict: f64,
    pub room_conflict: f64,
    pub group_conflict: f64,
    pub teacher_time_preference: f64,
    pub teacher_workload_balance: f64,
    pub group_home_room: f64,
    pub subject_distribution: f64,
    pub group_schedule_gap: f64,
    pub same_subject_across_groups: f64,
    pub multiple_first_periods: f64,
}

impl PenaltyBreakdown {
    /// Sum of the hard terms.
    pub fn hard(&self) -> f64 {
        self.teacher_conflict
            + self.room_conflict
            + self.group_conflict
            + self.same_subject_across_groups
            + self.multiple_first_periods
    }

    /// Sum of the soft terms.
    pub fn soft(&self) -> f64 {
        self.teacher_time_preference
            + self.teacher_workload_balance
            + self.group_home_room
            + self.subject_distribution
            + self.group_schedule_gap
    }

    /// Total penalty.
    ///
    /// Summed in a fixed term order so the result is reproducible.
    pub fn total(&self) -> f64 {
        let mut total = 0.0;
        total += self.teacher_conflict;
        total += self.room_conflict;
        total += self.group_conflict;
        total += self.teacher_time_preference;
        total += self.teacher_workload_balance;
        total += self.group_home_room;
        total += self.subject_distribution;
        total += self.group_schedule_gap;
        total += self.same_subject_across_groups;
        total += self.multiple_first_periods;
        total
    }

    /// Whether no hard term fires.
    pub fn is_feasible(&self) -> bool {
        self.hard() == 0.0
    }
}

/// Penalty evaluator over a teacher and group catalog.
///
/// Builds the teacher-preference and home-room maps once; evaluation is
/// then O(genes) per term.
///
/// # Example
///
/// ```
/// use u_timetable::evaluation::FitnessEvaluator;
/// use u_timetable::ga::{Chromosome, Gene};
/// use u_timetable::models::{StudentGroup, Teacher, Weekday};
///
/// let teachers = vec![Teacher::new(1, "Ada").with_preferred_time(Weekday::Monday, 1)];
/// let groups = vec![StudentGroup::new(1, "7A")];
/// let evaluator = FitnessEvaluator::new(&teachers, &groups);
///
/// let mut ch = Chromosome::new();
/// ch.add_gene(Gene::new(1, Weekday::Monday, 1, 1, 1, 1, 1).unwrap());
/// assert_eq!(evaluator.evaluate(&ch), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    preferences: HashMap<TeacherId, &'a BTreeSet<(Weekday, u32)>>,
    home_rooms: HashMap<GroupId, RoomId>,
    group_ids: Vec<GroupId>,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator from teacher and group records.
    pub fn new(teachers: &'a [Teacher], groups: &[StudentGroup]) -> Self {
        Self {
            preferences: teachers.iter().map(|t| (t.id, &t.preferred_times)).collect(),
            home_rooms: groups
                .iter()
                .filter_map(|g| g.home_room.map(|room| (g.id, room)))
                .collect(),
            group_ids: groups.iter().map(|g| g.id).collect(),
        }
    }

    /// Creates an evaluator from a catalog.
    pub fn from_catalog(catalog: &'a Catalog) -> Self {
        Self::new(catalog.teachers(), catalog.groups())
    }

    /// Scalar penalty of a chromosome.
    pub fn evaluate(&self, chromosome: &Chromosome) -> f64 {
        self.breakdown(chromosome).total()
    }

    /// All ten penalty terms of a chromosome.
    pub fn breakdown(&self, chromosome: &Chromosome) -> PenaltyBreakdown {
        PenaltyBreakdown {
            teacher_conflict: penalties::teacher_conflict(chromosome),
            room_conflict: penalties::room_conflict(chromosome),
            group_conflict: penalties::group_conflict(chromosome),
            teacher_time_preference: penalties::teacher_time_preference(chromosome, |t, d, p| {
                self.preferences
                    .get(&t)
                    .is_some_and(|times| times.contains(&(d, p)))
            }),
            teacher_workload_balance: penalties::teacher_workload_balance(chromosome),
            group_home_room: penalties::group_home_room(chromosome, |g| {
                self.home_rooms.get(&g).copied()
            }),
            subject_distribution: penalties::subject_distribution(chromosome),
            group_schedule_gap: penalties::group_schedule_gap(
                chromosome,
                self.group_ids.iter().copied(),
            ),
            same_subject_across_groups: penalties::same_subject_across_groups(chromosome),
            multiple_first_periods: penalties::multiple_first_periods(chromosome),
        }
    }
}

/// Scalar penalty of a chromosome against teacher and group records.
///
/// Convenience for one-off scoring; reuse a [`FitnessEvaluator`] when
/// scoring many chromosomes.
pub fn evaluate(chromosome: &Chromosome, teachers: &[Teacher], groups: &[StudentGroup]) -> f64 {
    FitnessEvaluator::new(teachers, groups).evaluate(chromosome)
}
