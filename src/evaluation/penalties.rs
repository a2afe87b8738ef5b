//! Penalty terms.
//!
//! Each term maps a chromosome to a non-negative penalty. Hard terms
//! count collisions at [`HARD_WEIGHT`] per surplus occupant; soft terms
//! weigh 1 or a fraction per violation, so no amount of soft improvement
//! outweighs one hard fix.
//!
//! | Term | Kind | Weight |
//! |------|------|--------|
//! | Teacher / room / group conflict | hard | 1000 × (count − 1) per cell |
//! | Same subject across groups | hard | 1000 × (groups − 1) per (teacher, course) |
//! | Multiple first periods | hard | 1000 × (count − 1) per teacher |
//! | Teacher time preference | soft | 1 per lesson outside preference |
//! | Workload balance | soft | Σ \|load − mean\| |
//! | Group home room | soft | 1 per lesson outside home room |
//! | Subject distribution | soft | 0.5 per back-to-back pair |
//! | Group schedule gap | soft | 0.5 per empty period inside a day |

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use crate::ga::Chromosome;
use crate::models::{CourseId, GroupId, RoomId, TeacherId, Weekday};

/// Weight of one unit of hard-constraint violation.
pub const HARD_WEIGHT: f64 = 1000.0;
/// Weight of one unit of soft-constraint violation.
pub const SOFT_WEIGHT: f64 = 1.0;
/// Weight of one back-to-back lesson pair for a teacher.
pub const ADJACENT_LESSON_WEIGHT: f64 = 0.5;
/// Weight of one empty period inside a group's day.
pub const GAP_WEIGHT: f64 = 0.5;

/// Sum of `count - 1` over keys seen more than once.
fn surplus<K: Eq + Hash>(keys: impl Iterator<Item = K>) -> u64 {
    let mut counts: HashMap<K, u64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts.values().filter(|&&c| c > 1).map(|c| c - 1).sum()
}

/// A teacher teaching more than one lesson in the same cell.
pub fn teacher_conflict(chromosome: &Chromosome) -> f64 {
    HARD_WEIGHT * surplus(chromosome.iter().map(|g| (g.teacher_id, g.day, g.period))) as f64
}

/// A room hosting more than one lesson in the same cell.
pub fn room_conflict(chromosome: &Chromosome) -> f64 {
    HARD_WEIGHT * surplus(chromosome.iter().map(|g| (g.room_id, g.day, g.period))) as f64
}

/// A group attending more than one lesson in the same cell.
pub fn group_conflict(chromosome: &Chromosome) -> f64 {
    HARD_WEIGHT * surplus(chromosome.iter().map(|g| (g.group_id, g.day, g.period))) as f64
}

/// A teacher teaching the same course to more than one group.
pub fn same_subject_across_groups(chromosome: &Chromosome) -> f64 {
    let mut groups: HashMap<(TeacherId, CourseId), HashSet<GroupId>> = HashMap::new();
    for gene in chromosome {
        groups
            .entry((gene.teacher_id, gene.course_id))
            .or_default()
            .insert(gene.group_id);
    }
    let extra: usize = groups.values().map(|g| g.len().saturating_sub(1)).sum();
    HARD_WEIGHT * extra as f64
}

/// A teacher holding more than one first-period lesson in the week.
pub fn multiple_first_periods(chromosome: &Chromosome) -> f64 {
    HARD_WEIGHT * surplus(chromosome.iter().filter(|g| g.period == 1).map(|g| g.teacher_id)) as f64
}

/// Lessons whose cell is outside the teacher's preferred times.
///
/// `prefers` answers whether a teacher prefers a cell; unknown teachers
/// should answer `false`.
pub fn teacher_time_preference(
    chromosome: &Chromosome,
    prefers: impl Fn(TeacherId, Weekday, u32) -> bool,
) -> f64 {
    let misses = chromosome
        .iter()
        .filter(|g| !prefers(g.teacher_id, g.day, g.period))
        .count();
    SOFT_WEIGHT * misses as f64
}

/// Total absolute deviation of teacher lesson counts from their mean.
///
/// Only teachers with at least one lesson take part.
pub fn teacher_workload_balance(chromosome: &Chromosome) -> f64 {
    // Ordered so the float sum is identical on every call
    let mut loads: BTreeMap<TeacherId, u64> = BTreeMap::new();
    for gene in chromosome {
        *loads.entry(gene.teacher_id).or_insert(0) += 1;
    }
    if loads.is_empty() {
        return 0.0;
    }
    let mean = loads.values().sum::<u64>() as f64 / loads.len() as f64;
    SOFT_WEIGHT * loads.values().map(|&l| (l as f64 - mean).abs()).sum::<f64>()
}

/// Lessons held outside the group's home room.
///
/// `home_room` returns `None` for groups without one, which are exempt.
pub fn group_home_room(
    chromosome: &Chromosome,
    home_room: impl Fn(GroupId) -> Option<RoomId>,
) -> f64 {
    let misses = chromosome
        .iter()
        .filter(|g| home_room(g.group_id).is_some_and(|room| room != g.room_id))
        .count();
    SOFT_WEIGHT * misses as f64
}

/// Back-to-back lessons for the same teacher on the same day.
pub fn subject_distribution(chromosome: &Chromosome) -> f64 {
    let mut days: HashMap<(TeacherId, Weekday), Vec<u32>> = HashMap::new();
    for gene in chromosome {
        days.entry((gene.teacher_id, gene.day))
            .or_default()
            .push(gene.period);
    }
    let mut pairs = 0u64;
    for periods in days.values_mut() {
        periods.sort_unstable();
        pairs += periods.windows(2).filter(|w| w[1] == w[0] + 1).count() as u64;
    }
    ADJACENT_LESSON_WEIGHT * pairs as f64
}

/// Empty periods between a group's first and last lesson of each day.
///
/// Only groups yielded by `groups` are considered.
pub fn group_schedule_gap(
    chromosome: &Chromosome,
    groups: impl IntoIterator<Item = GroupId>,
) -> f64 {
    let view = chromosome.to_indexed_view();
    let mut gaps = 0u64;
    for group in groups {
        let Some(days) = view.get(&group) else {
            continue;
        };
        for lessons in days.values() {
            // Lessons are period-sorted, so first/last bound the day
            let (Some(first), Some(last)) = (lessons.first(), lessons.last()) else {
                continue;
            };
            let span = u64::from(last.period - first.period + 1);
            let mut distinct: Vec<u32> = lessons.iter().map(|g| g.period).collect();
            distinct.dedup();
            gaps += span - distinct.len() as u64;
        }
    }
    GAP_WEIGHT * gaps as f64
}
