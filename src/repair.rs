//! Greedy conflict repair.
//!
//! # Algorithm
//!
//! Three single left-to-right passes over the genes, in this order:
//!
//! 1. **Teachers**: a gene whose teacher already teaches in its cell gets
//!    a teacher not yet used there, preferring ones who like the cell and,
//!    among those, the one with the fewest substitutions so far.
//! 2. **Rooms**: same scheme for rooms, least-used first.
//! 3. **Groups**: a repeated (group, day, period) is handled according to
//!    [`GroupConflictPolicy`].
//!
//! Earlier decisions are never revisited, so a substitution can leave a
//! conflict that a later pass does not see. Repair never fails: a conflict
//! with no alternative resource stays and shows up as penalty.
//!
//! # Complexity
//! O(n · r) per pass where n = genes, r = catalog teachers or rooms.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ga::{Chromosome, FixedGenePolicy, Gene};
use crate::models::{
    Catalog, CourseId, GroupId, Room, RoomId, Teacher, TeacherId, TimeDomain, Weekday,
};

/// Course ids drawn by [`GroupConflictPolicy::ReassignCourse`].
pub const REASSIGN_COURSE_IDS: RangeInclusive<CourseId> = 1..=3;

/// Treatment of a group booked twice in the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupConflictPolicy {
    /// Give the duplicate a random course id from [`REASSIGN_COURSE_IDS`].
    ///
    /// The duplicate keeps its cell, so the group conflict itself remains.
    #[default]
    ReassignCourse,
    /// Move the duplicate to a random cell where the group is free.
    RelocateSlot,
}

/// Repair behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOptions {
    pub group_conflicts: GroupConflictPolicy,
    pub fixed_genes: FixedGenePolicy,
}

/// What one repair call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairStats {
    pub teachers_reassigned: usize,
    pub rooms_reassigned: usize,
    pub courses_reassigned: usize,
    pub lessons_relocated: usize,
}

impl RepairStats {
    /// Whether any gene was modified.
    pub fn changed(&self) -> bool {
        self.teachers_reassigned
            + self.rooms_reassigned
            + self.courses_reassigned
            + self.lessons_relocated
            > 0
    }
}

/// Runs the teacher, room and group passes in sequence.
pub fn repair<R: Rng>(
    chromosome: &mut Chromosome,
    catalog: &Catalog,
    domain: &TimeDomain,
    options: RepairOptions,
    rng: &mut R,
) -> RepairStats {
    let mut stats = RepairStats {
        teachers_reassigned: resolve_teacher_conflicts(
            chromosome,
            catalog.teachers(),
            options.fixed_genes,
        ),
        rooms_reassigned: resolve_room_conflicts(chromosome, catalog.rooms(), options.fixed_genes),
        ..Default::default()
    };
    match options.group_conflicts {
        GroupConflictPolicy::ReassignCourse => {
            stats.courses_reassigned =
                reassign_duplicate_courses(chromosome, options.fixed_genes, rng);
        }
        GroupConflictPolicy::RelocateSlot => {
            stats.lessons_relocated =
                relocate_duplicate_lessons(chromosome, catalog, domain, options.fixed_genes, rng);
        }
    }
    log::trace!("repair: {stats:?}");
    stats
}

/// Teacher pass. Returns the number of genes given a new teacher.
pub fn resolve_teacher_conflicts(
    chromosome: &mut Chromosome,
    teachers: &[Teacher],
    fixed: FixedGenePolicy,
) -> usize {
    let mut schedule = pinned(chromosome, fixed, |g| g.teacher_id);
    let mut load: HashMap<TeacherId, usize> = teachers.iter().map(|t| (t.id, 0)).collect();
    let mut reassigned = 0;

    for gene in chromosome.iter_mut() {
        if !fixed.allows(gene.is_fixed) {
            continue;
        }
        let (day, period) = gene.cell();
        let used = schedule.entry((day, period)).or_default();

        if used.contains(&gene.teacher_id) {
            let available: Vec<&Teacher> =
                teachers.iter().filter(|t| !used.contains(&t.id)).collect();
            let preferred: Vec<&Teacher> = available
                .iter()
                .copied()
                .filter(|t| t.prefers(day, period))
                .collect();
            let pool = if preferred.is_empty() { &available } else { &preferred };

            if let Some(best) = pool.iter().min_by_key(|t| load[&t.id]) {
                gene.teacher_id = best.id;
                *load.entry(best.id).or_insert(0) += 1;
                reassigned += 1;
            }
        }
        used.insert(gene.teacher_id);
    }
    reassigned
}

/// Room pass. Returns the number of genes given a new room.
pub fn resolve_room_conflicts(
    chromosome: &mut Chromosome,
    rooms: &[Room],
    fixed: FixedGenePolicy,
) -> usize {
    let mut schedule = pinned(chromosome, fixed, |g| g.room_id);
    let mut usage: HashMap<RoomId, usize> = rooms.iter().map(|r| (r.id, 0)).collect();
    let mut reassigned = 0;

    for gene in chromosome.iter_mut() {
        if !fixed.allows(gene.is_fixed) {
            continue;
        }
        let used = schedule.entry(gene.cell()).or_default();

        if used.contains(&gene.room_id) {
            let best = rooms
                .iter()
                .filter(|r| !used.contains(&r.id))
                .min_by_key(|r| usage[&r.id]);
            if let Some(room) = best {
                gene.room_id = room.id;
                *usage.entry(room.id).or_insert(0) += 1;
                reassigned += 1;
            }
        }
        used.insert(gene.room_id);
    }
    reassigned
}

/// Resources held by genes the policy forbids changing, per cell.
///
/// Seeds a pass so that a pinned gene displaces any movable gene sharing
/// its resource, wherever that gene sits in the chromosome.
fn pinned(
    chromosome: &Chromosome,
    fixed: FixedGenePolicy,
    resource: impl Fn(&Gene) -> u32,
) -> HashMap<(Weekday, u32), HashSet<u32>> {
    let mut schedule: HashMap<(Weekday, u32), HashSet<u32>> = HashMap::new();
    for gene in chromosome.iter().filter(|g| !fixed.allows(g.is_fixed)) {
        schedule.entry(gene.cell()).or_default().insert(resource(gene));
    }
    schedule
}

/// Group pass under [`GroupConflictPolicy::ReassignCourse`].
pub fn reassign_duplicate_courses<R: Rng>(
    chromosome: &mut Chromosome,
    fixed: FixedGenePolicy,
    rng: &mut R,
) -> usize {
    let mut seen: HashSet<(GroupId, Weekday, u32)> = HashSet::new();
    let mut reassigned = 0;

    for gene in chromosome.iter_mut() {
        let fresh = seen.insert((gene.group_id, gene.day, gene.period));
        if !fresh && fixed.allows(gene.is_fixed) {
            gene.course_id = rng.random_range(REASSIGN_COURSE_IDS);
            reassigned += 1;
        }
    }
    reassigned
}

/// Group pass under [`GroupConflictPolicy::RelocateSlot`].
///
/// Cells already used by any lesson of the group are off limits, as are
/// cells without a catalog timeslot. A duplicate with nowhere to go stays.
pub fn relocate_duplicate_lessons<R: Rng>(
    chromosome: &mut Chromosome,
    catalog: &Catalog,
    domain: &TimeDomain,
    fixed: FixedGenePolicy,
    rng: &mut R,
) -> usize {
    let mut occupied: HashMap<GroupId, HashSet<(Weekday, u32)>> = HashMap::new();
    for gene in chromosome.iter() {
        occupied.entry(gene.group_id).or_default().insert(gene.cell());
    }

    let mut seen: HashSet<(GroupId, Weekday, u32)> = HashSet::new();
    let mut relocated = 0;

    for gene in chromosome.iter_mut() {
        if seen.insert((gene.group_id, gene.day, gene.period)) || !fixed.allows(gene.is_fixed) {
            continue;
        }
        let taken = occupied.entry(gene.group_id).or_default();
        let free: Vec<((Weekday, u32), u32)> = domain
            .cells()
            .filter(|cell| !taken.contains(cell))
            .filter_map(|(day, period)| {
                catalog
                    .slot_id(day, period)
                    .ok()
                    .map(|slot| ((day, period), slot))
            })
            .collect();

        if let Some(&((day, period), slot)) = free.choose(rng) {
            gene.day = day;
            gene.period = period;
            gene.timeslot_id = slot;
            taken.insert((day, period));
            seen.insert((gene.group_id, day, period));
            relocated += 1;
        }
    }
    relocated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::penalties;
    use crate::ga::Gene;
    use crate::models::{Course, StudentGroup, TimeSlot};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_catalog(teachers: u32, rooms: u32) -> Catalog {
        Catalog::new(
            (1..=3).map(|i| StudentGroup::new(i, format!("G{i}"))).collect(),
            (1..=3).map(|i| Course::new(i, format!("C{i}"))).collect(),
            (1..=teachers).map(|i| Teacher::new(i, format!("T{i}"))).collect(),
            (1..=rooms).map(|i| Room::new(i, format!("R{i}"))).collect(),
            TimeSlot::grid(&[Weekday::Monday, Weekday::Tuesday], &[1, 2]),
        )
        .unwrap()
    }

    fn domain() -> TimeDomain {
        TimeDomain::new(vec![Weekday::Monday, Weekday::Tuesday], vec![1, 2])
    }

    fn gene(group: u32, day: Weekday, period: u32, teacher: u32, room: u32) -> Gene {
        Gene::new(group, day, period, 1, 1, teacher, room).unwrap()
    }

    #[test]
    fn test_teacher_conflict_resolved() {
        let catalog = sample_catalog(3, 3);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(2, Weekday::Monday, 1, 1, 2),
            gene(3, Weekday::Monday, 1, 1, 3),
        ]);

        let n = resolve_teacher_conflicts(&mut ch, catalog.teachers(), FixedGenePolicy::Ignore);
        assert_eq!(n, 2);
        // Least-loaded, first in catalog order
        assert_eq!(ch[1].teacher_id, 2);
        assert_eq!(ch[2].teacher_id, 3);
        assert_eq!(penalties::teacher_conflict(&ch), 0.0);
    }

    #[test]
    fn test_teacher_preference_wins() {
        let teachers = vec![
            Teacher::new(1, "A"),
            Teacher::new(2, "B"),
            Teacher::new(3, "C").with_preferred_time(Weekday::Monday, 1),
        ];
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(2, Weekday::Monday, 1, 1, 2),
        ]);

        resolve_teacher_conflicts(&mut ch, &teachers, FixedGenePolicy::Ignore);
        assert_eq!(ch[1].teacher_id, 3);
    }

    #[test]
    fn test_teacher_load_balancing() {
        let catalog = sample_catalog(3, 6);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(2, Weekday::Monday, 1, 1, 2),
            gene(1, Weekday::Tuesday, 1, 3, 3),
            gene(2, Weekday::Tuesday, 1, 3, 4),
        ]);

        resolve_teacher_conflicts(&mut ch, catalog.teachers(), FixedGenePolicy::Ignore);
        // Monday: teacher 2 takes the duplicate (load 1)
        assert_eq!(ch[1].teacher_id, 2);
        // Tuesday: teachers 1 and 2 are free; 1 has the lower load
        assert_eq!(ch[3].teacher_id, 1);
    }

    #[test]
    fn test_single_teacher_conflict_stays() {
        let catalog = sample_catalog(1, 2);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(2, Weekday::Monday, 1, 1, 2),
        ]);

        let n = resolve_teacher_conflicts(&mut ch, catalog.teachers(), FixedGenePolicy::Ignore);
        assert_eq!(n, 0);
        assert!((penalties::teacher_conflict(&ch) - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_room_conflict_resolved() {
        let catalog = sample_catalog(3, 3);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 2),
            gene(2, Weekday::Monday, 1, 2, 2),
        ]);

        let n = resolve_room_conflicts(&mut ch, catalog.rooms(), FixedGenePolicy::Ignore);
        assert_eq!(n, 1);
        assert_eq!(ch[1].room_id, 1);
        assert_eq!(penalties::room_conflict(&ch), 0.0);
    }

    #[test]
    fn test_reassign_course_keeps_cell() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(1, Weekday::Monday, 1, 2, 2),
        ]);

        let n = reassign_duplicate_courses(&mut ch, FixedGenePolicy::Ignore, &mut rng);
        assert_eq!(n, 1);
        assert!(REASSIGN_COURSE_IDS.contains(&ch[1].course_id));
        assert_eq!(ch[1].cell(), (Weekday::Monday, 1));
        assert!((penalties::group_conflict(&ch) - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_relocate_slot_resolves_group_conflict() {
        let catalog = sample_catalog(3, 3);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(1, Weekday::Monday, 1, 2, 2),
            gene(1, Weekday::Tuesday, 2, 3, 3),
        ]);

        let n = relocate_duplicate_lessons(
            &mut ch,
            &catalog,
            &domain(),
            FixedGenePolicy::Ignore,
            &mut rng,
        );
        assert_eq!(n, 1);
        assert_eq!(penalties::group_conflict(&ch), 0.0);
        let moved = &ch[1];
        assert!([(Weekday::Monday, 2), (Weekday::Tuesday, 1)].contains(&moved.cell()));
        assert_eq!(moved.timeslot_id, catalog.slot_id(moved.day, moved.period).unwrap());
    }

    #[test]
    fn test_relocate_without_free_cell() {
        let catalog = sample_catalog(3, 3);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch: Chromosome = domain()
            .cells()
            .map(|(d, p)| gene(1, d, p, 1, 1))
            .collect();
        ch.add_gene(gene(1, Weekday::Monday, 1, 2, 2));

        let n = relocate_duplicate_lessons(
            &mut ch,
            &catalog,
            &domain(),
            FixedGenePolicy::Ignore,
            &mut rng,
        );
        assert_eq!(n, 0);
    }

    #[test]
    fn test_fixed_genes_preserved() {
        let catalog = sample_catalog(3, 3);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(2, Weekday::Monday, 1, 1, 1).fixed(),
        ]);

        let teachers =
            resolve_teacher_conflicts(&mut ch, catalog.teachers(), FixedGenePolicy::Preserve);
        let rooms = resolve_room_conflicts(&mut ch, catalog.rooms(), FixedGenePolicy::Preserve);
        assert_eq!((teachers, rooms), (1, 1));
        assert_eq!(ch[1].teacher_id, 1);
        assert_eq!(ch[1].room_id, 1);
        // The earlier movable lesson yields to the fixed one
        assert_eq!(ch[0].teacher_id, 2);
        assert_eq!(ch[0].room_id, 2);
        assert_eq!(penalties::teacher_conflict(&ch), 0.0);
        assert_eq!(penalties::room_conflict(&ch), 0.0);
    }

    #[test]
    fn test_fixed_genes_ignored() {
        let catalog = sample_catalog(3, 3);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(2, Weekday::Monday, 1, 1, 1).fixed(),
        ]);

        resolve_teacher_conflicts(&mut ch, catalog.teachers(), FixedGenePolicy::Ignore);
        assert_eq!(ch[0].teacher_id, 1);
        assert_eq!(ch[1].teacher_id, 2);
    }

    #[test]
    fn test_fixed_genes_clash_remains() {
        let catalog = sample_catalog(3, 3);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1).fixed(),
            gene(2, Weekday::Monday, 1, 1, 2).fixed(),
            gene(3, Weekday::Monday, 1, 1, 3),
        ]);

        let n = resolve_teacher_conflicts(&mut ch, catalog.teachers(), FixedGenePolicy::Preserve);
        assert_eq!(n, 1);
        assert_eq!(ch[0].teacher_id, 1);
        assert_eq!(ch[1].teacher_id, 1);
        assert_eq!(ch[2].teacher_id, 2);
        assert!((penalties::teacher_conflict(&ch) - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_repair_idempotent() {
        let catalog = sample_catalog(3, 3);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = Chromosome::from_genes(vec![
            gene(1, Weekday::Monday, 1, 1, 1),
            gene(2, Weekday::Monday, 1, 1, 1),
            gene(3, Weekday::Monday, 1, 1, 1),
            gene(1, Weekday::Monday, 2, 2, 2),
            gene(2, Weekday::Monday, 2, 2, 2),
        ]);

        let first = repair(&mut ch, &catalog, &domain(), RepairOptions::default(), &mut rng);
        assert!(first.changed());
        let snapshot = ch.clone();

        let second = repair(&mut ch, &catalog, &domain(), RepairOptions::default(), &mut rng);
        assert_eq!(second.teachers_reassigned, 0);
        assert_eq!(second.rooms_reassigned, 0);
        for (a, b) in ch.iter().zip(snapshot.iter()) {
            assert_eq!(a.teacher_id, b.teacher_id);
            assert_eq!(a.room_id, b.room_id);
        }
    }

    #[test]
    fn test_stats_changed() {
        assert!(!RepairStats::default().changed());
        let stats = RepairStats {
            rooms_reassigned: 1,
            ..Default::default()
        };
        assert!(stats.changed());
    }
}
