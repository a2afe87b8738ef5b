//! Conflict analysis.
//!
//! Lists every overbooked (resource, day, period) cell of a timetable.
//! Complements the scalar penalty with the concrete cells a planner has
//! to fix by hand when the search ends infeasible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::penalties::HARD_WEIGHT;
use crate::ga::Chromosome;
use crate::models::Weekday;

/// Resource kind involved in a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Teacher overbooked.
    Teacher,
    /// Room overbooked.
    Room,
    /// Group double-booked.
    Group,
}

/// One overbooked cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    /// Teacher, room or group id, depending on `kind`.
    pub entity_id: u32,
    pub day: Weekday,
    pub period: u32,
    /// Number of lessons sharing the cell (≥ 2).
    pub occupants: usize,
}

/// All conflicts of a chromosome, sorted by kind, entity, day, period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// Scans a chromosome for overbooked cells.
    pub fn analyze(chromosome: &Chromosome) -> Self {
        let mut counts: BTreeMap<(ConflictKind, u32, Weekday, u32), usize> = BTreeMap::new();
        for gene in chromosome {
            for (kind, id) in [
                (ConflictKind::Teacher, gene.teacher_id),
                (ConflictKind::Room, gene.room_id),
                (ConflictKind::Group, gene.group_id),
            ] {
                *counts.entry((kind, id, gene.day, gene.period)).or_insert(0) += 1;
            }
        }

        let conflicts = counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|((kind, entity_id, day, period), occupants)| Conflict {
                kind,
                entity_id,
                day,
                period,
                occupants,
            })
            .collect();
        Self { conflicts }
    }

    /// Whether no cell is overbooked.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Conflicts of one kind.
    pub fn of_kind(&self, kind: ConflictKind) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(move |c| c.kind == kind)
    }

    /// Collision penalty implied by conflicts of one kind.
    ///
    /// Equals the matching hard conflict term of the evaluator.
    pub fn penalty(&self, kind: ConflictKind) -> f64 {
        let surplus: usize = self.of_kind(kind).map(|c| c.occupants - 1).sum();
        HARD_WEIGHT * surplus as f64
    }
}
