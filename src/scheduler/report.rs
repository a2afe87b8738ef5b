//! Run results.
//!
//! # Contents
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `best` | Lowest-penalty chromosome of the final population |
//! | `breakdown` | Its ten penalty terms |
//! | `conflicts` | Its overbooked cells |
//! | `all_time_best` | Lowest-penalty chromosome seen in any generation |
//! | `history` | One [`GenerationStats`] per generation |

use serde::{Deserialize, Serialize};

use crate::evaluation::{ConflictReport, PenaltyBreakdown};
use crate::ga::Chromosome;

/// Progress of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index, from 0.
    pub generation: usize,
    /// Lowest penalty in the population after replacement.
    pub best_penalty: f64,
    /// Mean penalty of the population after replacement.
    pub mean_penalty: f64,
    /// Lowest penalty seen so far, initial population included.
    pub all_time_best_penalty: f64,
    /// Fitness evaluations performed in this generation.
    pub evaluations: usize,
}

/// Result of a scheduler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Best timetable of the final population.
    pub best: Chromosome,
    /// Penalty of `best`.
    pub best_penalty: f64,
    /// Per-term penalty of `best`.
    pub breakdown: PenaltyBreakdown,
    /// Overbooked cells of `best`.
    pub conflicts: ConflictReport,
    /// Best timetable over the whole run.
    pub all_time_best: Chromosome,
    /// Penalty of `all_time_best`.
    pub all_time_best_penalty: f64,
    /// Per-generation trace.
    pub history: Vec<GenerationStats>,
}

impl ScheduleOutcome {
    /// Whether the reported timetable violates no hard constraint.
    pub fn is_feasible(&self) -> bool {
        self.breakdown.is_feasible()
    }

    /// Number of generations run.
    pub fn generations(&self) -> usize {
        self.history.len()
    }

    /// Total fitness evaluations over all generations.
    pub fn total_evaluations(&self) -> usize {
        self.history.iter().map(|s| s.evaluations).sum()
    }
}
