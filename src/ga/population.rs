//! Population slots.
//!
//! A slot owns one chromosome and its fitness. Fitness is either current
//! (`Some`) or stale (`None`) after crossover, mutation or a repair that
//! changed genes; stale slots are re-evaluated before selection.

use serde::{Deserialize, Serialize};

use super::Chromosome;

/// A chromosome together with its (possibly stale) penalty.
///
/// Lower penalty = better timetable (minimization convention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// The timetable candidate.
    pub chromosome: Chromosome,
    fitness: Option<f64>,
}

impl Individual {
    /// Wraps a chromosome with stale fitness.
    pub fn new(chromosome: Chromosome) -> Self {
        Self {
            chromosome,
            fitness: None,
        }
    }

    /// The current penalty, or `None` if stale.
    #[inline]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Whether the penalty is current.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Records a freshly computed penalty.
    pub fn set_fitness(&mut self, penalty: f64) {
        self.fitness = Some(penalty);
    }

    /// Marks the penalty stale.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Penalty used for comparisons; stale slots rank last.
    #[inline]
    pub fn penalty(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }
}

/// Index of the first lowest-penalty slot, or `None` for an empty slice.
pub fn best_index(population: &[Individual]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, ind) in population.iter().enumerate() {
        match best {
            Some(b) if population[b].penalty() <= ind.penalty() => {}
            _ => best = Some(i),
        }
    }
    best
}
