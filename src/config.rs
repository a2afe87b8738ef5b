//! Scheduler configuration.
//!
//! [`SchedulingConfig`] holds every parameter of a timetable run: GA rates,
//! the weekly time grid, the random seed and the conflict policies.
//! Missing fields take their defaults when deserialized.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::ga::{FixedGenePolicy, GeneticOperators};
use crate::models::{TimeDomain, Weekday};
use crate::repair::{GroupConflictPolicy, RepairOptions};

/// Smallest population the scheduler accepts.
pub const MIN_POPULATION_SIZE: usize = 10;

/// Configuration for a timetable run.
///
/// # Defaults
///
/// ```
/// use u_timetable::config::SchedulingConfig;
///
/// let config = SchedulingConfig::default();
/// assert_eq!(config.population_size, 200);
/// assert_eq!(config.max_generations, 100);
/// assert_eq!(config.periods, vec![1, 2, 3, 4, 5, 6]);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::config::SchedulingConfig;
///
/// let config = SchedulingConfig::default()
///     .with_population_size(50)
///     .with_max_generations(20)
///     .with_seed(7)
///     .with_verbose(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Number of chromosomes per generation.
    pub population_size: usize,

    /// Number of generations to run.
    pub max_generations: usize,

    /// Probability that an adjacent offspring pair is crossed over.
    pub crossover_probability: f64,

    /// Probability that an offspring is mutated at all.
    pub mutation_probability: f64,

    /// Probability of each per-gene reassignment inside a mutation.
    pub gene_mutation_probability: f64,

    /// Contestants per tournament.
    pub tournament_size: usize,

    /// Teaching days, in week order.
    pub days: Vec<Weekday>,

    /// Teaching periods per day.
    pub periods: Vec<u32>,

    /// Seed for the run's random stream.
    pub seed: u64,

    /// Log per-generation progress at `info` instead of `debug`.
    pub verbose: bool,

    /// Evaluate offspring fitness in parallel using rayon.
    pub parallel: bool,

    /// How repair treats a group booked twice in one cell.
    pub group_conflict_policy: GroupConflictPolicy,

    /// How operators treat genes flagged `is_fixed`.
    pub fixed_genes: FixedGenePolicy,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            max_generations: 100,
            crossover_probability: 0.7,
            mutation_probability: 0.3,
            gene_mutation_probability: 0.1,
            tournament_size: 3,
            days: Weekday::SCHOOL_WEEK.to_vec(),
            periods: (1..=6).collect(),
            seed: 42,
            verbose: true,
            parallel: false,
            group_conflict_policy: GroupConflictPolicy::default(),
            fixed_genes: FixedGenePolicy::default(),
        }
    }
}

impl SchedulingConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the offspring mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_gene_mutation_probability(mut self, p: f64) -> Self {
        self.gene_mutation_probability = p;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the teaching days.
    pub fn with_days(mut self, days: Vec<Weekday>) -> Self {
        self.days = days;
        self
    }

    /// Sets the teaching periods.
    pub fn with_periods(mut self, periods: Vec<u32>) -> Self {
        self.periods = periods;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables per-generation `info` logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the group conflict policy.
    pub fn with_group_conflict_policy(mut self, policy: GroupConflictPolicy) -> Self {
        self.group_conflict_policy = policy;
        self
    }

    /// Sets the fixed-gene policy.
    pub fn with_fixed_genes(mut self, policy: FixedGenePolicy) -> Self {
        self.fixed_genes = policy;
        self
    }

    /// The configured (day, period) grid.
    pub fn time_domain(&self) -> TimeDomain {
        TimeDomain::new(self.days.clone(), self.periods.clone())
    }

    /// Genetic operators for this configuration.
    pub fn operators(&self) -> GeneticOperators {
        GeneticOperators {
            gene_mutation_probability: self.gene_mutation_probability,
            fixed_genes: self.fixed_genes,
        }
    }

    /// Repair options for this configuration.
    pub fn repair_options(&self) -> RepairOptions {
        RepairOptions {
            group_conflicts: self.group_conflict_policy,
            fixed_genes: self.fixed_genes,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfig`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(invalid(format!(
                "population_size must be at least {MIN_POPULATION_SIZE}, got {}",
                self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        if self.tournament_size == 0 {
            return Err(invalid("tournament_size must be at least 1"));
        }
        for (name, p) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
            ("gene_mutation_probability", self.gene_mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{name} must be in [0, 1], got {p}")));
            }
        }

        if self.days.is_empty() {
            return Err(invalid("days must not be empty"));
        }
        let mut seen_days = HashSet::new();
        if let Some(day) = self.days.iter().find(|d| !seen_days.insert(**d)) {
            return Err(invalid(format!("duplicate day: {day}")));
        }

        if self.periods.is_empty() {
            return Err(invalid("periods must not be empty"));
        }
        if self.periods.contains(&0) {
            return Err(invalid("periods must be positive integers"));
        }
        let mut seen_periods = HashSet::new();
        if let Some(p) = self.periods.iter().find(|p| !seen_periods.insert(**p)) {
            return Err(invalid(format!("duplicate period: {p}")));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> TimetableError {
    TimetableError::InvalidConfig(message.into())
}
