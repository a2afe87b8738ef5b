//! Generational timetable GA.
//!
//! # Algorithm
//!
//! 1. Build `population_size` chromosomes with one random lesson per
//!    (group, day, period); repair and evaluate each.
//! 2. For `max_generations` generations:
//!    - tournament-select a full offspring set and clone it
//!    - cross adjacent pairs with `crossover_probability`
//!    - mutate each child with `mutation_probability`
//!    - repair every child; a child whose genes changed loses its fitness
//!    - evaluate stale children, then replace the population
//! 3. Report the lowest-penalty chromosome of the final population.
//!
//! Every random draw comes from one RNG consumed in population order, so
//! a seed reproduces the run exactly. Parallel evaluation does not touch
//! the RNG and keeps that guarantee.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

use log::Level;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::report::{GenerationStats, ScheduleOutcome};
use super::selection::tournament_select;
use crate::config::SchedulingConfig;
use crate::error::{Result, TimetableError};
use crate::evaluation::{ConflictReport, FitnessEvaluator};
use crate::ga::{best_index, Chromosome, Gene, GeneticOperators, Individual};
use crate::models::{Catalog, GroupId, TimeDomain, Weekday};
use crate::repair::{repair, RepairOptions};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Genetic-algorithm timetable scheduler.
///
/// # Example
///
/// ```
/// use u_timetable::config::SchedulingConfig;
/// use u_timetable::models::{Catalog, Course, Room, StudentGroup, Teacher, TimeSlot, Weekday};
/// use u_timetable::scheduler::TimetableScheduler;
///
/// let days = [Weekday::Monday, Weekday::Tuesday];
/// let catalog = Catalog::new(
///     vec![StudentGroup::new(1, "7A")],
///     vec![Course::new(1, "Math"), Course::new(2, "Art")],
///     vec![Teacher::new(1, "Ada"), Teacher::new(2, "Alan")],
///     vec![Room::new(1, "R1")],
///     TimeSlot::grid(&days, &[1, 2]),
/// )
/// .unwrap();
/// let config = SchedulingConfig::default()
///     .with_days(days.to_vec())
///     .with_periods(vec![1, 2])
///     .with_population_size(10)
///     .with_max_generations(3)
///     .with_verbose(false);
///
/// let outcome = TimetableScheduler::new(catalog, config).unwrap().run().unwrap();
/// assert_eq!(outcome.best.len(), 4);
/// assert_eq!(outcome.generations(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableScheduler {
    catalog: Catalog,
    config: SchedulingConfig,
    domain: TimeDomain,
    operators: GeneticOperators,
    repair_options: RepairOptions,
}

impl TimetableScheduler {
    /// Creates a scheduler.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidConfig`] if `config` fails validation
    /// - [`TimetableError::InvalidCatalog`] if a configured (day, period)
    ///   has no catalog timeslot
    pub fn new(catalog: Catalog, config: SchedulingConfig) -> Result<Self> {
        config.validate()?;
        let domain = config.time_domain();
        catalog.ensure_covers(&domain)?;
        Ok(Self {
            operators: config.operators(),
            repair_options: config.repair_options(),
            catalog,
            config,
            domain,
        })
    }

    /// The catalog being scheduled.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The run configuration.
    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Runs the GA with a `ChaCha8Rng` seeded from the configuration.
    pub fn run(&self) -> Result<ScheduleOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.run_with_rng(&mut rng)
    }

    /// Runs the GA drawing randomness from `rng`.
    ///
    /// # Errors
    /// Propagates slot lookup failures, which cannot occur once
    /// [`TimetableScheduler::new`] has checked coverage.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<ScheduleOutcome> {
        let evaluator = FitnessEvaluator::from_catalog(&self.catalog);
        let level = if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        };

        let mut population = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let mut chromosome = self.random_chromosome(rng)?;
            repair(
                &mut chromosome,
                &self.catalog,
                &self.domain,
                self.repair_options,
                rng,
            );
            population.push(Individual::new(chromosome));
        }
        self.evaluate_stale(&evaluator, &mut population);

        let (mut all_time_best, mut all_time_best_penalty) = best_of(&population)?;
        log::info!(
            "initialised {} timetables of {} lessons, best penalty {}",
            population.len(),
            all_time_best.len(),
            all_time_best_penalty
        );

        let mut history = Vec::with_capacity(self.config.max_generations);
        for generation in 0..self.config.max_generations {
            let mut offspring: Vec<Individual> = tournament_select(
                &population,
                self.config.tournament_size,
                population.len(),
                rng,
            )
            .into_iter()
            .map(|i| population[i].clone())
            .collect();

            for pair in offspring.chunks_exact_mut(2) {
                if rng.random::<f64>() < self.config.crossover_probability {
                    let (left, right) = pair.split_at_mut(1);
                    if self
                        .operators
                        .crossover(&mut left[0].chromosome, &mut right[0].chromosome, rng)
                    {
                        left[0].invalidate();
                        right[0].invalidate();
                    }
                }
            }

            for child in offspring.iter_mut() {
                if rng.random::<f64>() < self.config.mutation_probability {
                    let touched =
                        self.operators
                            .mutate(&mut child.chromosome, &self.catalog, &self.domain, rng)?;
                    if touched > 0 {
                        child.invalidate();
                    }
                }
            }

            for child in offspring.iter_mut() {
                let stats = repair(
                    &mut child.chromosome,
                    &self.catalog,
                    &self.domain,
                    self.repair_options,
                    rng,
                );
                if stats.changed() {
                    child.invalidate();
                }
            }

            let evaluations = self.evaluate_stale(&evaluator, &mut offspring);
            population = offspring;

            let (best, best_penalty) = best_of(&population)?;
            if best_penalty < all_time_best_penalty {
                all_time_best = best;
                all_time_best_penalty = best_penalty;
            }
            let mean_penalty =
                population.iter().map(Individual::penalty).sum::<f64>() / population.len() as f64;

            log::log!(
                level,
                "generation {generation}: best {best_penalty}, mean {mean_penalty:.2}, \
                 all-time best {all_time_best_penalty}, {evaluations} evaluations"
            );
            history.push(GenerationStats {
                generation,
                best_penalty,
                mean_penalty,
                all_time_best_penalty,
                evaluations,
            });
        }

        let (best, best_penalty) = best_of(&population)?;
        let breakdown = evaluator.breakdown(&best);
        let conflicts = ConflictReport::analyze(&best);
        log::info!(
            "finished after {} generations: best penalty {} (hard {}, soft {}), {} conflicts",
            history.len(),
            best_penalty,
            breakdown.hard(),
            breakdown.soft(),
            conflicts.conflicts.len()
        );

        Ok(ScheduleOutcome {
            best,
            best_penalty,
            breakdown,
            conflicts,
            all_time_best,
            all_time_best_penalty,
            history,
        })
    }

    /// One lesson per (group, day, period) with random course, teacher
    /// and room.
    fn random_chromosome<R: Rng>(&self, rng: &mut R) -> Result<Chromosome> {
        let mut chromosome = Chromosome::new();
        for group in self.catalog.groups() {
            for (day, period) in self.domain.cells() {
                chromosome.add_gene(self.random_gene(group.id, day, period, rng)?);
            }
        }
        Ok(chromosome)
    }

    fn random_gene<R: Rng>(
        &self,
        group: GroupId,
        day: Weekday,
        period: u32,
        rng: &mut R,
    ) -> Result<Gene> {
        let slot = self.catalog.slot_id(day, period)?;
        let (Some(course), Some(teacher), Some(room)) = (
            self.catalog.courses().choose(rng),
            self.catalog.teachers().choose(rng),
            self.catalog.rooms().choose(rng),
        ) else {
            return Err(ValidationError::new(
                ValidationErrorKind::EmptyCollection,
                "courses, teachers and rooms must not be empty",
            )
            .into());
        };
        Gene::for_week(
            &self.domain.days,
            group,
            day,
            period,
            slot,
            course.id,
            teacher.id,
            room.id,
        )
        .map_err(Into::into)
    }

    /// Evaluates every stale individual. Returns the number evaluated.
    fn evaluate_stale(
        &self,
        evaluator: &FitnessEvaluator<'_>,
        population: &mut [Individual],
    ) -> usize {
        let stale = population.iter().filter(|i| !i.is_evaluated()).count();
        if self.config.parallel {
            population
                .par_iter_mut()
                .filter(|i| !i.is_evaluated())
                .for_each(|i| i.set_fitness(evaluator.evaluate(&i.chromosome)));
        } else {
            for ind in population.iter_mut().filter(|i| !i.is_evaluated()) {
                ind.set_fitness(evaluator.evaluate(&ind.chromosome));
            }
        }
        stale
    }
}

fn best_of(population: &[Individual]) -> Result<(Chromosome, f64)> {
    let idx = best_index(population)
        .ok_or_else(|| TimetableError::InvalidConfig("population is empty".into()))?;
    Ok((population[idx].chromosome.clone(), population[idx].penalty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::FixedGenePolicy;
    use crate::models::{Course, Room, StudentGroup, Teacher, TimeSlot};
    use crate::repair::GroupConflictPolicy;
    use rand::rngs::SmallRng;

    const DAYS: [Weekday; 2] = [Weekday::Monday, Weekday::Tuesday];

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                StudentGroup::new(1, "7A").with_home_room(1),
                StudentGroup::new(2, "7B").with_home_room(2),
            ],
            (1..=3).map(|i| Course::new(i, format!("C{i}"))).collect(),
            (1..=4)
                .map(|i| {
                    Teacher::new(i, format!("T{i}"))
                        .with_preferred_times([(Weekday::Monday, i % 3 + 1), (Weekday::Tuesday, 1)])
                })
                .collect(),
            (1..=3).map(|i| Room::new(i, format!("R{i}"))).collect(),
            TimeSlot::grid(&DAYS, &[1, 2, 3]),
        )
        .unwrap()
    }

    fn sample_config() -> SchedulingConfig {
        SchedulingConfig::default()
            .with_days(DAYS.to_vec())
            .with_periods(vec![1, 2, 3])
            .with_population_size(12)
            .with_max_generations(6)
            .with_verbose(false)
    }

    #[test]
    fn test_run_is_deterministic() {
        let scheduler = TimetableScheduler::new(sample_catalog(), sample_config()).unwrap();
        let a = scheduler.run().unwrap();
        let b = scheduler.run().unwrap();

        assert_eq!(a.best_penalty.to_bits(), b.best_penalty.to_bits());
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = TimetableScheduler::new(sample_catalog(), sample_config())
            .unwrap()
            .run()
            .unwrap();
        let parallel_config = sample_config().with_parallel(true);
        let parallel = TimetableScheduler::new(sample_catalog(), parallel_config)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(sequential.best, parallel.best);
        assert_eq!(sequential.history, parallel.history);
    }

    #[test]
    fn test_history_and_all_time_best() {
        let outcome = TimetableScheduler::new(sample_catalog(), sample_config())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(outcome.generations(), 6);
        for (i, stats) in outcome.history.iter().enumerate() {
            assert_eq!(stats.generation, i);
            assert!(stats.all_time_best_penalty <= stats.best_penalty);
            assert!(stats.best_penalty <= stats.mean_penalty + 1e-9);
            assert!(stats.evaluations <= 12);
        }
        for w in outcome.history.windows(2) {
            assert!(w[1].all_time_best_penalty <= w[0].all_time_best_penalty);
        }

        let last = outcome.history.last().unwrap();
        assert_eq!(outcome.best_penalty, last.best_penalty);
        assert_eq!(outcome.all_time_best_penalty, last.all_time_best_penalty);
        assert!(outcome.all_time_best_penalty <= outcome.best_penalty);
    }

    #[test]
    fn test_best_is_consistent() {
        let catalog = sample_catalog();
        let outcome = TimetableScheduler::new(catalog.clone(), sample_config())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(outcome.best.len(), 2 * 6);
        assert!((outcome.breakdown.total() - outcome.best_penalty).abs() < 1e-10);
        let evaluator = FitnessEvaluator::from_catalog(&catalog);
        let rescored = evaluator.evaluate(&outcome.all_time_best);
        assert!((rescored - outcome.all_time_best_penalty).abs() < 1e-10);
        for gene in &outcome.best {
            assert_eq!(gene.timeslot_id, catalog.slot_id(gene.day, gene.period).unwrap());
        }
    }

    #[test]
    fn test_run_with_caller_rng() {
        let scheduler = TimetableScheduler::new(
            sample_catalog(),
            sample_config()
                .with_group_conflict_policy(GroupConflictPolicy::RelocateSlot)
                .with_fixed_genes(FixedGenePolicy::Preserve),
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let outcome = scheduler.run_with_rng(&mut rng).unwrap();
        assert_eq!(outcome.generations(), 6);
        assert!(outcome.best_penalty.is_finite());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = TimetableScheduler::new(sample_catalog(), sample_config().with_population_size(3))
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_uncovered_domain() {
        let config = sample_config().with_days(vec![Weekday::Monday, Weekday::Friday]);
        let err = TimetableScheduler::new(sample_catalog(), config).unwrap_err();
        assert!(matches!(err, TimetableError::InvalidCatalog(_)));
    }
}
