//! Genetic operators for timetable chromosomes.
//!
//! - [`single_point_crossover`]: exchanges gene tails after a random cut
//! - [`mutate_genes`]: per-gene independent reassignment of teacher,
//!   course, room and (day, period)
//!
//! [`GeneticOperators`] bundles the mutation rate and the fixed-gene
//! policy so the scheduler can switch behaviour through configuration.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::{FixedGenePolicy, GeneticOperators};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.fixed_genes, FixedGenePolicy::Ignore);
//! ```

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Chromosome;
use crate::error::Result;
use crate::models::{Catalog, TimeDomain};

/// How operators treat genes flagged `is_fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FixedGenePolicy {
    /// The flag is carried but not consulted.
    #[default]
    Ignore,
    /// Crossover, mutation and repair leave fixed genes untouched.
    Preserve,
}

impl FixedGenePolicy {
    /// Whether an operator may change a gene with the given flag.
    #[inline]
    pub fn allows(self, is_fixed: bool) -> bool {
        match self {
            FixedGenePolicy::Ignore => true,
            FixedGenePolicy::Preserve => !is_fixed,
        }
    }
}

/// Runtime-configured genetic operators.
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Probability of each of the four per-gene reassignments.
    pub gene_mutation_probability: f64,
    /// Treatment of fixed genes.
    pub fixed_genes: FixedGenePolicy,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            gene_mutation_probability: 0.1,
            fixed_genes: FixedGenePolicy::Ignore,
        }
    }
}

impl GeneticOperators {
    /// Performs single-point crossover in place.
    ///
    /// Returns `true` if genes were exchanged; both fitnesses are stale then.
    pub fn crossover<R: Rng>(&self, a: &mut Chromosome, b: &mut Chromosome, rng: &mut R) -> bool {
        single_point_crossover(a, b, self.fixed_genes, rng)
    }

    /// Mutates genes in place.
    ///
    /// Returns the number of genes touched.
    pub fn mutate<R: Rng>(
        &self,
        chromosome: &mut Chromosome,
        catalog: &Catalog,
        domain: &TimeDomain,
        rng: &mut R,
    ) -> Result<usize> {
        mutate_genes(
            chromosome,
            catalog,
            domain,
            self.gene_mutation_probability,
            self.fixed_genes,
            rng,
        )
    }
}

/// Single-point crossover.
///
/// Picks a cut uniformly from `[1, len - 1]` and swaps everything from the
/// cut onward between the two chromosomes. With
/// [`FixedGenePolicy::Preserve`], positions where either parent holds a
/// fixed gene keep their gene.
///
/// Chromosomes shorter than two genes are left unchanged. The combined
/// gene count of the pair is always preserved.
///
/// Returns `true` if any gene changed hands.
pub fn single_point_crossover<R: Rng>(
    a: &mut Chromosome,
    b: &mut Chromosome,
    fixed: FixedGenePolicy,
    rng: &mut R,
) -> bool {
    let shared = a.len().min(b.len());
    if shared < 2 {
        return false;
    }
    let cut = rng.random_range(1..shared);

    let (genes_a, genes_b) = (a.genes_vec_mut(), b.genes_vec_mut());
    let mut exchanged = false;
    let split = match fixed {
        FixedGenePolicy::Ignore => cut,
        FixedGenePolicy::Preserve => {
            for i in cut..shared {
                if !genes_a[i].is_fixed && !genes_b[i].is_fixed {
                    std::mem::swap(&mut genes_a[i], &mut genes_b[i]);
                    exchanged = true;
                }
            }
            shared
        }
    };

    // Unequal-length parents trade their surplus tails as well
    let tail_a = genes_a.split_off(split);
    let tail_b = genes_b.split_off(split);
    exchanged |= !tail_a.is_empty() || !tail_b.is_empty();
    genes_a.extend(tail_b);
    genes_b.extend(tail_a);
    exchanged
}

/// Per-gene mutation.
///
/// For every gene, four independent trials each fire with `probability`:
/// a random catalog teacher, a random course, a random room, and a random
/// (day, period) from `domain` with its timeslot id re-resolved.
///
/// # Errors
/// [`TimetableError::SlotLookup`] if the drawn cell has no timeslot.
///
/// [`TimetableError::SlotLookup`]: crate::error::TimetableError::SlotLookup
pub fn mutate_genes<R: Rng>(
    chromosome: &mut Chromosome,
    catalog: &Catalog,
    domain: &TimeDomain,
    probability: f64,
    fixed: FixedGenePolicy,
    rng: &mut R,
) -> Result<usize> {
    let mut touched = 0;
    for gene in chromosome.iter_mut() {
        if !fixed.allows(gene.is_fixed) {
            continue;
        }
        let mut changed = false;

        if rng.random::<f64>() < probability {
            if let Some(t) = catalog.teachers().choose(rng) {
                gene.teacher_id = t.id;
                changed = true;
            }
        }
        if rng.random::<f64>() < probability {
            if let Some(c) = catalog.courses().choose(rng) {
                gene.course_id = c.id;
                changed = true;
            }
        }
        if rng.random::<f64>() < probability {
            if let Some(r) = catalog.rooms().choose(rng) {
                gene.room_id = r.id;
                changed = true;
            }
        }
        if rng.random::<f64>() < probability {
            if let (Some(&day), Some(&period)) =
                (domain.days.choose(rng), domain.periods.choose(rng))
            {
                gene.timeslot_id = catalog.slot_id(day, period)?;
                gene.day = day;
                gene.period = period;
                changed = true;
            }
        }

        if changed {
            touched += 1;
        }
    }
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimetableError;
    use crate::ga::Gene;
    use crate::models::{Course, Room, StudentGroup, Teacher, TimeSlot, Weekday};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![StudentGroup::new(1, "7A")],
            (1..=4).map(|i| Course::new(i, format!("C{i}"))).collect(),
            (1..=4).map(|i| Teacher::new(i, format!("T{i}"))).collect(),
            (1..=3).map(|i| Room::new(i, format!("R{i}"))).collect(),
            TimeSlot::grid(&Weekday::SCHOOL_WEEK, &[1, 2, 3]),
        )
        .unwrap()
    }

    fn sample_chromosome(len: usize, group: u32) -> Chromosome {
        let domain = TimeDomain::new(Weekday::SCHOOL_WEEK.to_vec(), vec![1, 2, 3]);
        let cells: Vec<_> = domain.cells().collect();
        cells
            .into_iter()
            .cycle()
            .take(len)
            .enumerate()
            .map(|(i, (d, p))| Gene::new(group, d, p, 1, 1, (i % 4) as u32 + 1, 1).unwrap())
            .collect()
    }

    #[test]
    fn test_crossover_preserves_gene_count() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut a = sample_chromosome(15, 1);
        let mut b = sample_chromosome(15, 2);

        assert!(single_point_crossover(&mut a, &mut b, FixedGenePolicy::Ignore, &mut rng));
        assert_eq!(a.len() + b.len(), 30);
        // Head of `a` always survives the cut
        assert_eq!(a[0].group_id, 1);
        // Something from `b` reached `a`
        assert!(a.iter().any(|g| g.group_id == 2));
        assert!(b.iter().any(|g| g.group_id == 1));
    }

    #[test]
    fn test_crossover_tail_is_swapped() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut a = sample_chromosome(10, 1);
        let mut b = sample_chromosome(10, 2);
        single_point_crossover(&mut a, &mut b, FixedGenePolicy::Ignore, &mut rng);

        let cut = a.iter().position(|g| g.group_id == 2).unwrap();
        assert!(cut >= 1 && cut <= 9);
        assert!(a.iter().skip(cut).all(|g| g.group_id == 2));
        assert!(b.iter().take(cut).all(|g| g.group_id == 2));
        assert!(b.iter().skip(cut).all(|g| g.group_id == 1));
    }

    #[test]
    fn test_crossover_short_is_noop() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut a = sample_chromosome(1, 1);
        let mut b = sample_chromosome(1, 2);
        assert!(!single_point_crossover(&mut a, &mut b, FixedGenePolicy::Ignore, &mut rng));
        assert_eq!(a[0].group_id, 1);
        assert_eq!(b[0].group_id, 2);

        let mut e1 = Chromosome::new();
        let mut e2 = Chromosome::new();
        assert!(!single_point_crossover(&mut e1, &mut e2, FixedGenePolicy::Ignore, &mut rng));
    }

    #[test]
    fn test_crossover_unequal_lengths() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut a = sample_chromosome(6, 1);
        let mut b = sample_chromosome(9, 2);
        single_point_crossover(&mut a, &mut b, FixedGenePolicy::Ignore, &mut rng);
        assert_eq!(a.len() + b.len(), 15);
    }

    #[test]
    fn test_crossover_preserves_fixed_positions() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut a = sample_chromosome(12, 1);
        let mut b = sample_chromosome(12, 2);
        for i in 0..12 {
            a[i].is_fixed = true;
        }

        let exchanged = single_point_crossover(&mut a, &mut b, FixedGenePolicy::Preserve, &mut rng);
        assert!(!exchanged);
        assert!(a.iter().all(|g| g.group_id == 1));
        assert!(b.iter().all(|g| g.group_id == 2));
    }

    #[test]
    fn test_crossover_preserve_reports_exchange() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut a = sample_chromosome(12, 1);
        let mut b = sample_chromosome(12, 2);
        a[0].is_fixed = true;

        // Position 0 is never past the cut, so the rest still swaps
        assert!(single_point_crossover(&mut a, &mut b, FixedGenePolicy::Preserve, &mut rng));
        assert_eq!(a[0].group_id, 1);
        assert_eq!(a[11].group_id, 2);
        assert_eq!(b[11].group_id, 1);
    }

    #[test]
    fn test_crossover_preserve_surplus_tail_counts() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut a = sample_chromosome(4, 1);
        let mut b = sample_chromosome(6, 2);
        for g in a.iter_mut() {
            g.is_fixed = true;
        }

        assert!(single_point_crossover(&mut a, &mut b, FixedGenePolicy::Preserve, &mut rng));
        assert_eq!(a.len(), 6);
        assert_eq!(b.len(), 4);
        assert!(b.iter().all(|g| g.group_id == 2));
    }

    #[test]
    fn test_mutation_keeps_length_and_domain() {
        let catalog = sample_catalog();
        let domain = TimeDomain::new(Weekday::SCHOOL_WEEK.to_vec(), vec![1, 2, 3]);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = sample_chromosome(15, 1);

        let touched =
            mutate_genes(&mut ch, &catalog, &domain, 1.0, FixedGenePolicy::Ignore, &mut rng)
                .unwrap();
        assert_eq!(touched, 15);
        assert_eq!(ch.len(), 15);
        for g in &ch {
            assert!(domain.contains(g.day, g.period));
            assert_eq!(g.timeslot_id, catalog.slot_id(g.day, g.period).unwrap());
            assert!(catalog.teacher(g.teacher_id).is_some());
            assert!(catalog.has_course(g.course_id));
        }
    }

    #[test]
    fn test_mutation_zero_probability_is_identity() {
        let catalog = sample_catalog();
        let domain = TimeDomain::new(Weekday::SCHOOL_WEEK.to_vec(), vec![1, 2, 3]);
        let mut rng = SmallRng::seed_from_u64(42);
        let original = sample_chromosome(15, 1);
        let mut ch = original.clone();

        let touched =
            mutate_genes(&mut ch, &catalog, &domain, 0.0, FixedGenePolicy::Ignore, &mut rng)
                .unwrap();
        assert_eq!(touched, 0);
        assert_eq!(ch, original);
    }

    #[test]
    fn test_mutation_skips_fixed_genes() {
        let catalog = sample_catalog();
        let domain = TimeDomain::new(Weekday::SCHOOL_WEEK.to_vec(), vec![1, 2, 3]);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = sample_chromosome(5, 1);
        ch[2].is_fixed = true;
        let pinned = ch[2].clone();

        let touched =
            mutate_genes(&mut ch, &catalog, &domain, 1.0, FixedGenePolicy::Preserve, &mut rng)
                .unwrap();
        assert_eq!(touched, 4);
        assert_eq!(ch[2], pinned);
    }

    #[test]
    fn test_mutation_missing_slot_fails() {
        let catalog = sample_catalog();
        // Period 6 has no timeslot in the catalog
        let domain = TimeDomain::new(vec![Weekday::Monday], vec![6]);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = sample_chromosome(5, 1);

        let err = mutate_genes(&mut ch, &catalog, &domain, 1.0, FixedGenePolicy::Ignore, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            TimetableError::SlotLookup {
                day: Weekday::Monday,
                period: 6
            }
        );
    }

    #[test]
    fn test_operators_wrapper() {
        let catalog = sample_catalog();
        let domain = TimeDomain::new(Weekday::SCHOOL_WEEK.to_vec(), vec![1, 2, 3]);
        let ops = GeneticOperators {
            gene_mutation_probability: 0.5,
            fixed_genes: FixedGenePolicy::Ignore,
        };
        let mut rng = SmallRng::seed_from_u64(42);
        let mut a = sample_chromosome(15, 1);
        let mut b = sample_chromosome(15, 2);

        assert!(ops.crossover(&mut a, &mut b, &mut rng));
        ops.mutate(&mut a, &catalog, &domain, &mut rng).unwrap();
        assert_eq!(a.len(), 15);
    }
}
