//! Tournament selection.
//!
//! # Algorithm
//!
//! For each parent: draw `k` population indices uniformly with
//! replacement and keep the contestant with the lowest penalty. On ties
//! the earliest draw wins.
//!
//! # Complexity
//! O(count · k)

use rand::Rng;

use crate::ga::Individual;

/// Selects `count` parent indices by `k`-way tournament.
///
/// Returns an empty vector for an empty population. A `k` of 0 is treated
/// as 1 (uniform random pick).
pub fn tournament_select<R: Rng>(
    population: &[Individual],
    k: usize,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    if population.is_empty() {
        return Vec::new();
    }
    let n = population.len();
    let k = k.max(1);

    (0..count)
        .map(|_| {
            let mut winner = rng.random_range(0..n);
            for _ in 1..k {
                let challenger = rng.random_range(0..n);
                if population[challenger].penalty() < population[winner].penalty() {
                    winner = challenger;
                }
            }
            winner
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Chromosome;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn population(penalties: &[f64]) -> Vec<Individual> {
        penalties
            .iter()
            .map(|&p| {
                let mut ind = Individual::new(Chromosome::new());
                ind.set_fitness(p);
                ind
            })
            .collect()
    }

    #[test]
    fn test_selects_requested_count() {
        let pop = population(&[5.0, 3.0, 8.0, 1.0]);
        let mut rng = SmallRng::seed_from_u64(42);
        let picks = tournament_select(&pop, 3, 10, &mut rng);
        assert_eq!(picks.len(), 10);
        assert!(picks.iter().all(|&i| i < pop.len()));
    }

    #[test]
    fn test_pressure_towards_low_penalty() {
        let pop = population(&[100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(42);
        let picks = tournament_select(&pop, 3, 2000, &mut rng);

        let best_share = picks.iter().filter(|&&i| i == 9).count() as f64 / 2000.0;
        let worst_share = picks.iter().filter(|&&i| i == 0).count() as f64 / 2000.0;
        // P(best wins) = 1 - 0.9^3 ≈ 0.27; P(worst wins) = 0.1^3 = 0.001
        assert!(best_share > 0.2, "best share {best_share}");
        assert!(worst_share < 0.01, "worst share {worst_share}");
    }

    #[test]
    fn test_stale_individuals_lose() {
        let mut pop = population(&[10.0, 10.0]);
        pop[0].invalidate();
        let mut rng = SmallRng::seed_from_u64(42);
        let picks = tournament_select(&pop, 8, 50, &mut rng);
        // With 8 draws from 2, index 1 is almost surely drawn in each round
        assert!(picks.iter().filter(|&&i| i == 1).count() >= 45);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(tournament_select(&[], 3, 5, &mut rng).is_empty());
    }

    #[test]
    fn test_single_contestant_is_uniform() {
        let pop = population(&[1.0, 2.0, 3.0]);
        let mut rng = SmallRng::seed_from_u64(42);
        let picks = tournament_select(&pop, 0, 300, &mut rng);
        for i in 0..3 {
            assert!(picks.contains(&i));
        }
    }
}
