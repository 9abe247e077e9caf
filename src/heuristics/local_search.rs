//! Local search improvement for TSP tours.
//!
//! Implements the stochastic 2-opt search used inside GRASP: random segment
//! reversals, accepting only strict improvements, until a budget of
//! consecutive failed attempts is spent.

use crate::instance::TspInstance;
use crate::solution::Tour;
use rand::Rng;

/// Trait for local search improvement methods
pub trait LocalSearch {
    /// Refine `tour`; the returned tour never costs more than the input.
    fn improve<R: Rng>(&self, instance: &TspInstance, tour: Tour, rng: &mut R) -> Tour;
    fn name(&self) -> &str;
}

/// Draw a random 2-opt move on a tour of `n` cities.
///
/// Returns positions `i < j` such that `j` is neither `i` nor one of its
/// cyclic neighbours, so reversing `[i, j)` always yields a different
/// arrangement. Needs `n >= 4`; smaller tours have no such pair.
pub fn random_two_opt_move<R: Rng>(n: usize, rng: &mut R) -> Option<(usize, usize)> {
    if n < 4 {
        return None;
    }

    let i = rng.gen_range(0..n);
    let prev = if i == 0 { n - 1 } else { i - 1 };
    let next = if i == n - 1 { 0 } else { i + 1 };

    let mut j = rng.gen_range(0..n);
    while j == i || j == prev || j == next {
        j = rng.gen_range(0..n);
    }

    Some(if i < j { (i, j) } else { (j, i) })
}

/// Apply one stochastic 2-opt move to a permutation, returning a new vector.
pub fn stochastic_two_opt<R: Rng>(permutation: &[usize], rng: &mut R) -> Option<Vec<usize>> {
    let (i, j) = random_two_opt_move(permutation.len(), rng)?;
    let mut perm = permutation.to_vec();
    perm[i..j].reverse();
    Some(perm)
}

/// Stochastic 2-opt local search
///
/// Each attempt reverses a random segment. A strictly shorter tour replaces
/// the current one and resets the failure counter; otherwise the counter
/// grows. The search stops once `max_no_improvements` consecutive attempts
/// have failed (at least one attempt is always made).
#[derive(Debug, Clone)]
pub struct StochasticTwoOpt {
    /// Maximum consecutive non-improving attempts
    pub max_no_improvements: usize,
}

impl StochasticTwoOpt {
    pub fn new(max_no_improvements: usize) -> Self {
        StochasticTwoOpt { max_no_improvements }
    }
}

impl Default for StochasticTwoOpt {
    fn default() -> Self {
        Self::new(50)
    }
}

impl LocalSearch for StochasticTwoOpt {
    fn improve<R: Rng>(&self, instance: &TspInstance, tour: Tour, rng: &mut R) -> Tour {
        let n = tour.len();
        if n < 4 {
            // Every cyclic order of three or fewer cities has the same length.
            return tour;
        }

        let initial_cost = tour.cost();
        let mut best = tour;
        let mut no_improve = 0;
        let mut attempts = 0usize;

        loop {
            let Some((i, j)) = random_two_opt_move(n, rng) else {
                break;
            };
            let candidate = best.with_reversed_segment(instance, i, j);
            attempts += 1;

            if candidate.cost() < best.cost() {
                best = candidate;
                no_improve = 0;
            } else {
                no_improve += 1;
            }

            if no_improve >= self.max_no_improvements {
                break;
            }
        }

        log::debug!(
            "2-opt pass: {} attempts, cost {:.0} -> {:.0}",
            attempts,
            initial_cost,
            best.cost()
        );
        best
    }

    fn name(&self) -> &str {
        "Stochastic-2-Opt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn line_instance() -> TspInstance {
        TspInstance::from_coords(
            "line",
            &[(0.0, 0.0), (3.0, 3.0), (1.0, 1.0), (2.0, 2.0), (4.0, 4.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_stochastic_two_opt_rearranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let perm: Vec<usize> = (1..=10).collect();

        for _ in 0..200 {
            let other = stochastic_two_opt(&perm, &mut rng).unwrap();
            assert_eq!(other.len(), perm.len());
            assert_ne!(other, perm);
            assert_ne!(other.as_ptr(), perm.as_ptr());

            let mut sorted = other.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, perm);
        }
    }

    #[test]
    fn test_move_excludes_neighbours() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let (i, j) = random_two_opt_move(6, &mut rng).unwrap();
            assert!(i < j && j < 6);
            assert!(j - i >= 2);
            assert!(!(i == 0 && j == 5));
        }
    }

    #[test]
    fn test_small_tours_have_no_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(random_two_opt_move(3, &mut rng).is_none());
        assert!(stochastic_two_opt(&[0, 1, 2], &mut rng).is_none());
    }

    #[test]
    fn test_local_search_improves_bad_tour() {
        let instance = line_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let start = Tour::new(&instance, vec![0, 1, 2, 3, 4]).unwrap();
        assert_eq!(start.cost(), 4.0 + 3.0 + 1.0 + 3.0 + 6.0);

        let result = StochasticTwoOpt::new(20).improve(&instance, start.clone(), &mut rng);
        assert!(result.cost() < start.cost());
        assert_ne!(result.order(), start.order());
    }

    #[test]
    fn test_local_search_keeps_optimal_tour() {
        let instance = line_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let start = Tour::new(&instance, vec![0, 2, 3, 1, 4]).unwrap();
        assert_eq!(start.cost(), 10.0);

        let result = StochasticTwoOpt::new(10).improve(&instance, start.clone(), &mut rng);
        assert_eq!(result.cost(), start.cost());
    }

    #[test]
    fn test_zero_budget_still_attempts_once() {
        let instance = line_instance();
        let start = Tour::new(&instance, vec![0, 1, 2, 3, 4]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut reference = ChaCha8Rng::seed_from_u64(5);

        let result = StochasticTwoOpt::new(0).improve(&instance, start.clone(), &mut rng);
        let (i, j) = random_two_opt_move(5, &mut reference).unwrap();
        let expected = start.with_reversed_segment(&instance, i, j);

        if expected.cost() < start.cost() {
            assert_eq!(result, expected);
        } else {
            assert_eq!(result, start);
        }
    }

    #[test]
    fn test_three_cities_returned_unchanged() {
        let instance =
            TspInstance::from_coords("tri", &[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]).unwrap();
        let tour = Tour::new(&instance, vec![2, 0, 1]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let result = StochasticTwoOpt::default().improve(&instance, tour.clone(), &mut rng);
        assert_eq!(result, tour);
    }

    proptest! {
        #[test]
        fn prop_local_search_never_worsens(
            coords in prop::collection::vec((0.0f64..500.0, 0.0f64..500.0), 4..30),
            budget in 0usize..60,
            seed in any::<u64>(),
        ) {
            let instance = TspInstance::from_coords("prop", &coords).unwrap();
            let start = Tour::new(&instance, (0..coords.len()).collect()).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let result = StochasticTwoOpt::new(budget).improve(&instance, start.clone(), &mut rng);
            prop_assert!(result.cost() <= start.cost());
            prop_assert_eq!(result.cost(), instance.tour_length(result.order()).unwrap());
        }
    }
}
