use crate::instance::TspInstance;
use crate::solution::Tour;
use ordered_float::OrderedFloat;
use rand::Rng;

pub trait ConstructionHeuristic {
    fn construct<R: Rng>(&self, instance: &TspInstance, rng: &mut R) -> Tour;
    fn name(&self) -> &str;
}

/// Randomized greedy construction with a restricted candidate list (RCL)
///
/// Starts from a random city. At each step every unvisited city within
/// `min + alpha * (max - min)` of the last placed city enters the RCL, and
/// the next city is drawn uniformly from it. `alpha = 0` is pure nearest
/// neighbor (ties broken at random), `alpha = 1` a uniformly random tour.
#[derive(Debug, Clone)]
pub struct RandomizedGreedyConstruction {
    pub greediness_factor: f64,
}

impl RandomizedGreedyConstruction {
    pub fn new(greediness_factor: f64) -> Self {
        RandomizedGreedyConstruction { greediness_factor }
    }

    /// Unvisited cities close enough to `current` to be picked next.
    fn restricted_candidates(
        &self,
        instance: &TspInstance,
        current: usize,
        unvisited: &[usize],
    ) -> Vec<usize> {
        let costs: Vec<f64> = unvisited.iter().map(|&c| instance.distance(current, c)).collect();

        let min = costs.iter().copied().map(OrderedFloat).min().map_or(0.0, |d| d.0);
        let max = costs.iter().copied().map(OrderedFloat).max().map_or(0.0, |d| d.0);
        let threshold = min + self.greediness_factor * (max - min);

        unvisited
            .iter()
            .zip(&costs)
            .filter(|&(_, &d)| d <= threshold)
            .map(|(&c, _)| c)
            .collect()
    }
}

impl Default for RandomizedGreedyConstruction {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl ConstructionHeuristic for RandomizedGreedyConstruction {
    fn construct<R: Rng>(&self, instance: &TspInstance, rng: &mut R) -> Tour {
        let n = instance.dimension();
        let start = rng.gen_range(0..n);

        let mut tour = Vec::with_capacity(n);
        tour.push(start);
        let mut unvisited: Vec<usize> = (0..n).filter(|&c| c != start).collect();

        while !unvisited.is_empty() {
            let current = tour[tour.len() - 1];
            let rcl = self.restricted_candidates(instance, current, &unvisited);
            // The nearest city always satisfies the threshold.
            let next = rcl[rng.gen_range(0..rcl.len())];

            tour.push(next);
            unvisited.retain(|&c| c != next);
        }

        Tour::from_permutation(instance, tour)
    }

    fn name(&self) -> &str {
        "RandomizedGreedy"
    }
}
