//! Greedy Randomized Adaptive Search Procedure (GRASP) for the TSP.
//!
//! Each iteration builds a tour with [`RandomizedGreedyConstruction`],
//! refines it with [`StochasticTwoOpt`] and keeps it if it beats the best
//! tour so far.

use crate::error::{GraspError, Result};
use crate::heuristics::construction::{ConstructionHeuristic, RandomizedGreedyConstruction};
use crate::heuristics::local_search::{LocalSearch, StochasticTwoOpt};
use crate::instance::TspInstance;
use crate::solution::{SearchResult, Tour};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// GRASP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraspConfig {
    /// Number of construct-then-improve restarts
    pub max_iterations: usize,
    /// Consecutive non-improving 2-opt attempts before a local search stops
    pub max_no_improvements: usize,
    /// RCL width in [0, 1]: 0 is pure nearest neighbor, 1 is uniform random
    pub greediness_factor: f64,
    /// Optional wall-clock limit in seconds
    pub time_limit: Option<f64>,
    /// Seed for [`Grasp::search`]
    pub seed: u64,
}

impl Default for GraspConfig {
    fn default() -> Self {
        GraspConfig {
            max_iterations: 50,
            max_no_improvements: 50,
            greediness_factor: 0.3,
            time_limit: None,
            seed: 42,
        }
    }
}

impl GraspConfig {
    pub fn with_params(max_iterations: usize, max_no_improvements: usize, greediness_factor: f64) -> Self {
        GraspConfig {
            max_iterations,
            max_no_improvements,
            greediness_factor,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GraspError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.greediness_factor) {
            return Err(GraspError::InvalidConfig(format!(
                "greediness_factor must be in [0, 1], got {}",
                self.greediness_factor
            )));
        }
        if let Some(limit) = self.time_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(GraspError::InvalidConfig(format!(
                    "time_limit must be a positive number of seconds, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// GRASP search driver
#[derive(Debug, Clone)]
pub struct Grasp {
    config: GraspConfig,
    construction: RandomizedGreedyConstruction,
    local_search: StochasticTwoOpt,
}

impl Grasp {
    /// Create a driver, rejecting an invalid configuration up front.
    pub fn new(config: GraspConfig) -> Result<Self> {
        config.validate()?;
        Ok(Grasp {
            construction: RandomizedGreedyConstruction::new(config.greediness_factor),
            local_search: StochasticTwoOpt::new(config.max_no_improvements),
            config,
        })
    }

    pub fn config(&self) -> &GraspConfig {
        &self.config
    }

    /// Run the search with a `ChaCha8Rng` seeded from the configuration.
    pub fn search(&self, instance: &TspInstance) -> Result<SearchResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.search_with_rng(instance, &mut rng)
    }

    /// Run the search drawing all randomness from `rng`.
    pub fn search_with_rng<R: Rng>(&self, instance: &TspInstance, rng: &mut R) -> Result<SearchResult> {
        let start = Instant::now();
        let mut best: Option<(Tour, usize)> = None;
        let mut history = Vec::with_capacity(self.config.max_iterations);

        for iteration in 1..=self.config.max_iterations {
            let candidate = self.iterate(instance, rng);

            let improved = best
                .as_ref()
                .map_or(true, |(tour, _)| candidate.cost() < tour.cost());
            if improved {
                best = Some((candidate, iteration));
            }

            let best_cost = best.as_ref().map_or(f64::INFINITY, |(tour, _)| tour.cost());
            history.push(best_cost);
            log::info!(" > iteration #{}, best={:.0}", iteration, best_cost);

            if let Some(limit) = self.config.time_limit {
                if start.elapsed().as_secs_f64() >= limit && iteration < self.config.max_iterations {
                    log::warn!(
                        "time limit of {:.2}s reached after {} of {} iterations",
                        limit,
                        iteration,
                        self.config.max_iterations
                    );
                    break;
                }
            }
        }

        let (best, found_at) = best.ok_or_else(|| {
            GraspError::InvalidConfig("search finished without running an iteration".to_string())
        })?;
        let result = SearchResult {
            found_at,
            iterations: history.len(),
            history,
            computation_time: start.elapsed().as_secs_f64(),
            best,
        };

        log::info!(
            "GRASP ({} + {}) on {}: best={:.0} (iteration {}/{}) in {:.3}s",
            self.construction.name(),
            self.local_search.name(),
            instance.name,
            result.cost(),
            result.found_at,
            result.iterations,
            result.computation_time
        );
        Ok(result)
    }

    /// One restart: randomized greedy construction followed by 2-opt.
    pub fn iterate<R: Rng>(&self, instance: &TspInstance, rng: &mut R) -> Tour {
        let tour = self.construction.construct(instance, rng);
        self.local_search.improve(instance, tour, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_instance() -> TspInstance {
        TspInstance::from_coords(
            "ring",
            &[
                (0.0, 0.0), (40.0, 5.0), (80.0, 0.0), (100.0, 40.0), (80.0, 80.0),
                (40.0, 85.0), (0.0, 80.0), (-20.0, 40.0), (30.0, 30.0), (60.0, 50.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = GraspConfig::default();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.max_no_improvements, 50);
        assert_eq!(config.greediness_factor, 0.3);
        assert!(config.time_limit.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let bad = [
            GraspConfig::with_params(0, 50, 0.3),
            GraspConfig::with_params(10, 50, -0.1),
            GraspConfig::with_params(10, 50, 1.5),
            GraspConfig::with_params(10, 50, f64::NAN),
            GraspConfig::default().with_time_limit(0.0),
            GraspConfig::default().with_time_limit(f64::INFINITY),
        ];
        for config in bad {
            assert!(
                matches!(Grasp::new(config.clone()), Err(GraspError::InvalidConfig(_))),
                "accepted {:?}",
                config
            );
        }
    }

    #[test]
    fn test_history_is_non_increasing() {
        let grasp = Grasp::new(GraspConfig::with_params(30, 20, 0.5)).unwrap();
        let result = grasp.search(&small_instance()).unwrap();

        assert_eq!(result.iterations, 30);
        assert_eq!(result.history.len(), 30);
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*result.history.last().unwrap(), result.cost());

        let first_best = result.history.iter().position(|&c| c == result.cost()).unwrap();
        assert_eq!(result.found_at, first_best + 1);
    }

    #[test]
    fn test_same_seed_same_result() {
        let instance = small_instance();
        let config = GraspConfig::with_params(15, 30, 0.3).with_seed(1234);
        let a = Grasp::new(config.clone()).unwrap().search(&instance).unwrap();
        let b = Grasp::new(config).unwrap().search(&instance).unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.found_at, b.found_at);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_injected_rng_matches_seeded_search() {
        let instance = small_instance();
        let grasp = Grasp::new(GraspConfig::with_params(5, 10, 0.3).with_seed(77)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);

        let seeded = grasp.search(&instance).unwrap();
        let injected = grasp.search_with_rng(&instance, &mut rng).unwrap();
        assert_eq!(seeded.best, injected.best);
    }

    #[test]
    fn test_two_city_instance() {
        let instance = TspInstance::from_coords("pair", &[(0.0, 0.0), (6.0, 8.0)]).unwrap();
        let result = Grasp::new(GraspConfig::default()).unwrap().search(&instance).unwrap();
        assert_eq!(result.cost(), 20.0);
        assert_eq!(result.found_at, 1);
    }

    #[test]
    fn test_time_limit_stops_early() {
        let config = GraspConfig::with_params(1_000_000, 50, 0.3).with_time_limit(0.05);
        let result = Grasp::new(config).unwrap().search(&TspInstance::berlin52()).unwrap();
        assert!(result.iterations >= 1);
        assert!(result.iterations < 1_000_000);
    }

    #[test]
    fn test_berlin52_regression() {
        let grasp = Grasp::new(GraspConfig::with_params(50, 70, 0.3)).unwrap();
        let instance = TspInstance::berlin52();
        let result = grasp.search(&instance).unwrap();

        assert!(result.cost() < 11000.0, "cost {} above regression bound", result.cost());
        assert!(Tour::new(&instance, result.best.order().to_vec()).is_ok());
    }
}
