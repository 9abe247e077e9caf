//! GRASP TSP Solver Library
//!
//! Computes near-optimal tours for the Euclidean Traveling Salesman Problem
//! with a Greedy Randomized Adaptive Search Procedure (GRASP).
//!
//! # Features
//!
//! - TSP-LIB `EUC_2D` instances with rounded Euclidean distances
//! - Randomized greedy construction with a restricted candidate list
//! - Stochastic 2-opt local search
//! - Restart driver with reproducible seeding and an optional time limit
//! - Benchmarking over repeated seeded runs
//!
//! # Example
//!
//! ```no_run
//! use grasp_tsp::instance::TspInstance;
//! use grasp_tsp::heuristics::grasp::{Grasp, GraspConfig};
//!
//! let instance = TspInstance::berlin52();
//! let grasp = Grasp::new(GraspConfig::with_params(50, 70, 0.3)).unwrap();
//! let result = grasp.search(&instance).unwrap();
//!
//! println!("Tour cost: {:.0}", result.cost());
//! ```

pub mod error;
pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod benchmark;

pub use error::{GraspError, Result};
pub use instance::{City, TspInstance};
pub use solution::{SearchResult, Tour};
