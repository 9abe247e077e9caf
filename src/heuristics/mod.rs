//! Heuristics module for the TSP.
//!
//! This module exports the GRASP building blocks: randomized greedy
//! construction, stochastic 2-opt local search and the search driver.

pub mod construction;
pub mod local_search;
pub mod grasp;

pub use construction::*;
pub use local_search::*;
pub use grasp::*;
