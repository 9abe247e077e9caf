//! Tour representation for the TSP.
//!
//! A [`Tour`] bundles a permutation of city indices with its closed-cycle
//! length. The fields are private and every constructor computes the cost,
//! so the two can never disagree. Moves produce new `Tour` values instead of
//! editing one in place.

use crate::error::{GraspError, Result};
use crate::instance::TspInstance;
use serde::Serialize;

/// A complete tour over every city of an instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    order: Vec<usize>,
    cost: f64,
}

impl Tour {
    /// Create a tour from a visiting order, checking that it is a
    /// permutation of `0..N`.
    pub fn new(instance: &TspInstance, order: Vec<usize>) -> Result<Self> {
        if let Some(reason) = permutation_defect(&order, instance.dimension()) {
            return Err(GraspError::InvalidTour(reason));
        }
        let cost = instance.cycle_length(&order);
        Ok(Tour { order, cost })
    }

    /// Create a tour from an order the caller produced itself.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of `0..N`: heuristics must never
    /// produce one, so this is a bug rather than bad input.
    pub(crate) fn from_permutation(instance: &TspInstance, order: Vec<usize>) -> Self {
        if let Some(reason) = permutation_defect(&order, instance.dimension()) {
            panic!("heuristic produced an invalid permutation: {}", reason);
        }
        let cost = instance.cycle_length(&order);
        Tour { order, cost }
    }

    /// Total length of the closed cycle
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// New tour with positions `[i, j)` reversed (a 2-opt move).
    pub fn with_reversed_segment(&self, instance: &TspInstance, i: usize, j: usize) -> Tour {
        let mut order = self.order.clone();
        order[i..j].reverse();
        Tour::from_permutation(instance, order)
    }

    /// The same cycle rotated so that `city` comes first.
    pub fn rotated_to(&self, city: usize) -> Option<Tour> {
        let pos = self.order.iter().position(|&c| c == city)?;
        let mut order = self.order.clone();
        order.rotate_left(pos);
        Some(Tour { order, cost: self.cost })
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Cost: {:.0}", self.cost)?;
        write!(f, "  Tour: {:?}", self.order)
    }
}

/// Returns why `order` is not a permutation of `0..n`, if it is not one.
fn permutation_defect(order: &[usize], n: usize) -> Option<String> {
    if order.len() != n {
        return Some(format!("expected {} cities, got {}", n, order.len()));
    }
    let mut seen = vec![false; n];
    for &c in order {
        if c >= n {
            return Some(format!("city index {} out of range", c));
        }
        if std::mem::replace(&mut seen[c], true) {
            return Some(format!("city {} visited twice", c));
        }
    }
    None
}

/// Outcome of a full GRASP search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Best tour over all restarts
    pub best: Tour,
    /// 1-based iteration at which `best` was found
    pub found_at: usize,
    /// Number of restarts actually executed
    pub iterations: usize,
    /// Best cost after each iteration
    pub history: Vec<f64>,
    /// Wall-clock time in seconds
    pub computation_time: f64,
}

impl SearchResult {
    pub fn cost(&self) -> f64 {
        self.best.cost()
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution (GRASP)")?;
        writeln!(f, "{}", self.best)?;
        writeln!(f, "  Found at iteration: {}/{}", self.found_at, self.iterations)?;
        write!(f, "  Time: {:.4}s", self.computation_time)
    }
}
