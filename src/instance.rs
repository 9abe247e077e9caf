//! Module for parsing and representing Euclidean TSP instances.
//!
//! This module handles TSP-LIB `EUC_2D` files and the built-in berlin52
//! benchmark. Distances follow the TSP-LIB convention: Euclidean distance
//! rounded to the nearest integer.

use crate::error::{GraspError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Best known tour length for berlin52.
pub const BERLIN52_OPTIMUM: f64 = 7542.0;

const BERLIN52_COORDS: [(f64, f64); 52] = [
    (565.0, 575.0), (25.0, 185.0), (345.0, 750.0), (945.0, 685.0), (845.0, 655.0),
    (880.0, 660.0), (25.0, 230.0), (525.0, 1000.0), (580.0, 1175.0), (650.0, 1130.0),
    (1605.0, 620.0), (1220.0, 580.0), (1465.0, 200.0), (1530.0, 5.0), (845.0, 680.0),
    (725.0, 370.0), (145.0, 665.0), (415.0, 635.0), (510.0, 875.0), (560.0, 365.0),
    (300.0, 465.0), (520.0, 585.0), (480.0, 415.0), (835.0, 625.0), (975.0, 580.0),
    (1215.0, 245.0), (1320.0, 315.0), (1250.0, 400.0), (660.0, 180.0), (410.0, 250.0),
    (420.0, 555.0), (575.0, 665.0), (1150.0, 1160.0), (700.0, 580.0), (685.0, 595.0),
    (685.0, 610.0), (770.0, 610.0), (795.0, 645.0), (720.0, 635.0), (760.0, 650.0),
    (475.0, 960.0), (95.0, 260.0), (875.0, 920.0), (700.0, 500.0), (555.0, 815.0),
    (830.0, 485.0), (1170.0, 65.0), (830.0, 610.0), (605.0, 625.0), (595.0, 360.0),
    (1340.0, 725.0), (1740.0, 245.0),
];

/// A city in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    pub const fn new(x: f64, y: f64) -> Self {
        City { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rounded Euclidean distance between two cities.
///
/// Ties round to even (2.5 -> 2, 3.5 -> 4), so every cost in the crate is an
/// integer-valued `f64`.
#[inline]
pub fn euc_2d(a: &City, b: &City) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt().round_ties_even()
}

/// A Euclidean TSP instance
#[derive(Debug, Clone)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    cities: Vec<City>,
    distance_matrix: Vec<Vec<f64>>,
}

impl TspInstance {
    /// Build an instance from a list of cities.
    ///
    /// Fails if there are fewer than two cities or any coordinate is NaN or
    /// infinite.
    pub fn new(name: impl Into<String>, cities: Vec<City>) -> Result<Self> {
        if cities.len() < 2 {
            return Err(GraspError::TooFewCities { found: cities.len() });
        }
        if let Some(index) = cities.iter().position(|c| !c.is_finite()) {
            return Err(GraspError::NonFiniteCoordinate { index });
        }

        let distance_matrix = Self::compute_distance_matrix(&cities);

        Ok(TspInstance {
            name: name.into(),
            comment: String::new(),
            cities,
            distance_matrix,
        })
    }

    /// Build an instance from bare `(x, y)` pairs.
    pub fn from_coords(name: impl Into<String>, coords: &[(f64, f64)]) -> Result<Self> {
        let cities = coords.iter().map(|&(x, y)| City::new(x, y)).collect();
        Self::new(name, cities)
    }

    /// The 52-city berlin52 benchmark from TSP-LIB.
    pub fn berlin52() -> Self {
        let cities: Vec<City> = BERLIN52_COORDS.iter().map(|&(x, y)| City::new(x, y)).collect();
        let distance_matrix = Self::compute_distance_matrix(&cities);
        TspInstance {
            name: "berlin52".to_string(),
            comment: "52 locations in Berlin (Groetschel)".to_string(),
            cities,
            distance_matrix,
        }
    }

    /// Parse an instance from a TSP-LIB format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mut instance = Self::from_reader(BufReader::new(file))?;
        if instance.name.is_empty() {
            instance.name = path
                .as_ref()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(instance)
    }

    /// Parse TSP-LIB text. Only `EUC_2D` coordinates are supported.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension: Option<usize> = None;
        let mut coords: Vec<City> = Vec::new();
        let mut in_coords = false;
        let mut in_other_section = false;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }
            if line.ends_with("_SECTION") {
                in_coords = line == "NODE_COORD_SECTION";
                in_other_section = !in_coords;
                continue;
            }
            if in_other_section {
                continue;
            }

            if in_coords {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(parse_error(line_no, "expected `<id> <x> <y>`"));
                }
                let x: f64 = parts[1]
                    .parse()
                    .map_err(|_| parse_error(line_no, "invalid x coordinate"))?;
                let y: f64 = parts[2]
                    .parse()
                    .map_err(|_| parse_error(line_no, "invalid y coordinate"))?;
                coords.push(City::new(x, y));
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                return Err(parse_error(line_no, "expected `KEY : VALUE` header"));
            };
            let value = value.trim();
            match key.trim() {
                "NAME" => name = value.to_string(),
                "COMMENT" => comment = value.to_string(),
                "DIMENSION" => {
                    let n = value
                        .parse()
                        .map_err(|_| parse_error(line_no, "invalid dimension"))?;
                    dimension = Some(n);
                }
                "EDGE_WEIGHT_TYPE" if value != "EUC_2D" => {
                    return Err(parse_error(
                        line_no,
                        &format!("unsupported edge weight type `{}`", value),
                    ));
                }
                "TYPE" if value != "TSP" => {
                    return Err(parse_error(
                        line_no,
                        &format!("unsupported problem type `{}`", value),
                    ));
                }
                _ => {}
            }
        }

        if let Some(n) = dimension {
            if n != coords.len() {
                return Err(GraspError::Parse {
                    line: 0,
                    message: format!("DIMENSION is {} but {} coordinates were read", n, coords.len()),
                });
            }
        }

        let mut instance = Self::new(name, coords)?;
        instance.comment = comment;
        Ok(instance)
    }

    fn compute_distance_matrix(cities: &[City]) -> Vec<Vec<f64>> {
        let n = cities.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in i + 1..n {
                let d = euc_2d(&cities[i], &cities[j]);
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }

        matrix
    }

    /// Number of cities
    #[inline]
    pub fn dimension(&self) -> usize {
        self.cities.len()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city(&self, i: usize) -> &City {
        &self.cities[i]
    }

    /// Get the rounded distance between two cities
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Length of the closed cycle visiting `order` and returning to its start.
    ///
    /// `order` may cover a subset of the cities, but every index must be in
    /// range and appear at most once.
    pub fn tour_length(&self, order: &[usize]) -> Result<f64> {
        if order.is_empty() {
            return Err(GraspError::InvalidTour("empty city sequence".to_string()));
        }
        let mut seen = vec![false; self.dimension()];
        for &c in order {
            if c >= self.dimension() {
                return Err(GraspError::InvalidTour(format!(
                    "city index {} out of range for {} cities",
                    c,
                    self.dimension()
                )));
            }
            if std::mem::replace(&mut seen[c], true) {
                return Err(GraspError::InvalidTour(format!("city {} visited twice", c)));
            }
        }
        Ok(self.cycle_length(order))
    }

    /// Unchecked cycle length; callers guarantee `order` is valid.
    pub(crate) fn cycle_length(&self, order: &[usize]) -> f64 {
        let closing = match (order.last(), order.first()) {
            (Some(&last), Some(&first)) => self.distance(last, first),
            _ => return 0.0,
        };
        order
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum::<f64>()
            + closing
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();
        let mut total = 0.0;
        let mut max_distance: f64 = 0.0;
        let mut nearest_total = 0.0;

        for i in 0..n {
            let mut nearest = f64::INFINITY;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = self.distance(i, j);
                nearest = nearest.min(d);
                if j > i {
                    total += d;
                    max_distance = max_distance.max(d);
                }
            }
            nearest_total += nearest;
        }

        let pairs = (n * (n - 1) / 2) as f64;
        let (min_x, max_x, min_y, max_y) = self.cities.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(lx, hx, ly, hy), c| (lx.min(c.x), hx.max(c.x), ly.min(c.y), hy.max(c.y)),
        );

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            avg_distance: total / pairs,
            max_distance,
            avg_nearest_neighbor: nearest_total / n as f64,
            bounding_box: (min_x, min_y, max_x, max_y),
        }
    }
}

fn parse_error(line: usize, message: &str) -> GraspError {
    GraspError::Parse {
        line,
        message: message.to_string(),
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub avg_distance: f64,
    pub max_distance: f64,
    /// Mean distance from each city to its nearest neighbor
    pub avg_nearest_neighbor: f64,
    /// (min_x, min_y, max_x, max_y)
    pub bounding_box: (f64, f64, f64, f64),
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (min_x, min_y, max_x, max_y) = self.bounding_box;
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cities: {}", self.dimension)?;
        writeln!(f, "  Bounding box: ({:.1}, {:.1}) - ({:.1}, {:.1})", min_x, min_y, max_x, max_y)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)?;
        writeln!(f, "  Avg nearest-neighbor distance: {:.2}", self.avg_nearest_neighbor)
    }
}
