//! Benchmarking and experimentation module.
//!
//! Runs the GRASP driver repeatedly with consecutive seeds, collects
//! per-run results and aggregates them per instance.

use crate::error::{GraspError, Result};
use crate::heuristics::grasp::{Grasp, GraspConfig};
use crate::instance::{TspInstance, BERLIN52_OPTIMUM};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of a single seeded GRASP run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub instance: String,
    pub dimension: usize,
    /// 0-based run index
    pub run: usize,
    pub seed: u64,
    pub cost: f64,
    /// Iteration at which the best tour was found
    pub found_at: usize,
    pub iterations: usize,
    /// Computation time in seconds
    pub time: f64,
    /// Gap to best known in percent (if available)
    pub gap_to_best: Option<f64>,
}

/// Aggregated statistics for one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub instance: String,
    pub num_runs: usize,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub avg_cost: f64,
    pub median_cost: f64,
    /// Sample standard deviation of cost
    pub std_cost: f64,
    pub avg_found_at: f64,
    pub avg_time: f64,
    pub total_time: f64,
    /// Average gap to best known
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs per instance
    pub num_runs: usize,
    /// Run `r` uses seed `base_seed + r`
    pub base_seed: u64,
    pub grasp: GraspConfig,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 10,
            base_seed: 42,
            grasp: GraspConfig::default(),
            show_progress: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
    best_known: HashMap<String, f64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        if config.num_runs == 0 {
            return Err(GraspError::InvalidConfig("num_runs must be at least 1".to_string()));
        }
        config.grasp.validate()?;

        let mut best_known = HashMap::new();
        best_known.insert("berlin52".to_string(), BERLIN52_OPTIMUM);

        Ok(Benchmark {
            config,
            results: Vec::new(),
            best_known,
        })
    }

    /// Set best known solution for an instance
    pub fn set_best_known(&mut self, instance_name: &str, cost: f64) {
        self.best_known.insert(instance_name.to_string(), cost);
    }

    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    /// Run every configured seed on one instance
    pub fn run_instance(&mut self, instance: &TspInstance) -> Result<()> {
        log::info!(
            "Running benchmark on instance: {} ({} runs)",
            instance.name,
            self.config.num_runs
        );

        let progress = if self.config.show_progress {
            ProgressBar::new(self.config.num_runs as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.set_message(instance.name.clone());

        for run in 0..self.config.num_runs {
            let seed = self.config.base_seed.wrapping_add(run as u64);
            let grasp = Grasp::new(self.config.grasp.clone().with_seed(seed))?;
            let outcome = grasp.search(instance)?;

            let gap_to_best = self
                .best_known
                .get(&instance.name)
                .map(|&best| (outcome.cost() - best) / best * 100.0);

            self.results.push(RunResult {
                instance: instance.name.clone(),
                dimension: instance.dimension(),
                run,
                seed,
                cost: outcome.cost(),
                found_at: outcome.found_at,
                iterations: outcome.iterations,
                time: outcome.computation_time,
                gap_to_best,
            });
            progress.inc(1);
        }

        progress.finish_and_clear();
        Ok(())
    }

    /// Compute statistics for each instance, in first-run order
    pub fn compute_statistics(&self) -> Vec<RunStatistics> {
        let mut order: Vec<&str> = Vec::new();
        let mut grouped: HashMap<&str, Vec<&RunResult>> = HashMap::new();

        for result in &self.results {
            let runs = grouped.entry(result.instance.as_str()).or_insert_with(|| {
                order.push(result.instance.as_str());
                Vec::new()
            });
            runs.push(result);
        }

        order
            .into_iter()
            .map(|name| summarize(name, &grouped[name]))
            .collect()
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        GRASP TSP Benchmark Report\n");
        report.push_str("========================================\n\n");
        report.push_str(&format!(
            "Generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        let g = &self.config.grasp;
        report.push_str(&format!(
            "Runs: {}  Iterations: {}  Max no-improve: {}  Greediness: {}\n\n",
            self.config.num_runs, g.max_iterations, g.max_no_improvements, g.greediness_factor
        ));

        report.push_str(&format!(
            "{:<16} {:>10} {:>10} {:>10} {:>10} {:>9} {:>9}\n",
            "Instance", "Best", "Avg", "Median", "Std", "Avg Gap%", "Avg Time"
        ));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            let gap_str = stat
                .avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!(
                "{:<16} {:>10.0} {:>10.1} {:>10.1} {:>10.2} {:>9} {:>9.4}\n",
                stat.instance,
                stat.best_cost,
                stat.avg_cost,
                stat.median_cost,
                stat.std_cost,
                gap_str,
                stat.avg_time
            ));
        }

        report
    }
}

fn summarize(instance: &str, runs: &[&RunResult]) -> RunStatistics {
    let costs: Vec<f64> = runs.iter().map(|r| r.cost).collect();
    let times: Vec<f64> = runs.iter().map(|r| r.time).collect();
    let found: Vec<f64> = runs.iter().map(|r| r.found_at as f64).collect();
    let gaps: Vec<f64> = runs.iter().filter_map(|r| r.gap_to_best).collect();

    let std_cost = if costs.len() > 1 {
        Statistics::std_dev(costs.iter())
    } else {
        0.0
    };
    let mut data = Data::new(costs.clone());

    RunStatistics {
        instance: instance.to_string(),
        num_runs: runs.len(),
        best_cost: Statistics::min(costs.iter()),
        worst_cost: Statistics::max(costs.iter()),
        avg_cost: Statistics::mean(costs.iter()),
        median_cost: OrderStatistics::median(&mut data),
        std_cost,
        avg_found_at: Statistics::mean(found.iter()),
        avg_time: Statistics::mean(times.iter()),
        total_time: times.iter().sum(),
        avg_gap: (!gaps.is_empty()).then(|| Statistics::mean(gaps.iter())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(num_runs: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            num_runs,
            base_seed: 7,
            grasp: GraspConfig::with_params(5, 20, 0.3),
            show_progress: false,
        }
    }

    fn result(instance: &str, cost: f64, gap: Option<f64>) -> RunResult {
        RunResult {
            instance: instance.to_string(),
            dimension: 4,
            run: 0,
            seed: 0,
            cost,
            found_at: 2,
            iterations: 5,
            time: 0.5,
            gap_to_best: gap,
        }
    }

    #[test]
    fn test_rejects_zero_runs() {
        assert!(matches!(
            Benchmark::new(quick_config(0)),
            Err(GraspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_runs_use_consecutive_seeds() {
        let mut bench = Benchmark::new(quick_config(3)).unwrap();
        bench.run_instance(&TspInstance::berlin52()).unwrap();

        let seeds: Vec<u64> = bench.results().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![7, 8, 9]);
        for r in bench.results() {
            assert!(r.cost >= BERLIN52_OPTIMUM);
            assert!(r.gap_to_best.unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_statistics() {
        let summary = summarize(
            "toy",
            &[
                &result("toy", 10.0, Some(0.0)),
                &result("toy", 12.0, Some(20.0)),
                &result("toy", 14.0, Some(40.0)),
            ],
        );
        assert_eq!(summary.num_runs, 3);
        assert_eq!(summary.best_cost, 10.0);
        assert_eq!(summary.worst_cost, 14.0);
        assert!((summary.avg_cost - 12.0).abs() < 1e-9);
        assert!((summary.median_cost - 12.0).abs() < 1e-9);
        assert!((summary.std_cost - 2.0).abs() < 1e-9);
        assert!((summary.avg_gap.unwrap() - 20.0).abs() < 1e-9);
        assert!((summary.total_time - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_run_has_zero_spread() {
        let summary = summarize("one", &[&result("one", 9.0, None)]);
        assert_eq!(summary.std_cost, 0.0);
        assert!(summary.avg_gap.is_none());
    }

    #[test]
    fn test_report_lists_instances() {
        let mut bench = Benchmark::new(quick_config(2)).unwrap();
        let square = TspInstance::from_coords(
            "square",
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        )
        .unwrap();
        bench.set_best_known("square", 40.0);
        bench.run_instance(&square).unwrap();

        let stats = bench.compute_statistics();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].best_cost, 40.0);
        assert_eq!(stats[0].avg_gap, Some(0.0));

        let report = bench.generate_report();
        assert!(report.contains("square"));
        assert!(report.contains("0.00%"));
    }
}
