//! GRASP TSP Solver - Command Line Interface
//!
//! Solves Euclidean TSP instances with GRASP, benchmarks repeated runs and
//! prints instance statistics.

use clap::{Args, Parser, Subcommand};
use grasp_tsp::benchmark::{Benchmark, BenchmarkConfig};
use grasp_tsp::heuristics::grasp::{Grasp, GraspConfig};
use grasp_tsp::instance::TspInstance;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grasp-tsp")]
#[command(version = "1.0")]
#[command(about = "A GRASP solver for the Euclidean Traveling Salesman Problem")]
struct Cli {
    /// Log per-iteration progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance
    Solve {
        /// TSP-LIB file (defaults to the built-in berlin52)
        #[arg(short, long)]
        instance: Option<PathBuf>,

        #[command(flatten)]
        params: GraspParams,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run repeated seeded searches and aggregate the results
    Benchmark {
        /// TSP-LIB file (defaults to the built-in berlin52)
        #[arg(short, long)]
        instance: Option<PathBuf>,

        #[command(flatten)]
        params: GraspParams,

        /// Number of runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Seed of the first run
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Best known tour length, for gap reporting
        #[arg(long)]
        best_known: Option<f64>,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Analyze an instance
    Analyze {
        /// TSP-LIB file (defaults to the built-in berlin52)
        #[arg(short, long)]
        instance: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GraspParams {
    /// Number of GRASP restarts
    #[arg(long, default_value = "50")]
    max_iterations: usize,

    /// Consecutive non-improving 2-opt moves before local search stops
    #[arg(long, default_value = "50")]
    max_no_improvements: usize,

    /// RCL width in [0, 1] (0 = nearest neighbor, 1 = random)
    #[arg(short, long, default_value = "0.3")]
    greediness: f64,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,
}

impl GraspParams {
    fn to_config(&self, seed: u64) -> GraspConfig {
        GraspConfig {
            max_iterations: self.max_iterations,
            max_no_improvements: self.max_no_improvements,
            greediness_factor: self.greediness,
            time_limit: self.time_limit,
            seed,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let outcome = match cli.command {
        Commands::Solve { instance, params, seed, output } => {
            solve_instance(instance.as_deref(), &params, seed, output.as_deref())
        }
        Commands::Benchmark { instance, params, runs, seed, best_known, output } => {
            run_benchmark(instance.as_deref(), &params, runs, seed, best_known, &output)
        }
        Commands::Analyze { instance } => analyze_instance(instance.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_instance(path: Option<&Path>) -> grasp_tsp::Result<TspInstance> {
    match path {
        Some(path) => {
            println!("Loading instance from {:?}...", path);
            TspInstance::from_file(path)
        }
        None => Ok(TspInstance::berlin52()),
    }
}

fn solve_instance(
    path: Option<&Path>,
    params: &GraspParams,
    seed: u64,
    output: Option<&Path>,
) -> grasp_tsp::Result<()> {
    let grasp = Grasp::new(params.to_config(seed))?;
    let instance = load_instance(path)?;

    println!("Solving {} ({} cities) with GRASP...", instance.name, instance.dimension());
    let result = grasp.search(&instance)?;

    println!("\n========== Results ==========");
    println!("Instance: {}", instance.name);
    println!("Cost: {:.0}", result.cost());
    println!("Found at iteration: {}/{}", result.found_at, result.iterations);
    println!("Time: {:.4}s", result.computation_time);
    let display = result.best.rotated_to(0).unwrap_or_else(|| result.best.clone());
    println!("Tour: {:?}", display.order());

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    Ok(())
}

fn run_benchmark(
    path: Option<&Path>,
    params: &GraspParams,
    runs: usize,
    seed: u64,
    best_known: Option<f64>,
    output: &Path,
) -> grasp_tsp::Result<()> {
    let config = BenchmarkConfig {
        num_runs: runs,
        base_seed: seed,
        grasp: params.to_config(seed),
        show_progress: true,
    };
    let mut benchmark = Benchmark::new(config)?;
    let instance = load_instance(path)?;

    if let Some(best) = best_known {
        benchmark.set_best_known(&instance.name, best);
    }

    println!("Benchmarking {} (n={}) over {} runs...", instance.name, instance.dimension(), runs);
    benchmark.run_instance(&instance)?;

    std::fs::create_dir_all(output)?;

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}

fn analyze_instance(path: Option<&Path>) -> grasp_tsp::Result<()> {
    let instance = load_instance(path)?;
    print!("{}", instance.statistics());
    if !instance.comment.is_empty() {
        println!("  Comment: {}", instance.comment);
    }
    Ok(())
}
