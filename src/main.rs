//! Command line entry point for the ACO-CVRP solver.

use aco_cvrp::config::{Config, Strategy};
use aco_cvrp::problem::Problem;
use aco_cvrp::utils::{save_solution, write_report, write_solution, SearchStatistics};
use aco_cvrp::{AcoError, AntColony};
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;

/// Solve a CVRP instance with Ant Colony Optimization.
#[derive(Debug, Parser)]
#[command(name = "aco-cvrp", version, about)]
struct Args {
    /// Instance file (.json, or the plain text node format)
    instance: PathBuf,

    /// Search strategy
    #[arg(long, value_enum, default_value_t = Strategy::Single)]
    strategy: Strategy,

    /// Ants per iteration
    #[arg(long, default_value_t = 10)]
    ants: usize,

    /// Iterations per fleet size
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// Pheromone exponent
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Heuristic exponent
    #[arg(long, default_value_t = 2.0)]
    beta: f64,

    /// Evaporation rate
    #[arg(long, default_value_t = 0.5)]
    rho: f64,

    /// Reinforcement scale
    #[arg(long, default_value_t = 10.0)]
    q: f64,

    /// Stalled passes (or non-improving iterations) tolerated per fleet size
    #[arg(long, default_value_t = Config::default().max_stagnation)]
    max_stagnation: usize,

    /// Fleet sizes explored by the vehicles strategy
    #[arg(long, default_value_t = 3)]
    vehicle_reset: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the instance vehicle capacity
    #[arg(long)]
    capacity: Option<u32>,

    /// Derive travel times from distances at this speed
    #[arg(long)]
    speed: Option<f64>,

    /// Write the outcome and history as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the best solution as a route listing
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_problem(args: &Args) -> Result<Problem, AcoError> {
    let is_json = args
        .instance
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let mut problem = if is_json {
        Problem::from_json_file(&args.instance)?
    } else {
        Problem::from_file(&args.instance)?
    };

    if let Some(capacity) = args.capacity {
        problem.vehicle_capacity = capacity;
    }

    if let Some(speed) = args.speed {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(AcoError::InvalidConfig(format!(
                "speed must be positive, got {}",
                speed
            )));
        }
        problem = problem.with_travel_speed(speed);
    }

    Ok(problem)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Loading problem from: {}", args.instance.display());
    let problem = load_problem(&args)?;
    info!(
        "Loaded problem: {} with {} customers",
        problem.name,
        problem.get_customer_count()
    );

    let mut config = Config::new()
        .with_strategy(args.strategy)
        .with_num_ants(args.ants)
        .with_num_iterations(args.iterations)
        .with_alpha(args.alpha)
        .with_beta(args.beta)
        .with_rho(args.rho)
        .with_q(args.q)
        .with_max_stagnation(args.max_stagnation)
        .with_vehicle_reset(args.vehicle_reset);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut colony = AntColony::new(problem, config)?;
    let outcome = colony.run()?;

    let statistics = SearchStatistics::from_outcome(&outcome, &colony.history, &colony.problem);
    println!("{}", statistics.format());

    for point in &outcome.pareto_front {
        println!(
            "Pareto point: distance {:.2}, time {:.2}",
            point.objectives.0, point.objectives.1
        );
    }
    for point in &outcome.trade_off {
        println!(
            "Trade-off: {} vehicles, distance {:.2}",
            point.vehicles, point.distance
        );
    }

    if let Some(best) = &outcome.best_solution {
        let stdout = io::stdout();
        write_solution(&mut stdout.lock(), best, &colony.problem)?;

        if let Some(path) = &args.output {
            info!("Saving solution to: {}", path.display());
            save_solution(best, &colony.problem, path)?;
        }
    }

    if let Some(path) = &args.report {
        info!("Writing report to: {}", path.display());
        write_report(&outcome, &colony.history, path)?;
    }

    Ok(())
}
