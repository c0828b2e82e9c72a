//! Basic example of using the ACO-CVRP library.

use aco_cvrp::config::{Config, Strategy};
use aco_cvrp::problem::{Node, Problem};
use aco_cvrp::utils::{format_duration, save_solution};
use aco_cvrp::AntColony;

/// Ten customers on two rings around a depot at (25, 25).
fn create_problem() -> Problem {
    let mut nodes = vec![Node::new(0, 25.0, 25.0, 0)];

    for i in 0..10 {
        let angle = i as f64 * std::f64::consts::TAU / 10.0;
        let radius = if i % 2 == 0 { 10.0 } else { 20.0 };
        let x = 25.0 + radius * angle.cos();
        let y = 25.0 + radius * angle.sin();
        nodes.push(Node::new(i + 1, x, y, 2 + (i as u32 % 4)));
    }

    Problem::new("Rings".to_string(), nodes, 10)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let problem = create_problem();
    println!(
        "Loaded problem: {} with {} customers",
        problem.name,
        problem.get_customer_count()
    );

    let config = Config::new()
        .with_strategy(Strategy::Single)
        .with_num_ants(10)
        .with_num_iterations(100)
        .with_max_stagnation(10)
        .with_seed(1);

    let mut colony = AntColony::new(problem.clone(), config)?;
    let outcome = colony.run()?;

    println!("Search completed in {}", format_duration(outcome.run_time));
    println!("Vehicles: {}", outcome.vehicles);

    if let Some(best) = &outcome.best_solution {
        println!("Best solution distance: {:.2}", best.distance);
        println!("Is feasible: {}", best.is_feasible(&problem));
        println!("{:?}", best);

        let output_path = format!("{}.sol", problem.name);
        println!("Saving solution to: {}", output_path);
        save_solution(best, &problem, &output_path)?;
    }

    Ok(())
}
