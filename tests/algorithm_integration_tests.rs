//! Integration tests for the full ACO-CVRP search strategies.

use aco_cvrp::config::{Config, Strategy};
use aco_cvrp::construction::DeadEndPolicy;
use aco_cvrp::error::AcoError;
use aco_cvrp::objective::Objective;
use aco_cvrp::pareto::dominates;
use aco_cvrp::problem::{Node, Problem};
use aco_cvrp::AntColony;

/// Depot plus four customers with demand 4 and capacity 10.
fn create_small_problem() -> Problem {
    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0),
        Node::new(1, 10.0, 0.0, 4),
        Node::new(2, 0.0, 10.0, 4),
        Node::new(3, -10.0, 0.0, 4),
        Node::new(4, 0.0, -10.0, 4),
    ];

    Problem::new("SmallTestProblem".to_string(), nodes, 10)
}

/// Creates a moderate size test problem with a depot and customers.
fn create_moderate_problem() -> Problem {
    let mut nodes = Vec::new();

    // Depot at (50, 50)
    nodes.push(Node::new(0, 50.0, 50.0, 0));

    // Create 20 customers in a grid pattern
    let mut id = 1;
    for i in 0..4 {
        for j in 0..5 {
            let x = i as f64 * 20.0 + 10.0;
            let y = j as f64 * 20.0 + 10.0;
            let demand = 1 + (id as u32 % 3);
            nodes.push(Node::new(id, x, y, demand));
            id += 1;
        }
    }

    Problem::new("ModerateTestProblem".to_string(), nodes, 10)
}

/// The moderate problem with travel times that disagree with distances.
fn create_timed_problem() -> Problem {
    let problem = create_moderate_problem();
    let n = problem.size();
    let mut time_matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..n {
            if i != j {
                // Vertical moves are slow, horizontal moves are fast
                let dx = (problem.nodes[i].x - problem.nodes[j].x).abs();
                let dy = (problem.nodes[i].y - problem.nodes[j].y).abs();
                time_matrix[i][j] = dx * 0.5 + dy * 2.0 + 1.0;
            }
        }
    }

    problem.with_time_matrix(time_matrix)
}

fn short_config(strategy: Strategy) -> Config {
    Config::new()
        .with_strategy(strategy)
        .with_num_ants(8)
        .with_num_iterations(30)
        .with_max_stagnation(10)
        .with_seed(1)
}

#[test]
fn test_single_strategy_small_problem() {
    let problem = create_small_problem();
    let mut colony = AntColony::new(problem, short_config(Strategy::Single)).unwrap();

    let outcome = colony.run().unwrap();
    let best = outcome.best_solution.as_ref().unwrap();

    assert_eq!(outcome.vehicles, 2);
    assert_eq!(best.routes.len(), 2);
    assert!(best.is_feasible(&colony.problem));
    assert_eq!(outcome.best_cost, Some(best.distance));
    assert_eq!(outcome.iterations, 30);
    assert!(outcome.pareto_front.is_empty());
    assert_eq!(colony.history.cost.len(), 30);
}

#[test]
fn test_single_strategy_moderate_problem() {
    let problem = create_moderate_problem();
    let initial = problem.initial_fleet_size();
    let mut colony = AntColony::new(problem, short_config(Strategy::Single)).unwrap();

    let outcome = colony.run().unwrap();
    let best = outcome.best_solution.as_ref().unwrap();

    assert!(outcome.vehicles >= initial);
    assert!(outcome.vehicles <= colony.problem.get_customer_count());
    assert_eq!(best.routes.len(), outcome.vehicles);
    assert!(best.is_feasible(&colony.problem));
    assert!(best.distance > 0.0);

    // Each route should respect capacity
    for route in &best.routes {
        assert!(route.load <= colony.problem.vehicle_capacity);
    }

    // Fleet sizes only grow
    let sizes = colony.history.fleet_sizes();
    assert!(sizes.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(sizes.last(), Some(&outcome.vehicles));

    // Best cost never increases within a fleet size
    for vehicles in sizes {
        let trace = colony.history.cost_trace(vehicles);
        assert!(trace.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    let trace = colony.history.cost_trace(outcome.vehicles);
    assert_eq!(trace.len(), 30);
    assert_eq!(trace.last().copied(), outcome.best_cost);

    // Every recorded improvement is a valid solution
    for solution in &colony.history.solution {
        assert!(solution.is_feasible(&colony.problem));
    }
}

#[test]
fn test_single_strategy_escalates_fleet() {
    // ceil(18 / 10) = 2, but no two customers fit in one vehicle
    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0),
        Node::new(1, 5.0, 0.0, 6),
        Node::new(2, 0.0, 5.0, 6),
        Node::new(3, 5.0, 5.0, 6),
    ];
    let problem = Problem::new("Tight".to_string(), nodes, 10);
    assert_eq!(problem.initial_fleet_size(), 2);

    let mut colony = AntColony::new(problem, short_config(Strategy::Single)).unwrap();
    let outcome = colony.run().unwrap();

    assert_eq!(outcome.vehicles, 3);
    assert_eq!(colony.history.fleet_sizes(), vec![3]);
    let best = outcome.best_solution.unwrap();
    assert!(best.is_feasible(&colony.problem));
    assert!(best.routes.iter().all(|route| route.customers().count() == 1));
}

#[test]
fn test_fleet_exhausted_on_degenerate_instance() {
    // Customer 1 shares the depot location and can never be drawn
    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0),
        Node::new(1, 0.0, 0.0, 1),
        Node::new(2, 5.0, 0.0, 1),
    ];
    let problem = Problem::new("Degenerate".to_string(), nodes, 10);

    let mut colony = AntColony::new(problem, short_config(Strategy::Single)).unwrap();
    let result = colony.run();

    assert!(matches!(result, Err(AcoError::FleetExhausted { vehicles: 2 })));
}

#[test]
fn test_same_seed_same_result() {
    let first = AntColony::new(create_moderate_problem(), short_config(Strategy::Single))
        .unwrap()
        .run()
        .unwrap();
    let second = AntColony::new(create_moderate_problem(), short_config(Strategy::Single))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(first.vehicles, second.vehicles);
    assert_eq!(first.best_cost, second.best_cost);
    assert_eq!(first.best_solution, second.best_solution);
}

#[test]
fn test_vehicles_strategy_trade_off() {
    let problem = create_small_problem();
    let config = short_config(Strategy::Vehicles).with_vehicle_reset(2);
    let mut colony = AntColony::new(problem, config).unwrap();

    let outcome = colony.run().unwrap();
    let best = outcome.best_solution.as_ref().unwrap();

    let vehicles: Vec<usize> = outcome.trade_off.iter().map(|point| point.vehicles).collect();
    assert_eq!(vehicles, vec![2, 3]);

    let min_distance = outcome
        .trade_off
        .iter()
        .map(|point| point.distance)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(outcome.best_cost, Some(min_distance));
    assert_eq!(best.distance, min_distance);
    assert_eq!(outcome.vehicles, best.routes.len());
    assert!(best.is_feasible(&colony.problem));

    // Best cost never increases within a fleet size
    for vehicles in colony.history.fleet_sizes() {
        let trace = colony.history.cost_trace(vehicles);
        assert!(!trace.is_empty());
        assert!(trace.windows(2).all(|pair| pair[1] <= pair[0]));
    }
}

#[test]
fn test_vehicles_strategy_stops_at_customer_count() {
    let problem = create_small_problem();
    let config = short_config(Strategy::Vehicles).with_vehicle_reset(10);
    let mut colony = AntColony::new(problem, config).unwrap();

    let outcome = colony.run().unwrap();

    let vehicles: Vec<usize> = outcome.trade_off.iter().map(|point| point.vehicles).collect();
    assert_eq!(vehicles, vec![2, 3, 4]);
}

#[test]
fn test_pareto_strategy_front() {
    let problem = create_timed_problem();
    let mut colony = AntColony::new(problem, short_config(Strategy::Pareto)).unwrap();

    let outcome = colony.run().unwrap();
    assert!(!outcome.pareto_front.is_empty());
    assert!(outcome.trade_off.is_empty());

    let objectives = outcome.pareto_objectives();
    for a in &objectives {
        for b in &objectives {
            assert!(!dominates(*a, *b));
        }
    }

    for point in &outcome.pareto_front {
        assert!(point.item.is_feasible(&colony.problem));
        assert_eq!(point.item.objectives(), point.objectives);
    }

    let best = outcome.best_solution.as_ref().unwrap();
    let min_distance = objectives
        .iter()
        .map(|pair| pair.0)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(best.distance, min_distance);
}

#[test]
fn test_pareto_strategy_requires_time_matrix() {
    let problem = create_moderate_problem();
    let result = AntColony::new(problem, short_config(Strategy::Pareto));

    assert!(matches!(result, Err(AcoError::InvalidInstance(_))));
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let problem = create_small_problem();

    for config in [
        Config::new().with_num_ants(0),
        Config::new().with_num_iterations(0),
        Config::new().with_rho(0.0),
        Config::new().with_rho(1.5),
        Config::new().with_q(0.0),
        Config::new().with_alpha(f64::NAN),
        Config::new().with_beta(-1.0),
        Config::new().with_max_stagnation(0),
        Config::new().with_vehicle_reset(0),
        Config::new().with_initial_pheromone(0.0),
    ] {
        let result = AntColony::new(problem.clone(), config);
        assert!(matches!(result, Err(AcoError::InvalidConfig(_))));
    }

    assert!(AntColony::new(problem, Config::new().with_rho(1.0)).is_ok());
}

#[test]
fn test_invalid_instance_is_rejected() {
    let mut problem = create_small_problem();
    problem.demand[1] = 11;

    let result = AntColony::new(problem, Config::new());
    assert!(matches!(result, Err(AcoError::InvalidInstance(_))));
}

#[test]
fn test_iteration_updates_pheromone() {
    let problem = create_small_problem();
    let config = Config::new().with_num_ants(4).with_rho(1.0).with_seed(3);
    let mut colony = AntColony::new(problem, config).unwrap();

    let batch = colony
        .iterate(2, Objective::Distance, DeadEndPolicy::Close)
        .unwrap();
    assert_eq!(batch.len(), 4);
    assert_eq!(colony.generation, 1);

    // Full evaporation: only edges used by this batch carry pheromone
    let mut used = vec![false; 25];
    for solution in &batch {
        for route in &solution.routes {
            for (from, to) in route.edges() {
                used[from * 5 + to] = true;
            }
        }
    }
    for (index, &value) in colony.pheromone.values().iter().enumerate() {
        if used[index] {
            assert!(value > 0.0);
        } else {
            assert_eq!(value, 0.0);
        }
    }
}

#[test]
fn test_single_strategy_survives_full_capacity_demand() {
    let distance_matrix = vec![
        vec![0.0, 3.0, 4.0, 5.0],
        vec![3.0, 0.0, 5.0, 4.0],
        vec![4.0, 5.0, 0.0, 3.0],
        vec![5.0, 4.0, 3.0, 0.0],
    ];
    let problem = Problem::from_matrices(
        "Huge".to_string(),
        vec![0, u32::MAX, 1, 1],
        distance_matrix,
        u32::MAX,
    );
    let config = Config::new()
        .with_strategy(Strategy::Single)
        .with_num_ants(4)
        .with_num_iterations(10)
        .with_seed(1);
    let mut colony = AntColony::new(problem, config).unwrap();

    let outcome = colony.run().unwrap();
    let best = outcome.best_solution.as_ref().unwrap();

    assert!(best.is_feasible(&colony.problem));
    assert_eq!(outcome.vehicles, best.vehicle_count());
}

#[test]
fn test_vehicles_strategy_moves_on_after_stagnation() {
    let max_stagnation = 1;
    let num_iterations = 200;
    let config = Config::new()
        .with_strategy(Strategy::Vehicles)
        .with_num_ants(2)
        .with_num_iterations(num_iterations)
        .with_max_stagnation(max_stagnation)
        .with_vehicle_reset(2)
        .with_seed(4);
    let mut colony = AntColony::new(create_small_problem(), config).unwrap();

    let outcome = colony.run().unwrap();

    let vehicles: Vec<usize> = outcome.trade_off.iter().map(|point| point.vehicles).collect();
    assert_eq!(vehicles, vec![2, 3]);
    assert!(outcome.iterations < 2 * num_iterations);

    for vehicles in colony.history.fleet_sizes() {
        let trace = colony.history.cost_trace(vehicles);
        assert!(trace.len() < num_iterations);

        // The improving iteration followed by more than max_stagnation idle ones
        let tail = &trace[trace.len() - (max_stagnation + 2)..];
        assert!(tail.iter().all(|&cost| cost == tail[0]));
        assert!(
            trace.len() == max_stagnation + 2 || trace[trace.len() - max_stagnation - 3] > tail[0]
        );
    }
}

#[test]
fn test_pareto_vehicles_match_best_solution() {
    let nodes = vec![
        Node::new(0, 0.0, 0.0, 0),
        Node::new(1, 10.0, 0.0, 6),
        Node::new(2, 0.0, 10.0, 4),
        Node::new(3, -10.0, 0.0, 6),
        Node::new(4, 0.0, -10.0, 4),
    ];
    let problem = Problem::new("Mixed".to_string(), nodes, 10).with_travel_speed(1.0);

    for seed in 0..50 {
        let config = Config::new()
            .with_strategy(Strategy::Pareto)
            .with_num_ants(1)
            .with_num_iterations(20)
            .with_max_stagnation(2)
            .with_seed(seed);
        let mut colony = AntColony::new(problem.clone(), config).unwrap();

        let outcome = colony.run().unwrap();
        let best = outcome.best_solution.as_ref().unwrap();

        assert_eq!(outcome.vehicles, best.vehicle_count(), "seed {}", seed);
        assert_eq!(outcome.vehicles, best.routes.len());
    }
}
