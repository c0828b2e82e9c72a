//! # ACO-CVRP
//!
//! A Rust implementation of Ant Colony Optimization for the Capacitated
//! Vehicle Routing Problem (CVRP) and two multi-objective variants.
//!
//! A colony of ants builds complete multi-vehicle solutions guided by a
//! pheromone field. After every iteration the field evaporates and the edges
//! used by the iteration's solutions are reinforced in proportion to their
//! quality. Three control loops drive the colony:
//!
//! - [`Strategy::Single`]: minimize distance, growing the fleet until a full
//!   run is feasible.
//! - [`Strategy::Vehicles`]: explore the vehicles against distance trade-off
//!   over a budget of fleet sizes.
//! - [`Strategy::Pareto`]: minimize distance and travel time, returning the
//!   Pareto front of every solution seen.

pub mod config;
pub mod construction;
pub mod error;
pub mod history;
pub mod objective;
pub mod pareto;
pub mod pheromone;
pub mod problem;
pub mod solution;
pub mod strategy;
pub mod utils;

pub use crate::config::{Config, Strategy};
pub use crate::error::{AcoError, AcoResult};
pub use crate::strategy::SearchOutcome;

use crate::construction::{DeadEndPolicy, FleetInfeasible, RouteConstructor, SelectionParams};
use crate::history::History;
use crate::objective::Objective;
use crate::pheromone::PheromoneField;
use crate::problem::Problem;
use crate::solution::Solution;

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// The main algorithm structure that owns the instance, the pheromone field
/// and the run history.
pub struct AntColony {
    pub problem: Problem,
    pub config: Config,
    pub pheromone: PheromoneField,
    pub history: History,
    /// Seed every ant stream is derived from
    pub seed: u64,
    /// Iterations started so far, across all fleet-size trials
    pub generation: u64,
    pub run_time: Duration,
}

impl AntColony {
    /// Create a new colony for the given problem and configuration.
    ///
    /// Both are validated here; an invalid setup never starts a run.
    pub fn new(problem: Problem, config: Config) -> AcoResult<Self> {
        config.validate()?;
        problem.validate()?;

        if config.strategy == Strategy::Pareto && !problem.has_time_matrix() {
            return Err(AcoError::InvalidInstance(
                "the pareto strategy needs a time matrix".into(),
            ));
        }

        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("Using seed {}", seed);

        Ok(AntColony {
            pheromone: PheromoneField::new(problem.size(), config.initial_pheromone),
            problem,
            config,
            history: History::new(),
            seed,
            generation: 0,
            run_time: Duration::from_secs(0),
        })
    }

    /// Run the configured strategy to completion.
    pub fn run(&mut self) -> AcoResult<SearchOutcome> {
        let start_time = Instant::now();
        self.history.clear();
        self.generation = 0;

        let mut outcome = match self.config.strategy {
            Strategy::Single => self.run_single()?,
            Strategy::Vehicles => self.run_vehicles()?,
            Strategy::Pareto => self.run_pareto()?,
        };

        self.run_time = start_time.elapsed();
        outcome.run_time = self.run_time;

        info!(
            "Finished {} search with {} vehicles after {} iterations",
            outcome.strategy, outcome.vehicles, outcome.iterations
        );

        Ok(outcome)
    }

    /// Run one iteration: construct a batch of solutions, then update the field.
    pub fn iterate(
        &mut self,
        vehicles: usize,
        objective: Objective,
        dead_end: DeadEndPolicy,
    ) -> Result<Vec<Solution>, FleetInfeasible> {
        let solutions = self.construct_solutions(vehicles, objective, dead_end)?;
        self.update_pheromone(&solutions, objective);
        Ok(solutions)
    }

    /// Let every ant build one solution with `vehicles` routes.
    ///
    /// Ants only read the field and the instance, and each draws from its own
    /// random stream, so the batch is the same whether built in sequence or
    /// in parallel.
    pub fn construct_solutions(
        &mut self,
        vehicles: usize,
        objective: Objective,
        dead_end: DeadEndPolicy,
    ) -> Result<Vec<Solution>, FleetInfeasible> {
        let generation = self.generation;
        self.generation += 1;

        let constructor = self.constructor(objective, dead_end);
        let build = |ant: usize| {
            let mut rng = self.ant_rng(generation, ant);
            constructor.construct(vehicles, &mut rng)
        };

        #[cfg(feature = "parallel")]
        let solutions = (0..self.config.num_ants).into_par_iter().map(build).collect();
        #[cfg(not(feature = "parallel"))]
        let solutions = (0..self.config.num_ants).map(build).collect();

        solutions
    }

    /// Evaporate the field once and reinforce the edges of `solutions`.
    pub fn update_pheromone(&mut self, solutions: &[Solution], objective: Objective) {
        self.pheromone
            .update(solutions, objective, self.config.rho, self.config.q);
    }

    /// A constructor reading the current field.
    pub fn constructor(&self, objective: Objective, dead_end: DeadEndPolicy) -> RouteConstructor<'_> {
        RouteConstructor::new(
            &self.problem,
            &self.pheromone,
            objective,
            dead_end,
            SelectionParams {
                alpha: self.config.alpha,
                beta: self.config.beta,
                max_stagnation: self.config.max_stagnation,
            },
        )
    }

    /// The random stream of one ant in one iteration.
    fn ant_rng(&self, generation: u64, ant: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(generation * self.config.num_ants as u64 + ant as u64);
        rng
    }
}
