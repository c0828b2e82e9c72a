//! Configuration parameters for the ACO-CVRP solver.

use crate::error::{AcoError, AcoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The search control loop to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Minimize distance, growing the fleet until a full run is feasible.
    Single,
    /// Trade vehicles against distance over a budget of fleet-size resets.
    Vehicles,
    /// Distance against travel time, reduced to a Pareto front.
    Pareto,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Single => "single",
            Strategy::Vehicles => "vehicles",
            Strategy::Pareto => "pareto",
        };
        write!(f, "{}", name)
    }
}

/// Configuration settings for the ACO-CVRP solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of solutions constructed per iteration
    pub num_ants: usize,
    /// Iterations per fleet-size trial
    pub num_iterations: usize,
    /// Pheromone exponent
    pub alpha: f64,
    /// Heuristic (inverse distance / time) exponent
    pub beta: f64,
    /// Evaporation rate
    pub rho: f64,
    /// Reinforcement scale
    pub q: f64,
    /// Stalled construction passes allowed before a fleet is infeasible;
    /// also the non-improving iterations tolerated by the vehicles strategy
    pub max_stagnation: usize,
    /// Number of converged fleet sizes the vehicles strategy explores
    pub vehicle_reset: usize,
    /// Value every pheromone entry starts from
    pub initial_pheromone: f64,
    /// Which control loop to run
    pub strategy: Strategy,
    /// Seed of the run; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            num_ants: 10,
            num_iterations: 100,
            alpha: 1.0,
            beta: 2.0,
            rho: 0.5,
            q: 10.0,
            max_stagnation: 5,
            vehicle_reset: 3,
            initial_pheromone: 1.0,
            strategy: Strategy::Single,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the number of ants.
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    /// Set the number of iterations per fleet-size trial.
    pub fn with_num_iterations(mut self, n: usize) -> Self {
        self.num_iterations = n;
        self
    }

    /// Set the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the heuristic exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the evaporation rate.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Set the reinforcement scale.
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Set the stagnation limit.
    pub fn with_max_stagnation(mut self, n: usize) -> Self {
        self.max_stagnation = n;
        self
    }

    /// Set the fleet-size reset budget of the vehicles strategy.
    pub fn with_vehicle_reset(mut self, n: usize) -> Self {
        self.vehicle_reset = n;
        self
    }

    /// Set the initial pheromone value.
    pub fn with_initial_pheromone(mut self, value: f64) -> Self {
        self.initial_pheromone = value;
        self
    }

    /// Set the search strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter range.
    pub fn validate(&self) -> AcoResult<()> {
        if self.num_ants == 0 {
            return Err(AcoError::InvalidConfig("num_ants must be at least 1".into()));
        }
        if self.num_iterations == 0 {
            return Err(AcoError::InvalidConfig(
                "num_iterations must be at least 1".into(),
            ));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(AcoError::InvalidConfig(format!(
                "alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(AcoError::InvalidConfig(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !(self.rho > 0.0 && self.rho <= 1.0) {
            return Err(AcoError::InvalidConfig(format!(
                "rho must be in (0, 1], got {}",
                self.rho
            )));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(AcoError::InvalidConfig(format!(
                "q must be finite and positive, got {}",
                self.q
            )));
        }
        if self.max_stagnation == 0 {
            return Err(AcoError::InvalidConfig(
                "max_stagnation must be at least 1".into(),
            ));
        }
        if self.vehicle_reset == 0 {
            return Err(AcoError::InvalidConfig(
                "vehicle_reset must be at least 1".into(),
            ));
        }
        if !(self.initial_pheromone.is_finite() && self.initial_pheromone > 0.0) {
            return Err(AcoError::InvalidConfig(format!(
                "initial_pheromone must be finite and positive, got {}",
                self.initial_pheromone
            )));
        }

        Ok(())
    }
}
