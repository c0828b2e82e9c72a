//! The pheromone field and its evaporate-then-reinforce update rule.

use crate::objective::Objective;
use crate::solution::Solution;

/// Square matrix of learned edge desirability over location indices.
///
/// Entries start at the initial value, never become negative, and are only
/// written during the update phase between iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    size: usize,
    initial: f64,
    values: Vec<f64>,
}

impl PheromoneField {
    /// Create a field of `size * size` entries set to `initial`.
    pub fn new(size: usize, initial: f64) -> Self {
        PheromoneField {
            size,
            initial,
            values: vec![initial; size * size],
        }
    }

    /// Restore every entry to the initial value (a fresh search).
    pub fn reset(&mut self) {
        self.values.fill(self.initial);
    }

    /// Number of locations the field covers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Pheromone on the directed edge `from -> to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.size + to]
    }

    /// All entries in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Multiply every entry by `1 - rho`.
    pub fn evaporate(&mut self, rho: f64) {
        let factor = (1.0 - rho).max(0.0);
        self.values.iter_mut().for_each(|value| *value *= factor);
    }

    /// Add `amount` to the directed edge `from -> to`.
    pub fn deposit(&mut self, from: usize, to: usize, amount: f64) {
        self.values[from * self.size + to] += amount;
    }

    /// Apply one iteration's update: evaporate once, then reinforce every edge
    /// used by each solution with `q / cost`.
    pub fn update(&mut self, solutions: &[Solution], objective: Objective, rho: f64, q: f64) {
        self.evaporate(rho);

        for solution in solutions {
            let cost = objective.reinforcement_cost(solution);
            if !(cost.is_finite() && cost > 0.0) {
                continue;
            }

            let amount = q / cost;
            for route in &solution.routes {
                for (from, to) in route.edges() {
                    self.deposit(from, to, amount);
                }
            }
        }
    }
}
