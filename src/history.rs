//! Run history: best cost per iteration and the solutions that improved it.

use crate::solution::Solution;
use serde::{Deserialize, Serialize};

/// Best known cost after one iteration of one fleet-size trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub vehicles: usize,
    pub iteration: usize,
    pub best_cost: f64,
}

/// Ordered log consumed by reporting and visualization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    pub cost: Vec<CostRecord>,
    pub solution: Vec<Solution>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        History::default()
    }

    /// Append the best cost after an iteration.
    pub fn record_cost(&mut self, vehicles: usize, iteration: usize, best_cost: f64) {
        self.cost.push(CostRecord {
            vehicles,
            iteration,
            best_cost,
        });
    }

    /// Append a solution that improved the tracked best.
    pub fn record_solution(&mut self, solution: Solution) {
        self.solution.push(solution);
    }

    /// The best-cost trace of one fleet size, in iteration order.
    pub fn cost_trace(&self, vehicles: usize) -> Vec<f64> {
        self.cost
            .iter()
            .filter(|record| record.vehicles == vehicles)
            .map(|record| record.best_cost)
            .collect()
    }

    /// Fleet sizes tried, in the order they were tried.
    pub fn fleet_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = Vec::new();
        for record in &self.cost {
            if sizes.last() != Some(&record.vehicles) {
                sizes.push(record.vehicles);
            }
        }
        sizes
    }

    /// Clear all records.
    pub fn clear(&mut self) {
        self.cost.clear();
        self.solution.clear();
    }
}
