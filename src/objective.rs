//! Objective models shared by edge selection and pheromone reinforcement.

use crate::problem::Problem;
use crate::solution::Solution;
use serde::{Deserialize, Serialize};

/// Which instance data drives the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Edges are scored and solutions are rated by distance only.
    Distance,
    /// Edges are scored by distance and travel time, solutions by their sum.
    DistanceTime,
}

impl Objective {
    /// Heuristic desirability of moving from `from` to `to`, already raised to `beta`.
    ///
    /// Returns infinity for zero-length edges; the caller treats a non-finite
    /// total as a degenerate draw. Without a time matrix the time factor is 1,
    /// so `DistanceTime` scores edges like `Distance`.
    pub fn visibility(&self, problem: &Problem, from: usize, to: usize, beta: f64) -> f64 {
        let distance = (1.0 / problem.get_distance(from, to)).powf(beta);

        match self {
            Objective::Distance => distance,
            Objective::DistanceTime => {
                let time = problem.get_time(from, to).unwrap_or(1.0);
                distance * (1.0 / time).powf(beta)
            }
        }
    }

    /// The cost a solution's reinforcement is inversely proportional to.
    pub fn reinforcement_cost(&self, solution: &Solution) -> f64 {
        match self {
            Objective::Distance => solution.distance,
            Objective::DistanceTime => solution.distance + solution.duration.unwrap_or(0.0),
        }
    }
}
