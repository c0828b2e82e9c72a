//! Solution representation for the CVRP.

use crate::problem::{Problem, DEPOT};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents one vehicle's route in a CVRP solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// The visited locations, starting and ending at the depot
    pub stops: Vec<usize>,
    /// The total load of the route
    pub load: u32,
    /// The total distance of the route
    pub distance: f64,
    /// The total travel time of the route, zero without a time matrix
    pub duration: f64,
}

impl Route {
    /// Create a new route that sits at the depot.
    pub fn new() -> Self {
        Route {
            stops: vec![DEPOT],
            load: 0,
            distance: 0.0,
            duration: 0.0,
        }
    }

    /// Create a route from a sequence of stops and evaluate it.
    pub fn from_stops(stops: Vec<usize>, problem: &Problem) -> Self {
        let mut route = Route {
            stops,
            load: 0,
            distance: 0.0,
            duration: 0.0,
        };
        route.calculate_load(problem);
        route.calculate_distance(problem);
        route.calculate_duration(problem);
        route
    }

    /// Iterate over the consecutive `(from, to)` pairs of this route.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.stops.iter().copied().tuple_windows()
    }

    /// Iterate over the customers of this route, depot visits excluded.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        self.stops.iter().copied().filter(|&stop| stop != DEPOT)
    }

    /// Check if the route serves no customer.
    pub fn is_empty(&self) -> bool {
        self.customers().next().is_none()
    }

    /// Check if the route has returned to the depot.
    pub fn is_closed(&self) -> bool {
        self.stops.len() > 1 && self.stops.last() == Some(&DEPOT)
    }

    /// Calculate the total distance of this route.
    pub fn calculate_distance(&mut self, problem: &Problem) {
        self.distance = self
            .edges()
            .map(|(from, to)| problem.get_distance(from, to))
            .sum();
    }

    /// Calculate the total travel time of this route.
    pub fn calculate_duration(&mut self, problem: &Problem) {
        self.duration = self
            .edges()
            .filter_map(|(from, to)| problem.get_time(from, to))
            .sum();
    }

    /// Calculate the total load of this route.
    pub fn calculate_load(&mut self, problem: &Problem) {
        self.load = self
            .customers()
            .fold(0u32, |load, customer| load.saturating_add(problem.demand[customer]));
    }

    /// Check if the route exceeds the vehicle capacity.
    pub fn exceeds_capacity(&self, capacity: u32) -> bool {
        self.load > capacity
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::new()
    }
}

/// Represents a complete solution: one route per vehicle slot.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// The list of routes
    pub routes: Vec<Route>,
    /// The total distance of the solution
    pub distance: f64,
    /// The total travel time, present when the instance has a time matrix
    pub duration: Option<f64>,
}

impl Solution {
    /// Create a new, empty solution.
    pub fn new() -> Self {
        Solution {
            routes: Vec::new(),
            distance: 0.0,
            duration: None,
        }
    }

    /// Build and evaluate a solution from raw stop sequences.
    pub fn from_routes(routes: Vec<Vec<usize>>, problem: &Problem) -> Self {
        let mut solution = Solution {
            routes: routes
                .into_iter()
                .map(|stops| Route {
                    stops,
                    ..Route::default()
                })
                .collect(),
            distance: 0.0,
            duration: None,
        };
        solution.evaluate(problem);
        solution
    }

    /// Evaluate the solution, recomputing its distance and travel time.
    pub fn evaluate(&mut self, problem: &Problem) {
        let mut total_distance = 0.0;
        let mut total_duration = 0.0;

        for route in &mut self.routes {
            route.calculate_load(problem);
            route.calculate_distance(problem);
            route.calculate_duration(problem);

            total_distance += route.distance;
            total_duration += route.duration;
        }

        self.distance = total_distance;
        self.duration = problem.has_time_matrix().then_some(total_duration);
    }

    /// The scalar cost: total distance over all routes.
    pub fn cost(&self) -> f64 {
        self.distance
    }

    /// The `(distance, time)` objective pair.
    pub fn objectives(&self) -> (f64, f64) {
        (self.distance, self.duration.unwrap_or(0.0))
    }

    /// Get the number of vehicle slots.
    pub fn vehicle_count(&self) -> usize {
        self.routes.len()
    }

    /// Get the number of routes that serve at least one customer.
    pub fn used_vehicle_count(&self) -> usize {
        self.routes.iter().filter(|route| !route.is_empty()).count()
    }

    /// Check that every route starts and ends at the depot, respects the
    /// capacity, and that customers are partitioned across routes.
    pub fn is_feasible(&self, problem: &Problem) -> bool {
        let mut visited = vec![false; problem.size()];

        for route in &self.routes {
            if route.stops.first() != Some(&DEPOT) || !route.is_closed() {
                return false;
            }
            if route.exceeds_capacity(problem.vehicle_capacity) {
                return false;
            }
            for customer in route.customers() {
                if customer >= visited.len() || visited[customer] {
                    return false;
                }
                visited[customer] = true;
            }
        }

        visited.iter().skip(1).all(|&seen| seen)
    }
}

impl Default for Solution {
    fn default() -> Self {
        Solution::new()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Distance: {:.2}", self.distance)?;
        if let Some(duration) = self.duration {
            writeln!(f, "  Duration: {:.2}", duration)?;
        }
        writeln!(f, "  Routes: {}", self.routes.len())?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "  Route {}: {:?} (Load: {}, Distance: {:.2})",
                i, route.stops, route.load, route.distance
            )?;
        }

        Ok(())
    }
}
