//! Probabilistic route construction: one ant builds one multi-vehicle solution.

use crate::objective::Objective;
use crate::pheromone::PheromoneField;
use crate::problem::{Problem, DEPOT};
use crate::solution::Solution;
use log::trace;
use rand::Rng;
use std::fmt;

/// What a vehicle does when no remaining customer fits its spare capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadEndPolicy {
    /// Return to the depot and stay idle until the construction restarts.
    Close,
    /// Skip the vehicle for the current pass; the route is closed at the end.
    Skip,
}

/// The current fleet cannot serve all demand under the current pheromone bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetInfeasible {
    pub vehicles: usize,
}

impl fmt::Display for FleetInfeasible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot build a solution with the current number of vehicles ({})",
            self.vehicles
        )
    }
}

impl std::error::Error for FleetInfeasible {}

/// Edge-selection parameters used by the constructor.
#[derive(Debug, Clone, Copy)]
pub struct SelectionParams {
    pub alpha: f64,
    pub beta: f64,
    pub max_stagnation: usize,
}

/// Builds complete solutions from the pheromone field and instance data.
///
/// Holds only shared references, so many constructors can run at once
/// against the same field.
pub struct RouteConstructor<'a> {
    problem: &'a Problem,
    pheromone: &'a PheromoneField,
    objective: Objective,
    dead_end: DeadEndPolicy,
    params: SelectionParams,
}

/// Mutable state of one construction attempt.
struct ConstructionState {
    remaining: Vec<usize>,
    loads: Vec<u32>,
    routes: Vec<Vec<usize>>,
    open: Vec<bool>,
}

impl ConstructionState {
    fn new(vehicles: usize, customer_count: usize) -> Self {
        ConstructionState {
            remaining: (1..=customer_count).collect(),
            loads: vec![0; vehicles],
            routes: vec![vec![DEPOT]; vehicles],
            open: vec![true; vehicles],
        }
    }

    fn assign(&mut self, vehicle: usize, customer: usize, demand: u32) {
        self.routes[vehicle].push(customer);
        self.loads[vehicle] += demand;
        self.remaining.retain(|&c| c != customer);
    }

    fn close(&mut self, vehicle: usize) {
        self.routes[vehicle].push(DEPOT);
        self.open[vehicle] = false;
    }
}

impl<'a> RouteConstructor<'a> {
    /// Create a new constructor.
    pub fn new(
        problem: &'a Problem,
        pheromone: &'a PheromoneField,
        objective: Objective,
        dead_end: DeadEndPolicy,
        params: SelectionParams,
    ) -> Self {
        RouteConstructor {
            problem,
            pheromone,
            objective,
            dead_end,
            params,
        }
    }

    /// Build one solution with exactly `vehicles` routes.
    ///
    /// A pass over all vehicles that places no customer counts as stalled.
    /// Stalled passes restart the construction from scratch until
    /// `max_stagnation` of them have accumulated, at which point the fleet is
    /// declared infeasible.
    pub fn construct<R: Rng>(
        &self,
        vehicles: usize,
        rng: &mut R,
    ) -> Result<Solution, FleetInfeasible> {
        let customer_count = self.problem.get_customer_count();
        let mut state = ConstructionState::new(vehicles, customer_count);
        let mut stalled_passes = 0;

        while !state.remaining.is_empty() {
            let mut progress_made = false;

            for vehicle in 0..vehicles {
                if state.remaining.is_empty() {
                    break;
                }
                if !state.open[vehicle] {
                    continue;
                }

                let current = state.routes[vehicle].last().copied().unwrap_or(DEPOT);
                match self.select_next(current, &state.remaining, state.loads[vehicle], rng) {
                    Some(customer) => {
                        state.assign(vehicle, customer, self.problem.demand[customer]);
                        progress_made = true;
                    }
                    None => {
                        if self.dead_end == DeadEndPolicy::Close {
                            state.close(vehicle);
                        }
                    }
                }
            }

            if !progress_made {
                stalled_passes += 1;

                if stalled_passes >= self.params.max_stagnation {
                    return Err(FleetInfeasible { vehicles });
                }

                trace!(
                    "Construction stalled with {} customers left, restarting ({}/{})",
                    state.remaining.len(),
                    stalled_passes,
                    self.params.max_stagnation
                );
                state = ConstructionState::new(vehicles, customer_count);
            }
        }

        for route in state.routes.iter_mut() {
            if route.len() == 1 || route.last() != Some(&DEPOT) {
                route.push(DEPOT);
            }
        }

        Ok(Solution::from_routes(state.routes, self.problem))
    }

    /// Pick the next customer for a vehicle at `current` carrying `load`.
    ///
    /// Candidates are the remaining customers whose demand fits the spare
    /// capacity. Returns `None` when there is none, or when the scores sum to
    /// zero or a non-finite value.
    pub fn select_next<R: Rng>(
        &self,
        current: usize,
        remaining: &[usize],
        load: u32,
        rng: &mut R,
    ) -> Option<usize> {
        let spare = self.problem.vehicle_capacity.saturating_sub(load);
        let candidates: Vec<(usize, f64)> = remaining
            .iter()
            .copied()
            .filter(|&customer| self.problem.demand[customer] <= spare)
            .map(|customer| (customer, self.score(current, customer)))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let total: f64 = candidates.iter().map(|&(_, score)| score).sum();
        if !(total.is_finite() && total > 0.0) {
            trace!(
                "Degenerate selection at {} over {} candidates (total score {})",
                current,
                candidates.len(),
                total
            );
            return None;
        }

        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;

        for &(customer, score) in &candidates {
            cumulative += score / total;
            if draw <= cumulative {
                return Some(customer);
            }
        }

        // Rounding can leave the cumulative sum just below the draw.
        candidates.last().map(|&(customer, _)| customer)
    }

    /// Unnormalized attractiveness of the edge `from -> to`.
    pub fn score(&self, from: usize, to: usize) -> f64 {
        self.pheromone.get(from, to).powf(self.params.alpha)
            * self
                .objective
                .visibility(self.problem, from, to, self.params.beta)
    }
}
