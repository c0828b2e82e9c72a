//! Search control loops built on construction and pheromone update.

use crate::config::Strategy;
use crate::construction::DeadEndPolicy;
use crate::error::{AcoError, AcoResult};
use crate::history::History;
use crate::objective::Objective;
use crate::pareto::{ParetoFront, ParetoPoint};
use crate::solution::Solution;
use crate::AntColony;
use log::{debug, info};
use serde::Serialize;
use std::time::Duration;

/// Best distance reached at one converged fleet size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeOffPoint {
    pub vehicles: usize,
    pub distance: f64,
}

/// What a finished search hands to reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub strategy: Strategy,
    /// Fleet size of the returned best solution
    pub vehicles: usize,
    pub best_solution: Option<Solution>,
    pub best_cost: Option<f64>,
    /// Non-dominated `(distance, time)` solutions, pareto strategy only
    pub pareto_front: Vec<ParetoPoint<Solution>>,
    /// Best distance per converged fleet size, vehicles strategy only
    pub trade_off: Vec<TradeOffPoint>,
    /// Iterations completed across all fleet sizes
    pub iterations: usize,
    pub run_time: Duration,
}

impl SearchOutcome {
    /// The `(distance, time)` pairs of the Pareto front.
    pub fn pareto_objectives(&self) -> Vec<(f64, f64)> {
        self.pareto_front
            .iter()
            .map(|point| point.objectives)
            .collect()
    }
}

/// Keep the cheapest solution of `batch` if it beats `best`, logging every
/// improvement. Returns whether `best` changed.
fn track_best(best: &mut Option<Solution>, batch: &[Solution], history: &mut History) -> bool {
    let mut improved = false;

    for solution in batch {
        let best_cost = best.as_ref().map_or(f64::INFINITY, Solution::cost);
        if solution.cost() < best_cost {
            *best = Some(solution.clone());
            history.record_solution(solution.clone());
            improved = true;
        }
    }

    improved
}

impl AntColony {
    /// Fail once the fleet outgrows one vehicle per customer.
    fn check_fleet(&self, vehicles: usize) -> AcoResult<()> {
        let customers = self.problem.get_customer_count();
        if vehicles > customers {
            return Err(AcoError::FleetExhausted {
                vehicles: customers,
            });
        }
        Ok(())
    }

    /// Single-objective fleet-size escalation.
    ///
    /// Starts from the smallest fleet that could carry the total demand. An
    /// infeasible construction abandons the trial, adds a vehicle and resets
    /// the field. The first trial that completes every iteration wins.
    pub(crate) fn run_single(&mut self) -> AcoResult<SearchOutcome> {
        let objective = Objective::Distance;
        let mut vehicles = self.problem.initial_fleet_size();
        let mut iterations = 0;

        'fleet: loop {
            self.check_fleet(vehicles)?;
            info!("Trying with {} vehicles", vehicles);
            self.pheromone.reset();

            let mut best: Option<Solution> = None;

            for iteration in 0..self.config.num_iterations {
                let batch = match self.iterate(vehicles, objective, DeadEndPolicy::Close) {
                    Ok(batch) => batch,
                    Err(infeasible) => {
                        debug!("{}, adding a vehicle", infeasible);
                        vehicles += 1;
                        continue 'fleet;
                    }
                };
                iterations += 1;

                track_best(&mut best, &batch, &mut self.history);
                let best_cost = best.as_ref().map_or(f64::INFINITY, Solution::cost);
                self.history.record_cost(vehicles, iteration, best_cost);
                debug!("Iteration {}: Best cost = {:.2}", iteration + 1, best_cost);
            }

            info!(
                "Best cost with {} vehicles: {:.2}",
                vehicles,
                best.as_ref().map_or(f64::INFINITY, Solution::cost)
            );

            return Ok(SearchOutcome {
                strategy: Strategy::Single,
                vehicles,
                best_cost: best.as_ref().map(Solution::cost),
                best_solution: best,
                pareto_front: Vec::new(),
                trade_off: Vec::new(),
                iterations,
                run_time: Duration::from_secs(0),
            });
        }
    }

    /// Vehicles against distance escalation.
    ///
    /// Each fleet size runs until its best cost has not improved for more
    /// than `max_stagnation` iterations (or `num_iterations` are spent), then
    /// one vehicle is added. The search stops after `vehicle_reset` converged
    /// fleet sizes. Infeasible fleets are skipped without using the budget.
    pub(crate) fn run_vehicles(&mut self) -> AcoResult<SearchOutcome> {
        let objective = Objective::Distance;
        let customers = self.problem.get_customer_count();
        let mut vehicles = self.problem.initial_fleet_size();
        let mut resets = 0;
        let mut iterations = 0;
        let mut overall: Option<Solution> = None;
        let mut trade_off = Vec::new();

        while resets < self.config.vehicle_reset && vehicles <= customers {
            info!(
                "Trying with {} vehicles (reset {}/{})",
                vehicles,
                resets + 1,
                self.config.vehicle_reset
            );
            self.pheromone.reset();

            let mut best: Option<Solution> = None;
            let mut stagnation = 0;
            let mut converged = true;

            for iteration in 0..self.config.num_iterations {
                let batch = match self.iterate(vehicles, objective, DeadEndPolicy::Skip) {
                    Ok(batch) => batch,
                    Err(infeasible) => {
                        debug!("{}, adding a vehicle", infeasible);
                        converged = false;
                        break;
                    }
                };
                iterations += 1;

                if track_best(&mut best, &batch, &mut self.history) {
                    stagnation = 0;
                } else {
                    stagnation += 1;
                }

                let best_cost = best.as_ref().map_or(f64::INFINITY, Solution::cost);
                self.history.record_cost(vehicles, iteration, best_cost);
                debug!("Iteration {}: Best cost = {:.2}", iteration + 1, best_cost);

                if stagnation > self.config.max_stagnation {
                    debug!(
                        "No improvement for {} iterations with {} vehicles",
                        stagnation, vehicles
                    );
                    break;
                }
            }

            if converged {
                if let Some(best) = best {
                    info!("Best cost with {} vehicles: {:.2}", vehicles, best.cost());
                    trade_off.push(TradeOffPoint {
                        vehicles,
                        distance: best.cost(),
                    });
                    if overall
                        .as_ref()
                        .map_or(true, |current| best.cost() < current.cost())
                    {
                        overall = Some(best);
                    }
                }
                resets += 1;
            }

            vehicles += 1;
        }

        let best = overall.ok_or(AcoError::FleetExhausted {
            vehicles: customers,
        })?;

        Ok(SearchOutcome {
            strategy: Strategy::Vehicles,
            vehicles: best.vehicle_count(),
            best_cost: Some(best.cost()),
            best_solution: Some(best),
            pareto_front: Vec::new(),
            trade_off,
            iterations,
            run_time: Duration::from_secs(0),
        })
    }

    /// Distance against time search with Pareto extraction.
    ///
    /// Escalates the fleet like the single-objective loop, using the
    /// time-aware model, and folds every constructed solution of every trial
    /// into a front of non-dominated `(distance, time)` pairs.
    pub(crate) fn run_pareto(&mut self) -> AcoResult<SearchOutcome> {
        let objective = Objective::DistanceTime;
        let mut vehicles = self.problem.initial_fleet_size();
        let mut iterations = 0;
        let mut front: ParetoFront<Solution> = ParetoFront::new();

        'fleet: loop {
            self.check_fleet(vehicles)?;
            info!("Trying with {} vehicles", vehicles);
            self.pheromone.reset();

            for iteration in 0..self.config.num_iterations {
                let batch = match self.iterate(vehicles, objective, DeadEndPolicy::Skip) {
                    Ok(batch) => batch,
                    Err(infeasible) => {
                        debug!("{}, adding a vehicle", infeasible);
                        vehicles += 1;
                        continue 'fleet;
                    }
                };
                iterations += 1;

                for solution in batch {
                    if front.insert(solution.objectives(), solution.clone()) {
                        self.history.record_solution(solution);
                    }
                }

                let best_distance = front
                    .best_by_first()
                    .map_or(f64::INFINITY, |point| point.objectives.0);
                self.history.record_cost(vehicles, iteration, best_distance);
                debug!(
                    "Iteration {}: Front size = {}, best distance = {:.2}",
                    iteration + 1,
                    front.len(),
                    best_distance
                );
            }

            break;
        }

        info!("Pareto front with {} points", front.len());

        let best_solution = front.best_by_first().map(|point| point.item.clone());

        Ok(SearchOutcome {
            strategy: Strategy::Pareto,
            // The front keeps solutions from abandoned smaller fleets too
            vehicles: best_solution
                .as_ref()
                .map_or(vehicles, Solution::vehicle_count),
            best_cost: best_solution.as_ref().map(Solution::cost),
            best_solution,
            pareto_front: front.into_points(),
            trade_off: Vec::new(),
            iterations,
            run_time: Duration::from_secs(0),
        })
    }
}
