//! Utility functions for reporting ACO-CVRP results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::error::AcoResult;
use crate::history::History;
use crate::problem::Problem;
use crate::solution::Solution;
use crate::strategy::SearchOutcome;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a solution to a file as a readable route listing.
pub fn save_solution<P: AsRef<Path>>(
    solution: &Solution,
    problem: &Problem,
    path: P,
) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_solution(&mut file, solution, problem)?;
    file.flush()
}

/// Write a readable route listing to any writer.
pub fn write_solution<W: Write>(
    out: &mut W,
    solution: &Solution,
    problem: &Problem,
) -> std::io::Result<()> {
    writeln!(out, "CVRP Solution for instance: {}", problem.name)?;
    writeln!(out, "Total Distance: {:.2}", solution.distance)?;
    if let Some(duration) = solution.duration {
        writeln!(out, "Total Time: {:.2}", duration)?;
    }
    writeln!(out, "Is Feasible: {}", solution.is_feasible(problem))?;
    writeln!(out, "Number of Routes: {}", solution.routes.len())?;
    writeln!(out)?;

    for (i, route) in solution.routes.iter().enumerate() {
        write!(out, "Route #{}: ", i + 1)?;

        if route.is_empty() {
            writeln!(out, "Empty")?;
            continue;
        }

        let stops: Vec<String> = route.stops.iter().map(|stop| stop.to_string()).collect();
        writeln!(out, "{}", stops.join(" -> "))?;

        writeln!(out, "  Distance: {:.2}", route.distance)?;
        writeln!(out, "  Load: {} / {}", route.load, problem.vehicle_capacity)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Everything the visualization side reads after a run.
#[derive(Serialize)]
pub struct Report<'a> {
    pub outcome: &'a SearchOutcome,
    pub history: &'a History,
}

/// Write the outcome and the run history as JSON.
pub fn write_report<P: AsRef<Path>>(
    outcome: &SearchOutcome,
    history: &History,
    path: P,
) -> AcoResult<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, &Report { outcome, history })?;
    Ok(())
}

/// Statistics about the search process.
pub struct SearchStatistics {
    pub strategy: String,
    pub iterations: usize,
    pub runtime: Duration,
    pub vehicles: usize,
    pub best_solution_distance: Option<f64>,
    pub best_solution_feasible: bool,
    pub pareto_points: usize,
    pub improvements: usize,
}

impl SearchStatistics {
    /// Collect statistics from a finished search.
    pub fn from_outcome(outcome: &SearchOutcome, history: &History, problem: &Problem) -> Self {
        SearchStatistics {
            strategy: outcome.strategy.to_string(),
            iterations: outcome.iterations,
            runtime: outcome.run_time,
            vehicles: outcome.vehicles,
            best_solution_distance: outcome.best_cost,
            best_solution_feasible: outcome
                .best_solution
                .as_ref()
                .map_or(false, |solution| solution.is_feasible(problem)),
            pareto_points: outcome.pareto_front.len(),
            improvements: history.solution.len(),
        }
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        let distance = self
            .best_solution_distance
            .map_or_else(|| "-".to_string(), |d| format!("{:.2}", d));

        format!(
            "Search Statistics:
- Strategy: {}
- Iterations: {}
- Runtime: {}
- Vehicles: {}
- Best Solution Distance: {}
- Best Solution Feasible: {}
- Pareto Points: {}
- Improvements: {}",
            self.strategy,
            self.iterations,
            format_duration(self.runtime),
            self.vehicles,
            distance,
            self.best_solution_feasible,
            self.pareto_points,
            self.improvements
        )
    }
}
