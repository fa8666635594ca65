//! Utility functions for reporting results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::problem::Problem;
use crate::solution::{IterationSummary, Solution};

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Write a human-readable solution report.
pub fn write_solution<W: Write>(
    out: &mut W,
    solution: &Solution,
    problem: &Problem,
) -> io::Result<()> {
    let graph = &problem.graph;

    writeln!(out, "CVRP Solution for instance: {}", problem.name)?;
    writeln!(out, "Total Weight: {}", solution.total_weight)?;
    writeln!(out, "Is Feasible: {}", solution.is_feasible(graph))?;
    writeln!(out, "Number of Trips: {}", solution.get_trip_count())?;
    writeln!(out)?;

    for route in solution.routes(graph) {
        write!(out, "Vehicle {}: ", route.vehicle_id)?;

        if route.tour.is_empty() {
            writeln!(out, "Unused")?;
            continue;
        }

        writeln!(out, "{}", route.tour.join(" -> "))?;
        writeln!(out, "  Weight: {}", route.weight)?;
        writeln!(out, "  Processing Time: {}", route.processing_time)?;
        writeln!(out, "  Served Demand: {}", route.served_demand)?;

        let capacity = problem
            .vehicles
            .iter()
            .find(|v| v.id == route.vehicle_id)
            .map_or(0, |v| v.capacity);
        for (i, load) in route.trip_loads.iter().enumerate() {
            writeln!(out, "  Trip #{} Load: {} / {}", i + 1, load, capacity)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Save a solution report to a file.
pub fn save_solution<P: AsRef<Path>>(
    solution: &Solution,
    problem: &Problem,
    path: P,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_solution(&mut file, solution, problem)
}

/// One line per iteration: index, constructed and improved weight.
pub fn format_history(history: &[IterationSummary]) -> String {
    history
        .iter()
        .map(|s| {
            format!(
                "#{:<4} constructed {:>8} improved {:>8}{}",
                s.iteration,
                s.constructed_weight,
                s.improved_weight,
                if s.mutated { "  *" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Statistics about a finished run.
pub struct SearchStatistics {
    pub iterations: usize,
    pub runtime: Duration,
    pub best_total_weight: u64,
    pub best_iteration: Option<usize>,
    pub best_solution_is_feasible: bool,
    pub best_solution_trips: usize,
    pub mutated_iterations: usize,
}

impl SearchStatistics {
    pub fn collect(
        solution: &Solution,
        problem: &Problem,
        history: &[IterationSummary],
        runtime: Duration,
    ) -> Self {
        SearchStatistics {
            iterations: history.len(),
            runtime,
            best_total_weight: solution.total_weight,
            best_iteration: solution.iteration,
            best_solution_is_feasible: solution.is_feasible(&problem.graph),
            best_solution_trips: solution.get_trip_count(),
            mutated_iterations: history.iter().filter(|s| s.mutated).count(),
        }
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Iterations: {}
- Runtime: {}
- Best Total Weight: {}
- Best Found At Iteration: {}
- Best Solution Feasible: {}
- Best Solution Trips: {}
- Mutated Iterations: {}",
            self.iterations,
            format_duration(self.runtime),
            self.best_total_weight,
            self.best_iteration
                .map_or_else(|| "initial".to_string(), |i| i.to_string()),
            self.best_solution_is_feasible,
            self.best_solution_trips,
            self.mutated_iterations
        )
    }
}
