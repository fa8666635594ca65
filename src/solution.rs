//! Solution snapshots and per-iteration reports.

use crate::ant::Ant;
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Route of one vehicle expressed with node identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle_id: String,
    /// Complete tour including every depot visit
    pub tour: Vec<String>,
    pub weight: u64,
    /// Demand served on each depot-to-depot trip
    pub trip_loads: Vec<i64>,
    pub served_demand: i64,
    pub processing_time: u64,
}

/// Deep copy of all ants' routes at one point of the run.
#[derive(Clone, Serialize, Deserialize)]
pub struct Solution {
    pub ants: Vec<Ant>,
    /// Sum of all ants' route weights
    pub total_weight: u64,
    /// Iteration that produced the snapshot; `None` for the initial construction
    pub iteration: Option<usize>,
}

impl Solution {
    pub fn from_ants(ants: &[Ant], iteration: Option<usize>) -> Self {
        Solution {
            ants: ants.to_vec(),
            total_weight: total_weight(ants),
            iteration,
        }
    }

    /// Per-vehicle routes with node identifiers.
    pub fn routes(&self, graph: &Graph) -> Vec<VehicleRoute> {
        self.ants
            .iter()
            .map(|ant| VehicleRoute {
                vehicle_id: ant.vehicle.id.clone(),
                tour: ant
                    .complete_tour()
                    .iter()
                    .map(|&n| graph.nodes[n].id.clone())
                    .collect(),
                weight: ant.route_weight(),
                trip_loads: ant.sub_route_loads(graph),
                served_demand: ant.served_demand(graph),
                processing_time: ant.processing_time,
            })
            .collect()
    }

    pub fn route_strings(&self, graph: &Graph) -> Vec<String> {
        self.ants.iter().map(|a| a.route_string(graph)).collect()
    }

    /// Every trip of every vehicle stays within its capacity.
    pub fn is_feasible(&self, graph: &Graph) -> bool {
        self.ants.iter().all(|a| a.is_capacity_feasible(graph))
    }

    /// Number of depot-to-depot trips over all vehicles.
    pub fn get_trip_count(&self) -> usize {
        self.ants.iter().map(|a| a.sub_routes().len()).sum()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Total Weight: {}", self.total_weight)?;
        writeln!(f, "  Iteration: {:?}", self.iteration)?;

        for ant in &self.ants {
            writeln!(
                f,
                "  Vehicle {}: {:?} (Weight: {})",
                ant.vehicle.id,
                ant.complete_tour(),
                ant.route_weight()
            )?;
        }

        Ok(())
    }
}

/// What happened in one iteration, for external reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    pub iteration: usize,
    /// Total weight right after route construction
    pub constructed_weight: u64,
    /// Total weight after mutation and 2-opt
    pub improved_weight: u64,
    pub mutated: bool,
    pub routes: Vec<String>,
}

pub fn total_weight(ants: &[Ant]) -> u64 {
    ants.iter().map(|a| a.route_weight()).sum()
}
