//! Problem definition and data structures for the CVRP.
//!
//! The records mirror what an external loader hands over; [`Problem::from_definition`]
//! validates them once and builds the complete [`Graph`] the colony works on.

use crate::error::ProblemError;
use crate::graph::{Edge, Graph};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Smallest admissible customer demand.
pub const MIN_DEMAND: i64 = 1;

/// Smallest admissible vehicle capacity.
pub const MIN_CAPACITY: i64 = 1;

/// Depot record. The base demand may be negative in observed data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotRecord {
    pub id: String,
    #[serde(default)]
    pub base_demand: i64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: String,
    pub capacity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub demand: i64,
    #[serde(default)]
    pub processing_time: u32,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Travel cost from one node to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeCostRecord {
    pub from: String,
    pub to: String,
    pub cost: u32,
}

impl EdgeCostRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, cost: u32) -> Self {
        EdgeCostRecord {
            from: from.into(),
            to: to.into(),
            cost,
        }
    }
}

/// Already-parsed problem data as delivered by a loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub depot: Option<DepotRecord>,
    #[serde(default)]
    pub vehicles: Vec<VehicleRecord>,
    #[serde(default)]
    pub customers: Vec<CustomerRecord>,
    #[serde(default)]
    pub costs: Vec<EdgeCostRecord>,
    /// Mirror an already known cost onto the reverse edge
    #[serde(default = "default_true")]
    pub symmetric_distance: bool,
    /// Skip self-loop cost records
    #[serde(default = "default_true")]
    pub avoid_cycle_same_node: bool,
}

fn default_true() -> bool {
    true
}

impl ProblemDefinition {
    /// Read a JSON problem definition from disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(io::Error::from)
    }

    /// Build a definition from a square cost matrix. Row/column 0 is the depot.
    pub fn from_matrix(
        name: impl Into<String>,
        demands: &[i64],
        capacities: &[i64],
        matrix: &[Vec<u32>],
    ) -> Self {
        let node_id = |i: usize| if i == 0 { "D".to_string() } else { i.to_string() };

        let mut costs = Vec::new();
        for (i, row) in matrix.iter().enumerate() {
            for (j, &cost) in row.iter().enumerate() {
                if i != j {
                    costs.push(EdgeCostRecord::new(node_id(i), node_id(j), cost));
                }
            }
        }

        ProblemDefinition {
            name: name.into(),
            depot: Some(DepotRecord {
                id: node_id(0),
                base_demand: 0,
                x: 0.0,
                y: 0.0,
            }),
            vehicles: capacities
                .iter()
                .enumerate()
                .map(|(i, &capacity)| VehicleRecord {
                    id: format!("V{}", i + 1),
                    capacity,
                })
                .collect(),
            customers: demands
                .iter()
                .enumerate()
                .map(|(i, &demand)| CustomerRecord {
                    id: node_id(i + 1),
                    demand,
                    processing_time: 0,
                    x: 0.0,
                    y: 0.0,
                })
                .collect(),
            costs,
            symmetric_distance: false,
            avoid_cycle_same_node: true,
        }
    }
}

/// Represents a node (customer or depot) of the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub demand: i64,
    pub is_depot: bool,
    pub processing_time: u32,
    /// Iteration-scoped; reset by [`Graph::reset_visited`]
    pub visited: bool,
}

impl Node {
    /// Create a new customer node.
    pub fn customer(id: impl Into<String>, demand: i64, processing_time: u32) -> Self {
        Node {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            demand,
            is_depot: false,
            processing_time,
            visited: false,
        }
    }

    /// Create the depot node.
    pub fn depot(id: impl Into<String>, base_demand: i64) -> Self {
        Node {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            demand: base_demand,
            is_depot: true,
            processing_time: 0,
            visited: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Calculate the Euclidean distance between two nodes.
    pub fn distance(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A vehicle and its constant capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub capacity: i64,
}

/// A validated CVRP instance.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub graph: Graph,
    pub vehicles: Vec<Vehicle>,
}

impl Problem {
    /// Validate a definition and build the complete graph.
    ///
    /// Fails fast on a missing depot, dangling edge references, vehicles below
    /// the minimum capacity, an incomplete cost table, and customers whose
    /// demand exceeds every vehicle's capacity.
    pub fn from_definition(
        definition: &ProblemDefinition,
        initial_pheromone: f64,
    ) -> Result<Self, ProblemError> {
        let depot = definition.depot.as_ref().ok_or(ProblemError::MissingDepot)?;

        if definition.vehicles.is_empty() {
            return Err(ProblemError::NoVehicles);
        }

        let mut vehicles = Vec::with_capacity(definition.vehicles.len());
        let mut vehicle_ids = HashSet::with_capacity(definition.vehicles.len());
        for record in &definition.vehicles {
            if !vehicle_ids.insert(record.id.as_str()) {
                return Err(ProblemError::DuplicateVehicle {
                    id: record.id.clone(),
                });
            }
            if record.capacity < MIN_CAPACITY {
                return Err(ProblemError::InvalidVehicleCapacity {
                    id: record.id.clone(),
                    capacity: record.capacity,
                });
            }
            vehicles.push(Vehicle {
                id: record.id.clone(),
                capacity: record.capacity,
            });
        }
        let max_capacity = vehicles.iter().map(|v| v.capacity).max().unwrap_or(0);

        let mut nodes = Vec::with_capacity(definition.customers.len() + 1);
        nodes.push(Node::depot(depot.id.clone(), depot.base_demand).at(depot.x, depot.y));

        for record in &definition.customers {
            if record.demand < MIN_DEMAND {
                return Err(ProblemError::InvalidDemand {
                    id: record.id.clone(),
                    demand: record.demand,
                });
            }
            if record.demand > max_capacity {
                return Err(ProblemError::InfeasibleDemand {
                    id: record.id.clone(),
                    demand: record.demand,
                    max_capacity,
                });
            }
            nodes.push(
                Node::customer(record.id.clone(), record.demand, record.processing_time)
                    .at(record.x, record.y),
            );
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(ProblemError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        let n = nodes.len();
        let mut slots: Vec<Option<Edge>> = vec![None; n * n];

        for record in &definition.costs {
            let lookup = |id: &String| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| ProblemError::UnknownNode { id: id.clone() })
            };
            let from = lookup(&record.from)?;
            let to = lookup(&record.to)?;

            if from == to && definition.avoid_cycle_same_node {
                continue;
            }

            let weight = match &slots[to * n + from] {
                Some(reverse) if definition.symmetric_distance => reverse.weight,
                _ => record.cost,
            };
            slots[from * n + to] = Some(Edge::new(from, to, weight, initial_pheromone));
        }

        if definition.symmetric_distance {
            for from in 0..n {
                for to in 0..n {
                    if slots[from * n + to].is_none() {
                        if let Some(weight) = slots[to * n + from].as_ref().map(|e| e.weight) {
                            slots[from * n + to] =
                                Some(Edge::new(from, to, weight, initial_pheromone));
                        }
                    }
                }
            }
        }

        for from in 0..n {
            for to in 0..n {
                if from != to && slots[from * n + to].is_none() {
                    return Err(ProblemError::MissingEdge {
                        from: nodes[from].id.clone(),
                        to: nodes[to].id.clone(),
                    });
                }
            }
        }

        debug!(
            "Loaded problem '{}': {} customers, {} vehicles",
            definition.name,
            n - 1,
            vehicles.len()
        );

        Ok(Problem {
            name: definition.name.clone(),
            graph: Graph::new(nodes, slots, index),
            vehicles,
        })
    }

    /// Get the number of customers (excluding the depot).
    pub fn get_customer_count(&self) -> usize {
        self.graph.nodes.len() - 1
    }

    /// Largest capacity in the fleet.
    pub fn max_capacity(&self) -> i64 {
        self.vehicles.iter().map(|v| v.capacity).max().unwrap_or(0)
    }

    /// Total demand of all customers.
    pub fn total_demand(&self) -> i64 {
        self.graph
            .nodes
            .iter()
            .filter(|n| !n.is_depot)
            .map(|n| n.demand)
            .sum()
    }
}
