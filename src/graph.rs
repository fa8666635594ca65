//! Complete directed graph holding travel weights and the pheromone table.

use crate::problem::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of the depot in [`Graph::nodes`].
pub const DEPOT: usize = 0;

/// A directed edge with its travel cost and pheromone level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: u32,
    pheromone: f64,
    previous_pheromone: f64,
}

impl Edge {
    pub fn new(from: usize, to: usize, weight: u32, pheromone: f64) -> Self {
        Edge {
            from,
            to,
            weight,
            pheromone,
            previous_pheromone: pheromone,
        }
    }

    pub fn pheromone(&self) -> f64 {
        self.pheromone
    }

    /// Value held before the last write. Only meaningful to trail renderers.
    pub fn previous_pheromone(&self) -> f64 {
        self.previous_pheromone
    }

    pub fn set_pheromone(&mut self, value: f64) {
        self.previous_pheromone = self.pheromone;
        self.pheromone = value;
    }

    /// Visibility (η), the reciprocal of the weight. Zero-weight edges count as 1.
    pub fn visibility(&self) -> f64 {
        if self.weight == 0 {
            1.0
        } else {
            1.0 / self.weight as f64
        }
    }
}

/// The graph exclusively owns nodes and edges; everything else refers to them by index.
#[derive(Debug, Clone)]
pub struct Graph {
    pub nodes: Vec<Node>,
    edges: Vec<Option<Edge>>,
    index: HashMap<String, usize>,
}

impl Graph {
    /// `edges` is a row-major `n * n` table; `index` maps node ids to positions.
    pub(crate) fn new(
        nodes: Vec<Node>,
        edges: Vec<Option<Edge>>,
        index: HashMap<String, usize>,
    ) -> Self {
        debug_assert_eq!(edges.len(), nodes.len() * nodes.len());
        Graph {
            nodes,
            edges,
            index,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depot(&self) -> &Node {
        &self.nodes[DEPOT]
    }

    /// Position of the node with the given identifier.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn edge(&self, from: usize, to: usize) -> Option<&Edge> {
        let n = self.nodes.len();
        if from >= n || to >= n {
            return None;
        }
        self.edges[from * n + to].as_ref()
    }

    pub fn edge_mut(&mut self, from: usize, to: usize) -> Option<&mut Edge> {
        let n = self.nodes.len();
        if from >= n || to >= n {
            return None;
        }
        self.edges[from * n + to].as_mut()
    }

    /// Look an edge up by node identifiers.
    pub fn find_edge(&self, from_id: &str, to_id: &str) -> Option<&Edge> {
        self.edge(self.node_index(from_id)?, self.node_index(to_id)?)
    }

    /// Weight of the edge between two nodes; 0 for a missing self-loop.
    pub fn weight(&self, from: usize, to: usize) -> u32 {
        self.edge(from, to).map_or(0, |e| e.weight)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().flatten()
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Clear every visited flag. Called once at the start of an iteration.
    pub fn reset_visited(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
        }
    }

    pub fn mark_visited(&mut self, node: usize) {
        self.nodes[node].visited = true;
    }

    /// True once every customer has been served by some ant.
    pub fn all_customers_visited(&self) -> bool {
        self.nodes.iter().all(|n| n.is_depot || n.visited)
    }

    pub fn unvisited_customers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_depot && !n.visited)
    }

    /// Put every edge back to the same pheromone level.
    pub fn reset_pheromone(&mut self, value: f64) {
        for edge in self.edges_mut() {
            edge.pheromone = value;
            edge.previous_pheromone = value;
        }
    }

    /// Sum of the depot-to-customer edge weights, floored at 1.
    pub fn depot_weight_sum(&self) -> f64 {
        let sum: u64 = (0..self.nodes.len())
            .filter(|&i| i != DEPOT)
            .map(|i| self.weight(DEPOT, i) as u64)
            .sum();
        sum.max(1) as f64
    }

    /// Recompute every weight as the rounded Euclidean distance of the node positions.
    ///
    /// Optional load-time correction for layouts whose positions were placed to match
    /// the cost table; the colony itself never calls this.
    pub fn correct_weights_from_positions(&mut self) {
        let n = self.nodes.len();
        for from in 0..n {
            for to in 0..n {
                let weight = self.nodes[from].distance(&self.nodes[to]).round() as u32;
                if let Some(edge) = self.edges[from * n + to].as_mut() {
                    edge.weight = weight;
                }
            }
        }
    }
}
