//! Next-node choice for an ant.
//!
//! Both rules rank the feasible candidates and take the arg-max. The classic rule
//! draws `q` once per decision to pick between the greedy score and the normalised
//! transition probability; the improved rule always uses the normalised
//! `τ^α · η^β`. Ranking instead of sampling keeps each decision deterministic for
//! a given `q`.

use crate::config::Config;
use crate::graph::{Graph, DEPOT};
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct NodeSelector {
    pub improved: bool,
    /// α
    pub pheromone_influence: f64,
    /// β
    pub visibility_influence: f64,
    pub q0: f64,
}

impl NodeSelector {
    pub fn new(config: &Config) -> Self {
        NodeSelector {
            improved: config.improved,
            pheromone_influence: config.pheromone_influence,
            visibility_influence: config.visibility_influence,
            q0: config.q0,
        }
    }

    /// Pick the next customer from `current`, or `None` when nothing fits.
    pub fn select_next<R: Rng + ?Sized>(
        &self,
        graph: &Graph,
        current: usize,
        remaining_capacity: i64,
        rng: &mut R,
    ) -> Option<usize> {
        let exploit = if self.improved {
            false
        } else {
            rng.gen::<f64>() <= self.q0
        };

        let total = if exploit {
            1.0
        } else {
            self.normalisation(graph, current, remaining_capacity)
        };

        let mut best_node = None;
        let mut best_score = f64::MIN;

        for j in 0..graph.node_count() {
            if !self.is_candidate(graph, current, j, remaining_capacity) {
                continue;
            }
            let Some(score) = self.score(graph, current, j) else {
                continue;
            };
            let value = if total > 0.0 { score / total } else { score };

            if value > best_score {
                best_score = value;
                best_node = Some(j);
            }
        }

        best_node
    }

    /// Unvisited, not the current node, and small enough for the remaining capacity.
    pub fn is_candidate(
        &self,
        graph: &Graph,
        current: usize,
        candidate: usize,
        remaining_capacity: i64,
    ) -> bool {
        let node = &graph.nodes[candidate];
        candidate != current
            && candidate != DEPOT
            && !node.visited
            && node.demand <= remaining_capacity
    }

    /// Attractiveness of the edge `from -> to`: `τ·η^β` (classic) or `τ^α·η^β` (improved).
    pub fn score(&self, graph: &Graph, from: usize, to: usize) -> Option<f64> {
        let edge = graph.edge(from, to)?;
        let visibility = edge.visibility().powf(self.visibility_influence);
        let pheromone = if self.improved {
            edge.pheromone().powf(self.pheromone_influence)
        } else {
            edge.pheromone()
        };
        Some(pheromone * visibility)
    }

    /// Denominator of the transition probability.
    ///
    /// The classic rule sums over every unvisited customer, the improved rule only
    /// over the capacity-feasible ones.
    fn normalisation(&self, graph: &Graph, current: usize, remaining_capacity: i64) -> f64 {
        graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(k, node)| *k != current && !node.is_depot && !node.visited)
            .filter(|(_, node)| !self.improved || node.demand <= remaining_capacity)
            .filter_map(|(k, _)| self.score(graph, current, k))
            .sum()
    }
}
