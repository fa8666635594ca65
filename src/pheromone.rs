//! Pheromone evaporation and reinforcement.
//!
//! Classic update, per traversed edge of each ant:
//!
//! `τ ← (1 − ρ)·τ + ρ / L`
//!
//! Improved (elitist, bounded) update, for every edge of the graph:
//!
//! `τ ← clamp(ρ·τ + Δτ, τ_min, τ_max)` with
//! `Δτ(i,j) = Σ_k Q / (L_total·K) · (D_k − d_ij) / (m_k·D_k)` over the ants `k`
//! whose route uses `(i,j)`, `τ_max = Q / S`, `τ_min = τ_max / 2` and `S` the sum of
//! the depot-to-customer weights. Note that ρ is the retained share in the
//! improved update and the evaporated share in the classic one.

use crate::ant::Ant;
use crate::config::Config;
use crate::graph::{Edge, Graph};
use crate::observer::{ColonyObserver, PheromoneEvent};
use itertools::Itertools;

#[derive(Debug, Clone, Copy)]
pub struct PheromoneUpdater {
    pub improved: bool,
    /// ρ
    pub evaporation_rate: f64,
    /// Q
    pub elitist_constant: f64,
}

impl PheromoneUpdater {
    pub fn new(config: &Config) -> Self {
        PheromoneUpdater {
            improved: config.improved,
            evaporation_rate: config.evaporation_rate,
            elitist_constant: config.elitist_constant,
        }
    }

    /// Apply the configured update family once, after all routes are final.
    pub fn update(
        &self,
        graph: &mut Graph,
        ants: &[Ant],
        observer: &mut dyn ColonyObserver,
        iteration: usize,
    ) {
        if self.improved {
            self.improved_update(graph, ants, observer, iteration);
        } else {
            for ant in ants {
                self.classic_update(graph, ant, observer, iteration);
            }
        }
    }

    /// Reinforce the edges of one ant's route.
    pub fn classic_update(
        &self,
        graph: &mut Graph,
        ant: &Ant,
        observer: &mut dyn ColonyObserver,
        iteration: usize,
    ) {
        let rho = self.evaporation_rate;
        let length = ant.route_weight().max(1) as f64;

        for leg in &ant.legs {
            if let Some(edge) = graph.edge_mut(leg.from, leg.to) {
                let old = edge.pheromone();
                let new = (1.0 - rho) * old + rho / length;
                write(edge, new, observer, iteration);
            }
        }
    }

    /// Elitist bounded update over every edge of the graph.
    pub fn improved_update(
        &self,
        graph: &mut Graph,
        ants: &[Ant],
        observer: &mut dyn ColonyObserver,
        iteration: usize,
    ) {
        let deltas = self.increments(graph, ants);
        let (tau_min, tau_max) = self.bounds(graph);
        let rho = self.evaporation_rate;
        let n = graph.node_count();

        for edge in graph.edges_mut() {
            let delta = deltas[edge.from * n + edge.to];
            let new = (rho * edge.pheromone() + delta).clamp(tau_min, tau_max);
            write(edge, new, observer, iteration);
        }
    }

    /// `(τ_min, τ_max)` of the improved update.
    pub fn bounds(&self, graph: &Graph) -> (f64, f64) {
        let tau_max = self.elitist_constant / graph.depot_weight_sum();
        (tau_max / 2.0, tau_max)
    }

    /// Row-major table of `Δτ` for every ordered node pair.
    pub fn increments(&self, graph: &Graph, ants: &[Ant]) -> Vec<f64> {
        let n = graph.node_count();
        let mut deltas = vec![0.0; n * n];

        let total_length = ants.iter().map(|a| a.route_weight()).sum::<u64>().max(1) as f64;
        let ant_count = ants.len().max(1) as f64;
        let factor = self.elitist_constant / (total_length * ant_count);

        for ant in ants.iter().filter(|a| a.has_route()) {
            let length = ant.route_weight().max(1) as f64;
            let served = ant.customer_count().max(1) as f64;

            for leg in ant.legs.iter().unique_by(|l| (l.from, l.to)) {
                let share = (length - leg.weight as f64) / (served * length);
                deltas[leg.from * n + leg.to] += factor * share;
            }
        }

        deltas
    }
}

fn write(
    edge: &mut Edge,
    new: f64,
    observer: &mut dyn ColonyObserver,
    iteration: usize,
) {
    let old = edge.pheromone();
    edge.set_pheromone(new);
    if old != new {
        observer.on_pheromone_changed(&PheromoneEvent {
            iteration,
            from: edge.from,
            to: edge.to,
            old,
            new,
        });
    }
}
