//! Read-only notifications for visualisation layers.
//!
//! Observers see every accepted edge traversal and every pheromone write. They
//! receive plain values and cannot reach back into the colony, so attaching one
//! never changes the optimisation result.

use crate::ant::Leg;
use serde::{Deserialize, Serialize};

/// An ant accepted an edge during route construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalEvent {
    pub iteration: usize,
    pub vehicle_id: String,
    pub leg: Leg,
}

/// A pheromone value was overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneEvent {
    pub iteration: usize,
    pub from: usize,
    pub to: usize,
    pub old: f64,
    pub new: f64,
}

pub trait ColonyObserver {
    fn on_edge_traversed(&mut self, _event: &TraversalEvent) {}

    fn on_pheromone_changed(&mut self, _event: &PheromoneEvent) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ColonyObserver for NoopObserver {}

/// Records every event so a renderer can replay the run at its own pace.
#[derive(Debug, Default, Clone)]
pub struct TraversalLog {
    pub traversals: Vec<TraversalEvent>,
    pub pheromone_changes: Vec<PheromoneEvent>,
}

impl TraversalLog {
    pub fn new() -> Self {
        TraversalLog::default()
    }

    /// Traversals of a single iteration, in acceptance order.
    pub fn traversals_in(&self, iteration: usize) -> impl Iterator<Item = &TraversalEvent> {
        self.traversals
            .iter()
            .filter(move |e| e.iteration == iteration)
    }
}

impl ColonyObserver for TraversalLog {
    fn on_edge_traversed(&mut self, event: &TraversalEvent) {
        self.traversals.push(event.clone());
    }

    fn on_pheromone_changed(&mut self, event: &PheromoneEvent) {
        self.pheromone_changes.push(event.clone());
    }
}
