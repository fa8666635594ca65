//! Route-building agent bound to one vehicle.

use crate::graph::{Graph, DEPOT};
use crate::problem::Vehicle;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One traversed edge of an ant's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub from: usize,
    pub to: usize,
    pub weight: u32,
}

/// An ant owns the ordered legs of its current tour and the remaining capacity of
/// the trip in progress. Nodes and edges are referenced by graph index only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ant {
    pub vehicle: Vehicle,
    pub legs: Vec<Leg>,
    pub remaining_capacity: i64,
    /// Sum of the processing times of the visited customers
    pub processing_time: u64,
}

impl Ant {
    pub fn new(vehicle: Vehicle) -> Self {
        let remaining_capacity = vehicle.capacity;
        Ant {
            vehicle,
            legs: Vec::new(),
            remaining_capacity,
            processing_time: 0,
        }
    }

    /// Drop the current tour and refill the vehicle.
    pub fn reset(&mut self) {
        self.legs.clear();
        self.remaining_capacity = self.vehicle.capacity;
        self.processing_time = 0;
    }

    /// Append the edge `from -> to` to the tour.
    ///
    /// Arriving at a customer consumes its demand; arriving at the depot closes the
    /// trip and replenishes the vehicle.
    pub fn travel(&mut self, graph: &Graph, from: usize, to: usize) -> Leg {
        let leg = Leg {
            from,
            to,
            weight: graph.weight(from, to),
        };
        self.legs.push(leg);

        if to == DEPOT {
            self.remaining_capacity = self.vehicle.capacity;
        } else {
            let node = &graph.nodes[to];
            self.remaining_capacity -= node.demand;
            self.processing_time += node.processing_time as u64;
        }
        leg
    }

    /// Total weight of all legs.
    pub fn route_weight(&self) -> u64 {
        self.legs.iter().map(|l| l.weight as u64).sum()
    }

    pub fn has_route(&self) -> bool {
        !self.legs.is_empty()
    }

    /// Customers in visiting order, depot returns omitted.
    pub fn customers(&self) -> Vec<usize> {
        self.legs
            .iter()
            .map(|l| l.to)
            .filter(|&n| n != DEPOT)
            .collect()
    }

    pub fn customer_count(&self) -> usize {
        self.legs.iter().filter(|l| l.to != DEPOT).count()
    }

    /// Full node sequence, starting at the depot and keeping every intermediate depot
    /// return. Empty when the ant did not leave the depot.
    pub fn complete_tour(&self) -> Vec<usize> {
        match self.legs.first() {
            None => Vec::new(),
            Some(first) => std::iter::once(first.from)
                .chain(self.legs.iter().map(|l| l.to))
                .collect(),
        }
    }

    /// Customers grouped per depot-to-depot trip.
    pub fn sub_routes(&self) -> Vec<Vec<usize>> {
        split_trips(&self.complete_tour())
    }

    /// Demand served on each trip.
    pub fn sub_route_loads(&self, graph: &Graph) -> Vec<i64> {
        trip_loads(graph, &self.complete_tour())
    }

    /// Demand served over all trips.
    pub fn served_demand(&self, graph: &Graph) -> i64 {
        self.customers()
            .iter()
            .map(|&c| graph.nodes[c].demand)
            .sum()
    }

    /// Every trip stays within the vehicle capacity.
    pub fn is_capacity_feasible(&self, graph: &Graph) -> bool {
        self.sub_route_loads(graph)
            .iter()
            .all(|&load| load <= self.vehicle.capacity)
    }

    /// Replace the legs by the consecutive edges of `tour`.
    pub fn rebuild_from_tour(&mut self, graph: &Graph, tour: &[usize]) {
        self.reset();
        for (from, to) in tour.iter().copied().tuple_windows() {
            self.travel(graph, from, to);
        }
    }

    /// `A<vehicle>>> from-to.from-to.` with node identifiers.
    pub fn route_string(&self, graph: &Graph) -> String {
        let mut tour = format!("A{}>>", self.vehicle.id);
        for leg in &self.legs {
            tour.push_str(&format!(
                "{}-{}.",
                graph.nodes[leg.from].id, graph.nodes[leg.to].id
            ));
        }
        tour
    }
}

/// Split a depot-delimited node sequence into its trips.
pub fn split_trips(tour: &[usize]) -> Vec<Vec<usize>> {
    tour.split(|&n| n == DEPOT)
        .filter(|trip| !trip.is_empty())
        .map(|trip| trip.to_vec())
        .collect()
}

/// Demand served on each trip of a depot-delimited node sequence.
pub fn trip_loads(graph: &Graph, tour: &[usize]) -> Vec<i64> {
    split_trips(tour)
        .iter()
        .map(|trip| trip.iter().map(|&c| graph.nodes[c].demand).sum())
        .collect()
}
