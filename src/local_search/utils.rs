//! Tour helpers shared by the local search and the mutation step.

use crate::ant::trip_loads;
use crate::graph::{Graph, DEPOT};
use itertools::Itertools;

/// Sum of the consecutive edge weights of a node sequence.
pub fn tour_weight(graph: &Graph, tour: &[usize]) -> u64 {
    tour.iter()
        .tuple_windows()
        .map(|(&from, &to)| graph.weight(from, to) as u64)
        .sum()
}

/// Every depot-to-depot trip of `tour` serves at most `capacity`.
pub fn trips_within_capacity(graph: &Graph, tour: &[usize], capacity: i64) -> bool {
    trip_loads(graph, tour).iter().all(|&load| load <= capacity)
}

/// Positions of the customers in a tour.
pub fn customer_positions(tour: &[usize]) -> Vec<usize> {
    tour.iter()
        .enumerate()
        .filter(|(_, &node)| node != DEPOT)
        .map(|(pos, _)| pos)
        .collect()
}

/// Index of the trip each position belongs to; depot positions close a trip.
pub fn trip_index(tour: &[usize]) -> Vec<usize> {
    let mut trip = 0;
    tour.iter()
        .enumerate()
        .map(|(pos, &node)| {
            if node == DEPOT && pos > 0 {
                trip += 1;
            }
            trip
        })
        .collect()
}
