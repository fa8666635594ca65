//! Inter-route mutation used to escape local optima.
//!
//! Each ant becomes a mutation candidate with probability
//! `p = p_min + (p_max − p_min)^(1 − (iter + 1) / iterations)`, where
//! `p_min = 1 / customers served by the ant` and `p_max = 1 / vehicle count`.
//! A candidate swaps one of its customers with a customer of another ant, taken
//! in random order, on the first pair that keeps both vehicles within capacity.
//! Every candidate yields its own mutated copy of the whole solution; copies are
//! improved with the local search and only the lightest one survives.

use crate::ant::Ant;
use crate::graph::Graph;
use crate::local_search::utils::{customer_positions, trips_within_capacity};
use crate::local_search::LocalSearch;
use log::{trace, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// A capacity-feasible exchange between two ants' tours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub ant: usize,
    pub position: usize,
    pub other_ant: usize,
    pub other_position: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    pub local_search: LocalSearch,
}

impl Mutation {
    pub fn new(local_search: LocalSearch) -> Self {
        Mutation { local_search }
    }

    /// Probability that an ant serving `customers` customers becomes a candidate.
    pub fn probability(
        iteration: usize,
        iterations: usize,
        customers: usize,
        vehicle_count: usize,
    ) -> f64 {
        if iterations == 0 || customers == 0 || vehicle_count == 0 {
            return 0.0;
        }
        let p_min = 1.0 / customers as f64;
        let p_max = 1.0 / vehicle_count as f64;
        let exponent = 1.0 - (iteration + 1) as f64 / iterations as f64;

        let p = p_min + (p_max - p_min).max(0.0).powf(exponent);
        if p > 1.0 {
            trace!("mutation probability {:.3} capped at 1", p);
        }
        p.clamp(0.0, 1.0)
    }

    /// Produce the best mutated copy of `ants`, or `None` when no candidate found a
    /// feasible exchange. The returned ants are already locally improved.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        graph: &Graph,
        ants: &[Ant],
        iteration: usize,
        iterations: usize,
        rng: &mut R,
    ) -> Option<Vec<Ant>> {
        let mut best: Option<(u64, Vec<Ant>)> = None;

        for candidate in 0..ants.len() {
            let p = Self::probability(
                iteration,
                iterations,
                ants[candidate].customer_count(),
                ants.len(),
            );
            if rng.gen::<f64>() >= p {
                continue;
            }

            let mut others: Vec<usize> = (0..ants.len()).filter(|&o| o != candidate).collect();
            others.shuffle(rng);

            let Some(exchange) = Self::find_exchange(graph, ants, candidate, &others) else {
                continue;
            };

            let mut copy = ants.to_vec();
            Self::apply(graph, &mut copy, exchange);
            self.local_search.educate(graph, &mut copy);

            if !copy.iter().all(|a| a.is_capacity_feasible(graph)) {
                warn!(
                    "discarding capacity-infeasible mutation of A{}",
                    ants[candidate].vehicle.id
                );
                continue;
            }

            let weight: u64 = copy.iter().map(|a| a.route_weight()).sum();
            trace!(
                "A{} exchanged with A{}: total {}",
                ants[candidate].vehicle.id,
                ants[exchange.other_ant].vehicle.id,
                weight
            );

            if best.as_ref().map_or(true, |(w, _)| weight < *w) {
                best = Some((weight, copy));
            }
        }

        best.map(|(_, ants)| ants)
    }

    /// First customer pair, scanning `others` in order, whose exchange keeps every
    /// trip of both vehicles within capacity.
    pub fn find_exchange(
        graph: &Graph,
        ants: &[Ant],
        candidate: usize,
        others: &[usize],
    ) -> Option<Exchange> {
        let mut tour = ants[candidate].complete_tour();
        let capacity = ants[candidate].vehicle.capacity;

        for &other in others {
            let mut other_tour = ants[other].complete_tour();
            let other_capacity = ants[other].vehicle.capacity;

            for &i in &customer_positions(&tour) {
                for &j in &customer_positions(&other_tour) {
                    std::mem::swap(&mut tour[i], &mut other_tour[j]);
                    let feasible = trips_within_capacity(graph, &tour, capacity)
                        && trips_within_capacity(graph, &other_tour, other_capacity);
                    std::mem::swap(&mut tour[i], &mut other_tour[j]);

                    if feasible {
                        return Some(Exchange {
                            ant: candidate,
                            position: i,
                            other_ant: other,
                            other_position: j,
                        });
                    }
                }
            }
        }

        None
    }

    /// Swap the two nodes and relink both ants' legs from the graph.
    pub fn apply(graph: &Graph, ants: &mut [Ant], exchange: Exchange) {
        let mut tour = ants[exchange.ant].complete_tour();
        let mut other_tour = ants[exchange.other_ant].complete_tour();

        std::mem::swap(
            &mut tour[exchange.position],
            &mut other_tour[exchange.other_position],
        );

        ants[exchange.ant].rebuild_from_tour(graph, &tour);
        ants[exchange.other_ant].rebuild_from_tour(graph, &other_tour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_grows_towards_the_last_iteration() {
        let first = Mutation::probability(0, 10, 10, 2);
        let middle = Mutation::probability(4, 10, 10, 2);
        let last = Mutation::probability(9, 10, 10, 2);

        assert!(first < middle);
        assert!(middle < last);
        assert_eq!(last, 1.0);
    }

    #[test]
    fn probability_is_zero_without_customers() {
        assert_eq!(Mutation::probability(0, 10, 0, 2), 0.0);
        assert_eq!(Mutation::probability(0, 0, 3, 2), 0.0);
    }

    #[test]
    fn probability_stays_a_probability() {
        // p_max < p_min makes the base negative
        for iteration in 0..5 {
            let p = Mutation::probability(iteration, 5, 2, 8);
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
