//! Positional 2-opt exchange (intra-route).
//!
//! Every pair of customer positions is tentatively swapped and the swap kept only
//! when the whole tour gets strictly shorter. Passes repeat until one makes no
//! change. Swaps between two trips of the same vehicle are also kept only if both
//! trips still fit the capacity.

use crate::graph::Graph;

use super::utils::{customer_positions, tour_weight, trip_index, trips_within_capacity};
use super::LocalSearch;

impl LocalSearch {
    /// Improve `tour` in place. Returns the weight saved.
    pub fn two_opt(&self, graph: &Graph, tour: &mut [usize], capacity: i64) -> u64 {
        let positions = customer_positions(tour);
        if positions.len() < 2 {
            return 0;
        }

        let trips = trip_index(tour);
        let initial = tour_weight(graph, tour);
        let mut best = initial;

        let mut improvement = true;
        while improvement {
            improvement = false;

            for (a, &i) in positions.iter().enumerate() {
                for &j in &positions[a + 1..] {
                    tour.swap(i, j);

                    let weight = tour_weight(graph, tour);
                    let feasible =
                        trips[i] == trips[j] || trips_within_capacity(graph, tour, capacity);

                    if weight < best && feasible {
                        best = weight;
                        improvement = true;
                    } else {
                        tour.swap(i, j);
                    }
                }
            }
        }

        initial - best
    }
}
