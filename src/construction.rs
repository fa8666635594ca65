//! Route construction: ants leave the depot in turn until every customer is served.

use crate::ant::Ant;
use crate::error::ColonyError;
use crate::graph::{Graph, DEPOT};
use crate::observer::{ColonyObserver, TraversalEvent};
use crate::selection::NodeSelector;
use log::trace;
use rand::Rng;

/// Drives the ants through the graph for one iteration.
pub struct RouteConstruction {
    pub selector: NodeSelector,
}

impl RouteConstruction {
    pub fn new(selector: NodeSelector) -> Self {
        RouteConstruction { selector }
    }

    /// Build a fresh tour for every ant.
    ///
    /// Visited flags and ant routes are reset first. In each pass every ant makes
    /// one depot-to-depot trip, so a vehicle may end up with several trips. A node
    /// visited by any ant is unavailable to all others. Pheromone is only read here.
    pub fn construct<R: Rng + ?Sized>(
        &self,
        graph: &mut Graph,
        ants: &mut [Ant],
        rng: &mut R,
        observer: &mut dyn ColonyObserver,
        iteration: usize,
    ) -> Result<(), ColonyError> {
        graph.reset_visited();
        graph.mark_visited(DEPOT);
        for ant in ants.iter_mut() {
            ant.reset();
        }

        while !graph.all_customers_visited() {
            let mut progress = false;

            for ant in ants.iter_mut() {
                if graph.all_customers_visited() {
                    break;
                }
                progress |= self.run_trip(graph, ant, rng, observer, iteration);
            }

            if !progress {
                return Err(ColonyError::Stalled {
                    unvisited: graph.unvisited_customers().map(|n| n.id.clone()).collect(),
                });
            }
        }

        Ok(())
    }

    /// One trip from the depot back to the depot. Returns whether a customer was served.
    fn run_trip<R: Rng + ?Sized>(
        &self,
        graph: &mut Graph,
        ant: &mut Ant,
        rng: &mut R,
        observer: &mut dyn ColonyObserver,
        iteration: usize,
    ) -> bool {
        let mut current = DEPOT;
        let mut served = false;
        ant.remaining_capacity = ant.vehicle.capacity;

        while ant.remaining_capacity > 0 && !graph.all_customers_visited() {
            let next =
                self.selector
                    .select_next(graph, current, ant.remaining_capacity, rng)
                    .filter(|&j| graph.nodes[j].demand <= ant.remaining_capacity);

            match next {
                Some(j) => {
                    Self::accept(graph, ant, current, j, observer, iteration);
                    graph.mark_visited(j);
                    current = j;
                    served = true;
                }
                None => break,
            }
        }

        if current != DEPOT {
            Self::accept(graph, ant, current, DEPOT, observer, iteration);
        }

        served
    }

    fn accept(
        graph: &Graph,
        ant: &mut Ant,
        from: usize,
        to: usize,
        observer: &mut dyn ColonyObserver,
        iteration: usize,
    ) {
        let leg = ant.travel(graph, from, to);
        trace!(
            "A{} {} -> {} ({})",
            ant.vehicle.id,
            graph.nodes[from].id,
            graph.nodes[to].id,
            leg.weight
        );
        observer.on_edge_traversed(&TraversalEvent {
            iteration,
            vehicle_id: ant.vehicle.id.clone(),
            leg,
        });
    }
}
