//! Local search applied to the constructed routes.

pub mod two_opt;
pub mod utils;

use crate::ant::Ant;
use crate::graph::Graph;
use log::trace;

/// Intra-route improvement of the ants' tours.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSearch;

impl LocalSearch {
    pub fn new() -> Self {
        LocalSearch
    }

    /// Improve every ant's tour. Returns the total weight saved.
    pub fn educate(&self, graph: &Graph, ants: &mut [Ant]) -> u64 {
        ants.iter_mut().map(|ant| self.improve_ant(graph, ant)).sum()
    }

    /// Run the positional exchange on one ant and rebuild its legs if it got shorter.
    pub fn improve_ant(&self, graph: &Graph, ant: &mut Ant) -> u64 {
        let mut tour = ant.complete_tour();
        let saved = self.two_opt(graph, &mut tour, ant.vehicle.capacity);

        if saved > 0 {
            trace!("A{} shortened by {}", ant.vehicle.id, saved);
            ant.rebuild_from_tour(graph, &tour);
        }
        saved
    }
}
