//! # ACO-CVRP
//!
//! Ant Colony Optimization for the Capacitated Vehicle Routing Problem (CVRP).
//!
//! A fleet of capacity-limited vehicles, one ant per vehicle, builds depot-based
//! routes guided by pheromone and visibility. Each iteration constructs routes,
//! optionally perturbs them with an inter-route mutation, shortens them with a
//! positional 2-opt exchange and finally updates the pheromone table, either with
//! the classic rule or with a bounded elitist variant.
//!
//! The engine is synchronous and free of global state; visualisation layers can
//! attach a [`ColonyObserver`](observer::ColonyObserver) to replay traversals.

pub mod ant;
pub mod config;
pub mod construction;
pub mod error;
pub mod graph;
pub mod local_search;
pub mod mutation;
pub mod observer;
pub mod pheromone;
pub mod problem;
pub mod selection;
pub mod solution;
pub mod utils;

use crate::ant::Ant;
use crate::config::Config;
use crate::construction::RouteConstruction;
use crate::error::ColonyError;
use crate::local_search::LocalSearch;
use crate::mutation::Mutation;
use crate::observer::{ColonyObserver, NoopObserver};
use crate::pheromone::PheromoneUpdater;
use crate::problem::{Problem, ProblemDefinition};
use crate::selection::NodeSelector;
use crate::solution::{total_weight, IterationSummary, Solution};

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// The iteration controller: owns the ants, the random stream and the best snapshot.
pub struct AcoAlgorithm {
    pub problem: Problem,
    pub config: Config,
    pub ants: Vec<Ant>,
    pub best_solution: Option<Solution>,
    /// One entry per completed iteration
    pub history: Vec<IterationSummary>,
    pub iterations: usize,
    pub run_time: Duration,
    pub construction: RouteConstruction,
    pub local_search: LocalSearch,
    pub mutation: Mutation,
    pub pheromone: PheromoneUpdater,
    rng: ChaCha8Rng,
}

impl AcoAlgorithm {
    /// Create a colony for a validated problem.
    pub fn new(problem: Problem, config: Config) -> Result<Self, ColonyError> {
        config.validate()?;

        let local_search = LocalSearch::new();
        let ants = problem.vehicles.iter().cloned().map(Ant::new).collect();

        Ok(AcoAlgorithm {
            ants,
            best_solution: None,
            history: Vec::new(),
            iterations: 0,
            run_time: Duration::from_secs(0),
            construction: RouteConstruction::new(NodeSelector::new(&config)),
            local_search,
            mutation: Mutation::new(local_search),
            pheromone: PheromoneUpdater::new(&config),
            rng: Self::seed_rng(&config),
            problem,
            config,
        })
    }

    /// Validate a definition and create a colony for it.
    pub fn from_definition(
        definition: &ProblemDefinition,
        config: Config,
    ) -> Result<Self, ColonyError> {
        config.validate()?;
        let problem = Problem::from_definition(definition, config.initial_pheromone)?;
        Self::new(problem, config)
    }

    fn seed_rng(config: &Config) -> ChaCha8Rng {
        match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Reset visited flags, ant routes, the best snapshot and the history.
    pub fn initialize(&mut self) {
        self.problem.graph.reset_visited();
        for ant in &mut self.ants {
            ant.reset();
        }
        self.best_solution = None;
        self.history.clear();
        self.iterations = 0;
    }

    /// Tear the run down so the colony can start over: also restores the initial
    /// pheromone and reseeds the random stream.
    pub fn reset(&mut self) {
        self.initialize();
        self.problem
            .graph
            .reset_pheromone(self.config.initial_pheromone);
        self.rng = Self::seed_rng(&self.config);
        self.run_time = Duration::from_secs(0);
    }

    /// Run all configured iterations and return the best solution found.
    pub fn run(&mut self) -> Result<&Solution, ColonyError> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Same as [`run`](Self::run), notifying `observer` of traversals and pheromone writes.
    pub fn run_with_observer(
        &mut self,
        observer: &mut dyn ColonyObserver,
    ) -> Result<&Solution, ColonyError> {
        let start_time = Instant::now();
        info!(
            "Starting ACO on '{}' ({} customers, {} vehicles, {} iterations, {})",
            self.problem.name,
            self.problem.get_customer_count(),
            self.ants.len(),
            self.config.iterations,
            if self.config.improved {
                "improved"
            } else {
                "classic"
            }
        );

        self.initialize();

        if self.config.iterations == 0 {
            // Nothing to improve, the first construction is the answer
            self.construction.construct(
                &mut self.problem.graph,
                &mut self.ants,
                &mut self.rng,
                observer,
                0,
            )?;
            self.record_best(None);
        }

        for iteration in 0..self.config.iterations {
            self.run_iteration(iteration, observer)?;
        }

        self.run_time = start_time.elapsed();
        let best = self
            .best_solution
            .get_or_insert_with(|| Solution::from_ants(&self.ants, None));
        info!(
            "ACO finished in {:?}: best total weight {} (iteration {:?})",
            self.run_time, best.total_weight, best.iteration
        );
        Ok(best)
    }

    /// Execute one iteration: construct, mutate, 2-opt, update pheromone, record best.
    ///
    /// Embedders may call this directly and stop between iterations. The returned
    /// summary is also appended to [`history`](Self::history).
    pub fn run_iteration(
        &mut self,
        iteration: usize,
        observer: &mut dyn ColonyObserver,
    ) -> Result<IterationSummary, ColonyError> {
        self.construction.construct(
            &mut self.problem.graph,
            &mut self.ants,
            &mut self.rng,
            observer,
            iteration,
        )?;
        let constructed_weight = total_weight(&self.ants);

        for ant in &self.ants {
            debug!("Prev: {}", ant.route_string(&self.problem.graph));
        }

        let mut mutated = false;
        if self.config.mutation_enabled {
            if let Some(ants) = self.mutation.mutate(
                &self.problem.graph,
                &self.ants,
                iteration,
                self.config.iterations,
                &mut self.rng,
            ) {
                self.ants = ants;
                mutated = true;
            }
        }

        self.local_search.educate(&self.problem.graph, &mut self.ants);

        self.pheromone
            .update(&mut self.problem.graph, &self.ants, observer, iteration);

        let improved_weight = total_weight(&self.ants);
        debug!(
            "Iteration {}: constructed {}, improved {}{}",
            iteration,
            constructed_weight,
            improved_weight,
            if mutated { " (mutated)" } else { "" }
        );

        self.record_best(Some(iteration));
        self.iterations += 1;

        let routes = self
            .ants
            .iter()
            .map(|a| a.route_string(&self.problem.graph))
            .collect();
        let summary = IterationSummary {
            iteration,
            constructed_weight,
            improved_weight,
            mutated,
            routes,
        };
        self.history.push(summary.clone());
        Ok(summary)
    }

    /// Keep a deep copy of the ants if they beat the best so far.
    fn record_best(&mut self, iteration: Option<usize>) {
        let weight = total_weight(&self.ants);
        let improved = self
            .best_solution
            .as_ref()
            .map_or(true, |best| weight < best.total_weight);

        if improved {
            info!("New best total weight {} at iteration {:?}", weight, iteration);
            self.best_solution = Some(Solution::from_ants(&self.ants, iteration));
        }
    }
}
