//! Integration tests for the full ACO iteration loop.

use aco_cvrp::ant::Ant;
use aco_cvrp::config::Config;
use aco_cvrp::construction::RouteConstruction;
use aco_cvrp::error::{ColonyError, ConfigError, ProblemError};
use aco_cvrp::graph::DEPOT;
use aco_cvrp::local_search::utils::tour_weight;
use aco_cvrp::observer::{NoopObserver, TraversalLog};
use aco_cvrp::problem::{Problem, ProblemDefinition};
use aco_cvrp::selection::NodeSelector;
use aco_cvrp::solution::total_weight;
use aco_cvrp::AcoAlgorithm;
use itertools::Itertools;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Creates a moderate problem: 20 customers on a grid around the depot.
fn create_moderate_definition(capacities: &[i64]) -> ProblemDefinition {
    let points: Vec<(f64, f64)> = std::iter::once((50.0, 50.0))
        .chain((0..4).flat_map(|i| {
            (0..5).map(move |j| (i as f64 * 20.0 + 10.0, j as f64 * 20.0 + 10.0))
        }))
        .collect();
    let matrix: Vec<Vec<u32>> = points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| (a.0 - b.0).hypot(a.1 - b.1).round() as u32)
                .collect()
        })
        .collect();
    let demands: Vec<i64> = (1..=20).map(|id| 1 + id % 3).collect();

    ProblemDefinition::from_matrix("ModerateTestProblem", &demands, capacities, &matrix)
}

/// Depot plus four customers, demands [3, 2, 4, 1], one vehicle of capacity 10.
fn create_tiny_definition() -> ProblemDefinition {
    let matrix = vec![
        vec![0, 3, 5, 4, 2],
        vec![3, 0, 2, 5, 4],
        vec![5, 2, 0, 3, 6],
        vec![4, 5, 3, 0, 3],
        vec![2, 4, 6, 3, 0],
    ];
    ProblemDefinition::from_matrix("Tiny", &[3, 2, 4, 1], &[10], &matrix)
}

fn run(definition: &ProblemDefinition, config: Config) -> AcoAlgorithm {
    let mut algorithm = AcoAlgorithm::from_definition(definition, config).unwrap();
    algorithm.run().unwrap();
    algorithm
}

#[test]
fn test_solution_covers_every_customer_once() {
    for improved in [false, true] {
        let definition = create_moderate_definition(&[12, 10, 8]);
        let config = Config::new()
            .with_iterations(8)
            .with_improved(improved)
            .with_seed(17);
        let algorithm = run(&definition, config);
        let best = algorithm.best_solution.as_ref().unwrap();
        let graph = &algorithm.problem.graph;

        let mut visited = vec![0; graph.node_count()];
        for ant in &best.ants {
            for customer in ant.customers() {
                visited[customer] += 1;
            }
        }
        assert_eq!(visited[DEPOT], 0);
        for (i, count) in visited.iter().enumerate().skip(1) {
            assert_eq!(*count, 1, "Customer {} visited {} times", i, count);
        }

        assert!(best.is_feasible(graph));
        assert_eq!(best.total_weight, total_weight(&best.ants));
    }
}

#[test]
fn test_every_iteration_is_capacity_feasible() {
    let definition = create_moderate_definition(&[7, 6]);
    let mut algorithm =
        AcoAlgorithm::from_definition(&definition, Config::new().with_iterations(10).with_seed(3))
            .unwrap();

    for iteration in 0..10 {
        let summary = algorithm.run_iteration(iteration, &mut NoopObserver).unwrap();
        assert_eq!(summary.iteration, iteration);
        assert_eq!(algorithm.history.last(), Some(&summary));
        assert_eq!(summary.routes.len(), algorithm.ants.len());
        for ant in &algorithm.ants {
            assert!(ant.is_capacity_feasible(&algorithm.problem.graph));
        }
        let served: usize = algorithm.ants.iter().map(|a| a.customer_count()).sum();
        assert_eq!(served, 20);
    }
}

#[test]
fn test_best_is_monotonic() {
    let definition = create_moderate_definition(&[12, 10]);
    let algorithm = run(&definition, Config::new().with_iterations(15).with_seed(5));

    let best = algorithm.best_solution.as_ref().unwrap();
    let history = &algorithm.history;
    assert_eq!(history.len(), 15);

    let min_improved = history.iter().map(|s| s.improved_weight).min().unwrap();
    assert_eq!(best.total_weight, min_improved);

    // Running minimum never goes up and the best came from the right iteration
    let running: Vec<u64> = history
        .iter()
        .scan(u64::MAX, |best, s| {
            *best = (*best).min(s.improved_weight);
            Some(*best)
        })
        .collect();
    assert!(running.iter().tuple_windows().all(|(a, b)| b <= a));
    let iteration = best.iteration.unwrap();
    assert_eq!(history[iteration].improved_weight, best.total_weight);
}

#[test]
fn test_same_seed_same_history() {
    for improved in [false, true] {
        let definition = create_moderate_definition(&[12, 10, 8]);
        let config = Config::new()
            .with_iterations(6)
            .with_improved(improved)
            .with_seed(2024);

        let first = run(&definition, config.clone());
        let second = run(&definition, config);

        assert_eq!(first.history, second.history);
        assert_eq!(
            first.best_solution.as_ref().unwrap().total_weight,
            second.best_solution.as_ref().unwrap().total_weight
        );
    }
}

#[test]
fn test_observer_does_not_change_results() {
    let definition = create_moderate_definition(&[12, 10]);
    let config = Config::new().with_iterations(5).with_seed(8);

    let plain = run(&definition, config.clone());

    let mut observed = AcoAlgorithm::from_definition(&definition, config).unwrap();
    let mut log = TraversalLog::new();
    observed.run_with_observer(&mut log).unwrap();

    assert_eq!(plain.history, observed.history);
    assert!(!log.traversals.is_empty());
    assert!(!log.pheromone_changes.is_empty());

    let last_legs: usize = observed.ants.iter().map(|a| a.legs.len()).sum();
    assert_eq!(log.traversals_in(4).count(), last_legs);
}

#[test]
fn test_reset_reproduces_the_run() {
    let definition = create_moderate_definition(&[12, 10]);
    let mut algorithm = AcoAlgorithm::from_definition(
        &definition,
        Config::new().with_iterations(4).with_seed(12),
    )
    .unwrap();

    algorithm.run().unwrap();
    let first = algorithm.history.clone();

    algorithm.reset();
    assert!(algorithm.best_solution.is_none());
    assert!(algorithm.history.is_empty());
    assert!(algorithm.problem.graph.edges().all(|e| e.pheromone() == 0.001));

    algorithm.run().unwrap();
    assert_eq!(algorithm.history, first);
}

#[test]
fn test_tiny_instance_reaches_brute_force_optimum() {
    let definition = create_tiny_definition();
    let algorithm = run(
        &definition,
        Config::new().with_iterations(5).with_mutation(false).with_seed(1),
    );
    let best = algorithm.best_solution.as_ref().unwrap();
    let graph = &algorithm.problem.graph;

    // A single trip serving all 10 units
    let ant = &best.ants[0];
    assert_eq!(ant.sub_routes().len(), 1);
    assert_eq!(ant.sub_route_loads(graph), vec![10]);

    let optimum = (1..=4)
        .permutations(4)
        .map(|p| {
            let tour: Vec<usize> = std::iter::once(DEPOT)
                .chain(p)
                .chain(std::iter::once(DEPOT))
                .collect();
            tour_weight(graph, &tour)
        })
        .min()
        .unwrap();
    assert_eq!(optimum, 13);
    assert!(best.total_weight <= optimum);
}

#[test]
fn test_zero_iterations_returns_first_construction() {
    let definition = create_moderate_definition(&[12, 10]);
    let config = Config::new().with_iterations(0).with_seed(7);
    let algorithm = run(&definition, config.clone());

    let best = algorithm.best_solution.as_ref().unwrap();
    assert!(algorithm.history.is_empty());
    assert_eq!(best.iteration, None);

    // Rebuild the first construction by hand with the same seed
    let mut problem = Problem::from_definition(&definition, config.initial_pheromone).unwrap();
    let mut ants: Vec<Ant> = problem.vehicles.iter().cloned().map(Ant::new).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    RouteConstruction::new(NodeSelector::new(&config))
        .construct(&mut problem.graph, &mut ants, &mut rng, &mut NoopObserver, 0)
        .unwrap();

    assert_eq!(best.total_weight, total_weight(&ants));
    let tours: Vec<Vec<usize>> = best.ants.iter().map(|a| a.complete_tour()).collect();
    let expected: Vec<Vec<usize>> = ants.iter().map(|a| a.complete_tour()).collect();
    assert_eq!(tours, expected);
}

#[test]
fn test_mutation_toggle_is_reported() {
    let definition = create_moderate_definition(&[12, 10, 8]);

    let without = run(
        &definition,
        Config::new().with_iterations(6).with_mutation(false).with_seed(4),
    );
    assert!(without.history.iter().all(|s| !s.mutated));

    let with = run(&definition, Config::new().with_iterations(6).with_seed(4));
    // In the last iteration every ant is a candidate and swaps of equal demand exist
    assert!(with.history.last().unwrap().mutated);
}

#[test]
fn test_invalid_config_is_rejected() {
    let definition = create_tiny_definition();

    let err = AcoAlgorithm::from_definition(&definition, Config::new().with_evaporation_rate(1.5))
        .err()
        .unwrap();
    assert_eq!(
        err,
        ColonyError::Config(ConfigError::EvaporationRateOutOfRange(1.5))
    );

    let err = AcoAlgorithm::from_definition(&definition, Config::new().with_initial_pheromone(0.0))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ColonyError::Config(ConfigError::NonPositiveInitialPheromone(_))
    ));
}

#[test]
fn test_infeasible_problem_is_rejected() {
    let mut definition = create_tiny_definition();
    definition.customers[2].demand = 11;

    let err = AcoAlgorithm::from_definition(&definition, Config::new())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ColonyError::Problem(ProblemError::InfeasibleDemand { .. })
    ));
}
