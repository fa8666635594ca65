//! Tests for problem validation and graph construction.

use aco_cvrp::error::ProblemError;
use aco_cvrp::graph::DEPOT;
use aco_cvrp::problem::{
    CustomerRecord, DepotRecord, EdgeCostRecord, Problem, ProblemDefinition, VehicleRecord,
};

/// Depot D and customers A, B with a full cost table.
fn create_definition() -> ProblemDefinition {
    ProblemDefinition {
        name: "Small".to_string(),
        depot: Some(DepotRecord {
            id: "D".to_string(),
            base_demand: -10,
            x: 0.0,
            y: 0.0,
        }),
        vehicles: vec![VehicleRecord {
            id: "V1".to_string(),
            capacity: 5,
        }],
        customers: vec![
            CustomerRecord {
                id: "A".to_string(),
                demand: 2,
                processing_time: 3,
                x: 3.0,
                y: 4.0,
            },
            CustomerRecord {
                id: "B".to_string(),
                demand: 3,
                processing_time: 1,
                x: 0.0,
                y: 8.0,
            },
        ],
        costs: vec![
            EdgeCostRecord::new("D", "A", 5),
            EdgeCostRecord::new("A", "D", 7),
            EdgeCostRecord::new("D", "B", 8),
            EdgeCostRecord::new("B", "D", 9),
            EdgeCostRecord::new("A", "B", 5),
            EdgeCostRecord::new("B", "A", 6),
            EdgeCostRecord::new("A", "A", 1),
        ],
        symmetric_distance: false,
        avoid_cycle_same_node: true,
    }
}

#[test]
fn test_complete_graph_is_built() {
    let problem = Problem::from_definition(&create_definition(), 0.5).unwrap();
    let graph = &problem.graph;

    assert_eq!(graph.node_count(), 3);
    assert_eq!(problem.get_customer_count(), 2);
    // n * (n - 1) directed edges, self-loop suppressed
    assert_eq!(graph.edge_count(), 6);
    assert!(graph.find_edge("A", "A").is_none());

    assert!(graph.depot().is_depot);
    assert_eq!(graph.depot().demand, -10);
    assert_eq!(graph.node_index("D"), Some(DEPOT));

    let edge = graph.find_edge("A", "D").unwrap();
    assert_eq!(edge.weight, 7);
    assert_eq!(edge.pheromone(), 0.5);
    assert!(graph.edges().all(|e| e.pheromone() > 0.0));
}

#[test]
fn test_symmetric_distance_mirrors_known_cost() {
    let mut definition = create_definition();
    definition.symmetric_distance = true;

    let problem = Problem::from_definition(&definition, 1.0).unwrap();
    let graph = &problem.graph;

    // The reverse record is ignored in favour of the cost read first
    assert_eq!(graph.find_edge("A", "D").unwrap().weight, 5);
    assert_eq!(graph.find_edge("B", "D").unwrap().weight, 8);
    assert_eq!(graph.find_edge("B", "A").unwrap().weight, 5);
}

#[test]
fn test_self_loops_kept_when_allowed() {
    let mut definition = create_definition();
    definition.avoid_cycle_same_node = false;

    let problem = Problem::from_definition(&definition, 1.0).unwrap();
    assert_eq!(problem.graph.edge_count(), 7);
    assert_eq!(problem.graph.find_edge("A", "A").unwrap().weight, 1);
}

#[test]
fn test_missing_depot_fails() {
    let mut definition = create_definition();
    definition.depot = None;

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert_eq!(err, ProblemError::MissingDepot);
}

#[test]
fn test_no_vehicles_fails() {
    let mut definition = create_definition();
    definition.vehicles.clear();

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert_eq!(err, ProblemError::NoVehicles);
}

#[test]
fn test_dangling_edge_fails() {
    let mut definition = create_definition();
    definition.costs.push(EdgeCostRecord::new("A", "Z", 1));

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert_eq!(
        err,
        ProblemError::UnknownNode {
            id: "Z".to_string()
        }
    );
}

#[test]
fn test_vehicle_below_minimum_capacity_fails() {
    let mut definition = create_definition();
    definition.vehicles.push(VehicleRecord {
        id: "V2".to_string(),
        capacity: 0,
    });

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert!(matches!(err, ProblemError::InvalidVehicleCapacity { capacity: 0, .. }));
}

#[test]
fn test_infeasible_demand_fails_at_load_time() {
    let mut definition = create_definition();
    definition.customers[1].demand = 6;

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert_eq!(
        err,
        ProblemError::InfeasibleDemand {
            id: "B".to_string(),
            demand: 6,
            max_capacity: 5
        }
    );
    assert!(err.to_string().contains("infeasible demand"));
}

#[test]
fn test_zero_demand_customer_fails() {
    let mut definition = create_definition();
    definition.customers[0].demand = 0;

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert!(matches!(err, ProblemError::InvalidDemand { demand: 0, .. }));
}

#[test]
fn test_incomplete_cost_table_fails() {
    let mut definition = create_definition();
    definition.costs.retain(|c| !(c.from == "B" && c.to == "A"));

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert_eq!(
        err,
        ProblemError::MissingEdge {
            from: "B".to_string(),
            to: "A".to_string()
        }
    );
}

#[test]
fn test_duplicate_node_fails() {
    let mut definition = create_definition();
    definition.customers[1].id = "A".to_string();

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert!(matches!(err, ProblemError::DuplicateNode { .. }));
}

#[test]
fn test_duplicate_vehicle_fails() {
    let matrix = vec![vec![0, 2, 3], vec![2, 0, 4], vec![3, 4, 0]];
    let mut definition = ProblemDefinition::from_matrix("Fleet", &[4, 4], &[4, 8], &matrix);
    definition.vehicles[1].id = definition.vehicles[0].id.clone();

    let err = Problem::from_definition(&definition, 1.0).unwrap_err();
    assert_eq!(
        err,
        ProblemError::DuplicateVehicle {
            id: "V1".to_string()
        }
    );
    assert_eq!(err.to_string(), "duplicate vehicle id 'V1'");
}

#[test]
fn test_definition_round_trips_through_json() {
    let json = r#"{
        "name": "json",
        "depot": { "id": "D" },
        "vehicles": [{ "id": "V1", "capacity": 4 }],
        "customers": [{ "id": "1", "demand": 4 }],
        "costs": [{ "from": "D", "to": "1", "cost": 3 }]
    }"#;
    let definition: ProblemDefinition = serde_json::from_str(json).unwrap();
    assert!(definition.symmetric_distance);
    assert!(definition.avoid_cycle_same_node);

    // The missing reverse cost is mirrored
    let problem = Problem::from_definition(&definition, 1.0).unwrap();
    assert_eq!(problem.graph.find_edge("1", "D").unwrap().weight, 3);
}

#[test]
fn test_weights_from_positions() {
    let mut problem = Problem::from_definition(&create_definition(), 1.0).unwrap();
    problem.graph.correct_weights_from_positions();

    assert_eq!(problem.graph.find_edge("D", "A").unwrap().weight, 5);
    assert_eq!(problem.graph.find_edge("A", "D").unwrap().weight, 5);
    assert_eq!(problem.graph.find_edge("D", "B").unwrap().weight, 8);
    assert_eq!(problem.graph.find_edge("A", "B").unwrap().weight, 5);
}

#[test]
fn test_from_matrix_helper() {
    let matrix = vec![vec![0, 1, 2], vec![1, 0, 3], vec![2, 3, 0]];
    let definition = ProblemDefinition::from_matrix("m", &[1, 2], &[3, 4], &matrix);
    let problem = Problem::from_definition(&definition, 1.0).unwrap();

    assert_eq!(problem.vehicles.len(), 2);
    assert_eq!(problem.max_capacity(), 4);
    assert_eq!(problem.total_demand(), 3);
    assert_eq!(problem.graph.weight(1, 2), 3);
    assert_eq!(problem.graph.depot_weight_sum(), 3.0);
}
