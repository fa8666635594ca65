//! Error types for problem loading, configuration and the colony run.

use std::fmt;

/// Errors raised while turning a problem definition into a validated [`Problem`].
///
/// [`Problem`]: crate::problem::Problem
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// The definition carries no depot record.
    MissingDepot,
    /// The definition carries no vehicle records.
    NoVehicles,
    /// Two nodes share the same identifier.
    DuplicateNode { id: String },
    /// Two vehicle records share an identifier.
    DuplicateVehicle { id: String },
    /// An edge cost record references a node that does not exist.
    UnknownNode { id: String },
    /// A vehicle capacity is below the minimum quantity.
    InvalidVehicleCapacity { id: String, capacity: i64 },
    /// A customer demand is below the minimum demand.
    InvalidDemand { id: String, demand: i64 },
    /// No cost was given for an ordered pair of distinct nodes.
    MissingEdge { from: String, to: String },
    /// A customer demands more than the largest vehicle can carry.
    InfeasibleDemand {
        id: String,
        demand: i64,
        max_capacity: i64,
    },
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemError::MissingDepot => write!(f, "problem has no depot"),
            ProblemError::NoVehicles => write!(f, "problem has no vehicles"),
            ProblemError::DuplicateNode { id } => write!(f, "duplicate node id '{}'", id),
            ProblemError::DuplicateVehicle { id } => write!(f, "duplicate vehicle id '{}'", id),
            ProblemError::UnknownNode { id } => {
                write!(f, "edge cost references unknown node '{}'", id)
            }
            ProblemError::InvalidVehicleCapacity { id, capacity } => write!(
                f,
                "vehicle '{}' has capacity {}, minimum is {}",
                id,
                capacity,
                crate::problem::MIN_CAPACITY
            ),
            ProblemError::InvalidDemand { id, demand } => write!(
                f,
                "customer '{}' has demand {}, minimum is {}",
                id,
                demand,
                crate::problem::MIN_DEMAND
            ),
            ProblemError::MissingEdge { from, to } => {
                write!(f, "no travel cost given from '{}' to '{}'", from, to)
            }
            ProblemError::InfeasibleDemand {
                id,
                demand,
                max_capacity,
            } => write!(
                f,
                "infeasible demand: customer '{}' needs {} but the largest vehicle carries {}",
                id, demand, max_capacity
            ),
        }
    }
}

impl std::error::Error for ProblemError {}

/// Errors raised by [`Config::validate`](crate::config::Config::validate).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EvaporationRateOutOfRange(f64),
    ExploitationThresholdOutOfRange(f64),
    NonPositiveInitialPheromone(f64),
    NonPositiveElitistConstant(f64),
    NonFiniteInfluence { name: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EvaporationRateOutOfRange(v) => {
                write!(f, "evaporation rate must be within [0, 1], got {}", v)
            }
            ConfigError::ExploitationThresholdOutOfRange(v) => {
                write!(f, "q0 must be within [0, 1], got {}", v)
            }
            ConfigError::NonPositiveInitialPheromone(v) => {
                write!(f, "initial pheromone must be positive, got {}", v)
            }
            ConfigError::NonPositiveElitistConstant(v) => {
                write!(f, "elitist constant Q must be positive, got {}", v)
            }
            ConfigError::NonFiniteInfluence { name, value } => {
                write!(f, "{} must be finite, got {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by the iteration controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ColonyError {
    Problem(ProblemError),
    Config(ConfigError),
    /// A full construction pass over every ant visited no new customer.
    Stalled { unvisited: Vec<String> },
}

impl fmt::Display for ColonyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColonyError::Problem(e) => write!(f, "invalid problem: {}", e),
            ColonyError::Config(e) => write!(f, "invalid configuration: {}", e),
            ColonyError::Stalled { unvisited } => write!(
                f,
                "route construction stalled with unvisited customers: {}",
                unvisited.join(", ")
            ),
        }
    }
}

impl std::error::Error for ColonyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ColonyError::Problem(e) => Some(e),
            ColonyError::Config(e) => Some(e),
            ColonyError::Stalled { .. } => None,
        }
    }
}

impl From<ProblemError> for ColonyError {
    fn from(e: ProblemError) -> Self {
        ColonyError::Problem(e)
    }
}

impl From<ConfigError> for ColonyError {
    fn from(e: ConfigError) -> Self {
        ColonyError::Config(e)
    }
}
