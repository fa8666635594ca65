//! Run parameters for the ant colony.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration settings for an ACO run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of construct/improve/update iterations
    pub iterations: usize,
    /// Evaporation rate (ρ)
    pub evaporation_rate: f64,
    /// Pheromone influence (α), only used by the improved rule
    pub pheromone_influence: f64,
    /// Visibility influence (β)
    pub visibility_influence: f64,
    /// Exploitation threshold (q0) of the classic rule
    pub q0: f64,
    /// Elitist scaling constant (Q) of the improved update
    pub elitist_constant: f64,
    /// Pheromone every edge starts with
    pub initial_pheromone: f64,
    /// Use the improved selection rule and the bounded elitist update
    pub improved: bool,
    /// Apply the inter-route mutation step
    pub mutation_enabled: bool,
    /// Seed for the random stream; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            iterations: 10,
            evaporation_rate: 0.2,
            pheromone_influence: 0.2,
            visibility_influence: 10.0,
            q0: 0.1,
            elitist_constant: 1.0,
            initial_pheromone: 0.001,
            improved: false,
            mutation_enabled: true,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the evaporation rate (ρ).
    pub fn with_evaporation_rate(mut self, rho: f64) -> Self {
        self.evaporation_rate = rho;
        self
    }

    /// Set the pheromone influence (α).
    pub fn with_pheromone_influence(mut self, alpha: f64) -> Self {
        self.pheromone_influence = alpha;
        self
    }

    /// Set the visibility influence (β).
    pub fn with_visibility_influence(mut self, beta: f64) -> Self {
        self.visibility_influence = beta;
        self
    }

    /// Set the exploitation threshold (q0).
    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    /// Set the elitist scaling constant (Q).
    pub fn with_elitist_constant(mut self, q: f64) -> Self {
        self.elitist_constant = q;
        self
    }

    /// Set the initial pheromone value.
    pub fn with_initial_pheromone(mut self, tau0: f64) -> Self {
        self.initial_pheromone = tau0;
        self
    }

    /// Switch between the classic and the improved ACO variant.
    pub fn with_improved(mut self, improved: bool) -> Self {
        self.improved = improved;
        self
    }

    /// Enable or disable the mutation step.
    pub fn with_mutation(mut self, enabled: bool) -> Self {
        self.mutation_enabled = enabled;
        self
    }

    /// Fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every parameter lies in its admissible range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.evaporation_rate) {
            return Err(ConfigError::EvaporationRateOutOfRange(
                self.evaporation_rate,
            ));
        }
        if !(0.0..=1.0).contains(&self.q0) {
            return Err(ConfigError::ExploitationThresholdOutOfRange(self.q0));
        }
        if !(self.initial_pheromone > 0.0) || !self.initial_pheromone.is_finite() {
            return Err(ConfigError::NonPositiveInitialPheromone(
                self.initial_pheromone,
            ));
        }
        if !(self.elitist_constant > 0.0) || !self.elitist_constant.is_finite() {
            return Err(ConfigError::NonPositiveElitistConstant(
                self.elitist_constant,
            ));
        }
        if !self.pheromone_influence.is_finite() {
            return Err(ConfigError::NonFiniteInfluence {
                name: "pheromone influence",
                value: self.pheromone_influence,
            });
        }
        if !self.visibility_influence.is_finite() {
            return Err(ConfigError::NonFiniteInfluence {
                name: "visibility influence",
                value: self.visibility_influence,
            });
        }
        Ok(())
    }
}
