//! Configuration parameters for the genetic algorithm.

use crate::error::TspResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration settings for a single optimisation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of tours in every generation
    pub population_size: usize,
    /// Hard cap on the number of generations
    pub max_generations: usize,
    /// Number of identical best distances that ends the run
    pub stagnation_limit: usize,
    /// Apply 2-opt and then 3-opt to the final best tour
    pub use_local_search: bool,
    /// Seed of the random source; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            population_size: 100,
            max_generations: 100,
            stagnation_limit: 5,
            use_local_search: false,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Set the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the maximum number of generations.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Set the stagnation limit.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Enable or disable local search on the final tour.
    pub fn with_local_search(mut self, enabled: bool) -> Self {
        self.use_local_search = enabled;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
