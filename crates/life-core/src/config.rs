//! Configuration types for the simulation.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How neighbor lookups behave at the grid edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Edges connect to the opposite edge
    #[default]
    Toroidal,
    /// Neighbors outside the grid count as dead
    Bounded,
}

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Dead margin placed around imported patterns
    pub padding: usize,
    /// Neighbor lookup behavior at the edges
    pub boundary: BoundaryPolicy,
    /// Largest side length a load or new pattern may produce
    pub max_grid_size: usize,
    /// Chance of a cell starting alive in a randomized pattern (0.0 to 1.0)
    pub random_fill_probability: f64,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            padding: 5,
            boundary: BoundaryPolicy::Toroidal,
            max_grid_size: 4096,
            random_fill_probability: 0.5,
            seed: 0,
        }
    }
}

/// Settings for the stepping driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Pattern file to load at startup
    pub pattern_path: Option<String>,
    /// Side length used when no pattern file is given
    pub default_size: usize,
    /// Fill the default grid randomly instead of leaving it empty
    pub randomize: bool,
    /// Delay between generations (milliseconds)
    pub tick_interval_ms: u64,
    /// Stop after this many generations
    pub max_generations: Option<u64>,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Engine settings
    pub simulation: SimulationConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            pattern_path: None,
            default_size: 64,
            randomize: true,
            tick_interval_ms: 100,
            max_generations: Some(1000),
            log_json: false,
            simulation: SimulationConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Read a JSON config file; missing fields fall back to defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let sim_config = SimulationConfig::default();
        assert_eq!(sim_config.padding, 5);
        assert_eq!(sim_config.boundary, BoundaryPolicy::Toroidal);
        assert_eq!(sim_config.max_grid_size, 4096);

        let driver_config = DriverConfig::default();
        assert_eq!(driver_config.default_size, 64);
        assert_eq!(driver_config.max_generations, Some(1000));
        assert!(driver_config.pattern_path.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "tick_interval_ms": 250, "simulation": { "boundary": "bounded" } }"#;
        let config = DriverConfig::from_json_str(json).unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.default_size, 64);
        assert_eq!(config.simulation.boundary, BoundaryPolicy::Bounded);
        assert_eq!(config.simulation.padding, 5);
    }

    #[test]
    fn test_config_serialization() {
        let config = SimulationConfig {
            seed: 7,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.seed, 7);
        assert_eq!(deserialized.boundary, config.boundary);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = DriverConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
