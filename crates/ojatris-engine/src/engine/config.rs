use serde::{Deserialize, Serialize};

use crate::ConfigError;

use super::{
    gravity::GravityConfig,
    piece_generator::{self, PieceGenerator},
};

/// Tunable game parameters.
///
/// Missing fields take their default values when deserialized, unknown fields
/// are rejected.
///
/// # Example
///
/// ```
/// use ojatris_engine::SessionConfig;
///
/// let config: SessionConfig =
///     serde_json::from_str(r#"{ "obstacle_probability": 0.2 }"#).unwrap();
/// assert_eq!(config.obstacle_probability, 0.2);
/// assert_eq!(config.gravity.base_interval_ms, 500);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Chance of each drawn piece being the obstacle block.
    pub obstacle_probability: f64,
    pub gravity: GravityConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SessionConfig {
    pub const DEFAULT: Self = Self {
        obstacle_probability: PieceGenerator::DEFAULT_OBSTACLE_PROBABILITY,
        gravity: GravityConfig::DEFAULT,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        piece_generator::check_obstacle_probability(self.obstacle_probability)?;
        self.gravity.validate()
    }
}
