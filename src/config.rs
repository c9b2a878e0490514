use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::advisor::HeuristicWeights;
use crate::engine::{Spawner, TWO_PROBABILITY};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("spawn.two_probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("heuristic weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Game configuration, loadable from TOML.
///
/// Every field has a default, so an empty file is a valid config:
///
/// ```toml
/// [spawn]
/// two_probability = 0.9
///
/// [heuristic]
/// empty = 10.0
/// monotonicity = 4.0
/// corner = 1.0
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub spawn: SpawnConfig,
    pub heuristic: HeuristicWeights,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Probability that a new tile is a 2 rather than a 4.
    pub two_probability: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self { Self { two_probability: TWO_PROBABILITY } }
}

impl SpawnConfig {
    pub fn spawner(&self) -> Result<Spawner, ConfigError> {
        Spawner::new(self.two_probability).ok_or(ConfigError::InvalidProbability(self.two_probability))
    }
}

impl GameConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn.spawner()?;
        let w = &self.heuristic;
        for (name, value) in [("empty", w.empty), ("monotonicity", w.monotonicity), ("corner", w.corner)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}
