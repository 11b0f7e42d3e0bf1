//! Serializable backtest configuration.
//!
//! A config file holds a single `[backtest]` table. Missing keys fall back to
//! the defaults (stride 30, 1% profit target, 1% stop loss):
//!
//! ```toml
//! [backtest]
//! stride = 30
//! profit_target = 0.01
//! stop_loss = 0.01
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STRIDE: usize = 30;
pub const DEFAULT_PROFIT_TARGET: f64 = 0.01;
pub const DEFAULT_STOP_LOSS: f64 = 0.01;

/// Invalid configuration. Raised before any simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("stride must be at least 1")]
    InvalidStride,

    #[error("{name} must be a finite fraction greater than zero, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("parse config: {0}")]
    Parse(String),
}

/// Parameters of one simulation run. Constant for the duration of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Only every `stride`-th index is a candidate entry.
    pub stride: usize,
    /// Fractional gain that closes a trade as `profit` (0.01 = 1%).
    pub profit_target: f64,
    /// Fractional loss that closes a trade as `stop_loss` (0.01 = 1%).
    pub stop_loss: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            profit_target: DEFAULT_PROFIT_TARGET,
            stop_loss: DEFAULT_STOP_LOSS,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    backtest: BacktestConfig,
}

impl BacktestConfig {
    pub fn new(stride: usize, profit_target: f64, stop_loss: f64) -> Self {
        Self {
            stride,
            profit_target,
            stop_loss,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stride == 0 {
            return Err(ConfigError::InvalidStride);
        }
        check_threshold("profit_target", self.profit_target)?;
        check_threshold("stop_loss", self.stop_loss)?;
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.backtest.validate()?;
        Ok(file.backtest)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            backtest: self.clone(),
        };
        toml::to_string_pretty(&file).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Deterministic BLAKE3 hash of the config, used to tag run reports.
    pub fn config_hash(&self) -> String {
        use serde_json::json;

        let canonical = json!({
            "profit_target": self.profit_target,
            "stop_loss": self.stop_loss,
            "stride": self.stride,
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}
