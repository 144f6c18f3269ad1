use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::automaton::CoolingParams;
use crate::error::ConfigError;

/// Tunable monitor settings: defaults, then an optional TOML file, then
/// `VIGIL_`-prefixed environment variables, each layer overriding the last.
/// Invalid values fail the load; nothing is silently clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub cooling: CoolingParams,
    pub response_limit: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            cooling: CoolingParams::default(),
            response_limit: 5,
        }
    }
}

impl MonitorConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults =
            Config::try_from(&MonitorConfig::default()).map_err(|e| ConfigError::Load(e.to_string()))?;
        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let cfg: MonitorConfig = builder
            .add_source(Environment::with_prefix("VIGIL").separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cooling.validate()?;
        if self.response_limit == 0 {
            return Err(ConfigError::ZeroDeadline);
        }
        Ok(())
    }

    /// Default configuration rendered as TOML, for `--dump-config` style
    /// bootstrapping.
    pub fn template() -> String {
        toml::to_string_pretty(&MonitorConfig::default())
            .expect("default configuration serialises to TOML")
    }
}
