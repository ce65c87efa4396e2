//! Facade configuration

use almanac_core::{AlmanacError, Zone};
use serde::Deserialize;

/// Top-level Almanac configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlmanacConfig {
    /// Zone used when a call omits one.
    #[serde(default = "default_zone")]
    pub default_zone: String,

    /// `warn`, `info`, `debug` or `trace`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_zone() -> String {
    "UTC".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: [&str; 4] = ["warn", "info", "debug", "trace"];

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            default_zone: default_zone(),
            log_level: default_log_level(),
        }
    }
}

impl AlmanacConfig {
    /// Parse and validate a JSON document; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, AlmanacError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AlmanacError::config_error(format!("invalid configuration: {}", e)))?;
        config.zone()?;
        if !LOG_LEVELS.contains(&config.log_level.as_str()) {
            return Err(AlmanacError::config_error(format!("unknown log_level '{}'", config.log_level))
                .with_suggestion("Use one of warn, info, debug, trace"));
        }
        Ok(config)
    }

    /// The resolved default zone
    pub fn zone(&self) -> Result<Zone, AlmanacError> {
        Zone::from_short_id(&self.default_zone).map_err(|e| {
            AlmanacError::config_error(format!("invalid default_zone '{}': {}", self.default_zone, e))
        })
    }
}
