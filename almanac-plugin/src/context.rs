//! Evaluation Context

use almanac_core::Zone;

/// Evaluation context passed to plugins
#[derive(Debug, Clone, PartialEq)]
pub struct EvalContext {
    /// Zone used when a call omits one, and for zone-less text read as an instant
    pub default_zone: Zone,
}

impl EvalContext {
    pub fn new() -> Self {
        Self { default_zone: Zone::utc() }
    }

    pub fn with_default_zone(mut self, zone: Zone) -> Self {
        self.default_zone = zone;
        self
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
