//! Almanac - date/time conversions and calendar arithmetic
//!
//! `Almanac` bundles the standard function registry with an evaluation
//! context. The typed operations are also available directly through
//! `almanac_core::convert` and `almanac_core::calendar`.

mod config;
pub mod logging;

pub use config::AlmanacConfig;

pub use almanac_core::{calendar, convert, pattern};
pub use almanac_core::{AlmanacError, CalendarDate, DateTimeError, DateTimePattern, Instant, LegacyDate};
pub use almanac_core::{LocalDateTime, Value, Zone, ZonedDateTime};
pub use almanac_plugin::{EvalContext, FunctionPlugin, PluginRegistry};
pub use almanac_std::standard_registry;

use std::sync::Arc;
use tracing::info;

/// Main Almanac engine
pub struct Almanac {
    registry: Arc<PluginRegistry>,
    ctx: EvalContext,
}

impl Almanac {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            ctx: EvalContext::new(),
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(almanac_std::standard_registry())
    }

    pub fn with_default_zone(mut self, zone: Zone) -> Self {
        self.ctx = self.ctx.with_default_zone(zone);
        self
    }

    /// Standard library with the configured default zone.
    ///
    /// Logging is not initialized here; call `logging::init(&config.log_level)`.
    pub fn from_config(config: &AlmanacConfig) -> Result<Self, AlmanacError> {
        let zone = config.zone()?;
        info!(default_zone = %zone, "almanac configured");
        Ok(Self::with_standard_library().with_default_zone(zone))
    }

    /// Call a function by name; failures come back as `Value::Error`
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        self.registry.call_function(name, args, &self.ctx)
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }

    pub fn catalog(&self) -> serde_json::Value {
        self.registry.catalog()
    }

    pub fn default_zone(&self) -> Zone {
        self.ctx.default_zone
    }

    pub fn registry(&self) -> Arc<PluginRegistry> {
        self.registry.clone()
    }
}

impl Default for Almanac {
    fn default() -> Self {
        Self::with_standard_library()
    }
}
