//! Almanac Standard Library

pub mod functions;

use almanac_plugin::PluginRegistry;

/// Load standard library into registry
pub fn load_standard_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversions
        .with_function(functions::ToInstant)
        .with_function(functions::ToLocalDateTime)
        .with_function(functions::ToZonedDateTime)
        .with_function(functions::ToDate)
        .with_function(functions::ToDuration)
        .with_function(functions::Format)
        .with_function(functions::ParseCalendarDate)
        .with_function(functions::ZoneFn)
        // Calendar arithmetic
        .with_function(functions::FirstDay)
        .with_function(functions::LastDay)
        .with_function(functions::NthDayOfWeekIn)
        .with_function(functions::PresidentialElectionDayUsa)
        .with_function(functions::NDaysAfter)
}

/// Create registry with standard library
pub fn standard_registry() -> PluginRegistry {
    load_standard_library(PluginRegistry::new())
}
