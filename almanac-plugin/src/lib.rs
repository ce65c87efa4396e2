//! Almanac Plugin System
//!
//! Every operation is a `FunctionPlugin` with static metadata, looked up by
//! name in a `PluginRegistry` and called with `Value` arguments.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use almanac_core::prelude::*;
}
