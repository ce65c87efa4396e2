use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["almanac", "almanac_core", "almanac_plugin", "almanac_std"];

/// Install a stderr subscriber at `level` for the workspace crates.
///
/// `RUST_LOG` overrides `level` if set. Calling this again, or after another
/// subscriber was installed, does nothing.
pub fn init(level: &str) {
    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init("debug");
        init("trace");
        tracing::debug!(target: "almanac", "still logging");
    }
}
