//! Tracing subscriber setup for hosts embedding the core.

use tracing_subscriber::EnvFilter;

/// Environment variable read for the log filter.
pub const LOG_ENV: &str = "DAYPLANNER_LOG";

/// Install a formatted subscriber filtered by `DAYPLANNER_LOG`, falling back
/// to `default_filter`. Returns `false` if a global subscriber already exists.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
