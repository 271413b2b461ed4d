//! Tracing bootstrap for host processes and tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a global fmt subscriber filtered by `filter` (e.g. `"info"`,
/// `"vetclinic_core=debug"`).
///
/// A second call is a no-op: the first subscriber stays installed.
/// Returns an error only when `filter` cannot be parsed.
pub fn init_tracing(filter: &str) -> Result<(), String> {
    let env_filter = EnvFilter::try_new(filter)
        .map_err(|e| format!("invalid tracing filter '{}': {}", filter, e))?;

    // try_init fails when a global subscriber already exists
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
    Ok(())
}
