//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global fmt subscriber, filtered from `RUST_LOG` when set and
/// falling back to `default_directive` otherwise.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(
    default_directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
