//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Initialize the global tracing subscriber
///
/// JSON lines outside `dev`, compact text in `dev`. `RUST_LOG` is not read;
/// the filter comes from `service.log_level`. Calling this again after a
/// subscriber is installed is a no-op.
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = config.service.log_level.clone();
    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.service.is_dev() {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    };

    match installed {
        Ok(()) => {
            tracing::info!(
                environment = %config.service.environment,
                "Tracing initialized for service: {}", config.service.name
            );
        }
        Err(e) => {
            tracing::debug!("Tracing subscriber already installed: {}", e);
        }
    }

    Ok(())
}
