//! CLI command implementations.

pub mod distribution;
pub mod init;
pub mod locate;
pub mod tokens;

use anyhow::{Context, Result};
use medley_consistent::{strings, Ring};
use std::sync::Arc;
use tracing::info;

use crate::config::RingConfig;

/// Build the ring described by the configuration.
pub fn build_ring(config: &RingConfig) -> Result<Arc<Ring<String>>> {
    let algorithm = medley::get_algorithm(&config.algorithm)
        .with_context(|| format!("Invalid ring algorithm {:?}", config.algorithm))?;
    let services = config.require_services()?;

    let ring = strings(services.iter().cloned())
        .vnodes(config.vnodes)
        .algorithm(algorithm)
        .build()
        .context("Failed to build ring")?;

    info!(
        services = ring.len(),
        vnodes = ring.vnodes(),
        algorithm = %config.algorithm,
        "ring ready"
    );
    Ok(ring)
}
