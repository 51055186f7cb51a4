//! Find the service each key maps to.

use anyhow::{Context, Result};
use colored::Colorize;
use medley::Node;
use medley_consistent::ConsistentHash;

use super::build_ring;
use crate::config::RingConfig;

/// Locate keys on the immutable ring, or on the mutable hash when `mutable`
/// is set. Both place keys identically.
pub fn run(config: &RingConfig, keys: &[String], mutable: bool) -> Result<()> {
    if mutable {
        let hash = ConsistentHash::new(config.hash_config())
            .context("Failed to create consistent hash")?;
        let mut nodes: Vec<Node> = config
            .require_services()?
            .iter()
            .map(|s| Node::from(s.as_str()))
            .collect();
        hash.add(&mut nodes);

        for key in keys {
            let node = hash.get(key.as_str())?;
            print_location(key, node.as_str());
        }
    } else {
        let ring = build_ring(config)?;
        for key in keys {
            let service = ring.find_str(key)?;
            print_location(key, &service);
        }
    }

    Ok(())
}

fn print_location(key: &str, service: &str) {
    println!("{} {} {}", key.white().bold(), "→".dimmed(), service.green());
}
