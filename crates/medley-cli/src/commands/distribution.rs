//! Show how a sample of keys spreads across the configured services.

use anyhow::Result;
use colored::Colorize;
use std::collections::HashMap;

use super::build_ring;
use crate::config::RingConfig;

pub fn run(config: &RingConfig, samples: usize) -> Result<()> {
    let ring = build_ring(config)?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for i in 0..samples {
        let service = ring.find_str(&format!("object-{}", i))?;
        *counts.entry(service).or_default() += 1;
    }

    let mut services: Vec<&String> = ring.services().collect();
    services.sort();
    let fair = samples as f64 / services.len().max(1) as f64;

    println!("{}", "Key Distribution".white().bold());
    println!("{}", "═".repeat(48).dimmed());
    println!(
        "  Services: {}, VNodes: {}, Samples: {}",
        services.len().to_string().cyan(),
        ring.vnodes().to_string().cyan(),
        samples.to_string().cyan()
    );
    println!();

    for service in services {
        let count = counts.get(service).copied().unwrap_or(0);
        let share = if fair > 0.0 { count as f64 / fair } else { 0.0 };
        let ratio = format!("{:.2}x", share);
        let ratio = if (0.75..=1.25).contains(&share) {
            ratio.green()
        } else {
            ratio.yellow()
        };
        println!("  {:<32} {:>8}  {}", service, count, ratio);
    }

    println!("{}", "═".repeat(48).dimmed());
    Ok(())
}
