//! Print the ring tokens of a service.

use anyhow::{Context, Result};
use colored::Colorize;
use medley::{get_algorithm, hash_string_to};
use medley_consistent::TokenHasher;

use crate::config::RingConfig;

pub fn run(config: &RingConfig, service: &str) -> Result<()> {
    let algorithm = get_algorithm(&config.algorithm)
        .with_context(|| format!("Invalid ring algorithm {:?}", config.algorithm))?;
    let hasher = TokenHasher::<String>::new(config.vnodes, algorithm, hash_string_to::<String>);
    let mut assigner = hasher.assigner();
    let tokens = hasher.service_tokens(&mut assigner, &service.to_string())?;

    println!(
        "{} ({} tokens, {})",
        service.white().bold(),
        tokens.len(),
        config.algorithm
    );
    for (index, token) in tokens.iter().enumerate() {
        println!("  {:>5}  {}", index.to_string().dimmed(), format!("{:016x}", token).cyan());
    }

    Ok(())
}
