//! Write a starter medley.toml.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, RingConfig, CONFIG_FILE};

pub fn run(path: Option<String>, services: Vec<String>, force: bool) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let config_path = base_path.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "{} already exists; pass {} to overwrite it",
            config_path.display(),
            "--force".cyan()
        );
    }

    let config = Config {
        ring: RingConfig {
            services,
            ..RingConfig::default()
        },
    };
    config.save(&config_path)?;
    println!("  {} Created {}", "✓".green(), config_path.display());

    println!();
    println!("Next steps:");
    println!("  {} edit the [ring] services in {}", "1.".blue(), CONFIG_FILE);
    println!("  {} medley locate <key>", "2.".blue());
    println!("  {} medley distribution", "3.".blue());

    Ok(())
}
