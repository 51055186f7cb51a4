//! Medley CLI - inspect consistent hash rings from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, RingConfig};

#[derive(Parser)]
#[command(name = "medley")]
#[command(author, version, about = "Medley - consistent hashing service location", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hash algorithm (overrides medley.toml)
    #[arg(short, long, global = true)]
    algorithm: Option<String>,

    /// Tokens per service (overrides medley.toml)
    #[arg(long, global = true)]
    vnodes: Option<usize>,

    /// Comma-separated services (overrides medley.toml)
    #[arg(short, long, global = true, value_delimiter = ',')]
    services: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter medley.toml
    Init {
        /// Directory to write it in (default: current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Find the service each key maps to
    Locate {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,

        /// Use the mutable hash instead of the immutable ring
        #[arg(short, long)]
        mutable: bool,
    },

    /// Print the ring tokens of a service
    Tokens {
        /// Service name
        service: String,
    },

    /// Show how sample keys spread across services
    Distribution {
        /// Number of sample keys
        #[arg(short = 'n', long, default_value = "10000")]
        samples: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path, force } => {
            commands::init::run(path, cli.services.unwrap_or_default(), force)
        }
        Commands::Locate { keys, mutable } => {
            let ring = ring_config(cli.algorithm, cli.vnodes, cli.services)?;
            commands::locate::run(&ring, &keys, mutable)
        }
        Commands::Tokens { service } => {
            let ring = ring_config(cli.algorithm, cli.vnodes, cli.services)?;
            commands::tokens::run(&ring, &service)
        }
        Commands::Distribution { samples } => {
            let ring = ring_config(cli.algorithm, cli.vnodes, cli.services)?;
            commands::distribution::run(&ring, samples)
        }
    }
}

/// The [ring] table of medley.toml with command-line overrides applied.
fn ring_config(
    algorithm: Option<String>,
    vnodes: Option<usize>,
    services: Option<Vec<String>>,
) -> Result<RingConfig> {
    Ok(Config::load()?.ring.with_overrides(algorithm, vnodes, services))
}
