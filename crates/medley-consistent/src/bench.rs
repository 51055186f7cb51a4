//! Benchmarking utilities for the hash rings.
//!
//! Measures ring construction, incremental updates and lookups for both the
//! immutable [`Ring`] and the mutable [`ConsistentHash`], along with how
//! evenly lookups spread across services.

use crate::builder::strings;
use crate::hash::{Config, ConsistentHash};
use crate::ring::Ring;
use medley::{get_algorithm, Node, Result, ALGORITHM_MURMUR3};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Configuration for benchmark runs.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of services on the ring.
    pub num_services: usize,
    /// Tokens per service.
    pub vnodes: usize,
    /// Number of lookups to time.
    pub num_lookups: usize,
    /// Registry name of the hash algorithm.
    pub algorithm: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            num_services: 10,
            vnodes: 200,
            num_lookups: 100_000,
            algorithm: ALGORITHM_MURMUR3.to_string(),
        }
    }
}

impl BenchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(mut self, num_services: usize) -> Self {
        self.num_services = num_services;
        self
    }

    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.vnodes = vnodes;
        self
    }

    pub fn with_lookups(mut self, num_lookups: usize) -> Self {
        self.num_lookups = num_lookups;
        self
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }
}

/// Results from a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchResults {
    /// Time to build the immutable ring from scratch.
    pub build_time: Duration,
    /// Time to update the ring with one extra service.
    pub update_time: Duration,
    /// Time to run every lookup against the ring.
    pub ring_lookup_time: Duration,
    /// Time to populate the mutable hash.
    pub hash_add_time: Duration,
    /// Time to run every lookup against the mutable hash.
    pub hash_lookup_time: Duration,
    /// Time to remove half the nodes from the mutable hash.
    pub hash_remove_time: Duration,
    /// Ring lookups per second.
    pub lookups_per_second: f64,
    /// Smallest share of lookups any service got, relative to a fair share.
    pub min_share: f64,
    /// Largest share of lookups any service got, relative to a fair share.
    pub max_share: f64,
    pub num_services: usize,
    pub vnodes: usize,
    pub num_lookups: usize,
}

impl BenchResults {
    /// Print a formatted summary.
    pub fn print_summary(&self) {
        println!("\n=== Consistent Hash Benchmark Results ===\n");
        println!("Configuration:");
        println!(
            "  Services: {}, VNodes: {}, Lookups: {}",
            self.num_services, self.vnodes, self.num_lookups
        );
        println!();
        println!("Ring:");
        println!("  Build time:    {:?}", self.build_time);
        println!("  Update time:   {:?}", self.update_time);
        println!(
            "  Lookup time:   {:?} ({:.0} lookups/sec)",
            self.ring_lookup_time, self.lookups_per_second
        );
        println!();
        println!("Mutable hash:");
        println!("  Add time:      {:?}", self.hash_add_time);
        println!("  Lookup time:   {:?}", self.hash_lookup_time);
        println!("  Remove time:   {:?}", self.hash_remove_time);
        println!();
        println!(
            "Distribution: {:.2}x .. {:.2}x of a fair share",
            self.min_share, self.max_share
        );
    }

    /// Return results as a CSV row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{:.0},{:.3},{:.3}",
            self.num_services,
            self.vnodes,
            self.num_lookups,
            self.build_time.as_micros(),
            self.update_time.as_micros(),
            self.lookups_per_second,
            self.min_share,
            self.max_share
        )
    }

    pub fn csv_header() -> &'static str {
        "services,vnodes,lookups,build_us,update_us,lookups_per_sec,min_share,max_share"
    }
}

/// Service names used by the benchmarks.
pub fn generate_services(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("service{}.example.net", i))
        .collect()
}

/// Run one benchmark. Fails if the algorithm is unknown or there are no
/// services.
pub fn run_benchmark(config: &BenchConfig) -> Result<BenchResults> {
    let algorithm = get_algorithm(&config.algorithm)?;
    let services = generate_services(config.num_services);
    let keys: Vec<String> = (0..config.num_lookups)
        .map(|i| format!("object-{}", i))
        .collect();

    let build_start = Instant::now();
    let ring = strings(services.clone())
        .vnodes(config.vnodes)
        .algorithm(algorithm)
        .build()?;
    let build_time = build_start.elapsed();

    let mut grown = services.clone();
    grown.push("extra.example.net".to_string());
    let update_start = Instant::now();
    let _ = Ring::update(&ring, &grown)?;
    let update_time = update_start.elapsed();

    let mut counts: HashMap<String, usize> = HashMap::with_capacity(services.len());
    let lookup_start = Instant::now();
    for key in &keys {
        let service = ring.find_str(key)?;
        *counts.entry(service).or_default() += 1;
    }
    let ring_lookup_time = lookup_start.elapsed();

    let hash = ConsistentHash::new(
        Config::new()
            .with_algorithm(config.algorithm.clone())
            .with_vnodes(config.vnodes),
    )?;
    let mut nodes: Vec<Node> = services.iter().map(|s| Node::from(s.as_str())).collect();
    let add_start = Instant::now();
    hash.add(&mut nodes);
    let hash_add_time = add_start.elapsed();

    let lookup_start = Instant::now();
    for key in &keys {
        hash.get(key.as_str())?;
    }
    let hash_lookup_time = lookup_start.elapsed();

    let half = nodes.len() / 2;
    let remove_start = Instant::now();
    hash.remove(&mut nodes[..half]);
    let hash_remove_time = remove_start.elapsed();

    let fair = config.num_lookups as f64 / config.num_services.max(1) as f64;
    let shares = services
        .iter()
        .map(|s| counts.get(s).copied().unwrap_or(0) as f64 / fair);
    let (min_share, max_share) = shares.fold((f64::MAX, 0.0f64), |(lo, hi), share| {
        (lo.min(share), hi.max(share))
    });

    Ok(BenchResults {
        build_time,
        update_time,
        ring_lookup_time,
        hash_add_time,
        hash_lookup_time,
        hash_remove_time,
        lookups_per_second: config.num_lookups as f64 / ring_lookup_time.as_secs_f64(),
        min_share: if services.is_empty() { 0.0 } else { min_share },
        max_share,
        num_services: config.num_services,
        vnodes: config.vnodes,
        num_lookups: config.num_lookups,
    })
}

/// Run a quick benchmark with minimal parameters.
pub fn run_quick_benchmark() -> Result<BenchResults> {
    run_benchmark(&BenchConfig {
        num_services: 3,
        vnodes: 50,
        num_lookups: 1_000,
        ..Default::default()
    })
}

/// Run the same workload at 50, 100 and 200 vnodes.
pub fn scaling_benchmark(num_services: usize, num_lookups: usize) -> Result<Vec<BenchResults>> {
    [50, 100, 200]
        .into_iter()
        .map(|vnodes| {
            run_benchmark(&BenchConfig {
                num_services,
                vnodes,
                num_lookups,
                ..Default::default()
            })
        })
        .collect()
}

/// Print scaling results as a table.
pub fn print_scaling_results(results: &[BenchResults]) {
    println!("\n=== Scaling Results ===\n");
    println!(
        "| {:>6} | {:>10} | {:>10} | {:>14} | {:>9} | {:>9} |",
        "VNodes", "Build", "Update", "Lookups/sec", "Min share", "Max share"
    );
    println!("|--------|------------|------------|----------------|-----------|-----------|");
    for r in results {
        println!(
            "| {:>6} | {:>10.2?} | {:>10.2?} | {:>14.0} | {:>9.2} | {:>9.2} |",
            r.vnodes, r.build_time, r.update_time, r.lookups_per_second, r.min_share, r.max_share
        );
    }
}
