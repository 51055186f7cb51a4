//! Benchmark runner binary for medley-consistent.
//!
//! Run with: cargo run --bin medley-bench --release

use medley_consistent::bench::{
    print_scaling_results, run_benchmark, run_quick_benchmark, scaling_benchmark, BenchConfig,
};
use std::env;
use std::process;

fn print_usage() {
    println!("Medley Consistent Hash Benchmarks");
    println!();
    println!("Usage: medley-bench [command] [options]");
    println!();
    println!("Commands:");
    println!("  quick       Run a quick benchmark with default settings");
    println!("  full        Run a benchmark with the default configuration");
    println!("  scale       Compare 50, 100 and 200 vnodes");
    println!("  csv         Print the scaling benchmark as CSV");
    println!("  custom      Run with custom parameters");
    println!();
    println!("Options for 'custom':");
    println!("  --services N    Number of services (default: 10)");
    println!("  --vnodes N      Tokens per service (default: 200)");
    println!("  --lookups N     Number of lookups (default: 100000)");
    println!("  --algorithm A   Hash algorithm, murmur3 or fnv (default: murmur3)");
    println!();
    println!("Examples:");
    println!("  medley-bench quick");
    println!("  medley-bench scale");
    println!("  medley-bench custom --services 50 --vnodes 100 --algorithm fnv");
}

fn parse_custom_args(args: &[String]) -> BenchConfig {
    let mut config = BenchConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--services" => {
                if i + 1 < args.len() {
                    config.num_services = args[i + 1].parse().unwrap_or(config.num_services);
                    i += 1;
                }
            }
            "--vnodes" => {
                if i + 1 < args.len() {
                    config.vnodes = args[i + 1].parse().unwrap_or(config.vnodes);
                    i += 1;
                }
            }
            "--lookups" => {
                if i + 1 < args.len() {
                    config.num_lookups = args[i + 1].parse().unwrap_or(config.num_lookups);
                    i += 1;
                }
            }
            "--algorithm" => {
                if i + 1 < args.len() {
                    config.algorithm = args[i + 1].clone();
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let outcome = match args[1].as_str() {
        "quick" => {
            println!("Running quick benchmark...");
            run_quick_benchmark().map(|r| r.print_summary())
        }

        "full" => {
            println!("Running full benchmark...");
            run_benchmark(&BenchConfig::default()).map(|r| r.print_summary())
        }

        "scale" => {
            println!("Running scaling benchmark...");
            scaling_benchmark(10, 100_000).map(|results| print_scaling_results(&results))
        }

        "csv" => scaling_benchmark(10, 100_000).map(|results| {
            println!("{}", medley_consistent::bench::BenchResults::csv_header());
            for r in &results {
                println!("{}", r.to_csv_row());
            }
        }),

        "custom" => {
            let config = parse_custom_args(&args[2..]);
            println!("Running custom benchmark...");
            println!(
                "  Services: {}, VNodes: {}, Lookups: {}, Algorithm: {}",
                config.num_services, config.vnodes, config.num_lookups, config.algorithm
            );
            run_benchmark(&config).map(|r| r.print_summary())
        }

        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_usage();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        eprintln!("benchmark failed: {}", err);
        process::exit(1);
    }
}
