//! Cache controller simulator CLI.
//!
//! This binary drives the cache model from a request trace. It performs:
//! 1. **Configuration:** Built-in defaults, or a JSON file matching `cachesim_core::config::Config`.
//! 2. **Trace run:** Services every trace operation through the cache, printing read responses.
//! 3. **Reporting:** Prints the selected statistics sections on completion.

use clap::{Parser, Subcommand};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use cachesim_core::config::Config;
use cachesim_core::sim::{Simulator, TraceOp, load_trace};
use cachesim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Set-associative cache controller simulator",
    long_about = "Run a request trace through a cycle-stepped cache controller.\n\nTrace lines are `r <addr>`, `w <addr> <data>` or `p <addr> <data>` (preload).\n\nExamples:\n  cachesim run --trace traces/example.txt\n  cachesim run --trace traces/wb_evict.txt --config traces/wb.json --stats requests --stats memory"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a request trace.
    Run {
        /// Trace file to execute.
        #[arg(short, long)]
        trace: String,

        /// JSON configuration (defaults when omitted).
        #[arg(short, long)]
        config: Option<String>,

        /// Statistics sections to print (summary, requests, memory). All when omitted.
        #[arg(long)]
        stats: Vec<String>,

        /// Log controller activity (overridden by `RUST_LOG`).
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace,
            config,
            stats,
            verbose,
        } => {
            init_logging(verbose);
            cmd_run(&trace, config.as_deref(), &stats);
        }
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "info,cachesim_core=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the configuration, runs the trace and prints the statistics.
///
/// Exits with code 1 on a configuration, trace or request error.
fn cmd_run(trace_path: &str, config_path: Option<&str>, sections: &[String]) {
    if let Some(bad) = sections
        .iter()
        .find(|s| !STATS_SECTIONS.contains(&s.as_str()))
    {
        eprintln!(
            "Error: unknown stats section `{}` (expected one of {})",
            bad,
            STATS_SECTIONS.join(", ")
        );
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config {}: {}", path, e);
                process::exit(1);
            });
            Config::from_json(&text).unwrap_or_else(|e| {
                eprintln!("Error in config {}: {}", path, e);
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("Error: invalid configuration: {}", e);
        process::exit(1);
    });

    let ops = load_trace(trace_path).unwrap_or_else(|e| {
        eprintln!("Error loading trace {}: {}", trace_path, e);
        process::exit(1);
    });

    tracing::info!(trace = trace_path, ops = ops.len(), "trace loaded");

    let geometry = *sim.system.controller.geometry();
    println!(
        "[*] {} sets x {} ways, {:?}, {} trace operations",
        geometry.num_sets,
        geometry.num_ways,
        geometry.write_policy,
        ops.len()
    );

    for (index, op) in ops.iter().enumerate() {
        let result = match *op {
            TraceOp::Preload { address, data } => {
                sim.preload(address, data);
                continue;
            }
            TraceOp::Read { address } => sim.read(address),
            TraceOp::Write { address, data } => sim.write(address, data),
        };
        match result {
            Ok(done) => {
                if let (TraceOp::Read { address }, Some(data)) = (op, done.read_data) {
                    println!(
                        "  r {:#06x} -> {:#x} ({}, {} cycles)",
                        address,
                        data,
                        if done.hit { "hit" } else { "miss" },
                        done.cycles
                    );
                }
            }
            Err(e) => {
                eprintln!("\n[!] Operation {} ({:?}) rejected: {}", index + 1, op, e);
                sim.stats().print_sections(sections);
                process::exit(1);
            }
        }
    }

    sim.stats().print_sections(sections);
}
