//! chronet CLI - causal path statistics from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show network statistics
//! chronet stats edges.csv
//!
//! # Exhaustive causal path extraction at delta = 2
//! chronet paths edges.csv --delta 2
//!
//! # Estimate via root sampling (seeded, reproducible)
//! chronet sample edges.csv --delta 30 --size 1000 --seed 42
//!
//! # Compress 20-second sampling intervals into unit time steps
//! chronet rescale edges.csv --factor 20 -o coarse.csv
//! ```
//!
//! Input is a headerless CSV of `source,target,time` rows. The time
//! column is an integer epoch, or a date/time string parsed with
//! `--timestamp-format`.

use anyhow::{bail, Context, Result};
use chronet_core::{
    extract_paths, sample_paths, ExtractOptions, PathStatistics, TemporalNetwork,
};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "chronet")]
#[command(about = "Causal path statistics for temporal networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Format for parsing non-integer time columns
    #[arg(long, global = true, default_value = chronet_core::DEFAULT_TIMESTAMP_FORMAT)]
    timestamp_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics about a temporal network
    Stats {
        /// Input file (source,target,time CSV)
        input: PathBuf,
    },

    /// Exhaustively extract causal path statistics
    Paths {
        /// Input file (source,target,time CSV)
        input: PathBuf,

        /// Maximum time difference between consecutive edges
        #[arg(short, long)]
        delta: i64,

        /// Abort after visiting this many unfolded nodes
        #[arg(long)]
        max_visits: Option<usize>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Estimate causal path statistics by sampling DAG roots
    Sample {
        /// Input file (source,target,time CSV)
        input: PathBuf,

        /// Maximum time difference between consecutive edges
        #[arg(short, long)]
        delta: i64,

        /// Number of roots to sample
        #[arg(short = 'k', long)]
        size: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rescale timestamps by an integer factor
    Rescale {
        /// Input file (source,target,time CSV)
        input: PathBuf,

        /// Divisor applied to every timestamp (rounded to nearest)
        #[arg(short, long)]
        factor: i64,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input } => {
            let net = load_network(&input, &cli.timestamp_format)?;
            println!("{}", net.stats());
        }

        Commands::Paths {
            input,
            delta,
            max_visits,
            json,
        } => {
            let net = load_network(&input, &cli.timestamp_format)?;
            let options = ExtractOptions {
                max_visits,
                ..Default::default()
            };

            let start = Instant::now();
            let spinner = ProgressBar::new_spinner();
            spinner.set_message(format!("extracting causal paths (delta = {delta})"));
            let stats = extract_paths(&net, delta, &options)
                .context("causal path extraction failed")?;
            spinner.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&path_report(&stats, &net))?);
            } else {
                print_paths(&stats, &net);
                eprintln!("Extracted in {:.2?}", start.elapsed());
            }
        }

        Commands::Sample {
            input,
            delta,
            size,
            seed,
            json,
        } => {
            let net = load_network(&input, &cli.timestamp_format)?;

            let start = Instant::now();
            let sampled = sample_paths(&net, delta, size, seed)?;

            if json {
                let mut report = path_report(&sampled.stats, &net);
                report["sampling"] = serde_json::json!({
                    "requested": sampled.requested,
                    "realized": sampled.realized,
                    "total_roots": sampled.total_roots,
                    "scale": sampled.scale(),
                    "seed": seed,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Sampled {} of {} roots (requested {}, scale {:.3})",
                    sampled.realized,
                    sampled.total_roots,
                    sampled.requested,
                    sampled.scale()
                );
                print_paths(&sampled.stats, &net);
                eprintln!("Sampled in {:.2?}", start.elapsed());
            }
        }

        Commands::Rescale {
            input,
            factor,
            output,
        } => {
            let net = load_network(&input, &cli.timestamp_format)?;
            if !net.is_multiple_of(factor) {
                eprintln!(
                    "warning: timestamps are not exact multiples of {factor}; \
                     rescaling is a lossy approximation"
                );
            }
            let coarse = net.rescale(factor)?;
            write_network(&coarse, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Rescaled {} edges by factor {factor} -> {}",
                coarse.num_edges(),
                output.display()
            );
        }
    }

    Ok(())
}

/// Load a `source,target,time` CSV into a temporal network.
fn load_network(path: &Path, timestamp_format: &str) -> Result<TemporalNetwork> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut net = TemporalNetwork::new().with_timestamp_format(timestamp_format);

    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("bad CSV record at row {}", row + 1))?;
        if record.len() < 3 {
            bail!(
                "row {}: expected source,target,time, got {} column(s)",
                row + 1,
                record.len()
            );
        }

        let (src, dst, time) = (&record[0], &record[1], &record[2]);
        let added = match time.parse::<i64>() {
            Ok(epoch) => net.add_edge(src, dst, epoch),
            Err(_) => net.add_edge(src, dst, time),
        };
        added.with_context(|| format!("row {}", row + 1))?;
    }

    Ok(net)
}

/// Write a network back out as `source,target,time` CSV, time-ordered.
fn write_network(net: &TemporalNetwork, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    for edge in net.edges_ordered() {
        writeln!(
            file,
            "{},{},{}",
            net.node_name(edge.src).unwrap_or("?"),
            net.node_name(edge.dst).unwrap_or("?"),
            edge.time
        )?;
    }
    Ok(())
}

/// Print a path table: summary first, then one row per observed path.
fn print_paths(stats: &PathStatistics, net: &TemporalNetwork) {
    println!("{}", stats.summary());
    println!("\nPath (longest / contained):");
    for (path, count) in stats.labelled(net) {
        println!(
            "  {}: {} / {}",
            path.join(" -> "),
            count.as_longest,
            count.as_sub
        );
    }
}

/// JSON report shared by `paths` and `sample`.
fn path_report(stats: &PathStatistics, net: &TemporalNetwork) -> serde_json::Value {
    let paths: Vec<serde_json::Value> = stats
        .labelled(net)
        .into_iter()
        .map(|(path, count)| {
            serde_json::json!({
                "path": path,
                "as_longest": count.as_longest,
                "as_sub": count.as_sub,
            })
        })
        .collect();

    let summary = stats.summary();
    serde_json::json!({
        "summary": {
            "distinct_paths": summary.distinct_paths,
            "nodes": summary.nodes,
            "edges": summary.edges,
            "total_observations": summary.total_observations,
        },
        "paths": paths,
    })
}
