use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pathsearch::runtime::config::load_query_config;
use pathsearch::runtime::logging::init_logging;
use pathsearch::runtime::runner::run_query;

#[derive(Debug, Parser)]
#[command(name = "pathsearch")]
#[command(about = "Run a shortest-path query described by a YAML file")]
struct Args {
    #[arg(long)]
    config: PathBuf,
    #[arg(long, default_value = "INFO")]
    log_level: String,
    #[arg(long)]
    output_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let cfg = load_query_config(&args.config)?;
    let report = run_query(&cfg)?;

    match report.paths.as_slice() {
        [single] if report.target.is_some() => println!(
            "{} {} -> {}: distance {} via {:?}",
            report.algorithm, report.source, single.node, single.distance, single.path
        ),
        _ if report.negative_cycle => println!(
            "{}: negative cycle reachable from {} (nodes {:?})",
            report.algorithm, report.source, report.negative_cycle_nodes
        ),
        paths if report.target.is_none() => println!(
            "{}: {} nodes reached from {}",
            report.algorithm,
            paths.len(),
            report.source
        ),
        _ => println!(
            "{}: no path from {} to {:?}",
            report.algorithm, report.source, report.target
        ),
    }

    if let Some(path) = args.output_json {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_vec_pretty(&report)?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
