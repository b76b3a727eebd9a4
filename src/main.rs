//! Command line entry point.
//!
//! ```bash
//! # read ./config, append to ./log and ./stats
//! cpu_disk_sim
//!
//! # five replications with seeds 42..46
//! cpu_disk_sim --config runs/heavy --seed 42 -n 5
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cpu_disk_sim::error::Result;
use cpu_disk_sim::queues::file_logger::open_append;
use cpu_disk_sim::sweep::{replication_seeds, run_logged};
use cpu_disk_sim::LoadedConfig;

/// CPU + two disks queueing network simulator
#[derive(Parser, Debug)]
#[command(name = "cpu_disk_sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file of whitespace separated `OPTION VALUE` pairs
    #[arg(short, long, default_value = "config")]
    config: PathBuf,

    /// Event log, appended to
    #[arg(short, long, default_value = "log")]
    log: PathBuf,

    /// Statistics report, appended to
    #[arg(short, long, default_value = "stats")]
    stats: PathBuf,

    /// Overrides SEED from the config file
    #[arg(long)]
    seed: Option<i64>,

    /// Number of independent runs, seeded SEED, SEED+1, ...
    #[arg(short = 'n', long, default_value = "1")]
    replications: usize,
}

fn run(args: &Args) -> Result<()> {
    let mut loaded = LoadedConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        loaded.override_seed(seed);
    }

    let mut stats_file = open_append(&args.stats)?;
    let seeds: Vec<i64> = replication_seeds(loaded.config.seed, args.replications).collect();
    for (i, seed) in seeds.into_iter().enumerate() {
        if i > 0 {
            loaded.override_seed(seed);
        }
        let log_file = open_append(&args.log)?;
        run_logged(&loaded, log_file, &mut stats_file)?;
    }
    info!(replications = args.replications, log = %args.log.display(), stats = %args.stats.display(), "done");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,cpu_disk_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
