use std::io::Write;

use tracing::info;

use crate::config::{Config, LoadedConfig};
use crate::error::{Error, Result};
use crate::queues::file_logger::{write_stats, FileLogger};
use crate::queues::queueing_network::QNet;
use crate::stats::Statistics;

const LOG_BUFFER: usize = 1024;

/// Seeds of 'replications' independent runs starting from 'seed'.
pub fn replication_seeds (seed: i64, replications: usize) -> impl Iterator<Item = i64> {
    (0..replications as i64).map(move |i| seed.wrapping_add(i))
}

/// Runs one simulation, appending its event log to 'log' and its report to 'stats'.
pub fn run_logged<L: Write, S: Write> (loaded: &LoadedConfig, log: L, stats: &mut S) -> Result<Statistics>
{
    let config = &loaded.config;
    info!(seed = config.seed, init_time = config.init_time, fin_time = config.fin_time, "starting simulation");

    let mut net = QNet::new(config)?;
    let mut logger = FileLogger::new(LOG_BUFFER, log);
    logger.write_header(&loaded.entries)?;

    let result = net.run(|t| logger.record(t).map_err(Error::from))?.clone();
    logger.finish()?;

    write_stats(stats, &loaded.entries, &result)?;
    info!(cpu_completed = result.cpu.completed,
          disk1_completed = result.disk1.completed,
          disk2_completed = result.disk2.completed,
          quits = result.quits,
          "simulation finished");
    Ok(result)
}

/// Runs independent replications with consecutive seeds, no files involved.
/// Every run owns its engine and generator.
pub fn replicate (config: &Config, replications: usize) -> Result<Vec<Statistics>>
{
    replication_seeds(config.seed, replications).map(|seed| -> Result<Statistics> {
        let mut config = config.clone();
        config.seed = seed;
        let mut net = QNet::new(&config)?;
        let stats = net.run_to_end()?.clone();
        Ok(stats)
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> Config {
        let mut config = Config::default();
        config.fin_time = 2000;
        config
    }

    #[test]
    fn seeds_are_consecutive() {
        assert_eq!(replication_seeds(10, 3).collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(replication_seeds(10, 0).count(), 0);
    }

    #[test]
    fn replications_are_independent_and_reproducible() {
        let config = short_config();
        let first = replicate(&config, 3).unwrap();
        let again = replicate(&config, 3).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, again);

        let mut single = config.clone();
        single.seed += 2;
        assert_eq!(replicate(&single, 1).unwrap()[0], first[2]);
    }

    #[test]
    fn logged_run_matches_silent_run() {
        let loaded = LoadedConfig { config: short_config(), entries: vec![("FIN_TIME".to_owned(), "2000".to_owned())] };
        let mut log = Vec::new();
        let mut stats = Vec::new();
        let logged = run_logged(&loaded, &mut log, &mut stats).unwrap();
        assert_eq!(logged, replicate(&loaded.config, 1).unwrap()[0]);

        let log = String::from_utf8(log).unwrap();
        assert!(log.starts_with("STARTING NEW SIMULATION\n~~~~~~~~~~~~~~~~~~~~~~~\nFIN_TIME = 2000\n\n0: Job1 arrives\n"));
        assert!(log.ends_with("2000: Simulation Finished\n\n\n\n"));
        let stats = String::from_utf8(stats).unwrap();
        assert!(stats.contains(&format!("CPU max queue size = {}\n", logged.cpu.max_len)));
    }

    #[test]
    fn invalid_config_is_reported_before_running() {
        let mut config = short_config();
        config.arrive_max = 0;
        let loaded = LoadedConfig { config, entries: Vec::new() };
        let mut stats = Vec::new();
        assert!(matches!(run_logged(&loaded, Vec::new(), &mut stats), Err(Error::Config(_))));
        assert!(stats.is_empty());
    }
}
