use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::queues::request::Time;

#[derive(Debug,thiserror::Error)]
pub enum ConfigError {
    #[error("config file {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("could not read config file {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid value {value:?} for {option}")]
    InvalidValue { option: String, value: String },
    #[error("{lower} must be less than {upper}")]
    InvertedBounds { lower: &'static str, upper: &'static str },
    #[error("QUIT_PROB must be >= 0 and <= 1, got {0}")]
    QuitProbability(f64),
    #[error("{option} must not be negative")]
    NegativeDelay { option: &'static str },
    #[error("FIN_TIME plus the longest delay is out of the time range counted from INIT_TIME")]
    TimeOverflow,
}

/// Parameters of one simulation run. Times are in simulation ticks.
#[derive(Debug,Clone,PartialEq)]
pub struct Config {
    /// Seed of the run's random generator.
    pub seed: i64,
    /// Time of the first arrival.
    pub init_time: Time,
    /// Time of the simulation end event.
    pub fin_time: Time,
    /// Inter-arrival delay is drawn from [arrive_min, arrive_max).
    pub arrive_min: Time,
    pub arrive_max: Time,
    /// Probability that a job leaves the network after CPU service.
    pub quit_prob: f64,
    pub cpu_min: Time,
    pub cpu_max: Time,
    pub disk1_min: Time,
    pub disk1_max: Time,
    pub disk2_min: Time,
    pub disk2_max: Time,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: 1234,
            init_time: 0,
            fin_time: 10000,
            arrive_min: 1,
            arrive_max: 7,
            quit_prob: 0.2,
            cpu_min: 1,
            cpu_max: 5,
            disk1_min: 50,
            disk1_max: 500,
            disk2_min: 50,
            disk2_max: 500,
        }
    }
}

impl Config {
    /// Checks every constraint, reporting the first one violated.
    pub fn validate (&self) -> Result<(), ConfigError> {
        check_bounds(self.init_time, self.fin_time, "INIT_TIME", "FIN_TIME")?;
        check_delay(self.arrive_min, self.arrive_max, "ARRIVE_MIN", "ARRIVE_MAX")?;

        if !(0. ..=1.).contains(&self.quit_prob) {
            return Err(ConfigError::QuitProbability(self.quit_prob));
        }

        check_delay(self.cpu_min, self.cpu_max, "CPU_MIN", "CPU_MAX")?;
        check_delay(self.disk1_min, self.disk1_max, "DISK1_MIN", "DISK1_MAX")?;
        check_delay(self.disk2_min, self.disk2_max, "DISK2_MIN", "DISK2_MAX")?;

        // Every event time and every span between two of them lies in [INIT_TIME, horizon)
        self.horizon()
            .and_then(|end| end.checked_sub(self.init_time))
            .map(|_| ())
            .ok_or(ConfigError::TimeOverflow)
    }

    /// Total simulated time. Saturates on a configuration that fails `validate`.
    pub fn duration (&self) -> Time {
        self.fin_time.saturating_sub(self.init_time)
    }

    fn horizon (&self) -> Option<Time> {
        let longest = self.arrive_max.max(self.cpu_max).max(self.disk1_max).max(self.disk2_max);
        self.fin_time.checked_add(longest)
    }

    // Returns false for names this simulator does not know
    fn set (&mut self, option: &str, value: &str) -> Result<bool, ConfigError> {
        let slot = match option {
            "SEED" => {
                self.seed = parse_value(option, value)?;
                return Ok(true);
            },
            "QUIT_PROB" => {
                self.quit_prob = parse_value(option, value)?;
                return Ok(true);
            },
            "INIT_TIME" => &mut self.init_time,
            "FIN_TIME" => &mut self.fin_time,
            "ARRIVE_MIN" => &mut self.arrive_min,
            "ARRIVE_MAX" => &mut self.arrive_max,
            "CPU_MIN" => &mut self.cpu_min,
            "CPU_MAX" => &mut self.cpu_max,
            "DISK1_MIN" => &mut self.disk1_min,
            "DISK1_MAX" => &mut self.disk1_max,
            "DISK2_MIN" => &mut self.disk2_min,
            "DISK2_MAX" => &mut self.disk2_max,
            _ => return Ok(false),
        };
        *slot = parse_value(option, value)?;
        Ok(true)
    }
}

fn check_bounds (min: Time, max: Time, lower: &'static str, upper: &'static str) -> Result<(), ConfigError> {
    if min >= max {
        return Err(ConfigError::InvertedBounds { lower, upper });
    }
    Ok(())
}

// Delays move time forward
fn check_delay (min: Time, max: Time, lower: &'static str, upper: &'static str) -> Result<(), ConfigError> {
    check_bounds(min, max, lower, upper)?;
    if min < 0 {
        return Err(ConfigError::NegativeDelay { option: lower });
    }
    Ok(())
}

fn parse_value<T: std::str::FromStr> (option: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        option: option.to_owned(),
        value: value.to_owned(),
    })
}

/// A validated configuration plus the option/value pairs it was read from,
/// in file order. The pairs are echoed at the top of the log and stats files.
#[derive(Debug,Clone,PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    pub entries: Vec<(String, String)>,
}

impl LoadedConfig {
    /// Parses whitespace separated `OPTION VALUE` pairs on top of the defaults.
    pub fn parse (text: &str) -> Result<LoadedConfig, ConfigError> {
        let mut config = Config::default();
        let mut entries = Vec::new();

        let mut tokens = text.split_whitespace();
        while let Some(option) = tokens.next() {
            let value = match tokens.next() {
                Some(v) => v,
                None => {
                    warn!(option, "option without a value, ignoring");
                    break;
                }
            };
            if !config.set(option, value)? {
                warn!(option, value, "unknown config option, ignoring");
            }
            entries.push((option.to_owned(), value.to_owned()));
        }

        config.validate()?;
        Ok(LoadedConfig { config, entries })
    }

    pub fn load<P: AsRef<Path>> (path: P) -> Result<LoadedConfig, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.to_owned() }
            }
            else {
                ConfigError::Io { path: path.to_owned(), source }
            }
        })?;
        LoadedConfig::parse(&text)
    }

    /// Replaces the seed, recording the override in the echoed entries.
    pub fn override_seed (&mut self, seed: i64) {
        self.config.seed = seed;
        self.entries.retain(|(option, _)| option != "SEED");
        self.entries.push(("SEED".to_owned(), seed.to_string()));
    }
}
