//! Search configuration.
//!
//! Configuration can be created programmatically with
//! [`SearchConfig::default()`] and the `with_*` builders, deserialized with
//! serde, or read from environment variables with
//! [`SearchConfig::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Unset or unparsable values keep the default.
//!
//! - `TTP_TEAMS`: Team count (default: `8`)
//! - `TTP_POP_SIZE`: Population kept after each generation (default: `500`)
//! - `TTP_GENERATIONS`: Generations to run (default: `100`)
//! - `TTP_WORKERS`: Worker threads (default: available parallelism)
//! - `TTP_SEED`: Master random seed (default: random)
//! - `TTP_DATA_DIR`: Directory holding distance and team files (default: `Distance Matrices`)
//! - `TTP_CHECKPOINT_DIR`: Directory holding best-schedule files (default: `NL Schedules`)
//! - `TTP_LOG`: `"true"` to log to a timestamped file instead of stderr (default: `false`)
//! - `TTP_VERBOSE`: `"true"` to log per-generation detail (default: `false`)

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TtpError, TtpResult};
use crate::ga::GeneratorConfig;

/// Parameters for one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of teams.
    pub teams: usize,
    /// Population size kept after truncation.
    pub pop_size: usize,
    /// Generations to run.
    pub gen_count: usize,
    /// Worker threads for the parallel phases.
    pub workers: usize,
    /// Master seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Construction retry policy.
    pub generator: GeneratorConfig,
    /// Directory with `NL<teams>.txt` and `NL Teams.txt`.
    pub data_dir: PathBuf,
    /// Directory with `<teams> teams.txt` checkpoints.
    pub checkpoint_dir: PathBuf,
    /// Log to a file instead of stderr.
    pub log_to_file: bool,
    /// Per-generation debug logging.
    pub verbose: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            teams: 8,
            pop_size: 500,
            gen_count: 100,
            workers: default_workers(),
            seed: None,
            generator: GeneratorConfig::default(),
            data_dir: PathBuf::from("Distance Matrices"),
            checkpoint_dir: PathBuf::from("NL Schedules"),
            log_to_file: false,
            verbose: false,
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl SearchConfig {
    /// Creates configuration from environment variables.
    ///
    /// See the module documentation for the recognized variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: FromStr>(value: Option<String>, default: T) -> T {
            value
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        }
        fn flag(value: Option<String>, default: bool) -> bool {
            match value {
                Some(v) => v.trim().eq_ignore_ascii_case("true"),
                None => default,
            }
        }

        let defaults = Self::default();
        Self {
            teams: parsed(lookup("TTP_TEAMS"), defaults.teams),
            pop_size: parsed(lookup("TTP_POP_SIZE"), defaults.pop_size),
            gen_count: parsed(lookup("TTP_GENERATIONS"), defaults.gen_count),
            workers: parsed(lookup("TTP_WORKERS"), defaults.workers),
            seed: lookup("TTP_SEED").and_then(|v| v.trim().parse().ok()),
            generator: defaults.generator,
            data_dir: lookup("TTP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            checkpoint_dir: lookup("TTP_CHECKPOINT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.checkpoint_dir),
            log_to_file: flag(lookup("TTP_LOG"), defaults.log_to_file),
            verbose: flag(lookup("TTP_VERBOSE"), defaults.verbose),
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> TtpResult<()> {
        if self.teams < 2 || self.teams % 2 != 0 {
            return Err(TtpError::InvalidConfig(format!(
                "teams must be even and at least 2, got {}",
                self.teams
            )));
        }
        if self.pop_size == 0 {
            return Err(TtpError::InvalidConfig("pop_size must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(TtpError::InvalidConfig("workers must be at least 1".into()));
        }
        if self.generator.max_attempts == 0 {
            return Err(TtpError::InvalidConfig(
                "generator.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Sets the team count.
    pub fn with_teams(mut self, teams: usize) -> Self {
        self.teams = teams;
        self
    }

    /// Sets the population size.
    pub fn with_pop_size(mut self, pop_size: usize) -> Self {
        self.pop_size = pop_size;
        self
    }

    /// Sets the number of generations.
    pub fn with_gen_count(mut self, gen_count: usize) -> Self {
        self.gen_count = gen_count;
        self
    }

    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Fixes the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the construction retry policy.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the input data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the checkpoint directory.
    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = dir.into();
        self
    }

    /// Enables or disables logging to file.
    pub fn with_log_to_file(mut self, value: bool) -> Self {
        self.log_to_file = value;
        self
    }

    /// Enables or disables per-generation detail.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }
}
