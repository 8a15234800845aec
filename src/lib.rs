//! Traveling Tournament Problem search.
//!
//! Builds double round-robin schedules for an even number of teams and
//! searches for the one with the least total travel, subject to the rule
//! that no team plays more than three consecutive home or away games.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Schedule`, `DistanceMatrix`, `ProblemInstance`
//! - **`validation`**: Run rule and structural checks for schedules and instances
//! - **`evaluation`**: Travel distance objective and per-team travel indicators
//! - **`ga`**: Randomized construction, mutation operators, population search
//! - **`parallel`**: Order-preserving worker pool
//! - **`checkpoint`**: Best-schedule persistence
//! - **`loader`**: Distance matrix and team name files
//! - **`render`**: Matrix and markdown table output
//! - **`config`**, **`logger`**, **`progress`**: Run configuration and reporting
//!
//! # References
//!
//! - Easton, Nemhauser & Trick (2001), "The Traveling Tournament Problem:
//!   Description and Benchmarks"
//! - Rasmussen & Trick (2008), "Round robin scheduling – a survey"

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod loader;
pub mod logger;
pub mod models;
pub mod parallel;
pub mod progress;
pub mod render;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use checkpoint::{CheckpointStore, FileCheckpointStore, MemoryCheckpointStore};
pub use config::SearchConfig;
pub use error::{TtpError, TtpResult};
pub use ga::{PopulationSearch, SearchObserver, SearchResult};
pub use models::{BestRecord, DistanceMatrix, ProblemInstance, Schedule, TeamId, Venue};
