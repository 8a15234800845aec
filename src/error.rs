//! Crate-level error type.
//!
//! Only unrecoverable conditions are represented here. Construction
//! dead-ends, run-rule violations and a missing checkpoint file are all
//! handled internally by retrying or regenerating and never reach callers.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type TtpResult<T> = Result<T, TtpError>;

/// Fatal errors surfaced by the tournament search.
#[derive(Debug)]
pub enum TtpError {
    /// A file could not be read or written.
    Io {
        /// File the operation was performed on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// An input file could not be parsed.
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number of the offending line.
        line: usize,
        /// Human-readable description.
        reason: String,
    },
    /// The distance matrix or team list does not describe a usable instance.
    InvalidInstance(Vec<ValidationError>),
    /// A schedule matrix violates the tournament structure.
    InvalidSchedule(Vec<ValidationError>),
    /// The checkpoint file exists but cannot be trusted.
    MalformedCheckpoint {
        /// Checkpoint file path.
        path: PathBuf,
        /// Human-readable description.
        reason: String,
    },
    /// Random construction exceeded its attempt budget.
    ConstructionFailed {
        /// Team count being scheduled.
        teams: usize,
        /// Number of whole-schedule attempts made.
        attempts: u64,
    },
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// The worker pool could not be created.
    ThreadPool(String),
}

impl TtpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedCheckpoint {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for TtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on '{}': {source}", path.display()),
            Self::Parse { path, line, reason } => {
                write!(f, "{}:{line}: {reason}", path.display())
            }
            Self::InvalidInstance(errors) => {
                write!(f, "invalid problem instance: {}", join_messages(errors))
            }
            Self::InvalidSchedule(errors) => {
                write!(f, "invalid schedule: {}", join_messages(errors))
            }
            Self::MalformedCheckpoint { path, reason } => {
                write!(f, "malformed checkpoint '{}': {reason}", path.display())
            }
            Self::ConstructionFailed { teams, attempts } => write!(
                f,
                "no valid schedule for {teams} teams after {attempts} construction attempts"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::ThreadPool(msg) => write!(f, "worker pool: {msg}"),
        }
    }
}

impl std::error::Error for TtpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
