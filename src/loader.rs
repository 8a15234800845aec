//! Input files: distance matrix and team names.
//!
//! # File Layout
//!
//! ```text
//! <data_dir>/NL<teams>.txt    whitespace-separated distance rows
//! <data_dir>/NL Teams.txt     whitespace-separated team names
//! ```
//!
//! Blank lines in the matrix file are ignored. The name file may list
//! more teams than the instance uses; only the first `teams` are kept.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TtpError, TtpResult};
use crate::models::{DistanceMatrix, ProblemInstance};
use crate::validation::{ValidationError, ValidationErrorKind};

/// `<dir>/NL<teams>.txt`.
pub fn distance_matrix_path(dir: &Path, teams: usize) -> PathBuf {
    dir.join(format!("NL{teams}.txt"))
}

/// `<dir>/NL Teams.txt`.
pub fn team_names_path(dir: &Path) -> PathBuf {
    dir.join("NL Teams.txt")
}

/// Parses distance rows from text. `path` is only used in error messages.
pub fn parse_distance_matrix(text: &str, path: &Path) -> TtpResult<DistanceMatrix> {
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<u64>().map_err(|_| TtpError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("'{token}' is not a non-negative integer"),
                })
            })
            .collect::<TtpResult<Vec<u64>>>()?;
        rows.push(row);
    }
    DistanceMatrix::new(rows)
}

/// Reads and parses a distance matrix file.
pub fn read_distance_matrix(path: &Path) -> TtpResult<DistanceMatrix> {
    let text = fs::read_to_string(path).map_err(|e| TtpError::io(path, e))?;
    parse_distance_matrix(&text, path)
}

/// Reads every whitespace-separated token of a team-name file.
pub fn read_team_names(path: &Path) -> TtpResult<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| TtpError::io(path, e))?;
    Ok(text.split_whitespace().map(str::to_string).collect())
}

/// Loads a problem instance of `teams` teams.
///
/// # Errors
/// - `Io` / `Parse` if a file is missing or unreadable
/// - `InvalidInstance` if the matrix size differs from `teams`, the matrix
///   is not square and symmetric, or too few names are listed
pub fn load_instance(
    matrix_path: &Path,
    names_path: &Path,
    teams: usize,
) -> TtpResult<ProblemInstance> {
    let distances = read_distance_matrix(matrix_path)?;
    if distances.size() != teams {
        return Err(TtpError::InvalidInstance(vec![ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!(
                "{} holds a {n}×{n} matrix, expected {teams} teams",
                matrix_path.display(),
                n = distances.size()
            ),
        )]));
    }
    let names = read_team_names(names_path)?;
    let instance = ProblemInstance::new(distances, names)?;
    tracing::debug!(
        teams,
        matrix = %matrix_path.display(),
        names = %names_path.display(),
        "instance loaded"
    );
    Ok(instance)
}
