//! Validation for tournament instances and schedules.
//!
//! Two levels of checking are provided:
//!
//! - [`is_valid`]: the hot-path home/away run check used by construction
//!   and mutation. O(teams × rounds), no allocation.
//! - [`validate_schedule`] / [`validate_instance`]: exhaustive structural
//!   checks that collect every problem found. Used when data enters the
//!   crate from outside (checkpoint files, user input). Detects:
//!   - Empty slots and out-of-range opponents
//!   - Rounds that are not perfect matchings
//!   - Missing or repeated home/away fixtures
//!   - Runs of more than three home or away games
//!
//! # Reference
//! Easton, Nemhauser & Trick (2001), "The Traveling Tournament Problem:
//! Description and Benchmarks"

use std::collections::HashSet;

use crate::models::{DistanceMatrix, Schedule, Venue};

/// Longest allowed run of consecutive home (or away) games.
pub const MAX_CONSECUTIVE: usize = 3;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Matrix dimensions do not match the team count.
    InvalidShape,
    /// Distance matrix is not square or does not match the team count.
    DimensionMismatch,
    /// Distance `a→b` differs from `b→a`.
    AsymmetricDistance,
    /// Team count is odd, so rounds cannot be perfect matchings.
    OddTeamCount,
    /// Fewer than two teams.
    TooFewTeams,
    /// Fewer team names than teams.
    MissingTeamNames,
    /// Two teams share a name.
    DuplicateTeamName,
    /// A schedule entry is zero.
    EmptySlot,
    /// A schedule entry names a team that doesn't exist.
    OpponentOutOfRange,
    /// A team is scheduled against itself.
    SelfMatch,
    /// The opponent's entry does not point back with the opposite venue.
    BrokenMatching,
    /// A pair does not meet exactly once at each venue.
    IncompleteRoundRobin,
    /// More than [`MAX_CONSECUTIVE`] home or away games in a row.
    ConsecutiveRun,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Whether no team plays more than three consecutive home or away games.
///
/// Sums the signs of every window of four consecutive rounds; a window
/// whose absolute sum is four is a run that is too long.
pub fn is_valid(schedule: &Schedule) -> bool {
    schedule.rows().all(|row| first_long_run(row).is_none())
}

/// Start round of the first window with more than [`MAX_CONSECUTIVE`]
/// same-venue games, if any.
fn first_long_run(row: &[i32]) -> Option<usize> {
    row.windows(MAX_CONSECUTIVE + 1).position(|window| {
        let sum: i32 = window.iter().map(|v| v.signum()).sum();
        sum.unsigned_abs() as usize > MAX_CONSECUTIVE
    })
}

/// Length of the longest run of consecutive games at `venue`.
pub fn longest_run(row: &[i32], venue: Venue) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &v in row {
        let here = if v > 0 { Venue::Home } else { Venue::Away };
        if v != 0 && here == venue {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Validates the structure of a complete schedule.
///
/// Checks:
/// 1. Every entry is nonzero and names another existing team
/// 2. Every round is a perfect matching with opposite venues
/// 3. Every ordered pair meets exactly once at each venue
/// 4. No team exceeds [`MAX_CONSECUTIVE`] home or away games in a row
///
/// Matching and completeness checks are skipped when entries are out of
/// range, since they would only repeat the same problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(schedule: &Schedule) -> ValidationResult {
    let teams = schedule.teams();
    let rounds = schedule.rounds();
    let mut errors = Vec::new();

    // Entry range
    for row in 0..teams {
        let team = row + 1;
        for round in 0..rounds {
            let v = schedule.value(row, round);
            let opponent = v.unsigned_abs() as usize;
            if v == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptySlot,
                    format!("Team {team} has no game in round {round}"),
                ));
            } else if opponent > teams {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OpponentOutOfRange,
                    format!("Team {team} plays unknown team {opponent} in round {round}"),
                ));
            } else if opponent == team {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfMatch,
                    format!("Team {team} plays itself in round {round}"),
                ));
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    // Per-round matching
    for round in 0..rounds {
        for row in 0..teams {
            let v = schedule.value(row, round);
            let other = schedule.opponent(row, round) - 1;
            let expected = -v.signum() * (row as i32 + 1);
            if schedule.value(other, round) != expected {
                errors.push(ValidationError::new(
                    ValidationErrorKind::BrokenMatching,
                    format!(
                        "Round {round}: team {} lists {v} but team {} lists {}",
                        row + 1,
                        other + 1,
                        schedule.value(other, round)
                    ),
                ));
            }
        }
    }

    // Double round-robin completeness: home[i][k] and away[i][k] must be 1.
    let mut home = vec![0u32; teams * teams];
    let mut away = vec![0u32; teams * teams];
    for row in 0..teams {
        for round in 0..rounds {
            let other = schedule.opponent(row, round) - 1;
            match schedule.venue(row, round) {
                Venue::Home => home[row * teams + other] += 1,
                Venue::Away => away[row * teams + other] += 1,
            }
        }
    }
    for row in 0..teams {
        for other in (0..teams).filter(|&o| o != row) {
            let (h, a) = (home[row * teams + other], away[row * teams + other]);
            if h != 1 || a != 1 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::IncompleteRoundRobin,
                    format!(
                        "Team {} hosts team {} {h} time(s) and visits {a} time(s)",
                        row + 1,
                        other + 1
                    ),
                ));
            }
        }
    }

    // Run rule
    for (row, cells) in schedule.rows().enumerate() {
        if let Some(start) = first_long_run(cells) {
            let venue = if cells[start] > 0 { "home" } else { "away" };
            errors.push(ValidationError::new(
                ValidationErrorKind::ConsecutiveRun,
                format!(
                    "Team {} plays more than {MAX_CONSECUTIVE} consecutive {venue} games \
                     from round {start}",
                    row + 1
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the input data for a tournament instance.
///
/// Checks:
/// 1. At least two teams, and an even number of them
/// 2. At least as many names as teams
/// 3. No duplicate names among the teams in play
///
/// Shape and symmetry of the matrix are enforced by [`DistanceMatrix::new`].
pub fn validate_instance(distances: &DistanceMatrix, team_names: &[String]) -> ValidationResult {
    let teams = distances.size();
    let mut errors = Vec::new();

    if teams < 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::TooFewTeams,
            format!("A tournament needs at least 2 teams, got {teams}"),
        ));
    } else if teams % 2 != 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::OddTeamCount,
            format!("Team count must be even, got {teams}"),
        ));
    }

    if team_names.len() < teams {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingTeamNames,
            format!("{teams} teams but only {} names", team_names.len()),
        ));
    }

    let mut seen = HashSet::new();
    for name in team_names.iter().take(teams) {
        if !seen.insert(name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTeamName,
                format!("Duplicate team name: {name}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
