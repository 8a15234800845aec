//! Randomized construction of valid double round-robin schedules.
//!
//! # Algorithm
//!
//! 1. Fill the first half (`games = teams − 1` rounds) column by column,
//!    row by row. A cell for team `t` may take any value `±k` where
//!    `k > t`, `k` is not yet in the row and `k` is not yet in the
//!    column. One is chosen uniformly and the opponent's cell is set to
//!    the mirrored fixture immediately.
//! 2. A row with no candidate clears the column and the column is retried.
//!    After more than `max_column_failures` consecutive failures the
//!    previous column is cleared too and construction backs up one column.
//! 3. The completed half is mirrored (negated) into the second half and
//!    the run rule is checked. A violation restarts from column 0.
//!
//! The restriction `k > t` means each pairing is placed exactly once per
//! half, from the lower-numbered team's row.
//!
//! # Complexity
//! One column fill is O(teams²). The number of retries is random; both the
//! failures within one half and the number of halves are capped by
//! [`GeneratorConfig`].

use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{TtpError, TtpResult};
use crate::models::Schedule;
use crate::validation::is_valid;

/// Retry policy for schedule construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Consecutive failures on one column before backing up a column.
    pub max_column_failures: u32,
    /// Column failures tolerated within one half before abandoning it.
    pub max_failures_per_attempt: u64,
    /// Whole-schedule attempts before giving up.
    pub max_attempts: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_column_failures: 10,
            max_failures_per_attempt: 10_000,
            max_attempts: 100_000,
        }
    }
}

impl GeneratorConfig {
    /// Sets the consecutive column failures before a one-column backtrack.
    pub fn with_max_column_failures(mut self, value: u32) -> Self {
        self.max_column_failures = value;
        self
    }

    /// Sets the column failures tolerated within one half.
    pub fn with_max_failures_per_attempt(mut self, value: u64) -> Self {
        self.max_failures_per_attempt = value;
        self
    }

    /// Sets the whole-schedule attempt cap.
    pub fn with_max_attempts(mut self, value: u64) -> Self {
        self.max_attempts = value;
        self
    }
}

/// Counters from one successful construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Halves started (including the successful one).
    pub attempts: u64,
    /// Columns cleared because a row had no candidate.
    pub column_failures: u64,
    /// Completed halves rejected by the run rule.
    pub run_failures: u64,
    /// Halves abandoned after too many column failures.
    pub abandoned: u64,
    /// One-column backtracks taken.
    pub backtracks: u64,
}

/// Builds valid random schedules for a fixed team count.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    teams: usize,
    config: GeneratorConfig,
}

impl ScheduleGenerator {
    /// Creates a generator for `teams` teams (even, at least 2).
    pub fn new(teams: usize, config: GeneratorConfig) -> Self {
        debug_assert!(teams >= 2 && teams % 2 == 0);
        Self { teams, config }
    }

    /// Team count.
    pub fn teams(&self) -> usize {
        self.teams
    }

    /// Retry policy.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a valid mirrored double round-robin.
    ///
    /// # Errors
    /// `ConstructionFailed` once `max_attempts` halves have been discarded.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> TtpResult<Schedule> {
        self.generate_with_stats(rng).map(|(schedule, _)| schedule)
    }

    /// Like [`generate`](Self::generate), also returning retry counters.
    pub fn generate_with_stats<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> TtpResult<(Schedule, GenerationStats)> {
        let mut half = HalfTable::new(self.teams);
        let mut stats = GenerationStats::default();

        while stats.attempts < self.config.max_attempts {
            stats.attempts += 1;
            half.clear();

            if !self.fill_half(&mut half, rng, &mut stats) {
                stats.abandoned += 1;
                continue;
            }

            let schedule = Schedule::mirrored(self.teams, &half.cells);
            if is_valid(&schedule) {
                trace!(
                    teams = self.teams,
                    attempts = stats.attempts,
                    column_failures = stats.column_failures,
                    run_failures = stats.run_failures,
                    backtracks = stats.backtracks,
                    "schedule constructed"
                );
                return Ok((schedule, stats));
            }
            stats.run_failures += 1;
        }

        Err(TtpError::ConstructionFailed {
            teams: self.teams,
            attempts: stats.attempts,
        })
    }

    /// Fills every first-half column. Returns `false` if the half was
    /// abandoned after too many column failures.
    fn fill_half<R: Rng + ?Sized>(
        &self,
        half: &mut HalfTable,
        rng: &mut R,
        stats: &mut GenerationStats,
    ) -> bool {
        let mut candidates = Vec::with_capacity(2 * self.teams);
        let mut col = 0;
        let mut consecutive = 0u32;
        let mut failures = 0u64;

        while col < half.games {
            if fill_column(half, col, rng, &mut candidates) {
                consecutive = 0;
                col += 1;
                continue;
            }

            half.clear_column(col);
            stats.column_failures += 1;
            failures += 1;
            consecutive += 1;

            if failures > self.config.max_failures_per_attempt {
                return false;
            }
            if consecutive > self.config.max_column_failures {
                if col > 0 {
                    col -= 1;
                    half.clear_column(col);
                    stats.backtracks += 1;
                }
                consecutive = 0;
            }
        }
        true
    }
}

/// Attempts to complete one column. Returns `false` on a dead end, leaving
/// the column partially filled.
fn fill_column<R: Rng + ?Sized>(
    half: &mut HalfTable,
    col: usize,
    rng: &mut R,
    candidates: &mut Vec<i32>,
) -> bool {
    let teams = half.teams;
    for row in 0..teams {
        if half.get(row, col) != 0 {
            continue;
        }
        let team = row + 1;

        candidates.clear();
        for k in (team + 1)..=teams {
            if half.row_contains(row, k) || half.column_contains(col, k) {
                continue;
            }
            candidates.push(k as i32);
            candidates.push(-(k as i32));
        }

        let Some(&choice) = candidates.choose(rng) else {
            return false;
        };
        half.set(row, col, choice);
        let opponent = choice.unsigned_abs() as usize - 1;
        half.set(opponent, col, -choice.signum() * team as i32);
    }
    true
}

/// First half under construction: row-major `teams × games`, 0 = empty.
struct HalfTable {
    teams: usize,
    games: usize,
    cells: Vec<i32>,
}

impl HalfTable {
    fn new(teams: usize) -> Self {
        let games = teams - 1;
        Self {
            teams,
            games,
            cells: vec![0; teams * games],
        }
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> i32 {
        self.cells[row * self.games + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: i32) {
        self.cells[row * self.games + col] = value;
    }

    fn clear(&mut self) {
        self.cells.fill(0);
    }

    fn clear_column(&mut self, col: usize) {
        for row in 0..self.teams {
            self.set(row, col, 0);
        }
    }

    fn row_contains(&self, row: usize, team: usize) -> bool {
        self.cells[row * self.games..(row + 1) * self.games]
            .iter()
            .any(|v| v.unsigned_abs() as usize == team)
    }

    fn column_contains(&self, col: usize, team: usize) -> bool {
        (0..self.teams).any(|row| self.get(row, col).unsigned_abs() as usize == team)
    }
}
