//! Tournament schedule (solution) model.
//!
//! A schedule is a `teams × rounds` matrix of signed opponent numbers.
//! Row `i` belongs to team `i + 1`. The magnitude of an entry is the
//! opponent's team number (1-based) and the sign is the venue:
//! positive = home, negative = away.
//!
//! # Layout
//!
//! | Round | 0 | 1 | 2 | 3 | 4 | 5 |
//! |-------|---|---|---|---|---|---|
//! | Team 1 | 2 | -3 | 4 | -2 | 3 | -4 |
//! | Team 2 | -1 | 4 | -3 | 1 | -4 | 3 |
//!
//! Schedules built by this crate are *mirrored*: round `r + games` is the
//! negation of round `r`, so the second half replays the first with venues
//! swapped. Slot-level edits ([`Schedule::with_slots_swapped`],
//! [`Schedule::with_slot_inverted`]) keep that property.
//!
//! # Reference
//! Easton, Nemhauser & Trick (2001), "The Traveling Tournament Problem:
//! Description and Benchmarks"

use serde::{Deserialize, Serialize};

use crate::error::{TtpError, TtpResult};
use crate::validation::{ValidationError, ValidationErrorKind};

/// 1-based team number.
pub type TeamId = usize;

/// Where a team plays in a given round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    /// The team hosts its opponent.
    Home,
    /// The team travels to its opponent.
    Away,
}

/// A double round-robin schedule.
///
/// Schedules are values: every edit returns a new schedule and leaves
/// the receiver untouched. Equality is structural (same matrix).
///
/// Serialized as nested rows; deserialization goes through
/// [`Schedule::from_rows`], so malformed shapes are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i32>>", into = "Vec<Vec<i32>>")]
pub struct Schedule {
    teams: usize,
    /// Row-major `teams × rounds` cells.
    cells: Vec<i32>,
}

/// The best schedule found so far and its travel distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    /// Best known schedule.
    pub schedule: Schedule,
    /// Its total travel distance.
    pub distance: u64,
}

impl Schedule {
    /// Number of rounds in a double round-robin for `teams` teams.
    #[inline]
    pub fn rounds_for(teams: usize) -> usize {
        2 * teams.saturating_sub(1)
    }

    /// Builds a schedule from explicit rows.
    ///
    /// Only the shape is checked here: at least two rows, each of length
    /// `2 × (rows − 1)`. Use [`crate::validation::validate_schedule`] to
    /// check the tournament structure.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> TtpResult<Self> {
        let teams = rows.len();
        if teams < 2 {
            return Err(TtpError::InvalidSchedule(vec![ValidationError::new(
                ValidationErrorKind::InvalidShape,
                format!("Schedule needs at least 2 teams, got {teams}"),
            )]));
        }

        let rounds = Self::rounds_for(teams);
        let errors: Vec<ValidationError> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != rounds)
            .map(|(i, row)| {
                ValidationError::new(
                    ValidationErrorKind::InvalidShape,
                    format!(
                        "Team {} has {} rounds, expected {rounds}",
                        i + 1,
                        row.len()
                    ),
                )
            })
            .collect();
        if !errors.is_empty() {
            return Err(TtpError::InvalidSchedule(errors));
        }

        Ok(Self {
            teams,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Builds a mirrored double round-robin from its first half.
    ///
    /// `half` is a row-major `teams × (teams − 1)` matrix; the second half
    /// is its negation.
    pub(crate) fn mirrored(teams: usize, half: &[i32]) -> Self {
        let games = teams - 1;
        debug_assert_eq!(half.len(), teams * games);
        let mut cells = Vec::with_capacity(teams * 2 * games);
        for row in half.chunks_exact(games) {
            cells.extend_from_slice(row);
            cells.extend(row.iter().map(|v| -v));
        }
        Self { teams, cells }
    }

    /// Number of teams.
    #[inline]
    pub fn teams(&self) -> usize {
        self.teams
    }

    /// Rounds per half (`teams − 1`).
    #[inline]
    pub fn games(&self) -> usize {
        self.teams - 1
    }

    /// Total rounds (`2 × games`).
    #[inline]
    pub fn rounds(&self) -> usize {
        Self::rounds_for(self.teams)
    }

    /// Signed entry for a row (0-based) and round (0-based).
    #[inline]
    pub fn value(&self, row: usize, round: usize) -> i32 {
        self.cells[row * self.rounds() + round]
    }

    /// Opponent team number for a row in a round.
    #[inline]
    pub fn opponent(&self, row: usize, round: usize) -> TeamId {
        self.value(row, round).unsigned_abs() as TeamId
    }

    /// Venue for a row in a round.
    #[inline]
    pub fn venue(&self, row: usize, round: usize) -> Venue {
        if self.value(row, round) > 0 {
            Venue::Home
        } else {
            Venue::Away
        }
    }

    /// All rounds of one row.
    pub fn row(&self, row: usize) -> &[i32] {
        let rounds = self.rounds();
        &self.cells[row * rounds..(row + 1) * rounds]
    }

    /// Iterates over rows in team order.
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        self.cells.chunks_exact(self.rounds())
    }

    /// Copies the matrix into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.rows().map(<[i32]>::to_vec).collect()
    }

    /// Every home fixture becomes away and vice versa.
    pub fn inverted(&self) -> Self {
        Self {
            teams: self.teams,
            cells: self.cells.iter().map(|v| -v).collect(),
        }
    }

    /// Swaps two first-half slots, together with their mirrored rounds.
    ///
    /// Slots are first-half round indices in `0..games`.
    pub fn with_slots_swapped(&self, a: usize, b: usize) -> Self {
        let games = self.games();
        debug_assert!(a < games && b < games);
        let mut next = self.clone();
        let rounds = self.rounds();
        for row in next.cells.chunks_exact_mut(rounds) {
            row.swap(a, b);
            row.swap(a + games, b + games);
        }
        next
    }

    /// Flips home and away for one first-half slot and its mirrored round.
    pub fn with_slot_inverted(&self, slot: usize) -> Self {
        let games = self.games();
        debug_assert!(slot < games);
        let mut next = self.clone();
        let rounds = self.rounds();
        for row in next.cells.chunks_exact_mut(rounds) {
            row[slot] = -row[slot];
            row[slot + games] = -row[slot + games];
        }
        next
    }

    /// Whether the second half is the negated first half.
    pub fn is_mirrored(&self) -> bool {
        let games = self.games();
        self.rows()
            .all(|row| (0..games).all(|r| row[r + games] == -row[r]))
    }
}

impl TryFrom<Vec<Vec<i32>>> for Schedule {
    type Error = TtpError;

    fn try_from(rows: Vec<Vec<i32>>) -> TtpResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<Schedule> for Vec<Vec<i32>> {
    fn from(schedule: Schedule) -> Self {
        schedule.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::four_team_schedule;

    #[test]
    fn test_dimensions() {
        let s = four_team_schedule();
        assert_eq!(s.teams(), 4);
        assert_eq!(s.games(), 3);
        assert_eq!(s.rounds(), 6);
        assert_eq!(Schedule::rounds_for(8), 14);
    }

    #[test]
    fn test_accessors() {
        let s = four_team_schedule();
        assert_eq!(s.value(0, 1), -3);
        assert_eq!(s.opponent(0, 1), 3);
        assert_eq!(s.venue(0, 0), Venue::Home);
        assert_eq!(s.venue(0, 1), Venue::Away);
        assert_eq!(s.row(3), &[-3, -2, -1, 3, 2, 1]);
        assert_eq!(s.rows().count(), 4);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Schedule::from_rows(vec![vec![2, -2], vec![-1]]).unwrap_err();
        match err {
            TtpError::InvalidSchedule(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, ValidationErrorKind::InvalidShape);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_rows_rejects_single_team() {
        assert!(Schedule::from_rows(vec![vec![]]).is_err());
    }

    #[test]
    fn test_mirrored_construction() {
        let half = vec![2, -3, 4, -1, 4, -3, 4, 1, 2, -3, -2, -1];
        let s = Schedule::mirrored(4, &half);
        assert!(s.is_mirrored());
        assert_eq!(s, four_team_schedule());
    }

    #[test]
    fn test_inverted_is_involution() {
        let s = four_team_schedule();
        let inv = s.inverted();
        assert_ne!(inv, s);
        assert_eq!(inv.value(0, 0), -2);
        assert_eq!(inv.inverted(), s);
    }

    #[test]
    fn test_slot_swap_keeps_mirror() {
        let s = four_team_schedule();
        let swapped = s.with_slots_swapped(0, 2);
        assert_eq!(swapped.row(0), &[4, -3, 2, -4, 3, -2]);
        assert!(swapped.is_mirrored());
        assert_eq!(swapped.with_slots_swapped(0, 2), s);
    }

    #[test]
    fn test_slot_inversion() {
        let s = four_team_schedule();
        let inv = s.with_slot_inverted(1);
        assert_eq!(inv.row(0), &[2, 3, 4, -2, -3, -4]);
        assert!(inv.is_mirrored());
        // Original untouched.
        assert_eq!(s.value(0, 1), -3);
    }

    #[test]
    fn test_serializes_as_rows() {
        let json = serde_json::to_string(&four_team_schedule()).unwrap();
        assert!(json.starts_with("[[2,-3,4,-2,3,-4],"));
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, four_team_schedule());
    }

    #[test]
    fn test_deserialize_rejects_bad_shape() {
        assert!(serde_json::from_str::<Schedule>(r#"{"teams":4,"cells":[1,2]}"#).is_err());
        assert!(serde_json::from_str::<Schedule>("[[2,-2],[-1]]").is_err());
        assert!(serde_json::from_str::<Schedule>("[[]]").is_err());
    }

    #[test]
    fn test_to_rows_round_trip() {
        let s = four_team_schedule();
        assert_eq!(Schedule::from_rows(s.to_rows()).unwrap(), s);
    }
}
