//! Travel-distance objective and schedule metrics.
//!
//! Each team starts at home, visits one venue per round (its own for a
//! home game, the opponent's for an away game) and returns home after the
//! last round. The objective is the sum of every leg over all teams.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total distance | Sum of every team's travel |
//! | Team distance | One team's travel, home → rounds → home |
//! | Longest road trip | Most consecutive away games |
//! | Longest home stand | Most consecutive home games |
//! | Trips | Number of times a team leaves home |
//!
//! # Reference
//! Easton, Nemhauser & Trick (2001), "The Traveling Tournament Problem:
//! Description and Benchmarks"

use std::sync::Arc;

use crate::models::{DistanceMatrix, Schedule, TeamId, Venue};
use crate::validation::longest_run;

/// Total travel distance of a schedule. This is the minimised objective.
pub fn total_distance(schedule: &Schedule, distances: &DistanceMatrix) -> u64 {
    (0..schedule.teams())
        .map(|row| team_distance(schedule, distances, row))
        .sum()
}

/// Travel distance of the team in `row` (0-based).
pub fn team_distance(schedule: &Schedule, distances: &DistanceMatrix, row: usize) -> u64 {
    let home: TeamId = row + 1;
    let mut here = home;
    let mut total = 0;
    for &v in schedule.row(row) {
        let venue = if v > 0 { home } else { v.unsigned_abs() as TeamId };
        total += distances.get(here, venue);
        here = venue;
    }
    total + distances.get(here, home)
}

/// Evaluates schedules against a shared distance matrix.
///
/// Cheap to clone and safe to share across worker threads.
#[derive(Debug, Clone)]
pub struct DistanceEvaluator {
    distances: Arc<DistanceMatrix>,
}

impl DistanceEvaluator {
    /// Creates an evaluator over shared distances.
    pub fn new(distances: Arc<DistanceMatrix>) -> Self {
        Self { distances }
    }

    /// Total travel distance.
    #[inline]
    pub fn evaluate(&self, schedule: &Schedule) -> u64 {
        total_distance(schedule, &self.distances)
    }

    /// The distances in use.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

/// Travel indicators for one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelKpi {
    /// Objective value.
    pub total_distance: u64,
    /// Per-team distance, in team order.
    pub distance_by_team: Vec<u64>,
    /// Longest run of away games of any team.
    pub longest_road_trip: usize,
    /// Longest run of home games of any team.
    pub longest_home_stand: usize,
    /// Per-team number of departures from home.
    pub trips_by_team: Vec<usize>,
}

impl TravelKpi {
    /// Computes indicators for a schedule.
    pub fn calculate(schedule: &Schedule, distances: &DistanceMatrix) -> Self {
        let distance_by_team: Vec<u64> = (0..schedule.teams())
            .map(|row| team_distance(schedule, distances, row))
            .collect();

        let mut longest_road_trip = 0;
        let mut longest_home_stand = 0;
        let mut trips_by_team = Vec::with_capacity(schedule.teams());
        for row in schedule.rows() {
            longest_road_trip = longest_road_trip.max(longest_run(row, Venue::Away));
            longest_home_stand = longest_home_stand.max(longest_run(row, Venue::Home));
            // A trip starts at every away game preceded by home (or the start).
            let trips = row
                .iter()
                .enumerate()
                .filter(|&(i, &v)| v < 0 && (i == 0 || row[i - 1] > 0))
                .count();
            trips_by_team.push(trips);
        }

        Self {
            total_distance: distance_by_team.iter().sum(),
            distance_by_team,
            longest_road_trip,
            longest_home_stand,
            trips_by_team,
        }
    }

    /// Team with the most travel (1-based) and its distance.
    pub fn busiest_team(&self) -> Option<(TeamId, u64)> {
        self.distance_by_team
            .iter()
            .enumerate()
            .max_by_key(|&(_, d)| *d)
            .map(|(i, &d)| (i + 1, d))
    }
}
