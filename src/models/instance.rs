//! Problem instance: the immutable input shared by every component.

use std::sync::Arc;

use super::distance::DistanceMatrix;
use super::schedule::{Schedule, TeamId};
use crate::error::{TtpError, TtpResult};
use crate::validation::validate_instance;

/// Team count, venue distances and team names for one TTP instance.
///
/// Built once at startup and passed by reference. Cloning is cheap: the
/// distance matrix is reference-counted.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    distances: Arc<DistanceMatrix>,
    team_names: Vec<String>,
}

impl ProblemInstance {
    /// Creates an instance whose team count is the matrix size.
    ///
    /// Surplus team names are dropped, so a league-wide name list can be
    /// reused for smaller instances.
    ///
    /// # Errors
    /// `InvalidInstance` if the team count is odd or below 2, or if fewer
    /// names than teams are given.
    pub fn new(distances: DistanceMatrix, mut team_names: Vec<String>) -> TtpResult<Self> {
        validate_instance(&distances, &team_names).map_err(TtpError::InvalidInstance)?;
        team_names.truncate(distances.size());
        Ok(Self {
            distances: Arc::new(distances),
            team_names,
        })
    }

    /// Number of teams.
    #[inline]
    pub fn teams(&self) -> usize {
        self.distances.size()
    }

    /// Rounds per half of the double round-robin.
    #[inline]
    pub fn games(&self) -> usize {
        self.teams() - 1
    }

    /// Total rounds.
    #[inline]
    pub fn rounds(&self) -> usize {
        Schedule::rounds_for(self.teams())
    }

    /// Venue distances.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Shared handle to the venue distances.
    pub fn shared_distances(&self) -> Arc<DistanceMatrix> {
        Arc::clone(&self.distances)
    }

    /// Team names in team-number order.
    pub fn team_names(&self) -> &[String] {
        &self.team_names
    }

    /// Name of a team (1-based).
    pub fn team_name(&self, team: TeamId) -> &str {
        &self.team_names[team - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::nl_names;

    #[test]
    fn test_truncates_names() {
        let inst = ProblemInstance::new(DistanceMatrix::uniform(4, 1), nl_names(8)).unwrap();
        assert_eq!(inst.teams(), 4);
        assert_eq!(inst.games(), 3);
        assert_eq!(inst.rounds(), 6);
        assert_eq!(inst.team_names().len(), 4);
        assert_eq!(inst.team_name(2), "NYM");
    }

    #[test]
    fn test_rejects_missing_names() {
        let err = ProblemInstance::new(DistanceMatrix::uniform(4, 1), nl_names(3)).unwrap_err();
        assert!(matches!(err, TtpError::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_odd_team_count() {
        let err = ProblemInstance::new(DistanceMatrix::uniform(5, 1), nl_names(5)).unwrap_err();
        assert!(err.to_string().contains("even"));
    }

    #[test]
    fn test_shared_distances_point_to_same_matrix() {
        let inst = ProblemInstance::new(DistanceMatrix::uniform(4, 3), nl_names(4)).unwrap();
        let shared = inst.shared_distances();
        assert!(std::ptr::eq(shared.as_ref(), inst.distances()));
    }
}
