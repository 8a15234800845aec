//! Shared fixtures for unit tests.

use crate::models::{DistanceMatrix, ProblemInstance, Schedule};

/// A valid mirrored 4-team schedule (circle method).
pub(crate) fn four_team_schedule() -> Schedule {
    Schedule::from_rows(vec![
        vec![2, -3, 4, -2, 3, -4],
        vec![-1, 4, -3, 1, -4, 3],
        vec![4, 1, 2, -4, -1, -2],
        vec![-3, -2, -1, 3, 2, 1],
    ])
    .unwrap()
}

/// Team names matching the National League benchmark ordering.
pub(crate) fn nl_names(teams: usize) -> Vec<String> {
    [
        "ATL", "NYM", "PHI", "MON", "FLA", "PIT", "CIN", "CHI", "STL", "MIL", "HOU", "COL", "SF",
        "SD", "LA", "ARI",
    ]
    .iter()
    .take(teams)
    .map(|s| s.to_string())
    .collect()
}

/// Every pair of distinct venues is `d` apart.
pub(crate) fn uniform_instance(teams: usize, d: u64) -> ProblemInstance {
    ProblemInstance::new(DistanceMatrix::uniform(teams, d), nl_names(teams)).unwrap()
}

/// The first rows of the NL16 benchmark matrix (4 teams).
pub(crate) fn nl4_instance() -> ProblemInstance {
    let matrix = DistanceMatrix::new(vec![
        vec![0, 745, 665, 929],
        vec![745, 0, 80, 337],
        vec![665, 80, 0, 380],
        vec![929, 337, 380, 0],
    ])
    .unwrap();
    ProblemInstance::new(matrix, nl_names(4)).unwrap()
}

/// A fresh scratch directory under the system temp dir.
pub(crate) fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "u-tournament-{name}-{}-{:?}",
        std::process::id(),
        std::thread::current().id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
