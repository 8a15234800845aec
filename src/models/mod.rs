//! Tournament domain models.
//!
//! Provides the core data types for a Traveling Tournament Problem:
//! the signed schedule matrix, the venue distance matrix and the
//! immutable problem instance that bundles them with team names.
//!
//! # Sign convention
//!
//! | Entry | Meaning |
//! |-------|---------|
//! | `+k` | hosts team `k` |
//! | `-k` | travels to team `k` |

mod distance;
mod instance;
mod schedule;

pub use distance::DistanceMatrix;
pub use instance::ProblemInstance;
pub use schedule::{BestRecord, Schedule, TeamId, Venue};
