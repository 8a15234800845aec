//! Schedule construction, mutation and population search.
//!
//! The search works only with valid schedules: every individual is built
//! by [`ScheduleGenerator`] and every child comes from a
//! structure-preserving [`MutationEngine`] operator, so no repair or
//! penalty step is needed.
//!
//! # Submodules
//!
//! - [`operators`]: Mutation strategies, drawn at random per child
//!
//! # Reference
//! - Easton, Nemhauser & Trick (2001), "The Traveling Tournament Problem:
//!   Description and Benchmarks"
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"

mod generator;
pub mod operators;
mod search;

pub use generator::{GenerationStats, GeneratorConfig, ScheduleGenerator};
pub use operators::{Mutation, MutationEngine, MutationOperator};
pub use search::{
    GenerationReport, LogObserver, PopulationSearch, SearchObserver, SearchResult,
};
