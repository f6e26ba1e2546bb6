//! Native guided-local-search route solver.
//!
//! [`GuidedLocalSearchSolver`] builds an initial tour with a path-cheapest-arc
//! walk from the depot and then improves it with guided local search: 2-opt
//! and relocate moves evaluated on a penalty-augmented objective, with arc
//! penalties raised whenever the search settles in a local optimum.
//!
//! The search is deterministic for a given matrix and configuration as long
//! as it stops on `max_iterations`. When the wall-clock limit ends the search
//! first, the returned tour depends on how far it got, so two runs may return
//! different tours of different cost.

#![forbid(unsafe_code)]

mod construction;
mod search;
mod solver;

pub use solver::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_PENALTY_FACTOR_PERCENT, GlsConfig, GuidedLocalSearchSolver,
};
