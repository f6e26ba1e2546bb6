//! Library-backed route solver for visitroute.
//!
//! This crate provides [`VrpRouteSolver`], the default implementation of the
//! [`RouteSolver`](visitroute_core::RouteSolver) trait. It models a visit
//! plan as a single-vehicle, single-depot routing problem in which every stop
//! is a mandatory job, and uses the `vrp-core` metaheuristics to minimise
//! total travel time within a wall-clock budget.
//!
//! The search is not deterministic: runs over the same matrix may return
//! different tours of equal or near-equal cost.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod vrp;

pub use solver::{DEFAULT_MAX_GENERATIONS, VrpRouteSolver, VrpSolverConfig};
