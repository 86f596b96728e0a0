//! Weekly visit planner for the `visitplan` engine.
//!
//! This crate provides [`VisitSolver`], the default implementation of the
//! [`Solver`](visitplan_core::Solver) trait. A request's depot and stops
//! become a routing graph with one node per location. Every vehicle leaves
//! from and returns to the depot and carries a cumulative-time dimension
//! bounded by five working days. The time windows, the slack between visits
//! and the vehicle horizon are all constraints on that dimension.
//!
//! A solve runs in three steps. First, a cheapest-arc construction (repaired
//! by cheapest insertion) produces a feasible first solution. Second, guided
//! local search improves it until the time limit or iteration cap. Third, the
//! decoder turns each vehicle's route into per-day routes with arrival,
//! departure and travel times. [`SolveTask`] runs the same pipeline on a
//! dedicated thread.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod decode;
mod model;
mod schedule;
mod search;
mod solver;
mod task;

#[doc(hidden)]
pub mod test_support;

pub use solver::{VisitSolver, VisitSolverConfig};
pub use task::SolveTask;
