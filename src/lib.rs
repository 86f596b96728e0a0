//! Facade crate for the visitplan weekly route planner.
//!
//! This crate re-exports the core domain types and exposes the solver and the
//! HTTP travel-time providers behind feature flags.

#![forbid(unsafe_code)]

pub use visitplan_core::{
    Diagnostics, InfeasibleReason, MatrixError, MatrixSource, OptimizeRequest, OptimizeResponse,
    RequestValidationError, RouteStop, SolveError, Solver, Stop, TravelTimeMatrix,
    TravelTimeProvider, Vehicle, VehicleRoute, WeekTime,
};

#[cfg(feature = "http-matrix")]
pub use visitplan_data::{
    FallbackTravelTimeProvider, GreatCircleTravelTimeProvider, HttpTravelTimeProvider,
    HttpTravelTimeProviderConfig,
};

#[cfg(feature = "solver")]
pub use visitplan_solver::{SolveTask, VisitSolver, VisitSolverConfig};
