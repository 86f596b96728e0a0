//! Core domain types for the visitplan engine.
//!
//! The crate defines the request and response records exchanged with the
//! outside world, the [`TravelTimeProvider`] seam used to acquire travel
//! times, and the [`Solver`] seam implemented by the search engine. It keeps
//! no state between calls; every request owns its data for its lifetime.
//!
//! Requests are validated up front with [`OptimizeRequest::validate`] so that
//! caller mistakes surface before any travel-time lookup is attempted.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod request;
pub mod response;
pub mod solver;
pub mod travel_time;
pub mod week;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use request::{
    DEFAULT_DEPOT_LAT, DEFAULT_DEPOT_LON, DEFAULT_MAX_DAILY_MINUTES, OptimizeRequest,
    RequestValidationError, Stop, Vehicle,
};
pub use response::{Diagnostics, OptimizeResponse, RouteStop, VehicleRoute, optimization_score};
pub use solver::{InfeasibleReason, SolveError, Solver};
pub use travel_time::{MatrixError, MatrixSource, TravelTimeMatrix, TravelTimeProvider};
pub use week::{LAST_DAY_IDX, MINUTES_PER_DAY, WORKING_DAYS, WeekTime, WeekTimeError, day_index};
