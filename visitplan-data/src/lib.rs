//! Travel-time acquisition for the visitplan engine.
//!
//! Responsibilities:
//! - Fetch duration and distance matrices from an OSRM routing service.
//! - Estimate travel times locally from great-circle distances.
//! - Compose the two so connectivity failures degrade to the estimate.
//!
//! Boundaries:
//! - Do not encode scheduling rules (those live in `visitplan-solver`).
//! - Keep blocking I/O off async executors; the HTTP provider bridges its
//!   async client onto the synchronous provider trait itself.
//!
//! Invariants:
//! - Every matrix returned is square with a zero diagonal.
//! - No global mutable state.

pub mod routing;

pub use routing::{
    FallbackTravelTimeProvider, GreatCircleConfig, GreatCircleTravelTimeProvider,
    HttpTravelTimeProvider, HttpTravelTimeProviderConfig, ProviderBuildError,
};
