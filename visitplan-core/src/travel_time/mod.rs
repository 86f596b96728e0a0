//! Acquire travel times between the depot and every stop.
//!
//! The [`TravelTimeProvider`] trait abstracts the retrieval of a square
//! [`TravelTimeMatrix`] of whole minutes, optionally paired with distances in
//! metres. Callers supply coordinates in routing-graph order (depot first) and
//! receive a matrix indexed identically.
//!
//! [`MatrixError`] separates transient failures, which callers may recover
//! from with a local estimate, from protocol failures, which must surface.

mod error;
mod matrix;
mod provider;

pub use error::MatrixError;
pub use matrix::{MatrixSource, TravelTimeMatrix};
pub use provider::TravelTimeProvider;
