//! Travel-time providers for routing services.
//!
//! This module provides three implementations of
//! [`visitplan_core::TravelTimeProvider`]:
//!
//! - [`HttpTravelTimeProvider`] queries the OSRM Table API.
//! - [`GreatCircleTravelTimeProvider`] estimates times from great-circle
//!   distance at a constant average speed.
//! - [`FallbackTravelTimeProvider`] tries a primary provider and switches to
//!   a fallback only when the primary fails transiently.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use std::time::Duration;
//! use visitplan_core::TravelTimeProvider;
//! use visitplan_data::routing::{
//!     FallbackTravelTimeProvider, GreatCircleTravelTimeProvider, HttpTravelTimeProvider,
//!     HttpTravelTimeProviderConfig,
//! };
//!
//! let config = HttpTravelTimeProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10));
//! let provider = FallbackTravelTimeProvider::new(
//!     HttpTravelTimeProvider::with_config(config)?,
//!     GreatCircleTravelTimeProvider::default(),
//! );
//!
//! let locations = [Coord { x: 10.2039, y: 56.1629 }, Coord { x: 9.9217, y: 57.0488 }];
//! let matrix = provider.get_travel_time_matrix(&locations)?;
//! assert_eq!(matrix.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod fallback;
mod great_circle;
mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use fallback::FallbackTravelTimeProvider;
pub use great_circle::{GreatCircleConfig, GreatCircleTravelTimeProvider};
pub use provider::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpTravelTimeProvider, HttpTravelTimeProviderConfig,
    ProviderBuildError,
};
