//! Test-only utilities for `visitplan-solver`.
//!
//! The helpers in this module are shared by unit, behavioural and benchmark
//! tests. The module is hidden from the rendered documentation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use geo::Coord;
use visitplan_core::{MatrixError, TravelTimeMatrix, TravelTimeProvider};

use crate::VisitSolverConfig;

/// Wraps a provider and counts the lookups made through it.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use visitplan_core::TravelTimeProvider;
/// use visitplan_core::test_support::UnitTravelTimeProvider;
/// use visitplan_solver::test_support::CountingTravelTimeProvider;
///
/// let provider = CountingTravelTimeProvider::new(UnitTravelTimeProvider);
/// assert_eq!(provider.calls(), 0);
/// provider
///     .get_travel_time_matrix(&[Coord { x: 0.0, y: 0.0 }])
///     .expect("unit matrix");
/// assert_eq!(provider.calls(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CountingTravelTimeProvider<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingTravelTimeProvider<P> {
    /// Wrap `inner` with a zeroed counter.
    #[must_use]
    pub const fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<P: TravelTimeProvider> TravelTimeProvider for CountingTravelTimeProvider<P> {
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.get_travel_time_matrix(locations)
    }
}

/// Configuration with a fixed iteration budget, so tests do not depend on
/// machine speed. The wall-clock limit stays generous.
///
/// # Examples
///
/// ```rust
/// use visitplan_solver::test_support::deterministic_config;
///
/// let config = deterministic_config(25);
/// assert_eq!(config.max_iterations, Some(25));
/// ```
#[must_use]
pub fn deterministic_config(max_iterations: u64) -> VisitSolverConfig {
    VisitSolverConfig::default()
        .with_time_limit(Duration::from_secs(20))
        .with_max_iterations(max_iterations)
}
