//! Test utilities for routing providers.
//!
//! This module provides [`StubTravelTimeProvider`], a deterministic test double
//! for [`TravelTimeProvider`] that returns pre-configured responses without
//! making actual HTTP requests.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;
use visitplan_core::{MatrixError, MatrixSource, TravelTimeMatrix, TravelTimeProvider};

/// Stub `TravelTimeProvider` for testing.
///
/// The provider returns pre-configured responses and counts how often it was
/// asked, allowing tests to verify behaviour without a running OSRM service.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use visitplan_core::TravelTimeProvider;
/// use visitplan_data::routing::test_support::StubTravelTimeProvider;
///
/// let provider = StubTravelTimeProvider::with_unit_matrix(2);
/// let locations = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
///
/// assert!(provider.get_travel_time_matrix(&locations).is_ok());
/// assert_eq!(provider.calls(), 1);
/// ```
#[derive(Debug)]
pub struct StubTravelTimeProvider {
    response: StubResponse,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Matrix(TravelTimeMatrix),
    Error(MatrixError),
}

impl StubTravelTimeProvider {
    /// Create a provider that returns the given matrix.
    ///
    /// The matrix will be returned regardless of the locations provided,
    /// as long as the input is non-empty.
    #[must_use]
    pub const fn with_matrix(matrix: TravelTimeMatrix) -> Self {
        Self::from_response(StubResponse::Matrix(matrix))
    }

    /// Create a provider that returns the given error.
    ///
    /// Empty input still returns `MatrixError::EmptyInput`.
    #[must_use]
    pub const fn with_error(error: MatrixError) -> Self {
        Self::from_response(StubResponse::Error(error))
    }

    /// Create a provider returning a unit matrix of the given size.
    ///
    /// The matrix has zero on the diagonal and one minute for all
    /// off-diagonal entries.
    ///
    /// # Panics
    ///
    /// Panics when `size` is zero.
    #[must_use]
    pub fn with_unit_matrix(size: usize) -> Self {
        let matrix = TravelTimeMatrix::from_minutes(vec![vec![1; size]; size], MatrixSource::Fixed)
            .unwrap_or_else(|err| panic!("unit matrix of size {size}: {err}"));
        Self::with_matrix(matrix)
    }

    /// Number of lookups made so far, including rejected empty ones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    const fn from_response(response: StubResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }
}

impl TravelTimeProvider for StubTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }

        match &self.response {
            StubResponse::Matrix(matrix) => Ok(matrix.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
