//! Test doubles and builders shared by unit, behaviour and downstream tests.

use geo::Coord;

use crate::{
    DEFAULT_MAX_DAILY_MINUTES, MatrixError, MatrixSource, Stop, TravelTimeMatrix,
    TravelTimeProvider, Vehicle,
};

/// Deterministic `TravelTimeProvider` returning one-minute edges.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitTravelTimeProvider;

impl TravelTimeProvider for UnitTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        let n = locations.len();
        TravelTimeMatrix::from_minutes(vec![vec![1; n]; n], MatrixSource::Fixed)
    }
}

/// `TravelTimeProvider` returning a fixed matrix of minutes.
///
/// The matrix is returned whenever the number of locations matches its size;
/// any other size yields [`MatrixError::DimensionMismatch`].
#[derive(Debug, Clone)]
pub struct FixedMatrixTravelTimeProvider {
    minutes: Vec<Vec<u32>>,
    distances: Option<Vec<Vec<f64>>>,
}

impl FixedMatrixTravelTimeProvider {
    /// Serve the given minutes.
    #[must_use]
    pub const fn from_minutes(minutes: Vec<Vec<u32>>) -> Self {
        Self {
            minutes,
            distances: None,
        }
    }

    /// Also serve the given distances in metres.
    #[must_use]
    pub fn with_distances(mut self, distances: Vec<Vec<f64>>) -> Self {
        self.distances = Some(distances);
        self
    }
}

impl TravelTimeProvider for FixedMatrixTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        if locations.len() != self.minutes.len() {
            return Err(MatrixError::DimensionMismatch {
                expected: locations.len(),
                actual: self.minutes.len(),
            });
        }
        let matrix = TravelTimeMatrix::from_minutes(self.minutes.clone(), MatrixSource::Fixed)?;
        match &self.distances {
            Some(distances) => matrix.with_distances(distances.clone()),
            None => Ok(matrix),
        }
    }
}

/// Stop near the default depot with zero service time.
#[must_use]
pub fn stop(id: u64, tw_start: u32, tw_end: u32) -> Stop {
    Stop {
        id,
        lat: 56.16,
        lon: 10.20,
        service_minutes: 0,
        tw_start,
        tw_end,
        priority: "Normal".to_owned(),
        customer_name: format!("Customer {id}"),
    }
}

/// Vehicle with the default daily budget parked at the default depot.
#[must_use]
pub fn vehicle(id: &str) -> Vehicle {
    Vehicle {
        id: id.to_owned(),
        name: format!("Vehicle {id}"),
        max_daily_minutes: DEFAULT_MAX_DAILY_MINUTES,
        start_lat: 56.1629,
        start_lon: 10.2039,
    }
}
