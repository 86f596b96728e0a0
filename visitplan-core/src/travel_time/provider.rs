//! Travel-time provider trait.

use geo::Coord;

use super::error::MatrixError;
use super::matrix::TravelTimeMatrix;

/// Fetch pairwise travel times for a set of locations.
///
/// Implementers must return a square `n×n` matrix where
/// `n == locations.len()`. Coordinates use `x` for longitude and `y` for
/// latitude. The first location is the depot by convention, but providers
/// treat every entry alike.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use visitplan_core::{MatrixError, MatrixSource, TravelTimeMatrix, TravelTimeProvider};
///
/// struct FiveMinuteProvider;
///
/// impl TravelTimeProvider for FiveMinuteProvider {
///     fn get_travel_time_matrix(
///         &self,
///         locations: &[Coord<f64>],
///     ) -> Result<TravelTimeMatrix, MatrixError> {
///         if locations.is_empty() {
///             return Err(MatrixError::EmptyInput);
///         }
///         let n = locations.len();
///         TravelTimeMatrix::from_minutes(vec![vec![5; n]; n], MatrixSource::Fixed)
///     }
/// }
///
/// let matrix = FiveMinuteProvider.get_travel_time_matrix(&[Coord { x: 10.2, y: 56.1 }; 2])?;
/// assert_eq!(matrix.duration(0, 1), Some(5));
/// assert_eq!(matrix.duration(1, 1), Some(0));
/// # Ok::<(), MatrixError>(())
/// ```
pub trait TravelTimeProvider {
    /// Return a matrix of travel times for `locations`.
    ///
    /// Implementations must return `Err(MatrixError::EmptyInput)` when
    /// `locations` is empty.
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError>;
}

impl<P: TravelTimeProvider + ?Sized> TravelTimeProvider for Box<P> {
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        (**self).get_travel_time_matrix(locations)
    }
}

impl<P: TravelTimeProvider + ?Sized> TravelTimeProvider for &P {
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        (**self).get_travel_time_matrix(locations)
    }
}
