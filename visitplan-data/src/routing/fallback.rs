//! Primary provider with a local estimate for connectivity failures.

use geo::Coord;
use log::warn;
use visitplan_core::{MatrixError, TravelTimeMatrix, TravelTimeProvider};

use super::great_circle::GreatCircleTravelTimeProvider;

/// Try `primary`, switching to `fallback` only on transient failures.
///
/// Protocol failures from the primary (a malformed response, an unroutable
/// pair, a service error code) are returned unchanged: silently estimating
/// would hide a broken routing backend.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use visitplan_core::{MatrixError, MatrixSource, TravelTimeProvider};
/// use visitplan_data::routing::FallbackTravelTimeProvider;
/// use visitplan_data::routing::test_support::StubTravelTimeProvider;
///
/// let primary = StubTravelTimeProvider::with_error(MatrixError::Timeout {
///     url: "http://osrm/table".into(),
///     timeout_secs: 30,
/// });
/// let provider = FallbackTravelTimeProvider::with_great_circle(primary);
/// let matrix = provider.get_travel_time_matrix(&[Coord { x: 10.2, y: 56.1 }; 3])?;
/// assert_eq!(matrix.source(), MatrixSource::GreatCircle);
/// # Ok::<(), MatrixError>(())
/// ```
#[derive(Debug)]
pub struct FallbackTravelTimeProvider<P, F = GreatCircleTravelTimeProvider> {
    primary: P,
    fallback: F,
}

impl<P> FallbackTravelTimeProvider<P> {
    /// Fall back to the default great-circle estimate.
    #[must_use]
    pub fn with_great_circle(primary: P) -> Self {
        Self::new(primary, GreatCircleTravelTimeProvider::default())
    }
}

impl<P, F> FallbackTravelTimeProvider<P, F> {
    /// Compose two providers.
    #[must_use]
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// The provider tried first.
    #[must_use]
    pub const fn primary(&self) -> &P {
        &self.primary
    }
}

impl<P, F> TravelTimeProvider for FallbackTravelTimeProvider<P, F>
where
    P: TravelTimeProvider,
    F: TravelTimeProvider,
{
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        match self.primary.get_travel_time_matrix(locations) {
            Err(err) if err.is_transient() => {
                warn!("travel time lookup failed ({err}); using local estimate");
                self.fallback.get_travel_time_matrix(locations)
            }
            other => other,
        }
    }
}
