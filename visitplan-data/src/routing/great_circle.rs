//! Local travel-time estimate from great-circle distance.
//!
//! Used when the routing service is unreachable. Distance follows the
//! haversine formula on a sphere; time assumes a constant average speed and
//! is floored to whole minutes. The matrix is symmetric by construction.

use geo::Coord;
use visitplan_core::{MatrixError, MatrixSource, TravelTimeMatrix, TravelTimeProvider};

const METERS_PER_KM: f64 = 1000.0;
const MINUTES_PER_HOUR: f64 = 60.0;

/// Parameters of the great-circle estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatCircleConfig {
    /// Assumed constant travel speed.
    pub average_speed_kmh: f64,
    /// Radius of the spherical Earth model.
    pub earth_radius_km: f64,
}

impl Default for GreatCircleConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 50.0,
            earth_radius_km: 6371.0,
        }
    }
}

impl GreatCircleConfig {
    /// Set the assumed average speed.
    #[must_use]
    pub const fn with_average_speed_kmh(mut self, average_speed_kmh: f64) -> Self {
        self.average_speed_kmh = average_speed_kmh;
        self
    }
}

/// Provider estimating travel times from great-circle distance.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use visitplan_core::TravelTimeProvider;
/// use visitplan_data::routing::GreatCircleTravelTimeProvider;
///
/// let provider = GreatCircleTravelTimeProvider::default();
/// // Aarhus to Aalborg, roughly 100 km.
/// let matrix = provider.get_travel_time_matrix(&[
///     Coord { x: 10.2039, y: 56.1629 },
///     Coord { x: 9.9217, y: 57.0488 },
/// ])?;
/// assert_eq!(matrix.duration(0, 1), matrix.duration(1, 0));
/// assert_eq!(matrix.duration(0, 1), Some(120));
/// # Ok::<(), visitplan_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircleTravelTimeProvider {
    config: GreatCircleConfig,
}

impl GreatCircleTravelTimeProvider {
    /// Create a provider with explicit parameters.
    #[must_use]
    pub const fn new(config: GreatCircleConfig) -> Self {
        Self { config }
    }

    /// Great-circle distance between two coordinates in kilometres.
    #[must_use]
    pub fn distance_km(&self, a: Coord<f64>, b: Coord<f64>) -> f64 {
        let (lat1, lat2) = (a.y.to_radians(), b.y.to_radians());
        let d_lat = (b.y - a.y).to_radians();
        let d_lon = (b.x - a.x).to_radians();
        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        self.config.earth_radius_km * c
    }

    /// Travel minutes for a distance, floored.
    fn minutes_for(&self, km: f64) -> u32 {
        let minutes = (km / self.config.average_speed_kmh * MINUTES_PER_HOUR).floor();
        if minutes.is_finite() && minutes > 0.0 {
            // Clamped to the u32 range, so the cast cannot wrap.
            minutes.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

impl TravelTimeProvider for GreatCircleTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        let n = locations.len();
        let mut minutes = vec![vec![0_u32; n]; n];
        let mut meters = vec![vec![0.0_f64; n]; n];
        for (i, a) in locations.iter().enumerate() {
            for (j, b) in locations.iter().enumerate().skip(i + 1) {
                let km = self.distance_km(*a, *b);
                let time = self.minutes_for(km);
                minutes[i][j] = time;
                minutes[j][i] = time;
                meters[i][j] = km * METERS_PER_KM;
                meters[j][i] = km * METERS_PER_KM;
            }
        }
        TravelTimeMatrix::from_minutes(minutes, MatrixSource::GreatCircle)?.with_distances(meters)
    }
}
