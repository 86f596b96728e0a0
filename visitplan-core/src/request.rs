//! Inbound optimisation request: stops, vehicles and the shared depot.
//!
//! The field names mirror the JSON accepted by the service so a request body
//! deserialises directly into [`OptimizeRequest`]. Times are expressed in
//! whole minutes elapsed since Monday 00:00 of the scheduling week.

use std::collections::HashSet;

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latitude used for the depot when the request omits one.
pub const DEFAULT_DEPOT_LAT: f64 = 56.1629;

/// Longitude used for the depot when the request omits one.
pub const DEFAULT_DEPOT_LON: f64 = 10.2039;

/// Working minutes per day granted to a vehicle when none are specified.
pub const DEFAULT_MAX_DAILY_MINUTES: u32 = 480;

const DEFAULT_PRIORITY: &str = "Normal";

/// A service visit with a time window.
///
/// # Examples
///
/// ```
/// use visitplan_core::Stop;
///
/// let stop: Stop = serde_json::from_str(
///     r#"{"id": 7, "lat": 56.15, "lon": 10.21, "service_min": 30,
///         "tw_start": 480, "tw_end": 960}"#,
/// )?;
/// assert_eq!(stop.priority, "Normal");
/// assert_eq!(stop.location().x, 10.21);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Unique identifier supplied by the caller.
    pub id: u64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Time spent on site, in minutes.
    #[serde(rename = "service_min")]
    pub service_minutes: u32,
    /// Earliest permitted arrival, in minutes from week start.
    pub tw_start: u32,
    /// Latest permitted arrival, in minutes from week start.
    pub tw_end: u32,
    /// Free-form priority label carried through untouched.
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Display name of the customer.
    #[serde(default)]
    pub customer_name: String,
}

impl Stop {
    /// Position as a `geo` coordinate (`x` = longitude, `y` = latitude).
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// A vehicle available for the whole week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier supplied by the caller.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Working minutes per day; the weekly horizon is five times this value.
    #[serde(alias = "max_hours_per_day", default = "default_max_daily_minutes")]
    pub max_daily_minutes: u32,
    /// Latitude of the vehicle's home position.
    pub start_lat: f64,
    /// Longitude of the vehicle's home position.
    pub start_lon: f64,
}

impl Vehicle {
    /// Home position as a `geo` coordinate.
    ///
    /// Routes always start and end at the shared depot; the home position is
    /// informational.
    #[must_use]
    pub const fn start_location(&self) -> Coord<f64> {
        Coord {
            x: self.start_lon,
            y: self.start_lat,
        }
    }
}

/// A complete optimisation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// Visits to schedule. Node `i + 1` of the routing graph is `stops[i]`.
    pub stops: Vec<Stop>,
    /// Available vehicles, in priority order.
    pub vehicles: Vec<Vehicle>,
    /// Depot latitude.
    #[serde(default = "default_depot_lat")]
    pub depot_lat: f64,
    /// Depot longitude.
    #[serde(default = "default_depot_lon")]
    pub depot_lon: f64,
}

impl OptimizeRequest {
    /// Create a request using the default depot position.
    #[must_use]
    pub const fn new(stops: Vec<Stop>, vehicles: Vec<Vehicle>) -> Self {
        Self {
            stops,
            vehicles,
            depot_lat: DEFAULT_DEPOT_LAT,
            depot_lon: DEFAULT_DEPOT_LON,
        }
    }

    /// Replace the depot position.
    #[must_use]
    pub const fn with_depot(mut self, lat: f64, lon: f64) -> Self {
        self.depot_lat = lat;
        self.depot_lon = lon;
        self
    }

    /// Depot position as a `geo` coordinate.
    #[must_use]
    pub const fn depot(&self) -> Coord<f64> {
        Coord {
            x: self.depot_lon,
            y: self.depot_lat,
        }
    }

    /// Coordinates in routing-graph order: depot first, then every stop.
    #[must_use]
    pub fn locations(&self) -> Vec<Coord<f64>> {
        std::iter::once(self.depot())
            .chain(self.stops.iter().map(Stop::location))
            .collect()
    }

    /// Check the request for caller mistakes.
    ///
    /// Empty stop and vehicle lists are reported before anything else so the
    /// caller learns about the most basic problem first.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestValidationError`] encountered.
    ///
    /// # Examples
    ///
    /// ```
    /// use visitplan_core::{OptimizeRequest, RequestValidationError};
    ///
    /// let request = OptimizeRequest::new(Vec::new(), Vec::new());
    /// assert_eq!(request.validate(), Err(RequestValidationError::NoStops));
    /// ```
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.stops.is_empty() {
            return Err(RequestValidationError::NoStops);
        }
        if self.vehicles.is_empty() {
            return Err(RequestValidationError::NoVehicles);
        }
        check_coordinate("depot", self.depot_lat, self.depot_lon)?;

        let mut seen_stops = HashSet::with_capacity(self.stops.len());
        for stop in &self.stops {
            if !seen_stops.insert(stop.id) {
                return Err(RequestValidationError::DuplicateStopId { id: stop.id });
            }
            if stop.tw_start > stop.tw_end {
                return Err(RequestValidationError::InvertedTimeWindow {
                    id: stop.id,
                    start: stop.tw_start,
                    end: stop.tw_end,
                });
            }
            check_coordinate(&format!("stop {}", stop.id), stop.lat, stop.lon)?;
        }

        let mut seen_vehicles = HashSet::with_capacity(self.vehicles.len());
        for vehicle in &self.vehicles {
            if !seen_vehicles.insert(vehicle.id.as_str()) {
                return Err(RequestValidationError::DuplicateVehicleId {
                    id: vehicle.id.clone(),
                });
            }
            if vehicle.max_daily_minutes == 0 {
                return Err(RequestValidationError::ZeroDailyBudget {
                    id: vehicle.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Caller mistakes detected before any work is done.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    /// The stop list was empty.
    #[error("no stops provided")]
    NoStops,
    /// The vehicle list was empty.
    #[error("no vehicles provided")]
    NoVehicles,
    /// Two stops share an identifier.
    #[error("stop id {id} appears more than once")]
    DuplicateStopId {
        /// The repeated identifier.
        id: u64,
    },
    /// Two vehicles share an identifier.
    #[error("vehicle id {id} appears more than once")]
    DuplicateVehicleId {
        /// The repeated identifier.
        id: String,
    },
    /// A time window closes before it opens.
    #[error("stop {id} has time window [{start}, {end}] with start after end")]
    InvertedTimeWindow {
        /// Offending stop.
        id: u64,
        /// Window start in minutes.
        start: u32,
        /// Window end in minutes.
        end: u32,
    },
    /// A vehicle has no working time.
    #[error("vehicle {id} has a zero daily working budget")]
    ZeroDailyBudget {
        /// Offending vehicle.
        id: String,
    },
    /// A latitude or longitude is out of range or not finite.
    #[error("{what} has an invalid coordinate")]
    InvalidCoordinate {
        /// Which location was rejected.
        what: String,
    },
}

fn check_coordinate(what: &str, lat: f64, lon: f64) -> Result<(), RequestValidationError> {
    let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
    let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);
    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(RequestValidationError::InvalidCoordinate {
            what: what.to_owned(),
        })
    }
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_owned()
}

const fn default_max_daily_minutes() -> u32 {
    DEFAULT_MAX_DAILY_MINUTES
}

const fn default_depot_lat() -> f64 {
    DEFAULT_DEPOT_LAT
}

const fn default_depot_lon() -> f64 {
    DEFAULT_DEPOT_LON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stop, vehicle};
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_request() -> OptimizeRequest {
        OptimizeRequest::new(
            vec![stop(1, 0, 600), stop(2, 60, 900)],
            vec![vehicle("van-1")],
        )
    }

    #[rstest]
    fn accepts_valid_request(valid_request: OptimizeRequest) {
        assert_eq!(valid_request.validate(), Ok(()));
    }

    #[rstest]
    fn empty_stops_reported_before_empty_vehicles() {
        let request = OptimizeRequest::new(Vec::new(), Vec::new());
        assert_eq!(request.validate(), Err(RequestValidationError::NoStops));
    }

    #[rstest]
    fn rejects_missing_vehicles(mut valid_request: OptimizeRequest) {
        valid_request.vehicles.clear();
        assert_eq!(valid_request.validate(), Err(RequestValidationError::NoVehicles));
    }

    #[rstest]
    fn rejects_duplicate_stop(mut valid_request: OptimizeRequest) {
        valid_request.stops.push(stop(1, 0, 100));
        assert_eq!(
            valid_request.validate(),
            Err(RequestValidationError::DuplicateStopId { id: 1 })
        );
    }

    #[rstest]
    fn rejects_duplicate_vehicle(mut valid_request: OptimizeRequest) {
        valid_request.vehicles.push(vehicle("van-1"));
        assert_eq!(
            valid_request.validate(),
            Err(RequestValidationError::DuplicateVehicleId {
                id: "van-1".to_owned()
            })
        );
    }

    #[rstest]
    fn rejects_inverted_window(mut valid_request: OptimizeRequest) {
        valid_request.stops.push(stop(3, 200, 100));
        assert_eq!(
            valid_request.validate(),
            Err(RequestValidationError::InvertedTimeWindow {
                id: 3,
                start: 200,
                end: 100
            })
        );
    }

    #[rstest]
    fn rejects_zero_budget(mut valid_request: OptimizeRequest) {
        valid_request.vehicles[0].max_daily_minutes = 0;
        assert!(matches!(
            valid_request.validate(),
            Err(RequestValidationError::ZeroDailyBudget { .. })
        ));
    }

    #[rstest]
    #[case(91.0, 10.0)]
    #[case(56.0, -181.0)]
    #[case(f64::NAN, 10.0)]
    fn rejects_bad_stop_coordinates(
        mut valid_request: OptimizeRequest,
        #[case] lat: f64,
        #[case] lon: f64,
    ) {
        valid_request.stops[0].lat = lat;
        valid_request.stops[0].lon = lon;
        assert_eq!(
            valid_request.validate(),
            Err(RequestValidationError::InvalidCoordinate {
                what: "stop 1".to_owned()
            })
        );
    }

    #[rstest]
    fn locations_put_depot_first(valid_request: OptimizeRequest) {
        let locations = valid_request.locations();
        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0], valid_request.depot());
        assert_eq!(locations[1], valid_request.stops[0].location());
    }

    #[rstest]
    fn deserialises_with_defaults() {
        let json = r#"{
            "stops": [{"id": 1, "lat": 56.1, "lon": 10.1, "service_min": 15,
                       "tw_start": 0, "tw_end": 600}],
            "vehicles": [{"id": "v1", "name": "Van", "start_lat": 56.1, "start_lon": 10.2}]
        }"#;
        let request: OptimizeRequest = serde_json::from_str(json).expect("valid json");
        assert!((request.depot_lat - DEFAULT_DEPOT_LAT).abs() < f64::EPSILON);
        assert!((request.depot_lon - DEFAULT_DEPOT_LON).abs() < f64::EPSILON);
        assert_eq!(request.vehicles[0].max_daily_minutes, DEFAULT_MAX_DAILY_MINUTES);
        assert_eq!(request.stops[0].priority, "Normal");
        assert!(request.stops[0].customer_name.is_empty());
    }

    #[rstest]
    fn accepts_legacy_budget_field_name() {
        let json = r#"{"id": "v1", "name": "Van", "max_hours_per_day": 300,
                       "start_lat": 56.1, "start_lon": 10.2}"#;
        let parsed: Vehicle = serde_json::from_str(json).expect("valid json");
        assert_eq!(parsed.max_daily_minutes, 300);
    }
}
