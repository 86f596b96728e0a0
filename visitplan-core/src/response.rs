//! Outbound records describing the optimised week.

use serde::{Deserialize, Serialize};

use crate::MatrixSource;

const SCORE_CEILING: f64 = 95.0;
const SCORE_FLOOR: f64 = 60.0;
const SCORE_BASE: f64 = 85.0;
const SCORE_PER_STOP: f64 = 0.1;

/// One visit on a day's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Identifier of the visited stop.
    pub stop_id: u64,
    /// 1-based position within the (vehicle, day) route.
    pub sequence: u32,
    /// Service start, in minutes from week start.
    pub arrival_time: u32,
    /// Service end, in minutes from week start.
    pub departure_time: u32,
    /// Minutes of travel from the previously visited node.
    pub travel_time_from_prev: u32,
    /// Working day, `0` = Monday to `4` = Friday.
    pub day_idx: u8,
}

/// All visits made by one vehicle on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRoute {
    /// Vehicle serving the route.
    pub vehicle_id: String,
    /// Working day of every stop on the route.
    pub day_idx: u8,
    /// Visits in driving order.
    pub stops: Vec<RouteStop>,
    /// Minutes spent on site across the route.
    pub total_duration: u32,
    /// Minutes spent travelling across the route.
    pub total_travel_time: u32,
}

impl VehicleRoute {
    /// Build a route and derive its totals from the visits.
    ///
    /// # Examples
    ///
    /// ```
    /// use visitplan_core::{RouteStop, VehicleRoute};
    ///
    /// let visit = RouteStop {
    ///     stop_id: 1,
    ///     sequence: 1,
    ///     arrival_time: 500,
    ///     departure_time: 530,
    ///     travel_time_from_prev: 12,
    ///     day_idx: 0,
    /// };
    /// let route = VehicleRoute::from_stops("van-1", 0, vec![visit]);
    /// assert_eq!(route.total_duration, 30);
    /// assert_eq!(route.total_travel_time, 12);
    /// ```
    #[must_use]
    pub fn from_stops(vehicle_id: impl Into<String>, day_idx: u8, stops: Vec<RouteStop>) -> Self {
        let total_duration = stops
            .iter()
            .map(|s| s.departure_time.saturating_sub(s.arrival_time))
            .sum();
        let total_travel_time = stops.iter().map(|s| s.travel_time_from_prev).sum();
        Self {
            vehicle_id: vehicle_id.into(),
            day_idx,
            stops,
            total_duration,
            total_travel_time,
        }
    }
}

/// How a response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Origin of the travel-time matrix.
    pub matrix_source: MatrixSource,
    /// Objective value of the constructed schedule.
    pub construction_cost: u64,
    /// Objective value of the returned schedule.
    pub final_cost: u64,
    /// Improvement iterations performed.
    pub iterations: u64,
    /// Times the search penalised arcs to escape a local optimum.
    pub penalty_rounds: u64,
}

/// The optimised week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// Routes ordered by vehicle, then by day.
    pub routes: Vec<VehicleRoute>,
    /// Distance driven across every route, including returns to the depot.
    pub total_distance_km: f64,
    /// Informational quality indicator derived from problem size.
    pub optimization_score: f64,
    /// Wall-clock time spent producing the response.
    pub computation_time_ms: u64,
    /// Search details.
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

impl OptimizeResponse {
    /// Every visit across all routes, in route order.
    pub fn visits(&self) -> impl Iterator<Item = &RouteStop> {
        self.routes.iter().flat_map(|route| route.stops.iter())
    }

    /// Number of visits across all routes.
    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.routes.iter().map(|route| route.stops.len()).sum()
    }
}

/// Heuristic quality indicator for a problem with `stop_count` stops.
///
/// The score falls by a tenth of a point per stop from 85 and is kept within
/// `[60, 95]`. It says nothing about the optimality gap.
///
/// # Examples
///
/// ```
/// use visitplan_core::optimization_score;
///
/// assert!((optimization_score(10) - 84.0).abs() < 1e-9);
/// assert!((optimization_score(1_000) - 60.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn optimization_score(stop_count: usize) -> f64 {
    let count = u32::try_from(stop_count).map_or(f64::from(u32::MAX), f64::from);
    (SCORE_BASE - count * SCORE_PER_STOP).clamp(SCORE_FLOOR, SCORE_CEILING)
}
