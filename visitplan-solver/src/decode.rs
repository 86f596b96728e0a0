//! Turn a solved routing graph back into per-day vehicle routes.

use std::collections::BTreeMap;

use log::warn;
use visitplan_core::{
    OptimizeRequest, RouteStop, SolveError, TravelTimeMatrix, VehicleRoute, day_index,
};

use crate::model::{DEPOT, ProblemModel, arcs};
use crate::schedule::earliest_schedule;
use crate::search::Solution;

const METERS_PER_KM: f64 = 1000.0;

/// Routes and totals read off a solution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Decoded {
    /// Routes ordered by vehicle, then by day.
    pub routes: Vec<VehicleRoute>,
    /// Distance over every travelled arc, depot legs included.
    pub total_distance_km: f64,
}

/// Reads schedules, days and totals from a solution.
pub(crate) struct SolutionDecoder<'a> {
    model: &'a ProblemModel,
    request: &'a OptimizeRequest,
    matrix: &'a TravelTimeMatrix,
}

impl<'a> SolutionDecoder<'a> {
    pub(crate) const fn new(
        model: &'a ProblemModel,
        request: &'a OptimizeRequest,
        matrix: &'a TravelTimeMatrix,
    ) -> Self {
        Self {
            model,
            request,
            matrix,
        }
    }

    /// Decode every vehicle's route.
    ///
    /// Fails with an internal error when the solution does not cover each
    /// stop exactly once or a route no longer schedules.
    pub(crate) fn decode(&self, solution: &Solution) -> Result<Decoded, SolveError> {
        self.check_coverage(solution)?;
        let mut routes = Vec::new();
        let mut meters = 0.0;
        for ((index, vehicle), route) in self
            .request
            .vehicles
            .iter()
            .enumerate()
            .zip(solution.routes())
        {
            let days = self.decode_vehicle(index, route)?;
            routes.extend(
                days.into_iter()
                    .map(|(day, stops)| VehicleRoute::from_stops(vehicle.id.clone(), day, stops)),
            );
            meters = add_meters(
                meters,
                arcs(route).filter_map(|(from, to)| self.matrix.distance_meters(from, to)),
            );
        }
        Ok(Decoded {
            routes,
            total_distance_km: to_km(meters),
        })
    }

    fn check_coverage(&self, solution: &Solution) -> Result<(), SolveError> {
        let mut seen = vec![0_u32; self.model.node_count()];
        for node in solution.routes().iter().flatten() {
            let slot = seen
                .get_mut(*node)
                .filter(|_| *node != DEPOT)
                .ok_or_else(|| SolveError::internal(format!("route visits unknown node {node}")))?;
            *slot = slot.saturating_add(1);
        }
        let missed: Vec<usize> = self
            .model
            .stop_nodes()
            .filter(|node| seen.get(*node).copied() != Some(1))
            .collect();
        if missed.is_empty() {
            Ok(())
        } else {
            Err(SolveError::internal(format!(
                "nodes {missed:?} are not visited exactly once"
            )))
        }
    }

    fn decode_vehicle(
        &self,
        vehicle: usize,
        route: &[usize],
    ) -> Result<BTreeMap<u8, Vec<RouteStop>>, SolveError> {
        let schedule = earliest_schedule(self.model, vehicle, route).ok_or_else(|| {
            SolveError::internal(format!("route of vehicle {vehicle} is not schedulable"))
        })?;
        let mut days: BTreeMap<u8, Vec<RouteStop>> = BTreeMap::new();
        let mut predecessor = DEPOT;
        for (&node, &arrival) in route.iter().zip(&schedule.arrivals) {
            let stop = node
                .checked_sub(1)
                .and_then(|index| self.request.stops.get(index))
                .ok_or_else(|| SolveError::internal(format!("no stop behind node {node}")))?;
            let arrival_time = u32::try_from(arrival)
                .map_err(|_| SolveError::internal(format!("arrival {arrival} overflows")))?;
            let (day_idx, clamped) = day_index(arrival_time);
            if clamped {
                warn!(
                    "stop {} arrives at minute {arrival_time}, past the working week; reporting it on day {day_idx}",
                    stop.id
                );
            }
            let travel_time_from_prev = self.matrix.duration(predecessor, node).ok_or_else(|| {
                SolveError::internal(format!("no travel time from {predecessor} to {node}"))
            })?;
            let day = days.entry(day_idx).or_default();
            let sequence = u32::try_from(day.len().saturating_add(1))
                .map_err(|_| SolveError::internal("route too long"))?;
            day.push(RouteStop {
                stop_id: stop.id,
                sequence,
                arrival_time,
                departure_time: arrival_time.saturating_add(stop.service_minutes),
                travel_time_from_prev,
                day_idx,
            });
            predecessor = node;
        }
        Ok(days)
    }
}

#[expect(clippy::float_arithmetic, reason = "distances are reported as floats")]
fn add_meters(total: f64, legs: impl Iterator<Item = f64>) -> f64 {
    legs.fold(total, |sum, leg| sum + leg)
}

#[expect(clippy::float_arithmetic, reason = "distances are reported as floats")]
fn to_km(meters: f64) -> f64 {
    meters / METERS_PER_KM
}
