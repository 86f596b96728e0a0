//! Property-based tests for the visit planner.
//!
//! These tests use `proptest` to assert invariants that must hold for all
//! valid solver inputs, complementing the golden scenario regression tests and
//! BDD behavioural tests.
//!
//! # Invariants tested
//!
//! - **Coverage:** every stop appears exactly once in a successful response.
//! - **Windows:** each arrival lies inside its stop's window.
//! - **Timing:** departure is arrival plus service; consecutive visits leave
//!   room for the travel between them and never idle beyond the slack.
//! - **Days:** `day_idx` is the arrival's day, and a route's visits share it.
//! - **Sequences:** sequences count from 1 within each (vehicle, day) route.
//! - **Totals:** route totals equal the sums recomputed from their visits.
//! - **Outcome:** a solve either succeeds or reports infeasibility; it never
//!   fails internally and never ends worse than its first solution.


use std::collections::HashSet;

use proptest::prelude::*;
use visitplan_core::test_support::FixedMatrixTravelTimeProvider;
use visitplan_core::{
    LAST_DAY_IDX, OptimizeResponse, SolveError, Solver, day_index,
};
use visitplan_solver::VisitSolver;
use visitplan_solver::test_support::deterministic_config;

use proptest_support::{Problem, problem_strategy, visits_by_vehicle};

const SLACK_MINUTES: u32 = 60;
const HORIZON_MINUTES: u32 = 2400;

fn solve(problem: &Problem) -> Result<OptimizeResponse, SolveError> {
    let provider = FixedMatrixTravelTimeProvider::from_minutes(problem.minutes.clone());
    VisitSolver::with_config(provider, deterministic_config(15)).solve(&problem.request)
}

fn check_vehicle_timing(
    problem: &Problem,
    visits: &[&visitplan_core::RouteStop],
) -> Result<(), TestCaseError> {
    let mut previous: Option<(usize, u32)> = None;
    for visit in visits {
        let found = problem.node_of(visit.stop_id);
        prop_assert!(found.is_some(), "unknown stop {}", visit.stop_id);
        let node = found.unwrap_or_default();
        let from = previous.map_or(0, |(prev, _)| prev);
        let travel = problem.travel(from, node).unwrap_or_default();
        prop_assert_eq!(visit.travel_time_from_prev, travel);
        if let Some((_, departure)) = previous {
            prop_assert!(visit.arrival_time >= departure + travel);
            prop_assert!(visit.arrival_time <= departure + travel + SLACK_MINUTES);
        } else {
            prop_assert!(visit.arrival_time >= travel);
        }
        previous = Some((node, visit.departure_time));
    }
    if let Some((last, departure)) = previous {
        let back = problem.travel(last, 0).unwrap_or_default();
        prop_assert!(departure + back <= HORIZON_MINUTES);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: successful responses cover every stop exactly once.
    #[test]
    fn every_stop_is_visited_once(problem in problem_strategy(6, 3)) {
        if let Ok(response) = solve(&problem) {
            let ids: Vec<u64> = response.visits().map(|visit| visit.stop_id).collect();
            let unique: HashSet<u64> = ids.iter().copied().collect();
            prop_assert_eq!(ids.len(), unique.len(), "duplicate visits: {:?}", ids);
            prop_assert_eq!(ids.len(), problem.request.stops.len());
        }
    }

    /// Property: arrivals respect windows and departures add service time.
    #[test]
    fn visits_respect_windows_and_service(problem in problem_strategy(6, 3)) {
        if let Ok(response) = solve(&problem) {
            for visit in response.visits() {
                let found = problem.stop(visit.stop_id);
                prop_assert!(found.is_some());
                if let Some(stop) = found {
                    prop_assert!(visit.arrival_time >= stop.tw_start);
                    prop_assert!(visit.arrival_time <= stop.tw_end);
                    prop_assert_eq!(visit.departure_time - visit.arrival_time, stop.service_minutes);
                }
            }
        }
    }

    /// Property: travel, waiting and the horizon are consistent per vehicle.
    #[test]
    fn vehicle_timelines_are_consistent(problem in problem_strategy(6, 3)) {
        if let Ok(response) = solve(&problem) {
            for visits in visits_by_vehicle(&response).values() {
                check_vehicle_timing(&problem, visits)?;
            }
        }
    }

    /// Property: day indices follow arrivals and sequences restart per route.
    #[test]
    fn days_and_sequences_are_well_formed(problem in problem_strategy(6, 3)) {
        if let Ok(response) = solve(&problem) {
            for route in &response.routes {
                prop_assert!(route.day_idx <= LAST_DAY_IDX);
                for (position, visit) in route.stops.iter().enumerate() {
                    prop_assert_eq!(visit.day_idx, route.day_idx);
                    prop_assert_eq!(visit.day_idx, day_index(visit.arrival_time).0);
                    prop_assert_eq!(usize::try_from(visit.sequence).ok(), Some(position + 1));
                }
            }
        }
    }

    /// Property: route totals match an independent recomputation.
    #[test]
    fn route_totals_match_visits(problem in problem_strategy(6, 3)) {
        if let Ok(response) = solve(&problem) {
            for route in &response.routes {
                let duration: u32 = route
                    .stops
                    .iter()
                    .map(|visit| visit.departure_time - visit.arrival_time)
                    .sum();
                let travel: u32 = route.stops.iter().map(|visit| visit.travel_time_from_prev).sum();
                prop_assert_eq!(route.total_duration, duration);
                prop_assert_eq!(route.total_travel_time, travel);
            }
        }
    }

    /// Property: solves never fail internally and never regress.
    #[test]
    fn outcome_is_success_or_infeasible(problem in problem_strategy(6, 3)) {
        match solve(&problem) {
            Ok(response) => {
                prop_assert!(response.diagnostics.final_cost <= response.diagnostics.construction_cost);
                prop_assert!(response.diagnostics.iterations <= 15);
            }
            Err(err) => prop_assert!(matches!(err, SolveError::Infeasible(_)), "unexpected error {}", err),
        }
    }
}
