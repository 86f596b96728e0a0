//! `VisitSolver`: validation, matrix lookup, search and decoding.

use std::time::{Duration, Instant};

use log::info;
use visitplan_core::{
    Diagnostics, InfeasibleReason, MatrixError, OptimizeRequest, OptimizeResponse, SolveError,
    Solver, TravelTimeProvider, optimization_score,
};

use crate::decode::SolutionDecoder;
use crate::model::{ModelParams, ProblemModel};
use crate::search::{ConstructionFailure, SearchEngine, SearchLimits};

/// Configuration for [`VisitSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisitSolverConfig {
    /// Wall-clock budget of the improvement phase.
    pub time_limit: Duration,
    /// Optional cap on improvement iterations.
    ///
    /// With a cap set, results no longer depend on machine speed as long as
    /// the cap is reached before the time limit.
    pub max_iterations: Option<u64>,
    /// Maximum idle minutes between consecutive nodes.
    pub slack_minutes: u32,
    /// Working days covered by each vehicle's horizon.
    pub horizon_days: u32,
    /// Weight of arc penalties relative to the mean arc cost.
    pub penalty_factor: f64,
}

impl Default for VisitSolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            max_iterations: None,
            slack_minutes: 60,
            horizon_days: 5,
            penalty_factor: 0.1,
        }
    }
}

impl VisitSolverConfig {
    /// Set the wall-clock budget.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Cap the number of improvement iterations.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Set the maximum idle minutes between consecutive nodes.
    #[must_use]
    pub const fn with_slack_minutes(mut self, slack_minutes: u32) -> Self {
        self.slack_minutes = slack_minutes;
        self
    }
}

/// Weekly visit planner backed by a travel-time provider.
///
/// Each call to [`Solver::solve`] validates the request, fetches one travel
/// time matrix for the depot and every stop, builds the constrained routing
/// graph, searches it and decodes the result into per-day routes. No state
/// survives between calls.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use visitplan_core::test_support::{FixedMatrixTravelTimeProvider, stop, vehicle};
/// use visitplan_core::{OptimizeRequest, Solver};
/// use visitplan_solver::{VisitSolver, VisitSolverConfig};
///
/// let provider = FixedMatrixTravelTimeProvider::from_minutes(vec![
///     vec![0, 10, 20],
///     vec![10, 0, 5],
///     vec![20, 5, 0],
/// ]);
/// let config = VisitSolverConfig::default()
///     .with_time_limit(Duration::from_secs(1))
///     .with_max_iterations(50);
/// let solver = VisitSolver::with_config(provider, config);
/// let request = OptimizeRequest::new(
///     vec![stop(1, 0, 100), stop(2, 0, 200)],
///     vec![vehicle("van-1")],
/// );
///
/// let response = solver.solve(&request)?;
/// let arrivals: Vec<u32> = response.visits().map(|visit| visit.arrival_time).collect();
/// assert_eq!(arrivals, vec![10, 15]);
/// # Ok::<(), visitplan_core::SolveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VisitSolver<T> {
    travel_time_provider: T,
    config: VisitSolverConfig,
}

impl<T> VisitSolver<T>
where
    T: TravelTimeProvider,
{
    /// Construct a solver using default configuration.
    pub fn new(travel_time_provider: T) -> Self {
        Self::with_config(travel_time_provider, VisitSolverConfig::default())
    }

    /// Construct a solver with explicit configuration.
    pub const fn with_config(travel_time_provider: T, config: VisitSolverConfig) -> Self {
        Self {
            travel_time_provider,
            config,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &VisitSolverConfig {
        &self.config
    }

    const fn limits(&self) -> SearchLimits {
        SearchLimits {
            time_limit: self.config.time_limit,
            max_iterations: self.config.max_iterations,
            penalty_factor: self.config.penalty_factor,
        }
    }

    fn params(&self) -> ModelParams {
        ModelParams {
            slack: u64::from(self.config.slack_minutes),
            horizon_days: self.config.horizon_days,
        }
    }
}

impl<T> Solver for VisitSolver<T>
where
    T: TravelTimeProvider + Send + Sync,
{
    fn solve(&self, request: &OptimizeRequest) -> Result<OptimizeResponse, SolveError> {
        request.validate()?;
        let started_at = Instant::now();

        let locations = request.locations();
        let matrix = self.travel_time_provider.get_travel_time_matrix(&locations)?;
        if matrix.len() != locations.len() {
            return Err(MatrixError::DimensionMismatch {
                expected: locations.len(),
                actual: matrix.len(),
            }
            .into());
        }
        info!(
            "travel times for {} locations from {} source",
            locations.len(),
            matrix.source()
        );

        let model = ProblemModel::new(request, &matrix, self.params());
        let outcome = SearchEngine::new(&model, self.limits())
            .run()
            .map_err(|failure| infeasible(request, failure))?;
        let decoded = SolutionDecoder::new(&model, request, &matrix).decode(&outcome.solution)?;

        let computation_time_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            "planned {} stops on {} routes in {computation_time_ms} ms",
            request.stops.len(),
            decoded.routes.len()
        );
        Ok(OptimizeResponse {
            routes: decoded.routes,
            total_distance_km: decoded.total_distance_km,
            optimization_score: optimization_score(request.stops.len()),
            computation_time_ms,
            diagnostics: Diagnostics {
                matrix_source: matrix.source(),
                construction_cost: outcome.stats.construction_cost,
                final_cost: outcome.stats.final_cost,
                iterations: outcome.stats.iterations,
                penalty_rounds: outcome.stats.penalty_rounds,
            },
        })
    }
}

/// Map failed construction to stop identifiers in request order.
fn infeasible(request: &OptimizeRequest, failure: ConstructionFailure) -> SolveError {
    let ids = |nodes: Vec<usize>| -> Vec<u64> {
        nodes
            .into_iter()
            .filter_map(|node| node.checked_sub(1))
            .filter_map(|index| request.stops.get(index))
            .map(|stop| stop.id)
            .collect()
    };
    let reason = match failure {
        ConstructionFailure::Unreachable(nodes) => InfeasibleReason::UnreachableStops {
            stop_ids: ids(nodes),
        },
        ConstructionFailure::Unplaced(nodes) => InfeasibleReason::UnplacedStops {
            stop_ids: ids(nodes),
        },
    };
    SolveError::Infeasible(reason)
}
