//! Test helpers for writing requests and stubbing the solver.

use std::sync::Arc;

use camino::Utf8Path;
use visitplan_core::test_support::{FixedMatrixTravelTimeProvider, stop, vehicle};
use visitplan_core::{OptimizeRequest, Solver};
use visitplan_solver::VisitSolver;

use crate::CliError;
use crate::optimize::{OptimizeConfig, OptimizeSolverBuilder};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn write_request(path: &Utf8Path, request: &OptimizeRequest) {
    let payload = serde_json::to_string_pretty(request).expect("serialize request");
    write_utf8(path, payload.as_bytes());
}

/// Depot, stop 1 and stop 2 on a line, 10 then 5 minutes apart.
pub(super) fn two_monday_stops() -> OptimizeRequest {
    OptimizeRequest::new(
        vec![stop(1, 0, 100), stop(2, 0, 200)],
        vec![vehicle("van-1")],
    )
}

/// Builds a [`VisitSolver`] over a fixed matrix instead of OSRM.
pub(super) struct FixedMatrixSolverBuilder {
    pub(super) rows: Vec<Vec<u32>>,
}

impl FixedMatrixSolverBuilder {
    pub(super) fn line() -> Self {
        Self {
            rows: vec![vec![0, 10, 15], vec![10, 0, 5], vec![15, 5, 0]],
        }
    }
}

impl OptimizeSolverBuilder for FixedMatrixSolverBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<Arc<dyn Solver>, CliError> {
        Ok(Arc::new(VisitSolver::with_config(
            FixedMatrixTravelTimeProvider::from_minutes(self.rows.clone()),
            config.solver_config(),
        )))
    }
}
