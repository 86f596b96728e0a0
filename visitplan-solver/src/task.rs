//! Run a solve on its own thread.
//!
//! Search is CPU-bound and may take up to its full time limit. A caller that
//! dispatches requests (a server loop, a UI) spawns a [`SolveTask`] instead of
//! blocking, then polls [`SolveTask::is_finished`] or waits on
//! [`SolveTask::join`]. Each task owns its request and shares only the
//! immutable solver.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use visitplan_core::{OptimizeRequest, OptimizeResponse, SolveError, Solver};

const THREAD_NAME: &str = "visitplan-solve";

/// Handle to a solve running on a dedicated thread.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use visitplan_core::test_support::{UnitTravelTimeProvider, stop, vehicle};
/// use visitplan_core::OptimizeRequest;
/// use visitplan_solver::test_support::deterministic_config;
/// use visitplan_solver::{SolveTask, VisitSolver};
///
/// let solver = Arc::new(VisitSolver::with_config(
///     UnitTravelTimeProvider,
///     deterministic_config(10),
/// ));
/// let request = OptimizeRequest::new(vec![stop(7, 0, 600)], vec![vehicle("van")]);
///
/// let task = SolveTask::spawn(solver, request)?;
/// let response = task.join()?;
/// assert_eq!(response.visit_count(), 1);
/// # Ok::<(), visitplan_core::SolveError>(())
/// ```
#[derive(Debug)]
pub struct SolveTask {
    handle: JoinHandle<Result<OptimizeResponse, SolveError>>,
}

impl SolveTask {
    /// Start solving `request` on a new named thread.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Internal`] when the operating system refuses to
    /// create the thread.
    pub fn spawn<S>(solver: Arc<S>, request: OptimizeRequest) -> Result<Self, SolveError>
    where
        S: Solver + ?Sized + 'static,
    {
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_owned())
            .spawn(move || solver.solve(&request))
            .map_err(|err| SolveError::internal(format!("failed to spawn solve thread: {err}")))?;
        Ok(Self { handle })
    }

    /// Whether the solve has completed, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the solve and return its result.
    ///
    /// # Errors
    ///
    /// Returns the solver's error, or [`SolveError::Internal`] when the solve
    /// thread panicked.
    pub fn join(self) -> Result<OptimizeResponse, SolveError> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(SolveError::internal("solve thread panicked")))
    }
}
