//! The solver seam and its error taxonomy.

use thiserror::Error;

use crate::{MatrixError, OptimizeRequest, OptimizeResponse, RequestValidationError};

/// Why no feasible schedule could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfeasibleReason {
    /// The stops cannot be reached inside their windows by any vehicle, even
    /// when visited alone.
    #[error("stops {stop_ids:?} cannot be served by any vehicle within their time windows")]
    UnreachableStops {
        /// Identifiers of the unreachable stops, in request order.
        stop_ids: Vec<u64>,
    },
    /// Construction could not insert these stops alongside the others.
    #[error("stops {stop_ids:?} could not be placed on any route")]
    UnplacedStops {
        /// Identifiers of the stops left over, in request order.
        stop_ids: Vec<u64>,
    },
}

/// Errors returned by [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The request was rejected before any work was done.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    /// The travel-time lookup failed in a way that could not be recovered.
    #[error("travel time lookup failed: {0}")]
    Matrix(#[from] MatrixError),
    /// No schedule serving every stop exists under the constraints.
    #[error("problem is infeasible: {0}")]
    Infeasible(InfeasibleReason),
    /// An unexpected failure inside modelling, search or decoding.
    #[error("internal solver error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl SolveError {
    /// Whether the caller must change the request to succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use visitplan_core::{RequestValidationError, SolveError};
    ///
    /// let err = SolveError::from(RequestValidationError::NoStops);
    /// assert!(err.is_caller_fault());
    /// assert!(!err.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_caller_fault(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Backend and internal failures qualify; an infeasible problem stays
    /// infeasible however often it is submitted.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Matrix(_) | Self::Internal { .. })
    }

    /// Shorthand for an [`SolveError::Internal`] with a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Produce weekly routes for every stop in a request.
///
/// Implementations should return [`SolveError::InvalidRequest`] for invalid
/// parameters rather than panicking, and must never return a response that
/// omits a stop. Solvers must be `Send + Sync` to operate safely across
/// threads.
pub trait Solver: Send + Sync {
    /// Solve a request, producing routes or an error.
    fn solve(&self, request: &OptimizeRequest) -> Result<OptimizeResponse, SolveError>;
}
