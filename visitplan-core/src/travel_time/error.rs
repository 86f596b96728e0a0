use thiserror::Error;

/// Errors from [`crate::travel_time::TravelTimeProvider::get_travel_time_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// No coordinates were provided.
    #[error("at least one location is required")]
    EmptyInput,

    /// The routing service did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },

    /// The routing service could not be reached.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Underlying transport message.
        message: String,
    },

    /// The routing service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response or client message.
        message: String,
    },

    /// The routing service reported a failure in its response body.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `InvalidQuery`.
        code: String,
        /// Service message.
        message: String,
    },

    /// The response body could not be understood.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Parser message.
        message: String,
    },

    /// The matrix does not match the number of requested locations.
    #[error("expected a {expected}x{expected} matrix but got {actual} rows or columns")]
    DimensionMismatch {
        /// Requested size.
        expected: usize,
        /// Offending row count or row length.
        actual: usize,
    },

    /// The routing service found no route between two locations.
    #[error("no route from location {from} to location {to}")]
    UnroutablePair {
        /// Origin index.
        from: usize,
        /// Destination index.
        to: usize,
    },
}

impl MatrixError {
    /// Whether the failure is a connectivity problem rather than a broken
    /// response.
    ///
    /// Transient failures may be replaced by a locally computed estimate;
    /// every other variant means the service contract was violated and must
    /// surface to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use visitplan_core::MatrixError;
    ///
    /// let timeout = MatrixError::Timeout { url: "http://osrm".into(), timeout_secs: 30 };
    /// assert!(timeout.is_transient());
    /// assert!(!MatrixError::ParseError { message: "missing durations".into() }.is_transient());
    /// ```
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::NetworkError { .. } | Self::HttpError { .. }
        )
    }
}
