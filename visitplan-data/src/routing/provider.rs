//! HTTP-based `TravelTimeProvider` using OSRM's Table API.
//!
//! # Architecture
//!
//! The [`TravelTimeProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally.
//!
//! Durations arrive in seconds and are floored to whole minutes, so travel
//! legs are never overestimated.

use std::time::Duration;

use geo::Coord;
use log::{debug, warn};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use visitplan_core::{MatrixError, MatrixSource, TravelTimeMatrix, TravelTimeProvider};

use super::osrm::TableResponse;

/// Error type for [`HttpTravelTimeProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "visitplan-routing/0.1";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Configuration for [`HttpTravelTimeProvider`].
#[derive(Debug, Clone)]
pub struct HttpTravelTimeProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment of the URL (e.g., `"driving"`).
    pub profile: String,
    /// Request timeout duration, applied to connecting and to the whole call.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Whether to ask OSRM for the distance annotation as well.
    pub request_distances: bool,
}

impl Default for HttpTravelTimeProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            request_distances: true,
        }
    }
}

impl HttpTravelTimeProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Choose whether distances are requested alongside durations.
    #[must_use]
    pub const fn with_distances(mut self, request_distances: bool) -> Self {
        self.request_distances = request_distances;
        self
    }
}

/// HTTP-based travel time provider using OSRM Table API.
///
/// The provider owns a `current_thread` Tokio runtime reused across calls.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// When called from within a `current_thread` Tokio runtime, the provider
/// falls back to its own internal runtime. This avoids the panic that
/// `block_in_place` would cause, but may deadlock if the caller's runtime is
/// driving IO this request depends on.
pub struct HttpTravelTimeProvider {
    client: Client,
    config: HttpTravelTimeProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTravelTimeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTravelTimeProvider")
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpTravelTimeProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpTravelTimeProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpTravelTimeProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &HttpTravelTimeProviderConfig {
        &self.config
    }

    /// Build the OSRM Table API URL for the given locations.
    ///
    /// The URL format is
    /// `{base_url}/table/v1/{profile}/{lon,lat;...}?annotations=...`.
    fn build_table_url(&self, locations: &[Coord<f64>]) -> String {
        let coords = locations
            .iter()
            .map(|c| format!("{},{}", c.x, c.y))
            .collect::<Vec<_>>()
            .join(";");
        let annotations = if self.config.request_distances {
            "duration,distance"
        } else {
            "duration"
        };

        format!(
            "{}/table/v1/{}/{}?annotations={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords,
            annotations
        )
    }

    /// Fetch the travel time matrix asynchronously.
    async fn fetch_matrix_async(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        let url = self.build_table_url(locations);
        debug!("requesting OSRM table for {} locations", locations.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        // A body that arrives but does not decode is a contract violation; a
        // body cut off mid-transfer is a connectivity failure.
        let table_response: TableResponse = response.json().await.map_err(|err| {
            if err.is_decode() {
                MatrixError::ParseError {
                    message: err.to_string(),
                }
            } else {
                self.convert_reqwest_error(&err, &url)
            }
        })?;

        convert_response(table_response, locations.len())
    }

    /// Convert a reqwest error to a `MatrixError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> MatrixError {
        if error.is_timeout() {
            return MatrixError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return MatrixError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        MatrixError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Convert an OSRM response into a matrix of whole minutes.
///
/// A missing duration matrix, a wrong shape, a `null` or invalid duration are
/// all protocol errors. A defective distance matrix is dropped with a warning
/// because distances are informational.
fn convert_response(
    response: TableResponse,
    expected: usize,
) -> Result<TravelTimeMatrix, MatrixError> {
    if !response.is_ok() {
        return Err(MatrixError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let durations = response
        .durations
        .ok_or_else(|| MatrixError::ParseError {
            message: "OSRM response missing durations array".to_owned(),
        })?;
    check_shape(&durations, expected)?;

    let minutes = durations
        .into_iter()
        .enumerate()
        .map(|(from, row)| {
            row.into_iter()
                .enumerate()
                .map(|(to, cell)| seconds_to_minutes(cell, from, to))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let matrix = TravelTimeMatrix::from_minutes(minutes, MatrixSource::Remote)?;
    match response.distances.map(|d| convert_distances(d, expected)) {
        Some(Ok(distances)) => matrix.with_distances(distances),
        Some(Err(reason)) => {
            warn!("discarding OSRM distances: {reason}");
            Ok(matrix)
        }
        None => Ok(matrix),
    }
}

fn check_shape<T>(rows: &[Vec<T>], expected: usize) -> Result<(), MatrixError> {
    if rows.len() != expected {
        return Err(MatrixError::DimensionMismatch {
            expected,
            actual: rows.len(),
        });
    }
    match rows.iter().find(|row| row.len() != expected) {
        Some(row) => Err(MatrixError::DimensionMismatch {
            expected,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}

fn seconds_to_minutes(cell: Option<f64>, from: usize, to: usize) -> Result<u32, MatrixError> {
    let seconds = cell.ok_or(MatrixError::UnroutablePair { from, to })?;
    if !(seconds.is_finite() && seconds >= 0.0) {
        return Err(MatrixError::ParseError {
            message: format!("invalid duration {seconds} from location {from} to {to}"),
        });
    }
    // Finite, non-negative and clamped, so the cast cannot wrap.
    let minutes = (seconds / SECONDS_PER_MINUTE)
        .floor()
        .min(f64::from(u32::MAX));
    Ok(minutes as u32)
}

fn convert_distances(
    distances: Vec<Vec<Option<f64>>>,
    expected: usize,
) -> Result<Vec<Vec<f64>>, String> {
    check_shape(&distances, expected).map_err(|err| err.to_string())?;
    distances
        .into_iter()
        .enumerate()
        .map(|(from, row)| {
            row.into_iter()
                .enumerate()
                .map(|(to, cell)| {
                    cell.filter(|m| m.is_finite() && *m >= 0.0)
                        .ok_or_else(|| format!("no distance from location {from} to {to}"))
                })
                .collect()
        })
        .collect()
}

impl TravelTimeProvider for HttpTravelTimeProvider {
    /// Fetch the travel time matrix for the given locations.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime should
    /// be multi-threaded. Inside a `current_thread` runtime the method uses
    /// its own internal runtime instead.
    fn get_travel_time_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<TravelTimeMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }

        let future = self.fetch_matrix_async(locations);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => self.runtime.block_on(future),
        }
    }
}
