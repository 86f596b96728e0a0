//! Optimize command implementation for the visitplan CLI.

use std::io::{BufReader, Write};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use visitplan_core::{OptimizeRequest, OptimizeResponse, Solver};
use visitplan_data::{
    FallbackTravelTimeProvider, HttpTravelTimeProvider, HttpTravelTimeProviderConfig,
};
use visitplan_solver::{SolveTask, VisitSolver, VisitSolverConfig};

use crate::fs::{file_is_file, open_utf8_file, write_utf8_file};
use crate::{
    ARG_MAX_ITERATIONS, ARG_OSRM_BASE_URL, ARG_OSRM_PROFILE, ARG_OUTPUT, ARG_REQUEST,
    ARG_TIME_LIMIT_SECS, CliError, ENV_REQUEST,
};

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "optimize",
    long_about = "Plan a working week for a fleet of vehicles. The request is \
                 a JSON-encoded OptimizeRequest; travel times come from an \
                 OSRM instance, falling back to great-circle estimates when \
                 it cannot be reached.",
    about = "Plan a week of visits"
)]
#[ortho_config(prefix = "VISITPLAN")]
pub(crate) struct OptimizeArgs {
    /// Path to a JSON file containing an OptimizeRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile.
    #[arg(long = ARG_OSRM_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Wall-clock budget for the improvement search, in seconds.
    #[arg(long = ARG_TIME_LIMIT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit_secs: Option<u64>,
    /// Cap on improvement iterations, for reproducible runs.
    #[arg(long = ARG_MAX_ITERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_iterations: Option<u64>,
    /// Write the response here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl OptimizeArgs {
    fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptimizeConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Base URL for the OSRM table service.
    pub(crate) osrm_base_url: String,
    /// OSRM routing profile.
    pub(crate) osrm_profile: String,
    /// Search time budget.
    pub(crate) time_limit: Duration,
    /// Optional iteration cap.
    pub(crate) max_iterations: Option<u64>,
    /// Response destination; stdout when absent.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl OptimizeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.request_path;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_REQUEST,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_REQUEST,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_REQUEST,
                path: path.clone(),
                source,
            }),
        }
    }

    pub(crate) fn solver_config(&self) -> VisitSolverConfig {
        let config = VisitSolverConfig::default().with_time_limit(self.time_limit);
        match self.max_iterations {
            Some(cap) => config.with_max_iterations(cap),
            None => config,
        }
    }
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REQUEST,
        })?;
        let defaults = HttpTravelTimeProviderConfig::default();
        let time_limit = args
            .time_limit_secs
            .map_or(VisitSolverConfig::default().time_limit, Duration::from_secs);

        Ok(Self {
            request_path,
            osrm_base_url: args.osrm_base_url.unwrap_or(defaults.base_url),
            osrm_profile: args.osrm_profile.unwrap_or(defaults.profile),
            time_limit,
            max_iterations: args.max_iterations,
            output: args.output,
        })
    }
}

/// Builds a solver instance for the current invocation.
pub(crate) trait OptimizeSolverBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<Arc<dyn Solver>, CliError>;
}

/// OSRM with a great-circle fallback, feeding a [`VisitSolver`].
pub(crate) struct DefaultOptimizeSolverBuilder;

impl OptimizeSolverBuilder for DefaultOptimizeSolverBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<Arc<dyn Solver>, CliError> {
        let http = HttpTravelTimeProviderConfig::new(config.osrm_base_url.clone())
            .with_profile(config.osrm_profile.clone());
        let primary = HttpTravelTimeProvider::with_config(http).map_err(|source| {
            CliError::BuildTravelTimeProvider {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        let provider = FallbackTravelTimeProvider::with_great_circle(primary);
        Ok(Arc::new(VisitSolver::with_config(
            provider,
            config.solver_config(),
        )))
    }
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(args, &DefaultOptimizeSolverBuilder, &mut stdout)
}

pub(crate) fn run_optimize_with(
    args: OptimizeArgs,
    builder: &dyn OptimizeSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_optimize_config(args)?;
    let response = execute_optimize(&config, builder)?;
    let payload = serde_json::to_string_pretty(&response).map_err(CliError::SerialiseResponse)?;
    match &config.output {
        Some(path) => write_utf8_file(path, format!("{payload}\n").as_bytes()).map_err(|source| {
            CliError::WriteOutputFile {
                path: path.clone(),
                source,
            }
        }),
        None => write_payload(writer, &payload),
    }
}

fn resolve_optimize_config(args: OptimizeArgs) -> Result<OptimizeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    debug!("resolved optimize configuration: {config:?}");
    Ok(config)
}

fn execute_optimize(
    config: &OptimizeConfig,
    builder: &dyn OptimizeSolverBuilder,
) -> Result<OptimizeResponse, CliError> {
    let request = load_request(&config.request_path)?;
    request
        .validate()
        .map_err(|source| CliError::InvalidRequest {
            path: config.request_path.clone(),
            source,
        })?;
    let solver = builder.build(config)?;
    let response = SolveTask::spawn(solver, request)
        .and_then(SolveTask::join)
        .map_err(|source| CliError::Solve { source })?;
    info!(
        "planned {} visits on {} routes in {} ms",
        response.visit_count(),
        response.routes.len(),
        response.computation_time_ms
    );
    Ok(response)
}

/// Loads a JSON-encoded [`OptimizeRequest`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<OptimizeRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_payload(writer: &mut dyn Write, payload: &str) -> Result<(), CliError> {
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
