//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use eyre::WrapErr;
use tracing_subscriber::EnvFilter;
use visitplan_cli::CliError;

fn main() -> eyre::Result<()> {
    init_logging();
    match visitplan_cli::run() {
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        outcome => outcome.wrap_err("visitplan failed"),
    }
}

/// Send log records to stderr; stdout carries the JSON response.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("visitplan: logging disabled: {err}");
    }
}
