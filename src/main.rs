//! Repowarden CLI entrypoint for organisation-wide repository administration.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use repowarden::config::OperationMode;
use repowarden::telemetry::StderrJsonlTelemetrySink;
use repowarden::{AdminError, RepowardenConfig};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AdminError> {
    let config = load_config()?;
    let mode = config.operation_mode()?;
    let telemetry = StderrJsonlTelemetrySink;
    if let Err(error) = config.validate() {
        if mode.is_traversal() {
            return cli::abandon_run(&config, mode, &telemetry, &mut io::stdout().lock(), error);
        }
        return Err(error);
    }

    match mode {
        OperationMode::Report => cli::report::run(&config, &telemetry).await,
        OperationMode::Webhooks => cli::webhooks::run_inventory(&config, &telemetry).await,
        OperationMode::RemoveWebhooks => cli::webhooks::run_removal(&config, &telemetry).await,
        OperationMode::BranchProtection => cli::branch_protection::run(&config, &telemetry).await,
        OperationMode::Dependabot => cli::dependabot::run(&config, &telemetry).await,
    }
}

/// Installs the stderr log subscriber.
///
/// `REPOWARDEN_LOG` takes precedence over `RUST_LOG`; both default to
/// `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("REPOWARDEN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`AdminError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RepowardenConfig, AdminError> {
    RepowardenConfig::load().map_err(|error| AdminError::Configuration {
        message: error.to_string(),
    })
}
