//! CLI operation mode handlers.
//!
//! This module contains the implementations for each command:
//! - [`report`]: Repository and branch protection report
//! - [`webhooks`]: Webhook inventory and removal by host
//! - [`branch_protection`]: Default branch protection over a repository list
//! - [`dependabot`]: Dependabot toggles over a repository list
//!
//! Output formatting utilities are in [`output`].

use std::io::Write;
use std::time::Duration;

use repowarden::config::OperationMode;
use repowarden::github::{
    AdminError, OrganizationLocator, PersonalAccessToken, RateLimitGateway,
    RepositoryPageGateway, WebhookGateway,
};
use repowarden::pipeline::{RunController, RunState};
use repowarden::telemetry::{TelemetryEvent, TelemetrySink};
use repowarden::RepowardenConfig;
use tracing::warn;

pub mod branch_protection;
pub mod dependabot;
pub mod output;
pub mod report;
pub mod webhooks;

#[cfg(test)]
pub mod test_utils;

/// Resolves the token and organisation locator every command needs.
///
/// # Errors
///
/// Returns [`AdminError::MissingOrganization`], [`AdminError::MissingToken`],
/// or [`AdminError::InvalidUrl`] when configuration is incomplete.
pub fn credentials(
    config: &RepowardenConfig,
) -> Result<(PersonalAccessToken, OrganizationLocator), AdminError> {
    let locator = config.organization_locator()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    Ok((token, locator))
}

/// Resolves credentials and builds the gateway for a command.
///
/// # Errors
///
/// Returns the credential error or whatever `build_gateway` reports.
pub fn connect<G, F>(config: &RepowardenConfig, build_gateway: F) -> Result<G, AdminError>
where
    F: FnOnce(&PersonalAccessToken, &OrganizationLocator) -> Result<G, AdminError>,
{
    let (token, locator) = credentials(config)?;
    build_gateway(&token, &locator)
}

/// Ends a traversal that failed before it started.
///
/// The summary and marker describe an untouched run: zero calls, the
/// configured start cursor, and `completedAllCalls=false`. `error` is always
/// returned; a marker that cannot be written is only logged.
///
/// # Errors
///
/// Always returns `error`.
pub fn abandon_run<O: Write>(
    config: &RepowardenConfig,
    mode: OperationMode,
    telemetry: &dyn TelemetrySink,
    writer: &mut O,
    error: AdminError,
) -> Result<(), AdminError> {
    let state = RunState::new(config.start_cursor.as_deref(), Duration::ZERO);
    telemetry.record(TelemetryEvent::run_finished(mode.as_str(), &state));

    let written = state.marker().to_line().and_then(|line| {
        writeln!(writer, "{line}").map_err(|write_error| AdminError::Io {
            message: format!("failed to write resume marker: {write_error}"),
        })
    });
    if let Err(marker_error) = written {
        warn!(%marker_error, "resume marker not written");
    }
    Err(error)
}

/// Records the run summary and writes the resume marker.
///
/// # Errors
///
/// Returns [`AdminError::Io`] when the marker cannot be written.
pub fn finish_run<R, P, W, O>(
    controller: &RunController<'_, R, P, W>,
    mode: OperationMode,
    telemetry: &dyn TelemetrySink,
    writer: &mut O,
) -> Result<(), AdminError>
where
    R: RateLimitGateway,
    P: RepositoryPageGateway,
    W: WebhookGateway,
    O: Write,
{
    telemetry.record(TelemetryEvent::run_finished(
        mode.as_str(),
        controller.state(),
    ));
    controller.finish(writer)
}
