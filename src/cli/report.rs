//! Repository and branch protection report operation.

use std::io::{self, Write};

use repowarden::config::OperationMode;
use repowarden::github::{
    AdminError, OctocrabAdminGateway, OrganizationLocator, PersonalAccessToken,
    RateLimitGateway, RepositoryPage, RepositoryPageGateway, TeamAccess, TeamGateway,
    WebhookGateway,
};
use repowarden::pipeline::{RunController, progress::logging_callback};
use repowarden::report::{FileReportWriter, ReportWriter, generate_repository_report, publish};
use repowarden::telemetry::TelemetrySink;
use repowarden::RepowardenConfig;
use tracing::info;

use super::output::write_report_written;
use super::{abandon_run, connect, finish_run};

/// Writes the repository report to the configured destination.
///
/// # Errors
///
/// Returns [`AdminError::Configuration`] if required configuration is
/// missing, [`AdminError::GraphQlCallFailed`] if listing fails, or
/// [`AdminError::Report`] if the report cannot be generated or written.
pub async fn run(
    config: &RepowardenConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), AdminError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(
        config,
        OctocrabAdminGateway::for_token,
        &FileReportWriter,
        telemetry,
        &mut stdout,
    )
    .await
}

/// Writes the repository report using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways. The resume
/// marker is written to `writer` whether or not the report succeeds, including
/// when configuration or credentials are rejected before the run starts.
pub async fn run_with_gateway_builder<G, F, R, W>(
    config: &RepowardenConfig,
    build_gateway: F,
    report_writer: &R,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: RateLimitGateway + RepositoryPageGateway + WebhookGateway + TeamGateway,
    F: FnOnce(&PersonalAccessToken, &OrganizationLocator) -> Result<G, AdminError>,
    R: ReportWriter,
    W: Write,
{
    let mode = OperationMode::Report;
    let prepared = config
        .require_file_path()
        .and_then(|_| config.file_type())
        .and_then(|_| connect(config, build_gateway));
    let gateway = match prepared {
        Ok(gateway) => gateway,
        Err(error) => return abandon_run(config, mode, telemetry, writer, error),
    };
    let mut controller =
        match RunController::new(&gateway, &gateway, &gateway, config.run_options()) {
            Ok(controller) => controller.with_progress(logging_callback()),
            Err(error) => return abandon_run(config, mode, telemetry, writer, error),
        };

    let outcome = write_report(&mut controller, &gateway, config, report_writer, writer).await;
    let finished = finish_run(&controller, mode, telemetry, writer);
    outcome.and(finished)
}

async fn write_report<G, R, W>(
    controller: &mut RunController<'_, G, G, G>,
    gateway: &G,
    config: &RepowardenConfig,
    report_writer: &R,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: RateLimitGateway + RepositoryPageGateway + WebhookGateway + TeamGateway,
    R: ReportWriter,
    W: Write,
{
    let pages = controller.collect_report_pages().await?;
    if config.dry_run || controller.state().stop_reason().is_some() {
        info!("no report written");
        return Ok(());
    }

    let path = config.require_file_path()?;
    let file_type = config.file_type()?;
    let team_access = team_access(gateway, config.team.as_deref()).await?;
    let contents = generate_repository_report(
        file_type,
        config.ignore_archived,
        &pages,
        team_access.as_ref(),
    )?;
    publish(report_writer, path, &contents)?;
    write_report_written(writer, path, file_type, surviving_count(&pages, config))
}

async fn team_access<G: TeamGateway>(
    gateway: &G,
    team: Option<&str>,
) -> Result<Option<TeamAccess>, AdminError> {
    let Some(slug) = team else {
        return Ok(None);
    };
    let access = gateway.team_access(slug).await?;
    info!(team = slug, repositories = access.len(), "loaded team access");
    Ok(Some(access))
}

fn surviving_count(pages: &[RepositoryPage], config: &RepowardenConfig) -> usize {
    pages
        .iter()
        .flat_map(|page| page.nodes.iter())
        .filter(|node| !(config.ignore_archived && node.is_archived))
        .count()
}
