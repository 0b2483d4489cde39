//! Webhook inventory and removal operations.

use std::io::{self, Write};

use camino::Utf8Path;
use repowarden::config::OperationMode;
use repowarden::github::{
    AdminError, OctocrabAdminGateway, OrganizationLocator, PersonalAccessToken,
    RateLimitGateway, RepositoryPageGateway, WebhookGateway,
};
use repowarden::pipeline::{RunController, progress::logging_callback};
use repowarden::report::{FileReportWriter, ReportWriter, generate_webhook_report, publish};
use repowarden::telemetry::TelemetrySink;
use repowarden::RepowardenConfig;
use tracing::info;

use super::output::{write_removal_summary, write_report_written, write_webhook_summary};
use super::{abandon_run, connect, finish_run};

/// Collects every repository's webhooks and writes the inventory.
///
/// The inventory is written to `--file-path` when set, otherwise summarised
/// on stdout.
///
/// # Errors
///
/// Returns [`AdminError::GraphQlCallFailed`] if listing fails or
/// [`AdminError::Report`] if the report cannot be generated or written.
pub async fn run_inventory(
    config: &RepowardenConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), AdminError> {
    let mut stdout = io::stdout().lock();
    run_inventory_with_gateway_builder(
        config,
        OctocrabAdminGateway::for_token,
        &FileReportWriter,
        telemetry,
        &mut stdout,
    )
    .await
}

/// Deletes every webhook delivering to `--webhook-host`.
///
/// # Errors
///
/// Returns [`AdminError::Configuration`] when no host is configured or
/// [`AdminError::GraphQlCallFailed`] if listing fails.
pub async fn run_removal(
    config: &RepowardenConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), AdminError> {
    let mut stdout = io::stdout().lock();
    run_removal_with_gateway_builder(config, OctocrabAdminGateway::for_token, telemetry, &mut stdout)
        .await
}

/// Collects the webhook inventory using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_inventory_with_gateway_builder<G, F, R, W>(
    config: &RepowardenConfig,
    build_gateway: F,
    report_writer: &R,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: RateLimitGateway + RepositoryPageGateway + WebhookGateway,
    F: FnOnce(&PersonalAccessToken, &OrganizationLocator) -> Result<G, AdminError>,
    R: ReportWriter,
    W: Write,
{
    let mode = OperationMode::Webhooks;
    let prepared = config
        .file_type()
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

    let outcome = write_inventory(&mut controller, config, report_writer, writer).await;
    let finished = finish_run(&controller, mode, telemetry, writer);
    outcome.and(finished)
}

/// Removes webhooks by host using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_removal_with_gateway_builder<G, F, W>(
    config: &RepowardenConfig,
    build_gateway: F,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: RateLimitGateway + RepositoryPageGateway + WebhookGateway,
    F: FnOnce(&PersonalAccessToken, &OrganizationLocator) -> Result<G, AdminError>,
    W: Write,
{
    let mode = OperationMode::RemoveWebhooks;
    let prepared = config.require_webhook_host().and_then(|host| {
        connect(config, build_gateway).map(|gateway| (host, gateway))
    });
    let (host, gateway) = match prepared {
        Ok(target) => target,
        Err(error) => return abandon_run(config, mode, telemetry, writer, error),
    };
    let mut controller =
        match RunController::new(&gateway, &gateway, &gateway, config.run_options()) {
            Ok(controller) => controller.with_progress(logging_callback()),
            Err(error) => return abandon_run(config, mode, telemetry, writer, error),
        };

    let outcome = remove_by_host(&mut controller, host, writer).await;
    let finished = finish_run(&controller, mode, telemetry, writer);
    outcome.and(finished)
}

async fn write_inventory<G, R, W>(
    controller: &mut RunController<'_, G, G, G>,
    config: &RepowardenConfig,
    report_writer: &R,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: RateLimitGateway + RepositoryPageGateway + WebhookGateway,
    R: ReportWriter,
    W: Write,
{
    let collection = controller.collect_webhooks().await?;
    if config.dry_run {
        return Ok(());
    }

    let Some(path) = config.file_path.as_deref().map(Utf8Path::new) else {
        return write_webhook_summary(writer, &collection);
    };
    if controller.state().stop_reason().is_some() && collection.hook_count() == 0 {
        info!("run stopped before any webhook was collected, no report written");
        return Ok(());
    }

    let file_type = config.file_type()?;
    let contents = generate_webhook_report(file_type, &collection)?;
    publish(report_writer, path, &contents)?;
    write_report_written(writer, path, file_type, collection.len())
}

async fn remove_by_host<G, W>(
    controller: &mut RunController<'_, G, G, G>,
    host: &str,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: RateLimitGateway + RepositoryPageGateway + WebhookGateway,
    W: Write,
{
    let collection = controller.collect_webhooks().await?;
    let summary = controller.remove_webhooks(&collection, host).await;
    write_removal_summary(writer, host, &summary)
}
