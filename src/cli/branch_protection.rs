//! Branch protection operation over a repository list.

use std::io::{self, Write};

use repowarden::admin::{BranchProtectionCommand, read_repository_list};
use repowarden::config::OperationMode;
use repowarden::github::{
    AdminError, BranchProtectionGateway, OctocrabAdminGateway, OrganizationLocator,
    PersonalAccessToken,
};
use repowarden::telemetry::{TelemetryEvent, TelemetrySink};
use repowarden::RepowardenConfig;

use super::credentials;
use super::output::write_admin_summary;

/// Applies `--signing` and `--approvals` to every listed repository.
///
/// # Errors
///
/// Returns [`AdminError::Configuration`] when the repository list or the
/// settings are missing or invalid.
pub async fn run(
    config: &RepowardenConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), AdminError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabAdminGateway::for_token, telemetry, &mut stdout)
        .await
}

/// Applies branch protection using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &RepowardenConfig,
    build_gateway: F,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: BranchProtectionGateway,
    F: FnOnce(&PersonalAccessToken, &OrganizationLocator) -> Result<G, AdminError>,
    W: Write,
{
    let settings = config.protection_settings()?;
    let repositories = read_repository_list(config.require_repos_file()?)?;
    let (token, locator) = credentials(config)?;

    let gateway = build_gateway(&token, &locator)?;
    let command = BranchProtectionCommand::new(&gateway, settings)?;
    let summary = command.run(&repositories, config.dry_run).await;

    let operation = OperationMode::BranchProtection.as_str();
    telemetry.record(TelemetryEvent::admin_finished(operation, &summary));
    write_admin_summary(writer, operation, &summary)
}
