//! Dependabot toggle operation over a repository list.

use std::io::{self, Write};

use repowarden::admin::{DependabotCommand, read_repository_list};
use repowarden::config::OperationMode;
use repowarden::github::{
    AdminError, DependabotGateway, OctocrabAdminGateway, OrganizationLocator,
    PersonalAccessToken,
};
use repowarden::telemetry::{TelemetryEvent, TelemetrySink};
use repowarden::RepowardenConfig;

use super::credentials;
use super::output::write_admin_summary;

/// Applies `--dependabot on|off` to every listed repository.
///
/// # Errors
///
/// Returns [`AdminError::Configuration`] when the repository list or the
/// toggle is missing or invalid.
pub async fn run(
    config: &RepowardenConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), AdminError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabAdminGateway::for_token, telemetry, &mut stdout)
        .await
}

/// Applies the Dependabot toggle using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &RepowardenConfig,
    build_gateway: F,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), AdminError>
where
    G: DependabotGateway,
    F: FnOnce(&PersonalAccessToken, &OrganizationLocator) -> Result<G, AdminError>,
    W: Write,
{
    let toggle = config.dependabot_toggle()?;
    let repositories = read_repository_list(config.require_repos_file()?)?;
    let (token, locator) = credentials(config)?;

    let gateway = build_gateway(&token, &locator)?;
    let summary = DependabotCommand::new(&gateway, toggle)
        .run(&repositories, config.dry_run)
        .await;

    let operation = OperationMode::Dependabot.as_str();
    telemetry.record(TelemetryEvent::admin_finished(operation, &summary));
    write_admin_summary(writer, operation, &summary)
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use repowarden::github::AdminError;
    use repowarden::RepowardenConfig;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::run_with_gateway_builder;
    use crate::cli::test_utils::{FakeGateway, RecordingSink};

    fn config_for(temp: &TempDir, toggle: &str) -> RepowardenConfig {
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("temp dir should be UTF-8");
        let path = root.join("repos.txt");
        std::fs::write(path.as_std_path(), "alpha\n").expect("repos file should be written");
        RepowardenConfig {
            token: Some("ghp_example".to_owned()),
            org: Some("octo-org".to_owned()),
            repos_file: Some(path.into_string()),
            dependabot: Some(toggle.to_owned()),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("on", vec!["alerts alpha true", "fixes alpha true"])]
    #[case("off", vec!["fixes alpha false", "alerts alpha false"])]
    #[tokio::test]
    async fn toggles_in_dependency_order(#[case] toggle: &str, #[case] expected: Vec<&str>) {
        let temp = TempDir::new().expect("temp dir should be created");
        let config = config_for(&temp, toggle);
        let gateway = FakeGateway::default();
        let probe = gateway.clone();
        let mut buffer = Vec::new();

        run_with_gateway_builder(&config, |_, _| Ok(gateway), &RecordingSink::default(), &mut buffer)
            .await
            .expect("dependabot toggle should succeed");

        assert_eq!(probe.recorded_calls(), expected);
        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert!(output.contains("dependabot: 1 succeeded, 0 failed"), "{output}");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_toggle_fails_before_building_gateway() {
        let temp = TempDir::new().expect("temp dir should be created");
        let config = config_for(&temp, "maybe");
        let mut buffer = Vec::new();

        let result = run_with_gateway_builder(
            &config,
            |_, _| -> Result<FakeGateway, AdminError> {
                panic!("gateway must not be built for an invalid toggle")
            },
            &RecordingSink::default(),
            &mut buffer,
        )
        .await;

        assert!(matches!(result, Err(AdminError::Configuration { .. })));
    }
}
