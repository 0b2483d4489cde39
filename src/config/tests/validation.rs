//! Tests for configuration consistency validation.

use rstest::rstest;

use crate::RepowardenConfig;
use crate::github::AdminError;

fn report_config() -> RepowardenConfig {
    RepowardenConfig {
        org: Some("octo-org".to_owned()),
        file_path: Some("report.csv".to_owned()),
        ..Default::default()
    }
}

#[rstest]
fn report_with_destination_is_valid() {
    assert_eq!(report_config().validate(), Ok(()));
}

#[rstest]
fn timeout_above_maximum_is_rejected() {
    let config = RepowardenConfig {
        timeout: 121,
        ..report_config()
    };

    assert_eq!(
        config.validate(),
        Err(AdminError::InvalidTimeout {
            minutes: 121,
            maximum: 120,
        })
    );
}

#[rstest]
fn timeout_at_maximum_is_accepted() {
    let config = RepowardenConfig {
        timeout: 120,
        ..report_config()
    };

    assert_eq!(config.validate(), Ok(()));
}

#[rstest]
#[case::report_without_destination(RepowardenConfig {
    operation: Some("report".to_owned()),
    ..Default::default()
})]
#[case::unknown_file_type(RepowardenConfig {
    file_type: Some("xml".to_owned()),
    ..report_config()
})]
#[case::protection_without_repos_file(RepowardenConfig {
    signing: Some("on".to_owned()),
    ..Default::default()
})]
#[case::protection_without_settings(RepowardenConfig {
    operation: Some("branch-protection".to_owned()),
    repos_file: Some("repos.txt".to_owned()),
    ..Default::default()
})]
#[case::protection_with_bad_signing(RepowardenConfig {
    signing: Some("sometimes".to_owned()),
    repos_file: Some("repos.txt".to_owned()),
    ..Default::default()
})]
#[case::dependabot_without_toggle(RepowardenConfig {
    operation: Some("dependabot".to_owned()),
    repos_file: Some("repos.txt".to_owned()),
    ..Default::default()
})]
#[case::removal_with_blank_host(RepowardenConfig {
    operation: Some("remove-webhooks".to_owned()),
    webhook_host: Some("  ".to_owned()),
    ..Default::default()
})]
fn inconsistent_configuration_is_rejected(#[case] config: RepowardenConfig) {
    assert!(
        matches!(config.validate(), Err(AdminError::Configuration { .. })),
        "expected a configuration error for {config:?}"
    );
}

#[rstest]
fn webhook_inventory_needs_no_destination() {
    let config = RepowardenConfig {
        operation: Some("webhooks".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.validate(), Ok(()));
}
