//! Tests for command selection.

use rstest::rstest;

use crate::RepowardenConfig;
use crate::config::OperationMode;

#[rstest]
#[case("report", OperationMode::Report)]
#[case("webhooks", OperationMode::Webhooks)]
#[case("remove-webhooks", OperationMode::RemoveWebhooks)]
#[case("Branch-Protection", OperationMode::BranchProtection)]
#[case("dependabot", OperationMode::Dependabot)]
fn explicit_operation_is_parsed(#[case] operation: &str, #[case] expected: OperationMode) {
    let config = RepowardenConfig {
        operation: Some(operation.to_owned()),
        ..Default::default()
    };

    assert_eq!(config.operation_mode(), Ok(expected));
}

#[rstest]
fn explicit_operation_wins_over_inference() {
    let config = RepowardenConfig {
        operation: Some("webhooks".to_owned()),
        webhook_host: Some("hooks.example.com".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.operation_mode(), Ok(OperationMode::Webhooks));
}

#[rstest]
#[case::default_is_report(RepowardenConfig::default(), OperationMode::Report)]
#[case::webhook_host_removes(
    RepowardenConfig { webhook_host: Some("hooks.example.com".to_owned()), ..Default::default() },
    OperationMode::RemoveWebhooks
)]
#[case::approvals_protect(
    RepowardenConfig { approvals: Some(1), ..Default::default() },
    OperationMode::BranchProtection
)]
#[case::dependabot_toggle(
    RepowardenConfig { dependabot: Some("on".to_owned()), ..Default::default() },
    OperationMode::Dependabot
)]
fn operation_is_inferred_from_flags(
    #[case] config: RepowardenConfig,
    #[case] expected: OperationMode,
) {
    assert_eq!(config.operation_mode(), Ok(expected));
}

#[rstest]
fn unknown_operation_is_rejected() {
    let config = RepowardenConfig {
        operation: Some("archive-everything".to_owned()),
        ..Default::default()
    };

    assert!(config.operation_mode().is_err());
}

#[rstest]
fn operation_names_round_trip() {
    for mode in [
        OperationMode::Report,
        OperationMode::Webhooks,
        OperationMode::RemoveWebhooks,
        OperationMode::BranchProtection,
        OperationMode::Dependabot,
    ] {
        assert_eq!(mode.as_str().parse::<OperationMode>(), Ok(mode));
    }
}

#[rstest]
#[case(OperationMode::Report, true)]
#[case(OperationMode::Webhooks, true)]
#[case(OperationMode::RemoveWebhooks, true)]
#[case(OperationMode::BranchProtection, false)]
#[case(OperationMode::Dependabot, false)]
fn only_traversals_emit_a_resume_marker(#[case] mode: OperationMode, #[case] expected: bool) {
    assert_eq!(mode.is_traversal(), expected);
}
