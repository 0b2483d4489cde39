//! Branch protection changes on each repository's default branch.

use crate::github::{AdminError, BranchProtectionGateway, ProtectionSettings, RepositoryName};

use super::{AdminSummary, for_each_repository};

/// Applies protection settings to the default branch of each repository.
///
/// An existing rule whose pattern equals the default branch is updated;
/// otherwise a rule for the default branch is created.
pub struct BranchProtectionCommand<'a, G>
where
    G: BranchProtectionGateway,
{
    gateway: &'a G,
    settings: ProtectionSettings,
}

impl<'a, G> BranchProtectionCommand<'a, G>
where
    G: BranchProtectionGateway,
{
    /// Creates the command.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when `settings` would change
    /// nothing.
    pub fn new(gateway: &'a G, settings: ProtectionSettings) -> Result<Self, AdminError> {
        if settings.is_empty() {
            return Err(AdminError::Configuration {
                message: "branch protection requires --signing or --approvals".to_owned(),
            });
        }
        Ok(Self { gateway, settings })
    }

    /// Applies the settings to every repository in order.
    pub async fn run(&self, repositories: &[RepositoryName], dry_run: bool) -> AdminSummary {
        for_each_repository(
            repositories,
            &describe(&self.settings),
            dry_run,
            |repository| self.apply_to(repository),
        )
        .await
    }

    /// Applies the settings to one repository.
    ///
    /// # Errors
    ///
    /// Returns the gateway error, or [`AdminError::Api`] when the repository
    /// has no default branch to protect.
    pub async fn apply_to(&self, repository: &RepositoryName) -> Result<(), AdminError> {
        let target = self.gateway.protection_target(repository).await?;

        if let Some(rule_id) = target.rule_id.as_deref() {
            return self.gateway.update_rule(rule_id, &self.settings).await;
        }

        let branch = target
            .default_branch
            .as_deref()
            .ok_or_else(|| AdminError::Api {
                message: format!("{} has no default branch", repository.as_str()),
            })?;
        self.gateway
            .create_rule(&target.repository_id, branch, &self.settings)
            .await
    }
}

fn describe(settings: &ProtectionSettings) -> String {
    let mut parts = Vec::new();
    if let Some(signed) = settings.requires_commit_signatures {
        parts.push(format!("require signed commits = {signed}"));
    }
    if let Some(count) = settings.required_approving_review_count {
        parts.push(format!("required approvals = {count}"));
    }
    format!("set branch protection ({})", parts.join(", "))
}
