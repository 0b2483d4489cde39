//! Dependabot vulnerability alerts and security updates.

use crate::github::{AdminError, DependabotGateway, RepositoryName};

use super::{AdminSummary, Toggle, for_each_repository};

/// Enables or disables Dependabot on each repository.
///
/// Security updates depend on vulnerability alerts, so enabling turns alerts
/// on first and disabling turns security updates off first.
pub struct DependabotCommand<'a, G>
where
    G: DependabotGateway,
{
    gateway: &'a G,
    toggle: Toggle,
}

impl<'a, G> DependabotCommand<'a, G>
where
    G: DependabotGateway,
{
    /// Creates the command.
    #[must_use]
    pub const fn new(gateway: &'a G, toggle: Toggle) -> Self {
        Self { gateway, toggle }
    }

    /// Applies the toggle to every repository in order.
    pub async fn run(&self, repositories: &[RepositoryName], dry_run: bool) -> AdminSummary {
        let description = format!("turn Dependabot {}", self.toggle);
        for_each_repository(repositories, &description, dry_run, |repository| {
            self.apply_to(repository)
        })
        .await
    }

    /// Applies the toggle to one repository.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error; the second call is then skipped.
    pub async fn apply_to(&self, repository: &RepositoryName) -> Result<(), AdminError> {
        let enabled = self.toggle.enabled();
        if enabled {
            self.gateway
                .set_vulnerability_alerts(repository, true)
                .await?;
            self.gateway
                .set_automated_security_fixes(repository, true)
                .await
        } else {
            self.gateway
                .set_automated_security_fixes(repository, false)
                .await?;
            self.gateway
                .set_vulnerability_alerts(repository, false)
                .await
        }
    }
}
