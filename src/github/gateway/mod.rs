//! Gateways for administering organisation repositories through Octocrab.
//!
//! This module provides small capability traits for each kind of GitHub call
//! the tool makes. The pipeline depends only on these traits so tests can
//! substitute mocks, while `OctocrabAdminGateway` implements all of them
//! against the real REST and GraphQL endpoints.

mod client;
mod error_mapping;
mod http_utils;
mod mutations;
mod octocrab_gateway;
mod queries;
mod rate_limit;
mod repositories;
mod types;
mod webhooks;

#[cfg(test)]
mod test_utils;

pub use octocrab_gateway::OctocrabAdminGateway;
pub use types::{FetchOutcome, ProtectionSettings, ProtectionTarget, RepositoryQuery, TeamAccess};

use async_trait::async_trait;

use crate::github::error::AdminError;
use crate::github::locator::RepositoryName;
use crate::github::models::{RepositoryPage, WebhookRecord};
use crate::github::rate_limit::RateLimitStatus;

/// Gateway reporting the current API quota.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitGateway: Send + Sync {
    /// Fetch the REST and GraphQL budgets.
    async fn rate_limit(&self) -> Result<RateLimitStatus, AdminError>;
}

/// Gateway walking the organisation repositories connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryPageGateway: Send + Sync {
    /// Fetch one page of up to 100 repositories after `after`.
    async fn repository_page(
        &self,
        query: RepositoryQuery,
        after: Option<String>,
    ) -> Result<RepositoryPage, AdminError>;
}

/// Gateway reading and removing repository webhooks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookGateway: Send + Sync {
    /// Fetch the webhooks configured on a repository.
    async fn list_webhooks(&self, repository: &RepositoryName)
    -> FetchOutcome<Vec<WebhookRecord>>;

    /// Delete a single webhook.
    async fn delete_webhook(&self, repository: &RepositoryName, hook_id: u64) -> FetchOutcome<()>;
}

/// Gateway resolving a team's repository permissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamGateway: Send + Sync {
    /// Map every repository the team can access to its highest permission.
    async fn team_access(&self, team_slug: &str) -> Result<TeamAccess, AdminError>;
}

/// Gateway reading and writing branch protection rules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchProtectionGateway: Send + Sync {
    /// Resolve the repository node, default branch, and any rule covering it.
    async fn protection_target(
        &self,
        repository: &RepositoryName,
    ) -> Result<ProtectionTarget, AdminError>;

    /// Apply settings to an existing rule.
    async fn update_rule(
        &self,
        rule_id: &str,
        settings: &ProtectionSettings,
    ) -> Result<(), AdminError>;

    /// Create a rule for `pattern` with the given settings.
    async fn create_rule(
        &self,
        repository_id: &str,
        pattern: &str,
        settings: &ProtectionSettings,
    ) -> Result<(), AdminError>;
}

/// Gateway toggling Dependabot features.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DependabotGateway: Send + Sync {
    /// Enable or disable vulnerability alerts.
    async fn set_vulnerability_alerts(
        &self,
        repository: &RepositoryName,
        enabled: bool,
    ) -> Result<(), AdminError>;

    /// Enable or disable automated security fixes.
    async fn set_automated_security_fixes(
        &self,
        repository: &RepositoryName,
        enabled: bool,
    ) -> Result<(), AdminError>;
}
