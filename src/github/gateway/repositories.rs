//! Organisation repository pages and team access lookups.

use async_trait::async_trait;
use octocrab::Page;
use serde::Deserialize;
use serde_json::json;

use crate::github::error::AdminError;
use crate::github::models::{ApiTeamRepository, RepositoryPage};
use crate::github::pagination::MAX_PAGE_SIZE;

use super::error_mapping::map_octocrab_error;
use super::octocrab_gateway::OctocrabAdminGateway;
use super::queries::{REPOSITORY_NAMES, REPOSITORY_REPORT};
use super::{RepositoryPageGateway, RepositoryQuery, TeamAccess, TeamGateway};

#[derive(Debug, Deserialize)]
struct OrganizationData {
    organization: Option<OrganizationRepositories>,
}

#[derive(Debug, Deserialize)]
struct OrganizationRepositories {
    repositories: RepositoryPage,
}

const fn document_for(query: RepositoryQuery) -> &'static str {
    match query {
        RepositoryQuery::Names => REPOSITORY_NAMES,
        RepositoryQuery::Report => REPOSITORY_REPORT,
    }
}

#[async_trait]
impl RepositoryPageGateway for OctocrabAdminGateway {
    async fn repository_page(
        &self,
        query: RepositoryQuery,
        after: Option<String>,
    ) -> Result<RepositoryPage, AdminError> {
        let variables = json!({
            "org": self.locator().organization().as_str(),
            "first": MAX_PAGE_SIZE,
            "after": after,
        });
        let data: OrganizationData = self
            .graphql("list repositories", document_for(query), variables)
            .await?;

        data.organization
            .map(|organization| organization.repositories)
            .ok_or_else(|| AdminError::GraphQlCallFailed {
                message: format!(
                    "organisation '{}' not found",
                    self.locator().organization().as_str()
                ),
            })
    }
}

#[async_trait]
impl TeamGateway for OctocrabAdminGateway {
    async fn team_access(&self, team_slug: &str) -> Result<TeamAccess, AdminError> {
        let route = self.locator().team_repos_path(team_slug);
        let first_page: Page<ApiTeamRepository> = self
            .client()
            .get(route, Some(&[("per_page", "100")]))
            .await
            .map_err(|error| map_octocrab_error("list team repositories", &error))?;
        let repositories = self
            .client()
            .all_pages(first_page)
            .await
            .map_err(|error| map_octocrab_error("list team repositories", &error))?;

        Ok(TeamAccess::new(
            team_slug,
            repositories.into_iter().map(|repository| {
                let permission = repository.permission().to_owned();
                (repository.name, permission)
            }),
        ))
    }
}
