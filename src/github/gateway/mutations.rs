//! Branch protection and Dependabot mutations.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::github::error::AdminError;
use crate::github::locator::RepositoryName;
use crate::github::models::{
    BranchProtectionRule, BranchRef, NodeList, deserialize_null_as_default,
};

use super::client::route_uri;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::extract_github_message;
use super::octocrab_gateway::OctocrabAdminGateway;
use super::queries::{CREATE_RULE, PROTECTION_TARGET, UPDATE_RULE};
use super::{BranchProtectionGateway, DependabotGateway, ProtectionSettings, ProtectionTarget};

#[derive(Debug, Deserialize)]
struct RepositoryData {
    repository: Option<ApiProtectionRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProtectionRepository {
    id: String,
    #[serde(default)]
    default_branch_ref: Option<BranchRef>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    branch_protection_rules: NodeList<BranchProtectionRule>,
}

impl From<ApiProtectionRepository> for ProtectionTarget {
    fn from(api: ApiProtectionRepository) -> Self {
        let default_branch = api.default_branch_ref.map(|branch| branch.name);
        let rule_id = default_branch.as_deref().and_then(|branch| {
            api.branch_protection_rules
                .nodes
                .into_iter()
                .find(|rule| rule.pattern == branch)
                .map(|rule| rule.id)
        });

        Self {
            repository_id: api.id,
            default_branch,
            rule_id,
        }
    }
}

/// Builds the settings portion of a rule mutation input.
fn settings_input(settings: &ProtectionSettings) -> Map<String, Value> {
    let mut input = Map::new();
    if let Some(signed) = settings.requires_commit_signatures {
        input.insert("requiresCommitSignatures".to_owned(), Value::Bool(signed));
    }
    if let Some(count) = settings.required_approving_review_count {
        input.insert("requiresApprovingReviews".to_owned(), Value::Bool(count > 0));
        input.insert("requiredApprovingReviewCount".to_owned(), json!(count));
    }
    input
}

#[async_trait]
impl BranchProtectionGateway for OctocrabAdminGateway {
    async fn protection_target(
        &self,
        repository: &RepositoryName,
    ) -> Result<ProtectionTarget, AdminError> {
        let variables = json!({
            "org": self.locator().organization().as_str(),
            "name": repository.as_str(),
        });
        let data: RepositoryData = self
            .graphql("look up branch protection", PROTECTION_TARGET, variables)
            .await?;

        data.repository
            .map(ProtectionTarget::from)
            .ok_or_else(|| AdminError::Api {
                message: format!("repository '{}' not found", repository.as_str()),
            })
    }

    async fn update_rule(
        &self,
        rule_id: &str,
        settings: &ProtectionSettings,
    ) -> Result<(), AdminError> {
        let mut input = settings_input(settings);
        input.insert(
            "branchProtectionRuleId".to_owned(),
            Value::String(rule_id.to_owned()),
        );
        let _response: Value = self
            .graphql(
                "update branch protection rule",
                UPDATE_RULE,
                json!({ "input": input }),
            )
            .await?;
        Ok(())
    }

    async fn create_rule(
        &self,
        repository_id: &str,
        pattern: &str,
        settings: &ProtectionSettings,
    ) -> Result<(), AdminError> {
        let mut input = settings_input(settings);
        input.insert(
            "repositoryId".to_owned(),
            Value::String(repository_id.to_owned()),
        );
        input.insert("pattern".to_owned(), Value::String(pattern.to_owned()));
        let _response: Value = self
            .graphql(
                "create branch protection rule",
                CREATE_RULE,
                json!({ "input": input }),
            )
            .await?;
        Ok(())
    }
}

impl OctocrabAdminGateway {
    /// Issues a body-less `PUT` (enable) or `DELETE` (disable) to `route`.
    async fn toggle(&self, operation: &str, route: &str, enabled: bool) -> Result<(), AdminError> {
        let uri = route_uri(route)?;
        let result = if enabled {
            self.client()._put(uri, None::<&()>).await
        } else {
            self.client()._delete(uri, None::<&()>).await
        };
        let response = result.map_err(|error| map_octocrab_error(operation, &error))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = self
            .client()
            .body_to_string(response)
            .await
            .unwrap_or_default();
        Err(map_http_error(
            operation,
            status,
            extract_github_message(&body),
        ))
    }
}

#[async_trait]
impl DependabotGateway for OctocrabAdminGateway {
    async fn set_vulnerability_alerts(
        &self,
        repository: &RepositoryName,
        enabled: bool,
    ) -> Result<(), AdminError> {
        let route = self.locator().vulnerability_alerts_path(repository);
        self.toggle("toggle vulnerability alerts", &route, enabled)
            .await
    }

    async fn set_automated_security_fixes(
        &self,
        repository: &RepositoryName,
        enabled: bool,
    ) -> Result<(), AdminError> {
        let route = self.locator().automated_security_fixes_path(repository);
        self.toggle("toggle automated security fixes", &route, enabled)
            .await
    }
}
