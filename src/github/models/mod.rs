//! Data models for repositories, branch protection rules, and webhooks.
//!
//! Repository and rule types mirror the GraphQL v4 node shapes so they can be
//! decoded directly from page responses and re-serialised into JSON reports.
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Branch protection rule node as returned by the GraphQL API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchProtectionRule {
    /// GraphQL node identifier used by mutations.
    pub id: String,
    /// Branch name pattern the rule applies to.
    pub pattern: String,
    /// Whether administrators are subject to the rule.
    pub is_admin_enforced: bool,
    /// Whether approving reviews are required before merging.
    pub requires_approving_reviews: bool,
    /// Number of approving reviews required.
    pub required_approving_review_count: Option<u32>,
    /// Whether code owner reviews are required.
    pub requires_code_owner_reviews: bool,
    /// Whether new commits dismiss existing approvals.
    pub dismisses_stale_reviews: bool,
    /// Whether commits must be signed.
    pub requires_commit_signatures: bool,
    /// Whether merge commits are disallowed.
    pub requires_linear_history: bool,
    /// Whether status checks must pass.
    pub requires_status_checks: bool,
    /// Whether branches must be up to date before merging.
    pub requires_strict_status_checks: bool,
}

/// Node list wrapper used by GraphQL connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct NodeList<T> {
    /// Connection nodes in API order; `null` entries are dropped.
    #[serde(deserialize_with = "deserialize_present_nodes")]
    pub nodes: Vec<T>,
}

/// Reference to a named git ref, such as the default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchRef {
    /// Branch name.
    pub name: String,
}

/// Reference to a fork parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentRepository {
    /// `owner/name` of the parent repository.
    pub name_with_owner: String,
}

/// Repository node as returned by the organisation repositories query.
///
/// Only `name` and `isArchived` are requested when listing names for webhook
/// collection; every other field defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryNode {
    /// Repository name, unique within the organisation.
    pub name: String,
    /// HTML URL.
    pub url: Option<String>,
    /// Whether the repository is archived.
    pub is_archived: bool,
    /// Whether the repository is private.
    pub is_private: bool,
    /// Whether the repository has no commits.
    pub is_empty: bool,
    /// Whether the repository is a fork.
    pub is_fork: bool,
    /// Fork parent, when the repository is a fork.
    pub parent: Option<ParentRepository>,
    /// Default branch reference, absent for empty repositories.
    pub default_branch_ref: Option<BranchRef>,
    /// Whether merge commits are allowed.
    pub merge_commit_allowed: bool,
    /// Whether squash merges are allowed.
    pub squash_merge_allowed: bool,
    /// Whether rebase merges are allowed.
    pub rebase_merge_allowed: bool,
    /// Whether head branches are deleted after merge.
    pub delete_branch_on_merge: bool,
    /// First branch protection rules of the repository.
    ///
    /// GitHub answers `null` when the token cannot read the rules.
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub branch_protection_rules: NodeList<BranchProtectionRule>,
}

impl RepositoryNode {
    /// Creates a node carrying only a name and archive flag.
    #[must_use]
    pub fn named(name: &str, is_archived: bool) -> Self {
        Self {
            name: name.to_owned(),
            is_archived,
            ..Self::default()
        }
    }

    /// Returns the default branch name when the repository has one.
    #[must_use]
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch_ref
            .as_ref()
            .map(|branch| branch.name.as_str())
    }
}

/// Cursor position reported with a page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CursorPageInfo {
    /// Cursor after the last node on the page.
    pub end_cursor: Option<String>,
    /// Whether another page follows.
    pub has_next_page: bool,
}

/// One page of organisation repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryPage {
    /// Total repositories in the organisation.
    pub total_count: u64,
    /// Pagination position after this page.
    pub page_info: CursorPageInfo,
    /// Repository nodes in name-ascending order.
    #[serde(deserialize_with = "deserialize_present_nodes")]
    pub nodes: Vec<RepositoryNode>,
}

impl RepositoryPage {
    /// Returns the page's end cursor, or an empty string when absent.
    #[must_use]
    pub fn end_cursor(&self) -> &str {
        self.page_info.end_cursor.as_deref().unwrap_or_default()
    }
}

/// Webhook delivery configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Delivery URL.
    #[serde(default)]
    pub url: Option<String>,
    /// `1` when TLS verification is disabled for deliveries.
    #[serde(
        rename(serialize = "insecureSsl", deserialize = "insecure_ssl"),
        default,
        deserialize_with = "deserialize_insecure_ssl"
    )]
    pub insecure_ssl: u8,
}

/// A repository webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRecord {
    /// Hook identifier.
    pub id: u64,
    /// Whether deliveries are enabled.
    #[serde(default)]
    pub active: bool,
    /// Subscribed event names.
    #[serde(default)]
    pub events: BTreeSet<String>,
    /// Delivery configuration.
    #[serde(default)]
    pub config: WebhookConfig,
}

impl WebhookRecord {
    /// Returns the lower-cased host of the delivery URL, if it parses.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        let raw = self.config.url.as_deref()?;
        let parsed = Url::parse(raw).ok()?;
        parsed.host_str().map(str::to_ascii_lowercase)
    }

    /// Returns true when the delivery URL points at `host`.
    #[must_use]
    pub fn targets_host(&self, host: &str) -> bool {
        self.host()
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(host.trim()))
    }
}

/// Decodes an explicit `null` as the type's default.
pub(crate) fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a GraphQL node list, skipping entries nulled by per-node errors.
fn deserialize_present_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let nodes = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(nodes.into_iter().flatten().flatten().collect())
}

/// GitHub sends `insecure_ssl` as `"0"`/`"1"` but older payloads use numbers.
fn deserialize_insecure_ssl<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Number(u8),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Flag::Number(value)) => Ok(value),
        Some(Flag::Text(text)) => text
            .trim()
            .parse::<u8>()
            .map_err(|error| serde::de::Error::custom(format!("insecure_ssl: {error}"))),
    }
}

/// Repository permissions granted to a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct ApiPermissions {
    admin: bool,
    maintain: bool,
    push: bool,
    triage: bool,
    pull: bool,
}

impl ApiPermissions {
    /// Returns the highest permission level granted.
    pub(crate) const fn highest(self) -> &'static str {
        if self.admin {
            "admin"
        } else if self.maintain {
            "maintain"
        } else if self.push {
            "push"
        } else if self.triage {
            "triage"
        } else if self.pull {
            "pull"
        } else {
            ""
        }
    }
}

/// Repository entry from `GET /orgs/{org}/teams/{team}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTeamRepository {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) permissions: Option<ApiPermissions>,
}

impl ApiTeamRepository {
    pub(crate) fn permission(&self) -> &'static str {
        self.permissions.map_or("", ApiPermissions::highest)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{ApiTeamRepository, RepositoryPage, WebhookRecord};

    #[rstest]
    #[case(json!("1"), 1)]
    #[case(json!(0), 0)]
    #[case(json!(null), 0)]
    fn webhook_accepts_string_or_numeric_insecure_ssl(
        #[case] flag: serde_json::Value,
        #[case] expected: u8,
    ) {
        let body = json!({
            "id": 7,
            "active": true,
            "events": ["push", "pull_request", "push"],
            "config": { "url": "https://hooks.example.com/ci", "insecure_ssl": flag }
        });

        let record: WebhookRecord = serde_json::from_value(body).expect("hook should decode");

        assert_eq!(record.config.insecure_ssl, expected);
        assert_eq!(record.events.len(), 2, "events form a set");
    }

    #[rstest]
    #[case("https://Hooks.Example.com/ci", "hooks.example.com", true)]
    #[case("https://hooks.example.com:8443/ci", "hooks.example.com", true)]
    #[case("https://other.example.com/ci", "hooks.example.com", false)]
    #[case("not-a-url", "hooks.example.com", false)]
    fn targets_host_compares_parsed_host(
        #[case] url: &str,
        #[case] host: &str,
        #[case] expected: bool,
    ) {
        let record: WebhookRecord = serde_json::from_value(json!({
            "id": 1,
            "config": { "url": url }
        }))
        .expect("hook should decode");

        assert_eq!(record.targets_host(host), expected);
    }

    #[rstest]
    fn webhook_serialises_insecure_ssl_in_camel_case() {
        let record: WebhookRecord = serde_json::from_value(json!({
            "id": 3,
            "config": { "url": "https://x.example.com", "insecure_ssl": "0" }
        }))
        .expect("hook should decode");

        let value = serde_json::to_value(&record).expect("hook should serialise");
        assert_eq!(value.pointer("/config/insecureSsl"), Some(&json!(0)));
    }

    #[rstest]
    fn repository_page_decodes_partial_nodes() {
        let page: RepositoryPage = serde_json::from_value(json!({
            "totalCount": 2,
            "pageInfo": { "endCursor": "Y3Vyc29yOjI=", "hasNextPage": false },
            "nodes": [
                { "name": "alpha", "isArchived": false },
                { "name": "beta", "isArchived": true,
                  "defaultBranchRef": { "name": "main" },
                  "branchProtectionRules": { "nodes": [ { "id": "BPR_1", "pattern": "main" } ] } }
            ]
        }))
        .expect("page should decode");

        assert_eq!(page.end_cursor(), "Y3Vyc29yOjI=");
        assert_eq!(page.nodes.len(), 2);
        let beta = page.nodes.get(1).expect("second node");
        assert_eq!(beta.default_branch(), Some("main"));
        assert_eq!(beta.branch_protection_rules.nodes.len(), 1);
    }

    #[rstest]
    fn repository_page_tolerates_nulled_fields_and_nodes() {
        let page: RepositoryPage = serde_json::from_value(json!({
            "totalCount": 3,
            "pageInfo": { "endCursor": "Y3Vyc29yOjM=", "hasNextPage": false },
            "nodes": [
                { "name": "alpha", "branchProtectionRules": null },
                null,
                { "name": "gamma", "branchProtectionRules": { "nodes": null } }
            ]
        }))
        .expect("page should decode");

        let names: Vec<_> = page.nodes.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "gamma"]);
        assert!(
            page.nodes
                .iter()
                .all(|node| node.branch_protection_rules.nodes.is_empty())
        );
    }

    #[rstest]
    #[case(json!({"admin": true, "push": true, "pull": true}), "admin")]
    #[case(json!({"push": true, "pull": true}), "push")]
    #[case(json!({"pull": true}), "pull")]
    #[case(json!(null), "")]
    fn team_repository_reports_highest_permission(
        #[case] permissions: serde_json::Value,
        #[case] expected: &str,
    ) {
        let repository: ApiTeamRepository =
            serde_json::from_value(json!({ "name": "alpha", "permissions": permissions }))
                .expect("team repository should decode");

        assert_eq!(repository.permission(), expected);
    }
}
