//! Public types shared by the gateway traits.

use std::collections::BTreeMap;

use crate::github::error::AdminError;

/// Tagged result of a per-repository REST call.
///
/// A 403 from GitHub is the signal that the REST budget ran out mid-run, so
/// it is kept apart from every other failure rather than folded into an
/// error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The call succeeded.
    Success(T),
    /// GitHub answered 403; the caller should stop issuing calls.
    RateLimited,
    /// Any other failure, scoped to this repository.
    Failed(AdminError),
}

/// Field selection for the organisation repositories query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryQuery {
    /// Names and archive flags only.
    Names,
    /// Repository metadata plus the first two branch protection rules.
    Report,
}

/// Team permissions keyed by repository name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamAccess {
    team: String,
    permissions: BTreeMap<String, String>,
}

impl TeamAccess {
    /// Creates team access from `(repository, permission)` pairs.
    #[must_use]
    pub fn new<I>(team: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            team: team.to_owned(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Returns the team slug.
    #[must_use]
    pub const fn team(&self) -> &str {
        self.team.as_str()
    }

    /// Returns the permission for a repository, or an empty string.
    #[must_use]
    pub fn permission_for(&self, repository: &str) -> &str {
        self.permissions
            .get(repository)
            .map_or("", String::as_str)
    }

    /// Returns the number of repositories the team can access.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns true when the team has no repository access.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

/// Branch protection changes requested by the operator.
///
/// `None` leaves the corresponding setting untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtectionSettings {
    /// Require signed commits.
    pub requires_commit_signatures: Option<bool>,
    /// Required approving review count; zero disables required reviews.
    pub required_approving_review_count: Option<u32>,
}

impl ProtectionSettings {
    /// Returns true when no setting would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.requires_commit_signatures.is_none()
            && self.required_approving_review_count.is_none()
    }
}

/// Repository identity and the rule covering its default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionTarget {
    /// GraphQL node identifier of the repository.
    pub repository_id: String,
    /// Default branch name, absent for empty repositories.
    pub default_branch: Option<String>,
    /// Identifier of the rule whose pattern equals the default branch.
    pub rule_id: Option<String>,
}
