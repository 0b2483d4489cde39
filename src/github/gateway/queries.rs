//! GraphQL documents sent to the v4 API.

/// Repository names and archive flags, `$first` per page, name ascending.
pub(super) const REPOSITORY_NAMES: &str = r"
query RepositoryNames($org: String!, $first: Int!, $after: String) {
  organization(login: $org) {
    repositories(first: $first, after: $after, orderBy: {field: NAME, direction: ASC}) {
      totalCount
      pageInfo { endCursor hasNextPage }
      nodes { name isArchived }
    }
  }
}
";

/// Repository metadata and the first two branch protection rules.
pub(super) const REPOSITORY_REPORT: &str = r"
query RepositoryReport($org: String!, $first: Int!, $after: String) {
  organization(login: $org) {
    repositories(first: $first, after: $after, orderBy: {field: NAME, direction: ASC}) {
      totalCount
      pageInfo { endCursor hasNextPage }
      nodes {
        name
        url
        isArchived
        isPrivate
        isEmpty
        isFork
        parent { nameWithOwner }
        defaultBranchRef { name }
        mergeCommitAllowed
        squashMergeAllowed
        rebaseMergeAllowed
        deleteBranchOnMerge
        branchProtectionRules(first: 2) {
          nodes {
            id
            pattern
            isAdminEnforced
            requiresApprovingReviews
            requiredApprovingReviewCount
            requiresCodeOwnerReviews
            dismissesStaleReviews
            requiresCommitSignatures
            requiresLinearHistory
            requiresStatusChecks
            requiresStrictStatusChecks
          }
        }
      }
    }
  }
}
";

/// Repository id, default branch, and rule patterns for one repository.
pub(super) const PROTECTION_TARGET: &str = r"
query ProtectionTarget($org: String!, $name: String!) {
  repository(owner: $org, name: $name) {
    id
    defaultBranchRef { name }
    branchProtectionRules(first: 100) {
      nodes { id pattern }
    }
  }
}
";

pub(super) const UPDATE_RULE: &str = r"
mutation UpdateRule($input: UpdateBranchProtectionRuleInput!) {
  updateBranchProtectionRule(input: $input) {
    branchProtectionRule { id }
  }
}
";

pub(super) const CREATE_RULE: &str = r"
mutation CreateRule($input: CreateBranchProtectionRuleInput!) {
  createBranchProtectionRule(input: $input) {
    branchProtectionRule { id }
  }
}
";
