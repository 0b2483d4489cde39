//! Test helpers for constructing repository and webhook fixtures.
//!
//! # Examples
//!
//! ```
//! use repowarden::github::models::test_support::{repository_page, webhook};
//!
//! let page = repository_page(&[("alpha", false), ("beta", true)], "cursor-1", false);
//! assert_eq!(page.nodes.len(), 2);
//!
//! let hook = webhook(1, "https://hooks.example.com/ci");
//! assert!(hook.targets_host("hooks.example.com"));
//! ```

use std::collections::BTreeSet;

use super::{
    BranchProtectionRule, CursorPageInfo, RepositoryNode, RepositoryPage, WebhookConfig,
    WebhookRecord,
};

/// Builds a repository page from `(name, is_archived)` pairs.
#[must_use]
pub fn repository_page(
    repositories: &[(&str, bool)],
    end_cursor: &str,
    has_next_page: bool,
) -> RepositoryPage {
    RepositoryPage {
        total_count: u64::try_from(repositories.len()).unwrap_or(u64::MAX),
        page_info: CursorPageInfo {
            end_cursor: Some(end_cursor.to_owned()),
            has_next_page,
        },
        nodes: repositories
            .iter()
            .map(|(name, archived)| RepositoryNode::named(name, *archived))
            .collect(),
    }
}

/// Builds an active push webhook delivering to `url`.
#[must_use]
pub fn webhook(id: u64, url: &str) -> WebhookRecord {
    WebhookRecord {
        id,
        active: true,
        events: BTreeSet::from(["push".to_owned()]),
        config: WebhookConfig {
            url: Some(url.to_owned()),
            insecure_ssl: 0,
        },
    }
}

/// Builds a branch protection rule for `pattern` requiring signed commits.
#[must_use]
pub fn signed_rule(id: &str, pattern: &str) -> BranchProtectionRule {
    BranchProtectionRule {
        id: id.to_owned(),
        pattern: pattern.to_owned(),
        requires_commit_signatures: true,
        ..BranchProtectionRule::default()
    }
}
