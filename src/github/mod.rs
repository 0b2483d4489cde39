//! GitHub organisation administration through Octocrab.
//!
//! This module wraps Octocrab behind small capability traits covering the
//! calls the tool makes: the rate limit endpoint, the organisation
//! repositories GraphQL connection, repository webhooks, team permissions,
//! branch protection rules, and Dependabot toggles. Errors are mapped into
//! [`AdminError`] so callers can surface precise failures without exposing
//! Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;

pub use error::{AdminError, ReportStage};
pub use gateway::{
    BranchProtectionGateway, DependabotGateway, FetchOutcome, OctocrabAdminGateway,
    ProtectionSettings, ProtectionTarget, RateLimitGateway, RepositoryPageGateway,
    RepositoryQuery, TeamAccess, TeamGateway, WebhookGateway,
};
pub use locator::{OrganizationLocator, OrganizationName, PersonalAccessToken, RepositoryName};
pub use models::{RepositoryNode, RepositoryPage, WebhookRecord};
pub use pagination::RepositoryCursorBatch;
pub use rate_limit::{RateLimitInfo, RateLimitStatus};

#[cfg(test)]
pub use gateway::{
    MockBranchProtectionGateway, MockDependabotGateway, MockRateLimitGateway,
    MockRepositoryPageGateway, MockTeamGateway, MockWebhookGateway,
};
