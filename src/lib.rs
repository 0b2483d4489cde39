//! Repowarden library crate for administering GitHub organisation
//! repositories in bulk.
//!
//! The library walks an organisation's repositories through the GraphQL
//! connection, issues rate-limit-aware REST calls per repository, and shapes
//! the results into CSV or JSON reports. Runs stop cleanly on an exhausted
//! quota or an expired deadline and emit a resume marker so the next run can
//! continue after the last completed batch.

pub mod admin;
pub mod config;
pub mod github;
pub mod pipeline;
pub mod report;
pub mod telemetry;

pub use config::RepowardenConfig;
pub use github::{
    AdminError, OctocrabAdminGateway, OrganizationLocator, PersonalAccessToken, RateLimitInfo,
    RepositoryName,
};
pub use pipeline::{ResumeMarker, RunController, RunOptions, RunState};
pub use report::{FileType, WebhookCollection};
