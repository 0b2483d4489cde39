//! Rate limit snapshots for the REST and GraphQL budgets.
//!
//! GitHub meters REST and GraphQL calls against separate budgets. The
//! `/rate_limit` endpoint reports both; `RateLimitStatus` captures them in a
//! single read-only snapshot so the pipeline can decide whether to start (or
//! keep issuing) secondary calls.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Rate limit information for a single budget.
///
/// # Example
///
/// ```
/// use repowarden::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 4999, 1700000000);
/// assert!(!info.is_exhausted());
/// assert_eq!(info.remaining(), 4999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    limit: u32,
    /// Remaining requests in the current window.
    remaining: u32,
    /// Unix timestamp when the rate limit resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the rate limit resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns the reset time as a UTC timestamp.
    #[must_use]
    pub fn reset_time(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.reset_at).ok()?;
        DateTime::from_timestamp(seconds, 0)
    }

    /// Returns true if the rate limit has been exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Calculates seconds until the rate limit resets.
    ///
    /// Returns 0 if the reset time has already passed or if the system time
    /// cannot be determined.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);

        self.reset_at.saturating_sub(now)
    }
}

/// Snapshot of both API budgets taken from `/rate_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// REST (core) budget.
    pub rest: RateLimitInfo,
    /// GraphQL budget.
    pub graphql: RateLimitInfo,
}

impl RateLimitStatus {
    /// Returns true when either budget has no calls left.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.rest.is_exhausted() || self.graphql.is_exhausted()
    }

    /// Returns when every exhausted budget has reset, or `None` when neither
    /// budget is exhausted.
    #[must_use]
    pub fn resumes_at(&self) -> Option<DateTime<Utc>> {
        [self.rest, self.graphql]
            .into_iter()
            .filter(RateLimitInfo::is_exhausted)
            .filter_map(|info| info.reset_time())
            .max()
    }
}

/// Wire shape of one budget in the `/rate_limit` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRateResource {
    limit: u64,
    remaining: u64,
    reset: u64,
}

impl ApiRateResource {
    fn into_info(self) -> RateLimitInfo {
        RateLimitInfo::new(
            saturate_u32(self.limit),
            saturate_u32(self.remaining),
            self.reset,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRateResources {
    core: ApiRateResource,
    graphql: ApiRateResource,
}

/// Wire shape of the `/rate_limit` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRateLimitResponse {
    resources: ApiRateResources,
}

impl From<ApiRateLimitResponse> for RateLimitStatus {
    fn from(response: ApiRateLimitResponse) -> Self {
        Self {
            rest: response.resources.core.into_info(),
            graphql: response.resources.graphql.into_info(),
        }
    }
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
