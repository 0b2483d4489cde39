//! Rate limit gate consulted before a run spends any quota.

use tracing::{info, warn};

use crate::github::{AdminError, RateLimitGateway, RateLimitStatus};

/// Decides whether enough API quota remains to start a run.
pub struct RateLimitGate<'a, G>
where
    G: RateLimitGateway,
{
    gateway: &'a G,
}

impl<'a, G> RateLimitGate<'a, G>
where
    G: RateLimitGateway,
{
    /// Creates a gate over the provided gateway.
    #[must_use]
    pub const fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Fetches the current REST and GraphQL quota.
    ///
    /// This call is not counted against the run's REST counter.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::RateLimitUnavailable`] when the endpoint cannot be
    /// reached or its response cannot be decoded.
    pub async fn check_rate_limit(&self) -> Result<RateLimitStatus, AdminError> {
        let status = self.gateway.rate_limit().await?;
        info!(
            rest_remaining = status.rest.remaining(),
            rest_reset = status.rest.reset_at(),
            graphql_remaining = status.graphql.remaining(),
            graphql_reset = status.graphql.reset_at(),
            "rate limit status"
        );
        Ok(status)
    }

    /// Returns true when either budget is exhausted or the check failed.
    pub async fn has_reached_limit(&self) -> bool {
        match self.check_rate_limit().await {
            Ok(status) => {
                if status.is_exhausted() {
                    warn!(
                        seconds_until_reset = status
                            .rest
                            .seconds_until_reset()
                            .max(status.graphql.seconds_until_reset()),
                        resumes_at = ?status.resumes_at(),
                        "rate limit exhausted"
                    );
                }
                status.is_exhausted()
            }
            Err(error) => {
                warn!(%error, "treating failed rate limit check as exhausted");
                true
            }
        }
    }
}
