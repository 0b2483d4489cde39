//! Rate limit lookups against `/rate_limit`.

use async_trait::async_trait;
use http::StatusCode;

use crate::github::error::AdminError;
use crate::github::rate_limit::{ApiRateLimitResponse, RateLimitStatus};

use super::RateLimitGateway;
use super::client::route_uri;
use super::http_utils::extract_github_message;
use super::octocrab_gateway::OctocrabAdminGateway;

const RATE_LIMIT_ROUTE: &str = "/rate_limit";

fn unavailable(detail: impl std::fmt::Display) -> AdminError {
    AdminError::RateLimitUnavailable {
        message: detail.to_string(),
    }
}

#[async_trait]
impl RateLimitGateway for OctocrabAdminGateway {
    async fn rate_limit(&self) -> Result<RateLimitStatus, AdminError> {
        let uri = route_uri(RATE_LIMIT_ROUTE)?;
        let response = self.client()._get(uri).await.map_err(unavailable)?;
        let status = response.status();
        let body = self
            .client()
            .body_to_string(response)
            .await
            .map_err(unavailable)?;

        if status != StatusCode::OK {
            let detail = extract_github_message(&body).unwrap_or_else(|| body.clone());
            return Err(unavailable(format!("GitHub returned {status}: {detail}")));
        }

        serde_json::from_str::<ApiRateLimitResponse>(&body)
            .map(RateLimitStatus::from)
            .map_err(|error| unavailable(format!("rate limit body did not decode: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::github::error::AdminError;
    use crate::github::gateway::RateLimitGateway;
    use crate::github::gateway::test_utils::gateway_for;

    #[tokio::test]
    async fn rate_limit_decodes_both_budgets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": {
                    "core": { "limit": 5000, "used": 1, "remaining": 4999, "reset": 1_700_000_000 },
                    "graphql": { "limit": 5000, "used": 0, "remaining": 5000, "reset": 1_700_000_000 }
                }
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let status = gateway.rate_limit().await.expect("rate limit should decode");

        assert_eq!(status.rest.remaining(), 4999);
        assert_eq!(status.graphql.remaining(), 5000);
    }

    #[rstest]
    #[case(ResponseTemplate::new(200).set_body_string("not json"))]
    #[case(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))]
    #[tokio::test]
    async fn rate_limit_reports_unavailable_for_undecodable_responses(
        #[case] response: ResponseTemplate,
    ) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(response)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let result = gateway.rate_limit().await;

        assert!(
            matches!(result, Err(AdminError::RateLimitUnavailable { .. })),
            "expected RateLimitUnavailable, got {result:?}"
        );
    }
}
