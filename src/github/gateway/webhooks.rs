//! Webhook listing and removal.

use async_trait::async_trait;
use http::StatusCode;

use crate::github::error::AdminError;
use crate::github::locator::RepositoryName;
use crate::github::models::WebhookRecord;

use super::client::route_uri;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::{extract_github_message, is_forbidden};
use super::octocrab_gateway::OctocrabAdminGateway;
use super::{FetchOutcome, WebhookGateway};

/// Classifies a transport-level octocrab failure.
fn classify_error<T>(operation: &str, error: &octocrab::Error) -> FetchOutcome<T> {
    match error {
        octocrab::Error::GitHub { source, .. } if is_forbidden(source.status_code) => {
            FetchOutcome::RateLimited
        }
        _ => FetchOutcome::Failed(map_octocrab_error(operation, error)),
    }
}

fn classify_status<T>(operation: &str, status: StatusCode, body: &str) -> FetchOutcome<T> {
    if is_forbidden(status) {
        return FetchOutcome::RateLimited;
    }
    FetchOutcome::Failed(map_http_error(
        operation,
        status,
        extract_github_message(body),
    ))
}

#[async_trait]
impl WebhookGateway for OctocrabAdminGateway {
    async fn list_webhooks(
        &self,
        repository: &RepositoryName,
    ) -> FetchOutcome<Vec<WebhookRecord>> {
        let operation = format!("list webhooks for {}", repository.as_str());
        let route = format!("{}?per_page=100", self.locator().hooks_path(repository));
        let uri = match route_uri(&route) {
            Ok(uri) => uri,
            Err(error) => return FetchOutcome::Failed(error),
        };

        let response = match self.client()._get(uri).await {
            Ok(response) => response,
            Err(error) => return classify_error(&operation, &error),
        };
        let status = response.status();
        let body = match self.client().body_to_string(response).await {
            Ok(body) => body,
            Err(error) => return classify_error(&operation, &error),
        };

        if !status.is_success() {
            return classify_status(&operation, status, &body);
        }

        match serde_json::from_str::<Vec<WebhookRecord>>(&body) {
            Ok(records) => FetchOutcome::Success(records),
            Err(error) => FetchOutcome::Failed(AdminError::Api {
                message: format!("{operation} failed: response did not decode: {error}"),
            }),
        }
    }

    async fn delete_webhook(&self, repository: &RepositoryName, hook_id: u64) -> FetchOutcome<()> {
        let operation = format!("delete webhook {hook_id} on {}", repository.as_str());
        let uri = match route_uri(&self.locator().hook_path(repository, hook_id)) {
            Ok(uri) => uri,
            Err(error) => return FetchOutcome::Failed(error),
        };

        let response = match self.client()._delete(uri, None::<&()>).await {
            Ok(response) => response,
            Err(error) => return classify_error(&operation, &error),
        };
        let status = response.status();
        if status.is_success() {
            return FetchOutcome::Success(());
        }

        let body = self
            .client()
            .body_to_string(response)
            .await
            .unwrap_or_default();
        classify_status(&operation, status, &body)
    }
}
