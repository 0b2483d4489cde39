//! Octocrab-backed gateway shared by every capability trait.

use octocrab::Octocrab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::github::error::AdminError;
use crate::github::locator::{OrganizationLocator, PersonalAccessToken};

use super::client::build_octocrab_client;
use super::error_mapping::graphql_failure;

/// Octocrab-backed gateway for one organisation.
pub struct OctocrabAdminGateway {
    client: Octocrab,
    locator: OrganizationLocator,
}

impl OctocrabAdminGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, locator: OrganizationLocator) -> Self {
        Self { client, locator }
    }

    /// Builds an Octocrab client for the given token and organisation.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidUrl` when the base URI cannot be parsed or
    /// `AdminError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &OrganizationLocator,
    ) -> Result<Self, AdminError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab, locator.clone()))
    }

    pub(super) const fn client(&self) -> &Octocrab {
        &self.client
    }

    pub(super) const fn locator(&self) -> &OrganizationLocator {
        &self.locator
    }

    /// Posts a GraphQL document and unwraps its `data` member.
    ///
    /// Any transport failure, non-2xx status, `errors` entry, or missing
    /// `data` becomes [`AdminError::GraphQlCallFailed`].
    pub(super) async fn graphql<T>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AdminError>
    where
        T: DeserializeOwned + Send,
    {
        let payload = serde_json::json!({ "query": query, "variables": variables });
        let envelope: GraphQlEnvelope<T> = self
            .client
            .graphql(&payload)
            .await
            .map_err(|error| graphql_failure(operation, &error))?;

        envelope.into_data(operation)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlMessage>,
}

impl<T> GraphQlEnvelope<T> {
    /// Returns `data`, logging any partial errors that accompany it.
    ///
    /// Errors are fatal only when no data came back.
    fn into_data(self, operation: &str) -> Result<T, AdminError> {
        let detail = self
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        match self.data {
            Some(data) => {
                if !self.errors.is_empty() {
                    warn!(operation, errors = %detail, "GraphQL response carried partial errors");
                }
                Ok(data)
            }
            None if detail.is_empty() => Err(AdminError::GraphQlCallFailed {
                message: format!("{operation} failed: response carried no data"),
            }),
            None => Err(AdminError::GraphQlCallFailed {
                message: format!("{operation} failed: {detail}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::GraphQlEnvelope;
    use crate::github::error::AdminError;

    #[rstest]
    fn envelope_with_errors_is_a_failure() {
        let envelope: GraphQlEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }]
        }))
        .expect("envelope should decode");

        let result = envelope.into_data("list repositories");
        assert_eq!(
            result,
            Err(AdminError::GraphQlCallFailed {
                message: "list repositories failed: API rate limit exceeded".to_owned(),
            })
        );
    }

    #[rstest]
    fn envelope_with_data_and_errors_keeps_data() {
        let envelope: GraphQlEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "data": { "organization": { "login": "octo-org" } },
            "errors": [{ "type": "FORBIDDEN", "message": "Resource not accessible by integration" }]
        }))
        .expect("envelope should decode");

        let data = envelope
            .into_data("list repositories")
            .expect("partial data should be returned");
        assert_eq!(data, json!({ "organization": { "login": "octo-org" } }));
    }

    #[rstest]
    fn envelope_without_data_is_a_failure() {
        let envelope: GraphQlEnvelope<serde_json::Value> =
            serde_json::from_value(json!({})).expect("envelope should decode");

        assert!(matches!(
            envelope.into_data("list repositories"),
            Err(AdminError::GraphQlCallFailed { .. })
        ));
    }
}
