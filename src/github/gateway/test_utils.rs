//! Shared fixtures for gateway tests backed by a wiremock server.

use wiremock::MockServer;

use crate::github::locator::{OrganizationLocator, PersonalAccessToken};

use super::OctocrabAdminGateway;

/// Builds a gateway for `octo-org` pointed at the mock server.
pub(super) fn gateway_for(server: &MockServer) -> OctocrabAdminGateway {
    let locator = OrganizationLocator::with_api_base("octo-org", &server.uri())
        .expect("locator should build");
    let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
    OctocrabAdminGateway::for_token(&token, &locator).expect("gateway should build")
}
