//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use http::header::CACHE_CONTROL;
use octocrab::Octocrab;

use crate::github::error::AdminError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// Every request carries `Cache-Control: no-cache` so paginated reads never
/// see stale intermediary copies between pages.
///
/// # Errors
///
/// Returns `AdminError::InvalidUrl` when the base URI cannot be parsed or
/// `AdminError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, AdminError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| AdminError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .add_header(CACHE_CONTROL, "no-cache".to_owned())
        .base_uri(base_uri)
        .map_err(|error| AdminError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Parses a REST route into a request URI.
pub(super) fn route_uri(route: &str) -> Result<Uri, AdminError> {
    route
        .parse::<Uri>()
        .map_err(|error| AdminError::InvalidUrl(error.to_string()))
}
