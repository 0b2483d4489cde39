//! Error mapping helpers for the Octocrab GitHub gateway implementations.

use http::StatusCode;

use crate::github::error::AdminError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether an octocrab error carries a 403 or 429 status.
///
/// The tool treats any forbidden answer during bulk traversal as the rate
/// limit signal, whatever the message says.
pub(super) fn is_rate_limit_status(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. }
            if matches!(source.status_code, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> AdminError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        let message = format!("{operation} failed: GitHub returned {status} {}", source.message);
        return if is_auth_failure(status) {
            AdminError::Authentication { message }
        } else if is_rate_limit_status(error) {
            AdminError::RateLimitExceeded {
                rate_limit: None,
                message,
            }
        } else {
            AdminError::Api { message }
        };
    }

    let message = format!("{operation} failed: {}", summarise(error));
    if is_network_error(error) {
        return AdminError::Network { message };
    }

    AdminError::Api { message }
}

/// Renders an octocrab error without the backtrace its `Display` appends.
fn summarise(error: &octocrab::Error) -> String {
    let rendered = error.to_string();
    let head = rendered.split("Found at").next().unwrap_or_default();
    head.lines().next().unwrap_or_default().trim_end().to_owned()
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> AdminError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        AdminError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS) {
        AdminError::RateLimitExceeded {
            rate_limit: None,
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        AdminError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

/// Wraps any gateway failure of a GraphQL call as `GraphQlCallFailed`.
pub(super) fn graphql_failure(operation: &str, error: &octocrab::Error) -> AdminError {
    AdminError::GraphQlCallFailed {
        message: map_octocrab_error(operation, error).to_string(),
    }
}
