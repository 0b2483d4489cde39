//! Error types exposed by the GitHub administration layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Report pipeline stage that failed while producing an output artefact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    /// Building the CSV or JSON bytes from collected results.
    Generate,
    /// Writing the generated bytes to the requested destination.
    Upload,
}

impl ReportStage {
    /// Returns the stage label used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Upload => "upload",
        }
    }
}

impl std::fmt::Display for ReportStage {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors surfaced while validating input or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminError {
    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// No organisation was configured.
    #[error("organisation is required (use --org or -o)")]
    MissingOrganization,

    /// The configured API base URL could not be parsed.
    #[error("API base URL is invalid: {0}")]
    InvalidUrl(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The requested timeout exceeds the configured maximum.
    #[error("timeout of {minutes} minutes exceeds the maximum of {maximum} minutes")]
    InvalidTimeout {
        /// Requested timeout in minutes.
        minutes: u64,
        /// Largest accepted timeout in minutes.
        maximum: u64,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403 with rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available from the rate limit endpoint.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// The rate limit endpoint could not be queried or decoded.
    #[error("rate limit status unavailable: {message}")]
    RateLimitUnavailable {
        /// Details about the failed rate limit lookup.
        message: String,
    },

    /// A GraphQL page query failed to complete or decode.
    #[error("GraphQL call failed: {message}")]
    GraphQlCallFailed {
        /// Transport, decode, or GraphQL error detail.
        message: String,
    },

    /// Nothing remained to serialise after filtering.
    #[error("no results to write")]
    EmptyResult,

    /// Producing the output artefact failed.
    #[error("report {stage} failed: {message}")]
    Report {
        /// Stage that failed.
        stage: ReportStage,
        /// Underlying failure detail.
        message: String,
    },
}

impl AdminError {
    /// Wraps this error with the report stage that produced it.
    #[must_use]
    pub fn in_stage(self, stage: ReportStage) -> Self {
        match self {
            Self::Report { .. } => self,
            other => Self::Report {
                stage,
                message: other.to_string(),
            },
        }
    }
}
