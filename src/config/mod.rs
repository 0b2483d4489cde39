//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.repowarden.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REPOWARDEN_ORG`, `REPOWARDEN_TOKEN`, or
//!    `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--org`/`-o`, `--token`/`-t`, and friends
//!
//! # Configuration File
//!
//! ```toml
//! org = "octo-org"
//! token = "ghp_example"
//! file_path = "reports/repositories.csv"
//! file_type = "csv"
//! timeout = 45
//! ignore_archived = true
//! ```

use std::env;
use std::str::FromStr;

use camino::Utf8Path;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::admin::Toggle;
use crate::github::{AdminError, OrganizationLocator, ProtectionSettings};
use crate::pipeline::{DEFAULT_TIMEOUT_MINUTES, MAX_TIMEOUT_MINUTES, RunOptions};
use crate::report::FileType;

/// Command selected by the `operation` setting or inferred from flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Repository and branch protection report.
    Report,
    /// Webhook inventory across the organisation.
    Webhooks,
    /// Delete webhooks delivering to a host.
    RemoveWebhooks,
    /// Update branch protection on listed repositories.
    BranchProtection,
    /// Toggle Dependabot on listed repositories.
    Dependabot,
}

impl OperationMode {
    /// Returns the operation name accepted by `--operation`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Webhooks => "webhooks",
            Self::RemoveWebhooks => "remove-webhooks",
            Self::BranchProtection => "branch-protection",
            Self::Dependabot => "dependabot",
        }
    }

    /// Returns true for commands that walk the organisation and emit a
    /// resume marker.
    #[must_use]
    pub const fn is_traversal(self) -> bool {
        matches!(self, Self::Report | Self::Webhooks | Self::RemoveWebhooks)
    }
}

impl FromStr for OperationMode {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "report" => Ok(Self::Report),
            "webhooks" | "webhook-report" => Ok(Self::Webhooks),
            "remove-webhooks" | "remove-webhook" => Ok(Self::RemoveWebhooks),
            "branch-protection" | "protection" => Ok(Self::BranchProtection),
            "dependabot" => Ok(Self::Dependabot),
            _ => Err(AdminError::Configuration {
                message: format!(
                    "unsupported operation '{s}': valid options are 'report', 'webhooks', \
                     'remove-webhooks', 'branch-protection', or 'dependabot'"
                ),
            }),
        }
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `REPOWARDEN_ORG` or `--org`: Organisation login
/// - `REPOWARDEN_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `REPOWARDEN_API_BASE` or `--api-base`: GitHub Enterprise API base
/// - `REPOWARDEN_FILE_PATH` or `--file-path`: Report destination
///
/// # Example
///
/// ```no_run
/// use repowarden::RepowardenConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = RepowardenConfig::load().expect("failed to load configuration");
/// config.validate().expect("configuration should be consistent");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REPOWARDEN",
    discovery(
        dotfile_name = ".repowarden.toml",
        config_file_name = "repowarden.toml",
        app_name = "repowarden"
    )
)]
pub struct RepowardenConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `REPOWARDEN_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Organisation login whose repositories are administered.
    #[ortho_config(cli_short = 'o')]
    pub org: Option<String>,

    /// API base URL; defaults to `https://api.github.com`.
    #[ortho_config(cli_short = 'b')]
    pub api_base: Option<String>,

    /// Command to run: `report`, `webhooks`, `remove-webhooks`,
    /// `branch-protection`, or `dependabot`.
    ///
    /// When unset the command is inferred from the other flags.
    #[ortho_config(cli_short = 'x')]
    pub operation: Option<String>,

    /// Logs intended changes without calling mutating endpoints.
    ///
    /// For traversals, stops after the first page and reports the total.
    #[ortho_config(cli_short = 'd')]
    pub dry_run: bool,

    /// Skips archived repositories.
    #[ortho_config(cli_short = 'i')]
    pub ignore_archived: bool,

    /// Destination for the generated report.
    #[ortho_config(cli_short = 'f')]
    pub file_path: Option<String>,

    /// Report format: `csv` (default) or `json`.
    #[ortho_config(cli_short = 'F')]
    pub file_type: Option<String>,

    /// Cursor to resume a previous traversal after.
    #[ortho_config(cli_short = 's')]
    pub start_cursor: Option<String>,

    /// Wall-clock budget for a traversal, in minutes.
    ///
    /// Defaults to 30; values above 120 are rejected.
    #[ortho_config(cli_short = 'm')]
    pub timeout: u64,

    /// Team slug whose permission is added to repository reports.
    #[ortho_config(cli_short = 'T')]
    pub team: Option<String>,

    /// Host whose webhooks are removed.
    #[ortho_config(cli_short = 'w')]
    pub webhook_host: Option<String>,

    /// Newline-separated repository list for one-shot commands.
    #[ortho_config(cli_short = 'r')]
    pub repos_file: Option<String>,

    /// Require signed commits on the default branch: `on` or `off`.
    #[ortho_config(cli_short = 'g')]
    pub signing: Option<String>,

    /// Required approving review count; `0` disables required reviews.
    #[ortho_config(cli_short = 'A')]
    pub approvals: Option<u32>,

    /// Dependabot alerts and security updates: `on` or `off`.
    #[ortho_config(cli_short = 'D')]
    pub dependabot: Option<String>,
}

impl Default for RepowardenConfig {
    fn default() -> Self {
        Self {
            token: None,
            org: None,
            api_base: None,
            operation: None,
            dry_run: false,
            ignore_archived: false,
            file_path: None,
            file_type: None,
            start_cursor: None,
            timeout: DEFAULT_TIMEOUT_MINUTES,
            team: None,
            webhook_host: None,
            repos_file: None,
            signing: None,
            approvals: None,
            dependabot: None,
        }
    }
}

impl RepowardenConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, AdminError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(AdminError::MissingToken)
    }

    /// Builds the organisation locator from `org` and `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::MissingOrganization`] when no organisation is
    /// configured, or [`AdminError::InvalidUrl`] for an unusable API base.
    pub fn organization_locator(&self) -> Result<OrganizationLocator, AdminError> {
        let org = self
            .org
            .as_deref()
            .ok_or(AdminError::MissingOrganization)?;
        self.api_base.as_deref().map_or_else(
            || OrganizationLocator::new(org),
            |api_base| OrganizationLocator::with_api_base(org, api_base),
        )
    }

    /// Determines the command from `operation`, or infers it from the
    /// command-specific flags when unset.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for an unknown operation name.
    pub fn operation_mode(&self) -> Result<OperationMode, AdminError> {
        if let Some(operation) = self.operation.as_deref() {
            return operation.parse();
        }

        Ok(if self.webhook_host.is_some() {
            OperationMode::RemoveWebhooks
        } else if self.signing.is_some() || self.approvals.is_some() {
            OperationMode::BranchProtection
        } else if self.dependabot.is_some() {
            OperationMode::Dependabot
        } else {
            OperationMode::Report
        })
    }

    /// Returns the configured report format, defaulting to CSV.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for an unknown file type.
    pub fn file_type(&self) -> Result<FileType, AdminError> {
        self.file_type
            .as_deref()
            .map_or_else(|| Ok(FileType::default()), str::parse)
    }

    /// Returns the report destination or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when no path is configured.
    pub fn require_file_path(&self) -> Result<&Utf8Path, AdminError> {
        self.file_path
            .as_deref()
            .map(Utf8Path::new)
            .ok_or_else(|| AdminError::Configuration {
                message: "report destination is required (use --file-path or -f)".to_owned(),
            })
    }

    /// Returns the repository list path or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when no list is configured.
    pub fn require_repos_file(&self) -> Result<&Utf8Path, AdminError> {
        self.repos_file
            .as_deref()
            .map(Utf8Path::new)
            .ok_or_else(|| AdminError::Configuration {
                message: "repository list is required (use --repos-file or -r)".to_owned(),
            })
    }

    /// Returns the webhook host to remove or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when no host is configured.
    pub fn require_webhook_host(&self) -> Result<&str, AdminError> {
        self.webhook_host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or_else(|| AdminError::Configuration {
                message: "webhook host is required (use --webhook-host or -w)".to_owned(),
            })
    }

    /// Builds branch protection settings from `signing` and `approvals`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when `signing` is not `on` or
    /// `off`.
    pub fn protection_settings(&self) -> Result<ProtectionSettings, AdminError> {
        let requires_commit_signatures = self
            .signing
            .as_deref()
            .map(str::parse::<Toggle>)
            .transpose()?
            .map(Toggle::enabled);
        Ok(ProtectionSettings {
            requires_commit_signatures,
            required_approving_review_count: self.approvals,
        })
    }

    /// Returns the Dependabot toggle or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when the toggle is missing or is
    /// not `on` or `off`.
    pub fn dependabot_toggle(&self) -> Result<Toggle, AdminError> {
        self.dependabot
            .as_deref()
            .ok_or_else(|| AdminError::Configuration {
                message: "dependabot toggle is required (use --dependabot on|off)".to_owned(),
            })?
            .parse()
    }

    /// Returns the traversal options for the pipeline.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            start_cursor: self.start_cursor.clone(),
            ignore_archived: self.ignore_archived,
            dry_run: self.dry_run,
            timeout_minutes: self.timeout,
        }
    }

    /// Validates the configuration before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidTimeout`] when the timeout exceeds
    /// [`MAX_TIMEOUT_MINUTES`], or [`AdminError::Configuration`] when a value
    /// is unknown or a command is missing a required setting.
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.timeout > MAX_TIMEOUT_MINUTES {
            return Err(AdminError::InvalidTimeout {
                minutes: self.timeout,
                maximum: MAX_TIMEOUT_MINUTES,
            });
        }
        self.file_type()?;

        match self.operation_mode()? {
            OperationMode::Report => {
                self.require_file_path()?;
            }
            OperationMode::Webhooks => {}
            OperationMode::RemoveWebhooks => {
                self.require_webhook_host()?;
            }
            OperationMode::BranchProtection => {
                self.require_repos_file()?;
                if self.protection_settings()?.is_empty() {
                    return Err(AdminError::Configuration {
                        message: "branch protection requires --signing or --approvals".to_owned(),
                    });
                }
            }
            OperationMode::Dependabot => {
                self.require_repos_file()?;
                self.dependabot_toggle()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
