//! One-shot administration commands over a list of repositories.
//!
//! Each command walks the list in order and applies a change to every
//! repository. A failure on one repository is logged and recorded, and the
//! loop moves on; a rate limit error stops the loop because every later call
//! would fail the same way.

pub mod branch_protection;
pub mod dependabot;
pub mod repos_file;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tracing::{info, warn};

use crate::github::{AdminError, RepositoryName};

pub use branch_protection::BranchProtectionCommand;
pub use dependabot::DependabotCommand;
pub use repos_file::{parse_repository_list, read_repository_list};

/// On/off switch accepted by toggle flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Enable the setting.
    On,
    /// Disable the setting.
    Off,
}

impl Toggle {
    /// Returns true for [`Toggle::On`].
    #[must_use]
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

impl FromStr for Toggle {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" | "true" | "enable" => Ok(Self::On),
            "off" | "false" | "disable" => Ok(Self::Off),
            _ => Err(AdminError::Configuration {
                message: format!("unsupported toggle '{s}': valid options are 'on' or 'off'"),
            }),
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// Per-repository results of a one-shot command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSummary {
    /// Repositories changed (or that would be changed in a dry run).
    pub succeeded: Vec<String>,
    /// Repositories that failed, with the failure message.
    pub failed: Vec<(String, String)>,
    /// Whether a rate limit error stopped the loop.
    pub stopped: bool,
}

impl AdminSummary {
    /// Returns true when every attempted repository succeeded and the loop
    /// was not stopped.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed.is_empty() && !self.stopped
    }
}

/// Applies `apply` to each repository in order, collecting outcomes.
///
/// In a dry run `apply` is never called and each repository is logged with
/// `description` instead.
pub(crate) async fn for_each_repository<'r, F, Fut>(
    repositories: &'r [RepositoryName],
    description: &str,
    dry_run: bool,
    mut apply: F,
) -> AdminSummary
where
    F: FnMut(&'r RepositoryName) -> Fut,
    Fut: Future<Output = Result<(), AdminError>>,
{
    let mut summary = AdminSummary::default();

    for repository in repositories {
        let name = repository.as_str();
        if dry_run {
            info!(repository = name, "dry run: would {description}");
            summary.succeeded.push(name.to_owned());
            continue;
        }

        match apply(repository).await {
            Ok(()) => {
                info!(repository = name, "{description}: done");
                summary.succeeded.push(name.to_owned());
            }
            Err(error @ AdminError::RateLimitExceeded { .. }) => {
                warn!(repository = name, %error, "rate limit reached, stopping");
                summary.failed.push((name.to_owned(), error.to_string()));
                summary.stopped = true;
                break;
            }
            Err(error) => {
                warn!(repository = name, %error, "{description}: failed");
                summary.failed.push((name.to_owned(), error.to_string()));
            }
        }
    }

    summary
}
