//! Report data models and the output format selector.
//!
//! Report entries borrow the repository nodes returned by GraphQL and add
//! the optional team permission column, so JSON output carries the same
//! fields as the API response plus the requested team annotation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::github::{AdminError, RepositoryNode, TeamAccess};

/// Supported report file types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileType {
    /// Comma-separated values with a fixed header row.
    #[default]
    Csv,
    /// Pretty-printed JSON object keyed by repository name.
    Json,
}

impl FromStr for FileType {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(AdminError::Configuration {
                message: format!("unsupported file type '{s}': valid options are 'csv' or 'json'"),
            }),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Team annotation attached to a report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamColumn<'a> {
    /// Team slug.
    pub team_name: &'a str,
    /// Highest permission the team holds, empty when it has none.
    pub team_permission: &'a str,
}

/// One repository as it appears in a JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryEntry<'a> {
    /// Repository metadata and branch protection rules.
    #[serde(flatten)]
    pub repository: &'a RepositoryNode,
    /// Team annotation, present only when a team was requested.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamColumn<'a>>,
}

impl<'a> RepositoryEntry<'a> {
    /// Builds an entry, looking up the team permission when requested.
    #[must_use]
    pub fn new(repository: &'a RepositoryNode, team_access: Option<&'a TeamAccess>) -> Self {
        Self {
            repository,
            team: team_access.map(|access| TeamColumn {
                team_name: access.team(),
                team_permission: access.permission_for(&repository.name),
            }),
        }
    }
}
