//! Report aggregation and output.
//!
//! Generation turns collected results into CSV or JSON bytes and writing
//! hands those bytes to a [`ReportWriter`]. Failures from either step are
//! tagged with the [`ReportStage`] that produced them.

mod model;
mod repositories;
mod webhooks;
mod writer;

pub use model::{FileType, RepositoryEntry, TeamColumn};
pub use repositories::{RULES_PER_ROW, generate_csv, generate_json, header};
pub use webhooks::WebhookCollection;
pub use writer::{FileReportWriter, ReportWriter};

#[cfg(test)]
pub use writer::MockReportWriter;

use camino::Utf8Path;

use crate::github::{AdminError, RepositoryPage, ReportStage, TeamAccess};

/// Generates a repository report in the requested format.
///
/// # Errors
///
/// Returns [`AdminError::Report`] at the `generate` stage when nothing
/// survives filtering or serialisation fails.
pub fn generate_repository_report(
    file_type: FileType,
    ignore_archived: bool,
    pages: &[RepositoryPage],
    team_access: Option<&TeamAccess>,
) -> Result<Vec<u8>, AdminError> {
    let generated = match file_type {
        FileType::Csv => generate_csv(ignore_archived, pages, team_access),
        FileType::Json => generate_json(ignore_archived, pages, team_access),
    };
    generated.map_err(|error| error.in_stage(ReportStage::Generate))
}

/// Generates a webhook report in the requested format.
///
/// # Errors
///
/// Returns [`AdminError::Report`] at the `generate` stage when nothing was
/// collected or serialisation fails.
pub fn generate_webhook_report(
    file_type: FileType,
    collection: &WebhookCollection,
) -> Result<Vec<u8>, AdminError> {
    let generated = match file_type {
        FileType::Csv => collection.to_csv(),
        FileType::Json => collection.to_json(),
    };
    generated.map_err(|error| error.in_stage(ReportStage::Generate))
}

/// Writes generated report bytes through `writer`.
///
/// # Errors
///
/// Returns [`AdminError::Report`] at the `upload` stage when the write
/// fails.
pub fn publish<W>(writer: &W, path: &Utf8Path, contents: &[u8]) -> Result<(), AdminError>
where
    W: ReportWriter + ?Sized,
{
    writer
        .write_report(path, contents)
        .map_err(|error| error.in_stage(ReportStage::Upload))
}
