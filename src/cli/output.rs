//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use camino::Utf8Path;
use repowarden::admin::AdminSummary;
use repowarden::github::AdminError;
use repowarden::pipeline::RemovalSummary;
use repowarden::report::{FileType, WebhookCollection};

/// Writes the destination of a generated report.
pub fn write_report_written<W: Write>(
    writer: &mut W,
    path: &Utf8Path,
    file_type: FileType,
    rows: usize,
) -> Result<(), AdminError> {
    writeln!(writer, "Wrote {file_type} report with {rows} entries to {path}")
        .map_err(|e| io_error(&e))
}

/// Writes a per-repository webhook count listing.
pub fn write_webhook_summary<W: Write>(
    writer: &mut W,
    collection: &WebhookCollection,
) -> Result<(), AdminError> {
    writeln!(
        writer,
        "Webhooks across {} repositories ({} hooks):",
        collection.len(),
        collection.hook_count()
    )
    .map_err(|e| io_error(&e))?;

    for (repository, hooks) in collection.iter() {
        writeln!(writer, "  {repository}: {}", hooks.len()).map_err(|e| io_error(&e))?;
        for hook in hooks {
            let url = hook.config.url.as_deref().unwrap_or("(no url)");
            writeln!(writer, "    #{} {url}", hook.id).map_err(|e| io_error(&e))?;
        }
    }

    Ok(())
}

/// Writes the outcome of removing webhooks by host.
pub fn write_removal_summary<W: Write>(
    writer: &mut W,
    host: &str,
    summary: &RemovalSummary,
) -> Result<(), AdminError> {
    writeln!(
        writer,
        "Webhooks for {host}: {} removed, {} failed",
        summary.removed, summary.failed
    )
    .map_err(|e| io_error(&e))?;

    if summary.stopped {
        writeln!(writer, "Stopped early: GitHub returned 403.").map_err(|e| io_error(&e))?;
    }

    Ok(())
}

/// Writes the succeeded and failed repositories of a one-shot command.
pub fn write_admin_summary<W: Write>(
    writer: &mut W,
    operation: &str,
    summary: &AdminSummary,
) -> Result<(), AdminError> {
    writeln!(
        writer,
        "{operation}: {} succeeded, {} failed",
        summary.succeeded.len(),
        summary.failed.len()
    )
    .map_err(|e| io_error(&e))?;

    for repository in &summary.succeeded {
        writeln!(writer, "  ok     {repository}").map_err(|e| io_error(&e))?;
    }
    for (repository, message) in &summary.failed {
        writeln!(writer, "  failed {repository}: {message}").map_err(|e| io_error(&e))?;
    }

    if summary.stopped {
        writeln!(
            writer,
            "Stopped early: rate limit reached, remaining repositories were skipped."
        )
        .map_err(|e| io_error(&e))?;
    }

    Ok(())
}

/// Converts an I/O error to an [`AdminError::Io`].
pub(crate) fn io_error(error: &io::Error) -> AdminError {
    AdminError::Io {
        message: error.to_string(),
    }
}
