//! Destinations for generated report bytes.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::github::AdminError;

/// Writes a generated report to its destination.
#[cfg_attr(test, mockall::automock)]
pub trait ReportWriter: Send + Sync {
    /// Writes `contents` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Io`] when the destination cannot be written.
    fn write_report(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), AdminError>;
}

/// Writes reports to the local filesystem, creating parent directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileReportWriter;

impl ReportWriter for FileReportWriter {
    fn write_report(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), AdminError> {
        let (resolved, mut file) = create_file_with_parents(path)?;
        file.write_all(contents)
            .and_then(|()| file.flush())
            .map_err(|error| AdminError::Io {
                message: format!("failed to write report '{resolved}': {error}"),
            })
    }
}

fn create_file_with_parents(
    path: &Utf8Path,
) -> Result<(Utf8PathBuf, cap_std::fs_utf8::File), AdminError> {
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| AdminError::Io {
        message: format!("invalid report path '{path}': no file name"),
    })?;

    let (dir, rel_parent) = if parent == Utf8Path::new(".") || parent.as_str().is_empty() {
        (open_ambient(".")?, Utf8Path::new("."))
    } else if parent.is_absolute() {
        let rel = parent.strip_prefix("/").map_err(|_| AdminError::Io {
            message: format!("failed to normalise report directory '{parent}'"),
        })?;
        (open_ambient("/")?, rel)
    } else {
        (open_ambient(".")?, parent)
    };

    let target_dir = if !rel_parent.as_str().is_empty() && rel_parent != Utf8Path::new(".") {
        dir.create_dir_all(rel_parent)
            .map_err(|error| AdminError::Io {
                message: format!("failed to create report directory '{parent}': {error}"),
            })?;
        dir.open_dir(rel_parent).map_err(|error| AdminError::Io {
            message: format!("failed to open report directory '{parent}': {error}"),
        })?
    } else {
        dir
    };

    let file = target_dir
        .create(file_name)
        .map_err(|error| AdminError::Io {
            message: format!("failed to create report file '{path}': {error}"),
        })?;

    Ok((path.to_path_buf(), file))
}

fn open_ambient(root: &str) -> Result<Dir, AdminError> {
    Dir::open_ambient_dir(root, ambient_authority()).map_err(|error| AdminError::Io {
        message: format!("failed to open directory '{root}' for reports: {error}"),
    })
}
