//! Newline-separated repository lists for one-shot commands.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::github::{AdminError, RepositoryName};

/// Parses a repository list, one name per line.
///
/// Surrounding whitespace is trimmed; blank lines and lines starting with
/// `#` are skipped.
///
/// # Errors
///
/// Returns [`AdminError::Configuration`] when no repository remains.
pub fn parse_repository_list(contents: &str) -> Result<Vec<RepositoryName>, AdminError> {
    let repositories: Vec<RepositoryName> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(RepositoryName::new)
        .collect::<Result<_, _>>()?;

    if repositories.is_empty() {
        return Err(AdminError::Configuration {
            message: "repository list is empty".to_owned(),
        });
    }
    Ok(repositories)
}

/// Reads and parses the repository list at `path`.
///
/// # Errors
///
/// Returns [`AdminError::Configuration`] when the file cannot be read or
/// lists no repository.
pub fn read_repository_list(path: &Utf8Path) -> Result<Vec<RepositoryName>, AdminError> {
    let unreadable = |detail: String| AdminError::Configuration {
        message: format!("failed to read repository list '{path}': {detail}"),
    };

    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| unreadable("no file name".to_owned()))?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| unreadable(error.to_string()))?;
    let contents = dir
        .read_to_string(file_name)
        .map_err(|error| unreadable(error.to_string()))?;

    parse_repository_list(&contents)
}
